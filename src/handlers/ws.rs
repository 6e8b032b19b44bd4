use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::services::{DeliveryError, NotificationSink, PaymentService};

pub async fn subscribe(
    ws: WebSocketUpgrade,
    State(service): State<Arc<PaymentService>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: Arc<PaymentService>) {
    let (sender, mut receiver) = socket.split();
    let id = service.on_subscriber_connected(Arc::new(WebSocketSink::new(sender)));

    // Subscribers não enviam dados: o loop só detecta o fechamento
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Subscriber {} read error: {}", id, e);
                break;
            }
        }
    }

    service.on_subscriber_disconnected(id);
}

/// Metade de escrita de um WebSocket registrada como subscriber.
pub struct WebSocketSink {
    sender: Mutex<SplitSink<WebSocket, Message>>,
}

impl WebSocketSink {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

#[async_trait]
impl NotificationSink for WebSocketSink {
    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        self.sender
            .lock()
            .await
            .send(Message::Text(payload.to_owned().into()))
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }

    async fn close(&self) {
        if let Err(e) = self.sender.lock().await.close().await {
            debug!("Error closing subscriber socket: {}", e);
        }
    }
}
