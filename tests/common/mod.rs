#![allow(dead_code)]

use futures::StreamExt;
use payment_notifier::app::{self, config::Config};
use payment_notifier::services::{PaymentOutcomeSimulator, PaymentService};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type Subscriber = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub service: Arc<PaymentService>,
}

impl TestServer {
    pub async fn start(rate_limit_cooldown_ms: u64) -> Self {
        let config = Config {
            rate_limit_cooldown_ms,
            delivery_timeout_ms: 1000,
            ..Config::default()
        };
        let (service, _broadcast) =
            app::start_with_simulator(&config, PaymentOutcomeSimulator::with_seed(3));
        let router = app::router(service.clone(), &config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self { addr, service }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Conecta um subscriber e espera o registro no servidor.
    pub async fn subscribe(&self) -> Subscriber {
        let expected = self.service.subscriber_count() + 1;
        let (socket, _) = connect_async(format!("ws://{}/ws", self.addr)).await.unwrap();
        self.wait_for_subscribers(expected).await;
        socket
    }

    pub async fn wait_for_subscribers(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.service.subscriber_count() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("subscriber count never reached expected value");
    }
}

pub async fn next_text(socket: &mut Subscriber, wait: Duration) -> Option<String> {
    let frame = tokio::time::timeout(wait, async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => return Some(text),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    frame.ok().flatten()
}
