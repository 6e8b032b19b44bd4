use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub type SubscriberId = u64;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("subscriber connection closed")]
    Closed,
    #[error("write timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Primitiva `deliver` fornecida pela camada de streaming.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError>;

    // chamado quando o subscriber é descartado por falha de escrita
    async fn close(&self) {}
}

pub struct ChannelSink {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }

    pub fn pair() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        self.sender
            .send(payload.to_string())
            .map_err(|_| DeliveryError::Closed)
    }
}

/// Conjunto de subscribers conectados. Add/remove podem vir do accept do
/// WebSocket, da leitura que falhou e do broadcast loop ao mesmo tempo.
pub struct SubscriberRegistry {
    subscribers: DashMap<SubscriberId, Arc<dyn NotificationSink>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn add(&self, sink: Arc<dyn NotificationSink>) -> SubscriberId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, sink);
        info!("Subscriber {} connected ({} active)", id, self.len());
        id
    }

    // remover um id ausente é no-op
    pub fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            info!("Subscriber {} removed ({} active)", id, self.len());
        } else {
            debug!("Subscriber {} already removed", id);
        }
        removed
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Cópia dos membros atuais, em ordem de conexão. Nenhum lock fica preso,
    /// então dá para remover membros enquanto o snapshot é percorrido.
    pub fn snapshot(&self) -> Vec<(SubscriberId, Arc<dyn NotificationSink>)> {
        let mut members: Vec<_> = self
            .subscribers
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        members.sort_unstable_by_key(|(id, _)| *id);
        members
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
