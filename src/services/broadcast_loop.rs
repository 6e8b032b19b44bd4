use crate::models::payment::Notification;
use crate::queue::NotificationReceiver;
use crate::services::atomic_metrics::AtomicMetrics;
use crate::services::subscriber_registry::{DeliveryError, SubscriberRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Único consumidor da fila de notificações. Serializa cada notificação uma
/// vez e escreve em cada subscriber do snapshot, um por vez; quem falhar ou
/// estourar `write_timeout` é removido e fechado.
pub struct BroadcastLoop {
    registry: Arc<SubscriberRegistry>,
    receiver: NotificationReceiver,
    write_timeout: Duration,
    metrics: Arc<AtomicMetrics>,
}

impl BroadcastLoop {
    pub fn new(
        registry: Arc<SubscriberRegistry>,
        receiver: NotificationReceiver,
        write_timeout: Duration,
        metrics: Arc<AtomicMetrics>,
    ) -> Self {
        Self {
            registry,
            receiver,
            write_timeout,
            metrics,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Roda até todos os senders serem descartados, o que só acontece no
    /// encerramento do processo.
    pub async fn run(mut self) {
        info!("Starting notification broadcast loop");

        while let Some(notification) = self.receiver.recv().await {
            self.broadcast(&notification).await;
        }

        info!("Notification queue closed, broadcast loop stopped");
    }

    pub async fn broadcast(&self, notification: &Notification) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        let payload = match notification.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize notification for payment {}: {}", notification.data.id, e);
                return report;
            }
        };

        self.metrics.increment_broadcasts();

        let subscribers = self.registry.snapshot();
        if subscribers.is_empty() {
            return report;
        }

        for (id, sink) in subscribers {
            let result = match tokio::time::timeout(self.write_timeout, sink.deliver(&payload)).await {
                Ok(result) => result,
                Err(_) => Err(DeliveryError::Timeout(self.write_timeout)),
            };

            match result {
                Ok(()) => {
                    report.delivered += 1;
                    self.metrics.increment_delivered();
                }
                Err(e) => {
                    report.failed += 1;
                    self.metrics.increment_delivery_failed();
                    warn!("Dropping subscriber {}: {}", id, e);
                    self.registry.remove(id);
                    // o close também escreve no socket travado
                    if tokio::time::timeout(self.write_timeout, sink.close()).await.is_err() {
                        warn!("Subscriber {} did not close within {:?}", id, self.write_timeout);
                    }
                }
            }
        }

        info!(
            "Notification {:?} for payment {} delivered to {} subscriber(s), {} failed",
            notification.kind, notification.data.id, report.delivered, report.failed
        );

        report
    }
}
