use crate::models::payment::{Payment, PaymentRequest, PaymentStatus, ValidationError};
use crate::queue::NotificationSender;
use crate::services::atomic_metrics::AtomicMetrics;
use crate::services::outcome_simulator::PaymentOutcomeSimulator;
use crate::services::rate_limiter::RateLimiter;
use crate::services::subscriber_registry::{NotificationSink, SubscriberId, SubscriberRegistry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Muitas tentativas. Aguarde {} segundos.", cooldown_secs(.cooldown))]
    RateLimited {
        retry_after: Duration,
        cooldown: Duration,
    },
    #[error("notification queue is closed")]
    QueueClosed,
}

fn cooldown_secs(cooldown: &Duration) -> u64 {
    cooldown.as_secs_f64().ceil() as u64
}

/// Valida, simula o resultado, enfileira a notificação e devolve o pagamento.
pub struct PaymentService {
    simulator: PaymentOutcomeSimulator,
    registry: Arc<SubscriberRegistry>,
    notification_sender: NotificationSender,
    rate_limiter: RateLimiter,
    metrics: Arc<AtomicMetrics>,
}

impl PaymentService {
    pub fn new(
        simulator: PaymentOutcomeSimulator,
        registry: Arc<SubscriberRegistry>,
        notification_sender: NotificationSender,
        rate_limiter: RateLimiter,
        metrics: Arc<AtomicMetrics>,
    ) -> Self {
        Self {
            simulator,
            registry,
            notification_sender,
            rate_limiter,
            metrics,
        }
    }

    pub fn submit_payment(
        &self,
        request: PaymentRequest,
        client: &str,
    ) -> Result<Payment, ServiceError> {
        let start = Instant::now();
        self.metrics.increment_requests();

        let result = self.process(request, client);
        self.metrics.record_processing_time(start.elapsed());
        result
    }

    fn process(&self, request: PaymentRequest, client: &str) -> Result<Payment, ServiceError> {
        if let Err(retry_after) = self.rate_limiter.check(client) {
            self.metrics.increment_throttled();
            warn!("Client {} throttled, retry in {:?}", client, retry_after);
            return Err(ServiceError::RateLimited {
                retry_after,
                cooldown: self.rate_limiter.cooldown(),
            });
        }

        let validated = request.validate().map_err(|e| {
            self.metrics.increment_rejected();
            warn!("Rejected payment request from {}: {}", client, e);
            e
        })?;

        let (payment, notification) = self.simulator.simulate(validated);

        match payment.status {
            PaymentStatus::Approved => self.metrics.increment_approved(),
            PaymentStatus::Declined => self.metrics.increment_declined(),
        }

        self.notification_sender.send(notification).map_err(|_| {
            error!("Notification queue closed, payment {} not announced", payment.id);
            ServiceError::QueueClosed
        })?;

        info!(
            "Payment {} for order {} {:?} ({} {})",
            payment.id, payment.order_id, payment.status, payment.method, payment.amount
        );

        Ok(payment)
    }

    pub fn on_subscriber_connected(&self, sink: Arc<dyn NotificationSink>) -> SubscriberId {
        self.registry.add(sink)
    }

    pub fn on_subscriber_disconnected(&self, id: SubscriberId) {
        self.registry.remove(id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    pub fn metrics(&self) -> &AtomicMetrics {
        &self.metrics
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
