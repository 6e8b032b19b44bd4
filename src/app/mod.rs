pub mod config;
pub mod middleware;

use axum::{
    http::header::InvalidHeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use crate::handlers::{health, metrics, payments, ws};
use crate::queue::create_queue;
use crate::services::{
    AtomicMetrics, BroadcastLoop, PaymentOutcomeSimulator, PaymentService, RateLimiter,
    SubscriberRegistry,
};
use config::Config;
use middleware::CorsPolicy;

/// Monta o núcleo e dispara o broadcast loop.
pub fn start(config: &Config) -> (Arc<PaymentService>, JoinHandle<()>) {
    start_with_simulator(config, PaymentOutcomeSimulator::new())
}

pub fn start_with_simulator(
    config: &Config,
    simulator: PaymentOutcomeSimulator,
) -> (Arc<PaymentService>, JoinHandle<()>) {
    let registry = Arc::new(SubscriberRegistry::new());
    let metrics = Arc::new(AtomicMetrics::new());
    let (notification_sender, notification_receiver) = create_queue();

    let broadcast = BroadcastLoop::new(
        registry.clone(),
        notification_receiver,
        config.delivery_timeout(),
        metrics.clone(),
    )
    .spawn();

    let service = Arc::new(PaymentService::new(
        simulator,
        registry,
        notification_sender,
        RateLimiter::new(config.rate_limit_cooldown()),
        metrics,
    ));

    (service, broadcast)
}

pub fn router(service: Arc<PaymentService>, config: &Config) -> Result<Router, InvalidHeaderValue> {
    let cors = CorsPolicy::new(&config.allowed_origin)?;

    Ok(Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::get_metrics))
        .route("/api/payments", post(payments::create_payment))
        .route("/ws", get(ws::subscribe))
        .with_state(service)
        .layer(from_fn_with_state(cors, middleware::cors))
        .layer(from_fn(middleware::security_headers))
        .layer(from_fn(middleware::log_requests)))
}

/// Remove periodicamente clientes cujo cooldown já expirou.
pub fn spawn_rate_limit_pruner(service: Arc<PaymentService>, every: Duration) -> Option<JoinHandle<()>> {
    if !service.rate_limiter().is_enabled() {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let pruned = service.rate_limiter().prune();
            if pruned > 0 {
                info!("Rate limiter pruned {} idle clients", pruned);
            }
        }
    }))
}
