pub mod atomic_metrics;
pub mod broadcast_loop;
pub mod outcome_simulator;
pub mod payment_service;
pub mod rate_limiter;
pub mod subscriber_registry;

pub use atomic_metrics::AtomicMetrics;
pub use broadcast_loop::{BroadcastLoop, BroadcastReport};
pub use outcome_simulator::PaymentOutcomeSimulator;
pub use payment_service::{PaymentService, ServiceError};
pub use rate_limiter::RateLimiter;
pub use subscriber_registry::{
    ChannelSink, DeliveryError, NotificationSink, SubscriberId, SubscriberRegistry,
};
