use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::services::PaymentService;

pub async fn get_metrics(
    State(service): State<Arc<PaymentService>>,
) -> Json<serde_json::Value> {
    let metrics = service.metrics();
    let requests = metrics.get_requests();
    let approved = metrics.get_approved();
    let declined = metrics.get_declined();

    Json(serde_json::json!({
        "requests": requests,
        "approved": approved,
        "declined": declined,
        "rejected": metrics.get_rejected(),
        "throttled": metrics.get_throttled(),
        "approval_rate": if approved + declined > 0 {
            (approved as f64 / (approved + declined) as f64) * 100.0
        } else {
            0.0
        },
        "avg_processing_ms": metrics.avg_processing_ms(),
        "broadcast": {
            "notifications": metrics.get_broadcasts(),
            "delivered": metrics.get_delivered(),
            "failed": metrics.get_delivery_failed(),
            "subscribers": service.subscriber_count(),
        },
        "rate_limiter": {
            "enabled": service.rate_limiter().is_enabled(),
            "tracked_clients": service.rate_limiter().tracked_clients(),
        }
    }))
}
