use axum::{extract::State, response::Json};
use chrono::Utc;
use std::sync::Arc;

use crate::services::PaymentService;

pub async fn health_check(
    State(service): State<Arc<PaymentService>>,
) -> Json<serde_json::Value> {
    let metrics = service.metrics();

    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "service": "payments",
        "requestCount": metrics.get_requests(),
        "avgProcessingTimeMs": metrics.avg_processing_ms(),
        "subscribers": service.subscriber_count(),
    }))
}
