use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::error;

use crate::models::payment::{Payment, PaymentRequest};
use crate::services::{PaymentService, ServiceError};

pub async fn create_payment(
    State(service): State<Arc<PaymentService>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Result<Json<Payment>, Response> {
    let request: PaymentRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            error!("Invalid payment request from {}: {}", addr, e);
            return Err((StatusCode::BAD_REQUEST, "Invalid request").into_response());
        }
    };

    // identidade do cliente = IP, sem a porta efêmera
    let client = addr.ip().to_string();

    service
        .submit_payment(request, &client)
        .map(Json)
        .map_err(IntoResponse::into_response)
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, message).into_response(),
            ServiceError::RateLimited { retry_after, .. } => {
                let retry_secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_secs.to_string())],
                    message,
                )
                    .into_response()
            }
            ServiceError::QueueClosed => {
                (StatusCode::SERVICE_UNAVAILABLE, message).into_response()
            }
        }
    }
}
