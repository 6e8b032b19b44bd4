use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    Boleto,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Pix,
        PaymentMethod::Boleto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Boleto => "boleto",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidMethod(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Approved,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created: DateTime<Utc>,
}

/// Payload cru recebido do storefront. Campos ausentes viram valores vazios
/// e são rejeitados em `validate`, não na decodificação.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub method: String,
}

// só sai de `PaymentRequest::validate`
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPaymentRequest {
    order_id: String,
    amount: f64,
    method: PaymentMethod,
}

impl ValidatedPaymentRequest {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Dados de pagamento inválidos: orderId é obrigatório")]
    EmptyOrderId,
    #[error("Dados de pagamento inválidos: amount deve ser maior que zero")]
    NonPositiveAmount,
    #[error("Dados de pagamento inválidos: method é obrigatório")]
    EmptyMethod,
    #[error("Método de pagamento inválido: {0}")]
    InvalidMethod(String),
}

impl PaymentRequest {
    pub fn new(order_id: impl Into<String>, amount: f64, method: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
            method: method.into(),
        }
    }

    pub fn validate(self) -> Result<ValidatedPaymentRequest, ValidationError> {
        if self.order_id.is_empty() {
            return Err(ValidationError::EmptyOrderId);
        }
        // NaN falha na comparação, por isso o is_finite
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.method.is_empty() {
            return Err(ValidationError::EmptyMethod);
        }
        let method = self.method.parse::<PaymentMethod>()?;

        Ok(ValidatedPaymentRequest {
            order_id: self.order_id,
            amount: self.amount,
            method,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    PaymentSuccess,
    PaymentFailed,
}

impl From<PaymentStatus> for NotificationType {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Approved => NotificationType::PaymentSuccess,
            PaymentStatus::Declined => NotificationType::PaymentFailed,
        }
    }
}

/// Mensagem enviada aos subscribers de `/ws`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    pub data: Payment,
}

impl Notification {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_payment() -> Payment {
        Payment {
            id: "pay_1".to_string(),
            order_id: "o1".to_string(),
            amount: 100.0,
            method: PaymentMethod::Pix,
            status: PaymentStatus::Approved,
            created: Utc::now(),
        }
    }

    #[test]
    fn test_parse_methods() {
        assert_eq!("credit_card".parse::<PaymentMethod>(), Ok(PaymentMethod::CreditCard));
        assert_eq!("debit_card".parse::<PaymentMethod>(), Ok(PaymentMethod::DebitCard));
        assert_eq!("pix".parse::<PaymentMethod>(), Ok(PaymentMethod::Pix));
        assert_eq!("boleto".parse::<PaymentMethod>(), Ok(PaymentMethod::Boleto));
        assert_eq!(
            "PIX".parse::<PaymentMethod>(),
            Err(ValidationError::InvalidMethod("PIX".to_string()))
        );
    }

    #[test]
    fn test_validate_accepts_valid_request() {
        let validated = PaymentRequest::new("o1", 100.0, "pix").validate().unwrap();
        assert_eq!(validated.order_id(), "o1");
        assert_eq!(validated.amount(), 100.0);
        assert_eq!(validated.method(), PaymentMethod::Pix);
    }

    #[test]
    fn test_validate_rejects_invalid_fields() {
        assert_eq!(
            PaymentRequest::new("", 100.0, "pix").validate(),
            Err(ValidationError::EmptyOrderId)
        );
        assert_eq!(
            PaymentRequest::new("o1", 0.0, "pix").validate(),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            PaymentRequest::new("o1", -5.0, "pix").validate(),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            PaymentRequest::new("o1", f64::NAN, "pix").validate(),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            PaymentRequest::new("o1", 10.0, "").validate(),
            Err(ValidationError::EmptyMethod)
        );
        assert_eq!(
            PaymentRequest::new("o1", 10.0, "cash").validate(),
            Err(ValidationError::InvalidMethod("cash".to_string()))
        );
    }

    #[test]
    fn test_missing_fields_decode_then_fail_validation() {
        let request: PaymentRequest = serde_json::from_str(r#"{"amount": 10}"#).unwrap();
        assert_eq!(request.validate(), Err(ValidationError::EmptyOrderId));
    }

    #[test]
    fn test_notification_wire_shape() {
        let notification = Notification {
            kind: NotificationType::PaymentSuccess,
            message: "Pagamento de R$100.00 aprovado!".to_string(),
            data: sample_payment(),
        };

        let value: serde_json::Value =
            serde_json::from_str(&notification.to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "payment_success");
        assert_eq!(value["message"], "Pagamento de R$100.00 aprovado!");
        assert_eq!(value["data"]["id"], "pay_1");
        assert_eq!(value["data"]["orderId"], "o1");
        assert_eq!(value["data"]["amount"], 100.0);
        assert_eq!(value["data"]["method"], "pix");
        assert_eq!(value["data"]["status"], "approved");
        assert!(value["data"]["created"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_notification_type_follows_status() {
        assert_eq!(
            NotificationType::from(PaymentStatus::Approved),
            NotificationType::PaymentSuccess
        );
        assert_eq!(
            NotificationType::from(PaymentStatus::Declined),
            NotificationType::PaymentFailed
        );
    }

    proptest! {
        #[test]
        fn prop_unknown_methods_are_rejected(method in "[a-z_]{1,12}") {
            prop_assume!(!PaymentMethod::ALL.iter().any(|m| m.as_str() == method));
            let result = PaymentRequest::new("o1", 10.0, method.clone()).validate();
            prop_assert_eq!(result, Err(ValidationError::InvalidMethod(method)));
        }

        #[test]
        fn prop_non_positive_amounts_are_rejected(amount in -1.0e9f64..=0.0) {
            let result = PaymentRequest::new("o1", amount, "pix").validate();
            prop_assert_eq!(result, Err(ValidationError::NonPositiveAmount));
        }
    }
}
