use crate::models::payment::{
    Notification, NotificationType, Payment, PaymentStatus, ValidatedPaymentRequest,
};
use crate::utils::money::format_brl;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Probabilidade fixa de aprovação.
pub const APPROVAL_RATE: f64 = 0.8;

pub const DECLINED_MESSAGE: &str = "Pagamento recusado. Tente novamente.";

/// Decide aprovado/recusado e monta o par `Payment` + `Notification`, sem
/// enfileirar nem persistir nada.
pub struct PaymentOutcomeSimulator {
    rng: Mutex<StdRng>,
}

impl PaymentOutcomeSimulator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn simulate(&self, request: ValidatedPaymentRequest) -> (Payment, Notification) {
        let draw: f64 = self.rng.lock().gen();
        let status = if draw < APPROVAL_RATE {
            PaymentStatus::Approved
        } else {
            PaymentStatus::Declined
        };

        let payment = Payment {
            id: generate_id(),
            order_id: request.order_id().to_string(),
            amount: request.amount(),
            method: request.method(),
            status,
            created: Utc::now(),
        };

        let message = match status {
            PaymentStatus::Approved => {
                format!("Pagamento de {} aprovado!", format_brl(payment.amount))
            }
            PaymentStatus::Declined => DECLINED_MESSAGE.to_string(),
        };

        let notification = Notification {
            kind: NotificationType::from(status),
            message,
            data: payment.clone(),
        };

        (payment, notification)
    }
}

impl Default for PaymentOutcomeSimulator {
    fn default() -> Self {
        Self::new()
    }
}

// UUID v4 em vez de timestamp: dois pagamentos no mesmo nanossegundo não colidem
fn generate_id() -> String {
    format!("pay_{}", Uuid::new_v4().simple())
}
