pub mod payment;

pub use payment::{
    Notification, NotificationType, Payment, PaymentMethod, PaymentRequest, PaymentStatus,
    ValidatedPaymentRequest, ValidationError,
};
