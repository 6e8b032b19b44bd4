use crate::models::payment::Notification;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type NotificationSender = UnboundedSender<Notification>;
pub type NotificationReceiver = UnboundedReceiver<Notification>;

/// Fila sem limite: enfileirar nunca bloqueia o request HTTP.
pub fn create_queue() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}
