pub mod notification_queue;

pub use notification_queue::{create_queue, NotificationReceiver, NotificationSender};
