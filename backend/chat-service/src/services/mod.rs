pub mod chat_service;
pub mod fanout;
pub mod notification_service;

pub use chat_service::{ChatService, SendMessage};
pub use fanout::EventFanout;
pub use notification_service::NotificationService;
