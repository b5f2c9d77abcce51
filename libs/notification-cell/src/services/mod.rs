pub mod email;
pub mod inbox;

pub use email::EmailClient;
pub use inbox::NotificationService;
