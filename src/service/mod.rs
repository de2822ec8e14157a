pub mod notifier;
pub mod session;

pub use notifier::{ClientEvent, EventNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use session::Session;
