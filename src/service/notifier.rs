use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives what the client wants the user to see.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    /// The session is gone; the application should route to its login entry point.
    fn redirect_to_login(&self);
}

/// Writes notices to the log. Suitable for headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(notice = %notice.message),
            NoticeLevel::Error => error!(notice = %notice.message),
        }
    }

    fn redirect_to_login(&self) {
        warn!("login required");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Notice(Notice),
    LoginRequired,
}

/// Fans events out to any number of subscribers (e.g. a UI loop).
#[derive(Debug, Clone)]
pub struct EventNotifier {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Build a notifier together with its first subscriber.
    pub fn channel(capacity: usize) -> (Self, broadcast::Receiver<ClientEvent>) {
        let notifier = Self::new(capacity);
        let rx = notifier.subscribe();
        (notifier, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    fn emit(&self, event: ClientEvent) {
        // No subscribers is fine; the event is simply dropped.
        let _ = self.tx.send(event);
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, notice: Notice) {
        self.emit(ClientEvent::Notice(notice));
    }

    fn redirect_to_login(&self) {
        self.emit(ClientEvent::LoginRequired);
    }
}
