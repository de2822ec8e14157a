pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod service;
pub mod types;

pub use api::ApiClient;
pub use config::Config;
pub use error::{DataplatError, FailureClass};
pub use service::{ClientEvent, EventNotifier, Notice, Notifier, Session, TracingNotifier};
