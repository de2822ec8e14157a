//! Backend HTTP client: the core in `client`, typed endpoints beside it.

pub mod auth;
pub mod client;
pub mod connections;
pub mod metadata;
pub mod request;

pub use auth::AuthApi;
pub use client::ApiClient;
pub use connections::ConnectionsApi;
pub use metadata::MetadataApi;
pub use request::{ApiRequest, RequestBody};
