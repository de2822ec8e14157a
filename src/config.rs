use crate::error::DataplatError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Runtime configuration for the backend client.
///
/// Sources, lowest precedence first:
/// - built-in defaults
/// - `BACKEND_URL`
/// - `DATAPLAT_*` (e.g. `DATAPLAT_BACKEND_URL`, `DATAPLAT_REQUEST_TIMEOUT_MS`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend_url: Url,
    pub request_timeout_ms: u64,
    /// SQLite URL of the durable session store.
    pub session_db: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            session_db: "sqlite:dataplat-session.db".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(
                Env::raw()
                    .only(&["BACKEND_URL"])
                    .map(|_| "backend_url".into()),
            )
            .merge(Env::prefixed("DATAPLAT_"))
    }

    pub fn load() -> Result<Self, DataplatError> {
        Ok(Self::figment().extract()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
