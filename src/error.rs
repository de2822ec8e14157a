use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use sqlx::Error as SqlxError;
use std::time::Duration;
use thiserror::Error as ThisError;

/// Shown when the backend rejects the bearer credential.
pub const SESSION_EXPIRED_NOTICE: &str = "Session expired, please log in again";

#[derive(Debug, ThisError)]
pub enum DataplatError {
    #[error("Not authenticated: {}", .detail.as_deref().unwrap_or("credential rejected"))]
    Unauthorized { detail: Option<String> },

    #[error("Backend error with status {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Backend {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Unexpected response payload: {0}")]
    Decode(serde_json::Error),

    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),

    #[error("Session storage error: {0}")]
    Storage(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),
}

/// Coarse failure taxonomy used by the response interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The backend rejected the credential (401).
    Authentication,
    /// Business-rule rejection, server fault, or a payload of the wrong shape.
    Backend,
    /// Timeout or network unreachability; no backend detail exists.
    Transport,
    /// The request could not be built or the local environment is broken.
    Local,
}

impl DataplatError {
    pub fn class(&self) -> FailureClass {
        match self {
            DataplatError::Unauthorized { .. } => FailureClass::Authentication,
            DataplatError::Backend { .. } | DataplatError::Decode(_) => FailureClass::Backend,
            DataplatError::Timeout(_) | DataplatError::Transport(_) => FailureClass::Transport,
            DataplatError::UrlParse(_)
            | DataplatError::Json(_)
            | DataplatError::InvalidHeader(_)
            | DataplatError::InvalidHeaderName(_)
            | DataplatError::Storage(_)
            | DataplatError::Config(_) => FailureClass::Local,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.class() == FailureClass::Authentication
    }

    /// HTTP status of the failed response, when the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DataplatError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            DataplatError::Backend { status, .. } => Some(*status),
            DataplatError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Backend-provided detail message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            DataplatError::Unauthorized { detail } | DataplatError::Backend { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// Text for the user-visible notice.
    ///
    /// Backend detail wins; a backend failure without detail uses the
    /// operation-specific `fallback` when one is given, and everything else
    /// falls back to the transport-level message.
    pub fn notice_message(&self, fallback: Option<&str>) -> String {
        if self.is_unauthorized() {
            return SESSION_EXPIRED_NOTICE.to_string();
        }
        if let Some(detail) = self.detail().filter(|d| !d.trim().is_empty()) {
            return detail.to_string();
        }
        match self {
            DataplatError::Backend { status, .. } => fallback
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16())),
            DataplatError::Decode(_) => fallback
                .map(str::to_string)
                .unwrap_or_else(|| self.to_string()),
            _ => self.to_string(),
        }
    }
}

/// Error body returned by the backend on non-2xx responses.
///
/// `detail` is a plain string for raised errors and a list of
/// `{loc, msg, type}` objects for request-validation failures.
#[derive(Debug, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl BackendErrorBody {
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| {
                        let msg = item.get("msg").and_then(Value::as_str)?;
                        let field = item
                            .get("loc")
                            .and_then(Value::as_array)
                            .and_then(|loc| loc.last())
                            .and_then(Value::as_str);
                        Some(match field {
                            Some(field) => format!("{field}: {msg}"),
                            None => msg.to_string(),
                        })
                    })
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
