use crate::error::{BackendErrorBody, DataplatError, FailureClass, SESSION_EXPIRED_NOTICE};
use crate::service::notifier::{Notice, Notifier};
use crate::service::session::Session;
use crate::types::envelope::unwrap_payload;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Map a transport-level failure, distinguishing timeouts.
pub fn classify_transport(err: reqwest::Error, timeout: Duration) -> DataplatError {
    if err.is_timeout() {
        DataplatError::Timeout(timeout)
    } else {
        DataplatError::Transport(err)
    }
}

/// Read the body of a response, turning non-2xx statuses into classified errors.
pub async fn read_body(resp: Response, timeout: Duration) -> Result<Vec<u8>, DataplatError> {
    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| classify_transport(e, timeout))?;

    if status.is_success() {
        return Ok(body.to_vec());
    }

    let detail = serde_json::from_slice::<BackendErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail_message());
    debug!(status = status.as_u16(), detail = ?detail, "backend rejected request");

    Err(match status {
        StatusCode::UNAUTHORIZED => DataplatError::Unauthorized { detail },
        _ => DataplatError::Backend { status, detail },
    })
}

/// Incoming interceptor, success path: strip the envelope and decode `T`.
pub fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, DataplatError> {
    unwrap_payload(body).map_err(DataplatError::Decode)
}

/// Incoming interceptor, failure path.
///
/// Authentication failures tear the session down and ask for the login
/// screen. Every failure that reached (or tried to reach) the backend yields
/// exactly one notice.
pub async fn handle_failure(
    err: &DataplatError,
    session: &Session,
    notifier: &dyn Notifier,
    fallback: Option<&str>,
) {
    match err.class() {
        FailureClass::Authentication => {
            warn!(error = %err, "credential rejected; clearing session");
            session.clear().await;
            notifier.notify(Notice::error(SESSION_EXPIRED_NOTICE));
            notifier.redirect_to_login();
        }
        FailureClass::Backend | FailureClass::Transport => {
            warn!(error = %err, "backend call failed");
            notifier.notify(Notice::error(err.notice_message(fallback)));
        }
        FailureClass::Local => {
            warn!(error = %err, "request could not be issued");
        }
    }
}
