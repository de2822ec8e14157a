use crate::service::session::Session;
use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, HeaderMap};

/// Outgoing interceptor: attach the session's bearer token, if any.
///
/// Requests are otherwise left untouched.
pub fn attach_credential(builder: RequestBuilder, session: &Session) -> RequestBuilder {
    match session.get() {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())?;
    let auth = auth.trim();
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
