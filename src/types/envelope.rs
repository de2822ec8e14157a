use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Backend envelope wrapper: `{code, message, data}`.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub code: i64,
    pub message: String,
    pub data: T,
}

/// Parse raw JSON bytes into the payload type, unwrapping the envelope when present.
///
/// Some endpoints answer with the bare payload; those are accepted as-is. When
/// the body is an envelope, errors refer to its `data` member.
pub fn unwrap_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    match serde_json::from_slice::<ResponseEnvelope<serde_json::Value>>(body) {
        Ok(envelope) => serde_json::from_value(envelope.data),
        Err(_) => serde_json::from_slice::<T>(body),
    }
}
