use crate::db::SessionStorage;
use crate::error::DataplatError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Durable key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Holder of the single bearer credential.
///
/// Cloning yields another handle to the same session. Reads only touch
/// memory; writes update memory first and then the durable storage, if any.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    token: RwLock<Option<String>>,
    storage: Option<SessionStorage>,
}

impl Session {
    /// Session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Session backed by `storage`, restoring any persisted token.
    pub async fn open(storage: SessionStorage) -> Result<Self, DataplatError> {
        let token = storage.load(ACCESS_TOKEN_KEY).await?;
        info!(restored = token.is_some(), "session opened");
        Ok(Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                storage: Some(storage),
            }),
        })
    }

    /// Replace the current token.
    pub async fn set(&self, token: impl Into<String>) {
        let token = token.into();
        *self.inner.token.write() = Some(token.clone());
        if let Some(storage) = &self.inner.storage
            && let Err(e) = storage.store(ACCESS_TOKEN_KEY, &token).await
        {
            warn!(error = %e, "failed to persist access token; keeping it in memory only");
        }
        debug!("access token stored");
    }

    pub fn get(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    /// Drop the current token. Clearing an empty session is a no-op.
    pub async fn clear(&self) {
        let previous = self.inner.token.write().take();
        if let Some(storage) = &self.inner.storage
            && let Err(e) = storage.remove(ACCESS_TOKEN_KEY).await
        {
            warn!(error = %e, "failed to remove persisted access token");
        }
        if previous.is_some() {
            debug!("access token cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.token.read().is_some()
    }
}
