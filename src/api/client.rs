use crate::api::auth::AuthApi;
use crate::api::connections::ConnectionsApi;
use crate::api::metadata::MetadataApi;
use crate::api::request::ApiRequest;
use crate::config::Config;
use crate::error::DataplatError;
use crate::middleware::{auth::attach_credential, response};
use crate::service::notifier::{Notice, Notifier, TracingNotifier};
use crate::service::session::Session;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Single point of egress to the backend.
///
/// Cheap to clone; clones share the HTTP connection pool, the session and the
/// notifier.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    session: Session,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// Create a client with a preconfigured HTTP client.
    pub fn new(
        config: &Config,
        session: Session,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, DataplatError> {
        let timeout = config.request_timeout();
        let http = reqwest::Client::builder()
            .user_agent(concat!("dataplat-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.backend_url.clone(),
            timeout,
            session,
            notifier,
        })
    }

    /// Client that reports through the log only.
    pub fn with_tracing(config: &Config, session: Session) -> Result<Self, DataplatError> {
        Self::new(config, session, Arc::new(TracingNotifier))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn connections(&self) -> ConnectionsApi<'_> {
        ConnectionsApi::new(self)
    }

    pub fn metadata(&self) -> MetadataApi<'_> {
        MetadataApi::new(self)
    }

    pub(crate) fn notify_success(&self, message: &str) {
        self.notifier.notify(Notice::success(message));
    }

    /// Absolute URL for `path`, appended verbatim to the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, DataplatError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Issue `request` and decode the unwrapped payload as `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, DataplatError> {
        let fallback = request.failure_notice();
        let result = match self.dispatch(request).await {
            Ok(body) => response::decode_payload(&body),
            Err(e) => Err(e),
        };
        self.finish(result, fallback).await
    }

    /// Issue `request` and discard whatever payload comes back.
    pub async fn send_unit(&self, request: ApiRequest) -> Result<(), DataplatError> {
        let fallback = request.failure_notice();
        let result = self.dispatch(request).await.map(|_| ());
        self.finish(result, fallback).await
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<Vec<u8>, DataplatError> {
        let url = self.endpoint(request.path())?;
        debug!(method = %request.method(), %url, "dispatching backend request");

        let builder = self.http.request(request.method().clone(), url);
        let builder = attach_credential(builder, &self.session);
        let resp = request
            .apply(builder)
            .send()
            .await
            .map_err(|e| response::classify_transport(e, self.timeout))?;

        response::read_body(resp, self.timeout).await
    }

    async fn finish<T>(
        &self,
        result: Result<T, DataplatError>,
        fallback: Option<&str>,
    ) -> Result<T, DataplatError> {
        if let Err(err) = &result {
            response::handle_failure(err, &self.session, self.notifier.as_ref(), fallback).await;
        }
        result
    }
}
