use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::error::DataplatError;
use crate::types::auth::{LoginRequest, ResetPasswordRequest, TokenResponse, User, UserCreate};
use tracing::{info, warn};

pub const LOGIN_PATH: &str = "/auth/front_token";
pub const CURRENT_USER_PATH: &str = "/auth/me";
pub const REGISTER_PATH: &str = "/auth/register";
pub const RESET_PASSWORD_PATH: &str = "/auth/reset-password";

/// Authentication endpoints and the session transitions they drive.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange username/password for a bearer token and store it.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, DataplatError> {
        let req = ApiRequest::post(LOGIN_PATH)
            .form([
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .on_failure("Login failed");
        let token: TokenResponse = self.client.send(req).await?;

        if token.access_token.is_empty() {
            warn!(username = %credentials.username, "login succeeded without an access token");
        } else {
            self.client.session().set(token.access_token.clone()).await;
            info!(username = %credentials.username, "logged in");
        }
        Ok(token)
    }

    pub async fn current_user(&self) -> Result<User, DataplatError> {
        self.client
            .send(ApiRequest::get(CURRENT_USER_PATH).on_failure("Failed to fetch current user"))
            .await
    }

    /// Forget the stored token. No backend call is made.
    pub async fn logout(&self) {
        self.client.session().clear().await;
        info!("logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    pub async fn register(&self, user: &UserCreate) -> Result<User, DataplatError> {
        let req = ApiRequest::post(REGISTER_PATH)
            .json(user)?
            .on_failure("Registration failed");
        let created: User = self.client.send(req).await?;
        info!(username = %created.username, "user registered");
        Ok(created)
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), DataplatError> {
        let req = ApiRequest::post(RESET_PASSWORD_PATH)
            .json(request)?
            .on_failure("Failed to reset password");
        self.client.send_unit(req).await?;
        self.client.notify_success("Password reset successful");
        Ok(())
    }
}
