use api_types::auth::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, User};
use reqwest::Method;

use crate::{error::Result, transport::Transport};

#[derive(Clone, Debug)]
pub struct AuthApi {
    transport: Transport,
}

impl AuthApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Creates an account. A token in the response starts the session.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .transport
            .send_json(Method::POST, "/api/auth/register", Some(payload))
            .await?;
        self.store_token(&response).await;
        Ok(response)
    }

    /// Logs in. A token in the response starts the session.
    pub async fn login(&self, payload: &LoginRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .transport
            .send_json(Method::POST, "/api/auth/login", Some(payload))
            .await?;
        self.store_token(&response).await;
        Ok(response)
    }

    pub async fn me(&self) -> Result<Option<User>> {
        let response: MeResponse = self.transport.get_json("/api/auth/me").await?;
        Ok(response.user)
    }

    /// Ends the session. The local token is removed even if the call fails.
    pub async fn logout(&self) {
        if let Err(err) = self
            .transport
            .send_unit(Method::POST, "/api/auth/logout", None::<&()>)
            .await
        {
            tracing::warn!("logout request failed: {err}");
        }
        self.transport.session().remove().await;
    }

    async fn store_token(&self, response: &AuthResponse) {
        if let Some(token) = &response.token {
            self.transport.session().set(token.as_str()).await;
            tracing::debug!("session token stored");
        }
    }
}
