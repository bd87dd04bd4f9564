use reqwest::Method;

use super::{ApiError, BackendClient, handle_response, handle_text};
use crate::types::{AuthStatus, ExchangeCodeRequest, ExchangeCodeResponse, UserProfile};

impl BackendClient {
    /// URL the user's browser must visit to start the Spotify login.
    ///
    /// The backend answers it with a redirect to Spotify, which in turn
    /// redirects to the local callback server with `code` and `state`.
    pub fn login_url(&self) -> String {
        self.url("/auth/login")
    }

    /// Ends the backend session. The backend answers with plain text.
    pub async fn logout(&self) -> Result<String, ApiError> {
        let request = self.request(Method::GET, "/auth/logout").await;
        let response = self.send(request).await?;
        handle_text(response).await
    }

    /// Authentication state of the current session.
    pub async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        let request = self.request(Method::GET, "/auth/status").await;
        let response = self.send(request).await?;
        handle_response(response).await
    }

    /// Profile of the logged-in user; a 401 when no session exists.
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let request = self.request(Method::GET, "/api/me").await;
        let response = self.send(request).await?;
        handle_response(response).await
    }

    /// Trades the authorization code from the login redirect for a session.
    ///
    /// On success the backend sets the session cookie, which this client
    /// captures for all subsequent requests.
    pub async fn exchange_code(
        &self,
        code: &str,
        state: &str,
    ) -> Result<ExchangeCodeResponse, ApiError> {
        let body = ExchangeCodeRequest {
            code: code.to_string(),
            state: state.to_string(),
        };
        let request = self.request(Method::POST, "/auth/exchange").await.json(&body);
        let response = self.send(request).await?;
        let exchanged: ExchangeCodeResponse = handle_response(response).await?;

        if !exchanged.success {
            return Err(ApiError::Rejected(
                "The server refused the authorization code".to_string(),
            ));
        }

        Ok(exchanged)
    }
}
