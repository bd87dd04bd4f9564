//! # Backend Module
//!
//! Client for the streaming backend the front end talks to. The backend owns
//! everything remote: the Spotify login, the catalog search, artist and album
//! lookups, the user's library, recommendations and the audio bytes. This
//! module only consumes its HTTP contract.
//!
//! ## Architecture
//!
//! ```text
//! CLI / Shell / Player
//!          ↓
//! BackendClient (session cookie, error mapping)
//!     ├── auth            login URL, logout, status, me, code exchange
//!     ├── search          polymorphic catalog search
//!     ├── catalog         artist and album details, home content, top artists
//!     ├── library         user playlists and paginated playlist tracks
//!     ├── recommendations seeded track recommendations
//!     └── stream          stream URL construction (no request is made)
//!          ↓
//! reqwest → backend HTTP API
//! ```
//!
//! ## Session Credentials
//!
//! The backend identifies the user by a session cookie it sets during the
//! code exchange. `BackendClient` remembers every `Set-Cookie` it sees and
//! replays the cookies on each request, the way a browser does with
//! `credentials: "include"`. The cookie value is persisted between runs by
//! [`crate::management::SessionStore`].
//!
//! ## Error Handling
//!
//! Any non-2xx response becomes a single [`ApiError::Status`] whose message
//! is taken, in order, from the JSON `error` field, the JSON `message` field,
//! the plain-text body, or the HTTP reason phrase. Nothing is retried.

mod auth;
mod catalog;
mod library;
mod recommendations;
mod search;
mod stream;

use std::{fmt, sync::Arc};

use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{COOKIE, SET_COOKIE},
};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::config;

pub use stream::stream_url;

#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout...).
    Transport(reqwest::Error),
    /// The backend answered with a non-2xx status.
    Status { status: StatusCode, message: String },
    /// The backend answered 2xx but flagged the payload as unsuccessful.
    Rejected(String),
    /// The body could not be decoded into the expected shape.
    Decode(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "network error: {}", e),
            ApiError::Status { message, .. } => write!(f, "{}", message),
            ApiError::Rejected(message) => write!(f, "{}", message),
            ApiError::Decode(e) => write!(f, "unexpected response from server: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err)
    }
}

impl ApiError {
    /// `true` when the backend refused the request for lack of a session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Status {
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        )
    }
}

/// Handle to the backend. Cheap to clone; clones share the session cookie.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    session: Arc<Mutex<Option<String>>>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_session(base_url, None)
    }

    pub fn with_session(base_url: impl Into<String>, cookie: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Arc::new(Mutex::new(cookie)),
        }
    }

    /// Client for the configured backend URL, without a session.
    pub fn from_config() -> Self {
        Self::new(config::backend_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn session_cookie(&self) -> Option<String> {
        self.session.lock().await.clone()
    }

    pub async fn set_session_cookie(&self, cookie: Option<String>) {
        *self.session.lock().await = cookie;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.lock().await.as_deref() {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    /// Sends the request and folds any `Set-Cookie` headers into the session.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        if !set_cookies.is_empty() {
            let mut session = self.session.lock().await;
            *session = merge_cookies(session.as_deref(), &set_cookies);
        }

        Ok(response)
    }
}

/// Decodes a JSON response body, turning non-2xx statuses into [`ApiError::Status`].
pub(crate) async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            message: error_message(status, &body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Like [`handle_response`] for endpoints answering with plain text.
pub(crate) async fn handle_text(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            message: error_message(status, &body),
        });
    }

    Ok(body)
}

/// Best-effort human message for a failed response body.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = json.get(key).and_then(|v| v.as_str()) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
    }

    let text = body.trim();
    if !text.is_empty() && !text.starts_with('{') {
        return text.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| "Unknown server error".to_string())
}

/// Applies `Set-Cookie` header values to a `Cookie` header value.
///
/// Attributes (`Path`, `HttpOnly`, ...) are dropped; a cookie set to an empty
/// value is removed. Returns `None` once no cookie is left.
pub fn merge_cookies(existing: Option<&str>, set_cookies: &[String]) -> Option<String> {
    let mut jar: Vec<(String, String)> = existing
        .unwrap_or_default()
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    for set_cookie in set_cookies {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() {
            continue;
        }

        jar.retain(|(n, _)| n != name);
        if !value.is_empty() {
            jar.push((name.to_string(), value.to_string()));
        }
    }

    if jar.is_empty() {
        return None;
    }

    Some(
        jar.iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
