use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{backend::BackendClient, types::UserProfile, warning};

const FAILURE_REDIRECT_SECS: u32 = 5;
const SUCCESS_REDIRECT_SECS: u32 = 3;

/// How the browser round trip ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Succeeded {
        /// Session cookie the backend set during the exchange.
        cookie: Option<String>,
        user: Option<UserProfile>,
    },
    Failed(String),
}

/// Shared between the callback handler and the command waiting for it.
#[derive(Clone)]
pub struct CallbackState {
    pub client: BackendClient,
    pub outcome: Arc<Mutex<Option<LoginOutcome>>>,
}

impl CallbackState {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            outcome: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn take_outcome(&self) -> Option<LoginOutcome> {
        self.outcome.lock().await.take()
    }

    async fn finish(&self, outcome: LoginOutcome) {
        *self.outcome.lock().await = Some(outcome);
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Html<String> {
    let (Some(code), Some(auth_state)) = (params.get("code"), params.get("state")) else {
        state
            .finish(LoginOutcome::Failed(
                "Missing authentication parameters".to_string(),
            ))
            .await;
        return failure_page("Missing authentication parameters");
    };

    match state.client.exchange_code(code, auth_state).await {
        Ok(exchanged) => {
            let cookie = state.client.session_cookie().await;
            let page = success_page(exchanged.user.as_ref());
            state
                .finish(LoginOutcome::Succeeded {
                    cookie,
                    user: exchanged.user,
                })
                .await;
            page
        }
        Err(e) => {
            warning!("Code exchange failed: {}", e);
            let message = e.to_string();
            let page = failure_page(&message);
            state.finish(LoginOutcome::Failed(message)).await;
            page
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html("<h2>freesound</h2><p>You can close this window and return to the terminal.</p>")
}

fn failure_page(message: &str) -> Html<String> {
    Html(format!(
        "<html><head><meta http-equiv=\"refresh\" content=\"{secs};url=/\"></head>\
         <body><h2>Authentication failed</h2><p>{message}</p>\
         <p>Redirecting in {secs} seconds...</p></body></html>",
        secs = FAILURE_REDIRECT_SECS,
        message = escape(message),
    ))
}

fn success_page(user: Option<&UserProfile>) -> Html<String> {
    let greeting = match user {
        Some(user) if !user.display_name.is_empty() => format!("Welcome, {}!", escape(&user.display_name)),
        _ => "Welcome!".to_string(),
    };
    Html(format!(
        "<html><head><meta http-equiv=\"refresh\" content=\"{secs};url=/\"></head>\
         <body><h2>{greeting}</h2><p>Login successful.</p>\
         <p>Redirecting in {secs} seconds...</p></body></html>",
        secs = SUCCESS_REDIRECT_SECS,
    ))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
