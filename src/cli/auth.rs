use std::time::{Duration, Instant};

use crate::{
    Res,
    api::{CallbackState, LoginOutcome},
    backend::BackendClient,
    cli::{render, session_client},
    config, error, info,
    management::SessionStore,
    server::start_api_server,
    success,
    types::UserProfile,
    warning,
};

/// Runs the browser login against the backend.
///
/// The flow:
/// 1. start the local callback server
/// 2. open the backend's login URL in the browser (or print it)
/// 3. the backend sends the browser through Spotify and back to
///    `/auth/callback`, where the code is exchanged for a session
/// 4. the session cookie lands in `client` and is persisted
///
/// Gives up after `FREESOUND_AUTH_TIMEOUT_SECS` (120 s by default).
pub async fn run_login(client: &BackendClient) -> Res<Option<UserProfile>> {
    let state = CallbackState::new(client.clone());

    let server_state = state.clone();
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let login_url = client.login_url();
    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    } else {
        info!("Continue the login in your browser.");
    }

    let timeout = Duration::from_secs(config::auth_timeout_secs());
    let outcome = wait_for_login(&state, timeout).await;

    // let the browser fetch the result page before the server goes away
    tokio::time::sleep(Duration::from_millis(500)).await;
    server.abort();

    match outcome {
        Some(LoginOutcome::Succeeded {
            cookie: Some(cookie),
            user,
        }) => {
            SessionStore::new().persist(&cookie).await?;
            Ok(user)
        }
        Some(LoginOutcome::Succeeded { cookie: None, .. }) => {
            Err("The server accepted the login but did not start a session".into())
        }
        Some(LoginOutcome::Failed(message)) => Err(message.into()),
        None => Err("Authentication timed out".into()),
    }
}

/// Polls the callback state once a second until the handler records an
/// outcome or `max_wait` passes.
async fn wait_for_login(state: &CallbackState, max_wait: Duration) -> Option<LoginOutcome> {
    let pb = render::spinner("Waiting for the browser login...");
    let start = Instant::now();

    while start.elapsed() < max_wait {
        if let Some(outcome) = state.take_outcome().await {
            pb.finish_and_clear();
            return Some(outcome);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    pb.finish_and_clear();
    None
}

pub async fn login() {
    let client = BackendClient::from_config();
    match run_login(&client).await {
        Ok(Some(user)) => success!("Logged in as {}.", user.display_name),
        Ok(None) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed: {}", e),
    }
}

pub async fn logout() {
    let client = session_client().await;
    match client.logout().await {
        Ok(message) if !message.trim().is_empty() => info!("{}", message.trim()),
        Ok(_) => {}
        Err(e) => warning!("The server did not confirm the logout: {}", e),
    }

    if let Err(e) = SessionStore::new().clear().await {
        error!("Failed to remove the stored session: {}", e);
    }
    success!("Logged out.");
}

pub async fn status() {
    let client = session_client().await;
    let pb = render::spinner("Checking session...");
    let result = client.auth_status().await;
    pb.finish_and_clear();

    match result {
        Ok(status) if status.is_authenticated => match status.user {
            Some(user) => success!("Logged in as {} ({}).", user.display_name, user.email),
            None => success!("Logged in."),
        },
        Ok(_) => info!("Not logged in. Run `freesound auth login`."),
        Err(e) if e.is_unauthorized() => info!("Not logged in. Run `freesound auth login`."),
        Err(e) => warning!("Could not reach the server: {}", e),
    }
}
