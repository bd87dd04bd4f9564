use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};

use crate::{Res, api, api::CallbackState, config};

/// Routes of the login callback server.
pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/auth/callback", get(api::callback).layer(Extension(state)))
}

/// Serves [`router`] on the configured callback address until the task is
/// dropped.
pub async fn start_api_server(state: CallbackState) -> Res<()> {
    let addr = SocketAddr::from_str(&config::callback_addr())
        .map_err(|e| format!("Failed to parse callback address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind callback server on {}: {}", addr, e))?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
