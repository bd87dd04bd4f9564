//! Configuration management for the Freesound terminal client.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Every accessor falls back to a
//! default so a fresh install talks to a backend on localhost without any
//! setup:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5501";
pub const DEFAULT_CALLBACK_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 15;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `freesound` data directory if needed. A missing `.env` file is
/// not an error since every setting has a default; a present but unreadable
/// one is.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/freesound/.env`
/// - macOS: `~/Library/Application Support/freesound/.env`
/// - Windows: `%LOCALAPPDATA%/freesound/.env`
///
/// # Example
///
/// ```
/// use freesound::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of everything the client stores locally.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("freesound");
    path
}

/// Base URL of the streaming backend, without a trailing slash.
///
/// Reads `FREESOUND_BACKEND_URL`, defaulting to `http://127.0.0.1:5501`.
pub fn backend_url() -> String {
    env::var("FREESOUND_BACKEND_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
}

/// Address the local login callback server binds to.
///
/// Reads `FREESOUND_CALLBACK_ADDRESS`, defaulting to `127.0.0.1:3000`. The
/// backend must be configured to redirect to `http://<address>/auth/callback`.
pub fn callback_addr() -> String {
    env::var("FREESOUND_CALLBACK_ADDRESS").unwrap_or_else(|_| DEFAULT_CALLBACK_ADDRESS.to_string())
}

/// How many recommended tracks to request when a track is played without a list.
pub fn recommendation_limit() -> u32 {
    parsed_or("FREESOUND_RECOMMENDATION_LIMIT", DEFAULT_RECOMMENDATION_LIMIT)
}

/// Whether the queue advances on its own when a track ends.
pub fn autoplay() -> bool {
    parsed_or("FREESOUND_AUTOPLAY", true)
}

/// Initial output volume, clamped to `0.0..=1.0`.
pub fn volume() -> f64 {
    volume_from(env::var("FREESOUND_VOLUME").ok().as_deref())
}

/// Parses a configured volume. Missing, unparsable and non-finite values
/// (`NaN`, `inf`) fall back to full volume; the rest is clamped to `0.0..=1.0`.
pub fn volume_from(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(1.0)
        .clamp(0.0, 1.0)
}

/// The mpv executable used for audio output.
pub fn mpv_binary() -> String {
    env::var("FREESOUND_MPV_BINARY").unwrap_or_else(|_| "mpv".to_string())
}

/// Seconds `auth login` waits for the browser round trip.
pub fn auth_timeout_secs() -> u64 {
    parsed_or("FREESOUND_AUTH_TIMEOUT_SECS", DEFAULT_AUTH_TIMEOUT_SECS)
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
