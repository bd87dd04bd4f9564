//! # CLI Module
//!
//! User-facing commands. One-shot subcommands call the backend once and
//! print a table; `play` opens the interactive shell that hosts the player.
//!
//! ## Commands
//!
//! ### Authentication
//!
//! - [`login`] - browser login through the local callback server
//! - [`logout`] - ends the backend session and forgets the stored cookie
//! - [`status`] - shows who is logged in
//!
//! ### Catalog
//!
//! - [`search`] - polymorphic catalog search
//! - [`artist`], [`album`] - detail pages
//! - [`playlists`], [`playlist`] - the user's library
//! - [`home`], [`profile`] - personalised content
//!
//! ### Playback
//!
//! - [`play`] - interactive shell with queue, autoplay and recommendations
//!
//! ## Error Handling
//!
//! Backend failures are printed as a warning line and the command returns;
//! nothing here panics on a network error. Only a broken local setup (no
//! audio output, unusable session cache) ends the process through
//! [`crate::error!`].
//!
//! ## Session
//!
//! Every command starts from [`session_client`], which replays the cookie
//! stored by the last successful login.

mod auth;
mod browse;
pub mod render;
mod search;
mod shell;

pub use auth::{login, logout, run_login, status};
pub use browse::{album, artist, home, playlist, playlists, profile};
pub use search::search;
pub use shell::{ShellCommand, play};

use crate::{backend::BackendClient, config, management::SessionStore};

/// Backend client carrying the stored session cookie, if any.
pub async fn session_client() -> BackendClient {
    let cookie = SessionStore::new().cookie().await;
    BackendClient::with_session(config::backend_url(), cookie)
}
