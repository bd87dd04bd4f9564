//! Freesound Terminal Client Library
//!
//! A terminal front end for the Freesound streaming backend. The backend owns
//! the Spotify login, the catalog and the audio; this library searches and
//! browses through it, keeps a play queue, and drives a local audio output,
//! building a queue from recommendations when a single track is picked.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local login callback server
//! - `backend` - client for the backend's HTTP contract
//! - `cli` - Command-line interface and the interactive player shell
//! - `config` - Configuration management and environment variables
//! - `gate` - login gating of the shell's views
//! - `management` - the persisted session cookie
//! - `player` - playback engine, queue and their state machine
//! - `router` - which view the shell is showing
//! - `server` - Local HTTP server for the login callback
//! - `types` - Data structures and type definitions
//! - `utils` - Formatting and parsing helpers
//!
//! # Example
//!
//! ```
//! use freesound::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> freesound::Res<()> {
//!     config::load_env().await?;
//!     cli::search("daft punk").await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod gate;
pub mod management;
pub mod player;
pub mod router;
pub mod server;
pub mod types;
pub mod utils;

/// Result alias for glue code that only reports errors.
///
/// Library modules return their own error enums (`ApiError`, `OutputError`,
/// `SessionError`); this boxes any of them, plus plain messages, so command
/// code can use `?` across modules.
///
/// # Example
///
/// ```
/// use freesound::Res;
///
/// async fn fetch_title() -> Res<String> {
///     Ok("One More Time".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line behind a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Continue the login in your browser.");
/// info!("Queued {} recommended tracks.", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line behind a green checkmark for a completed action.
///
/// ```
/// success!("Logged out.");
/// success!("Volume {}%", percent);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line behind a red `!` and exits with status 1.
///
/// Reserved for failures the process cannot continue from, such as an
/// unreadable configuration or a missing audio player. Request failures are
/// reported with [`warning!`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot load environment");
/// error!("Cannot start audio output ({}). Is mpv installed?", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a line behind a yellow `!` for a recoverable problem: a failed
/// request, a refused playback, bad shell input.
///
/// ```
/// warning!("Search failed: {}", e);
/// warning!("There is no track {} in the queue.", n);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
