//! # API Module
//!
//! HTTP endpoints of the local callback server that completes a browser
//! login.
//!
//! ## Endpoints
//!
//! - [`callback`] - `GET /auth/callback?code&state`. The backend's login
//!   redirect lands here; the handler trades the code for a session with
//!   [`crate::backend::BackendClient::exchange_code`] and records the
//!   [`LoginOutcome`] for the waiting `auth login` command.
//! - [`index`] - `GET /`, where the result pages redirect to.
//! - [`health`] - `GET /health`, status and version.
//!
//! ## Result Pages
//!
//! Missing parameters or a refused exchange render a failure page that
//! redirects after 5 seconds. A successful login greets the user by name and
//! redirects after 3 seconds.

mod callback;
mod health;

pub use callback::{CallbackState, LoginOutcome, callback, index};
pub use health::health;
