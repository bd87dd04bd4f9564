//! Login gating for the interactive shell.
//!
//! The gate knows whether a user is signed in, based on the last
//! `/auth/status` poll. Until the first answer arrives it is *loading* and
//! makes no routing decision, so the login view never flashes up for a user
//! who is in fact signed in.

use std::fmt::Display;

use crate::{
    backend::BackendClient,
    router::{View, ViewRouter},
    types::{AuthStatus, SessionUser},
};

#[derive(Debug, Clone, PartialEq)]
enum GateState {
    Loading,
    SignedOut,
    SignedIn(Option<SessionUser>),
}

#[derive(Debug)]
pub struct SessionGate {
    state: GateState,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Loading,
        }
    }

    /// Settles the gate from a status poll. Any error, a 401 included, counts
    /// as signed out.
    pub fn apply_status<E: Display>(&mut self, status: Result<AuthStatus, E>) {
        self.state = match status {
            Ok(status) if status.is_authenticated => GateState::SignedIn(status.user),
            _ => GateState::SignedOut,
        };
    }

    pub async fn refresh(&mut self, client: &BackendClient) {
        self.apply_status(client.auth_status().await);
    }

    pub fn is_loading(&self) -> bool {
        self.state == GateState::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, GateState::SignedIn(_))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match &self.state {
            GateState::SignedIn(user) => user.as_ref(),
            _ => None,
        }
    }

    /// Forces the router onto the view the session allows: signed-out users
    /// land on Login, signed-in users are moved off it. Returns whether the
    /// view changed. Does nothing while loading.
    pub fn enforce(&self, router: &mut ViewRouter) -> bool {
        if self.is_loading() {
            return false;
        }

        let on_login = *router.current() == View::Login;
        match (self.is_authenticated(), on_login) {
            (true, true) => {
                router.navigate_home();
                true
            }
            (false, false) => {
                router.navigate_to_login();
                true
            }
            _ => false,
        }
    }
}
