//! Which view the interactive shell is showing.
//!
//! Exactly one [`View`] is active at a time; every navigation replaces it
//! wholesale together with its payload, so a view never sees a payload that
//! belongs to another.

use crate::types::SearchResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(SearchResponse),
    Failed(String),
}

/// The query a search view was opened for and what the backend answered.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPayload {
    pub query: String,
    pub outcome: SearchOutcome,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Home,
    Search(SearchPayload),
    Artist {
        artist_id: String,
    },
    Album {
        album_id: String,
    },
    Playlist {
        playlist_id: String,
    },
    Login,
}

impl View {
    /// Label shown in the top bar; Home and Login have none.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            View::Home | View::Login => None,
            View::Search(_) => Some("Search Results"),
            View::Artist { .. } => Some("Artist"),
            View::Album { .. } => Some("Album"),
            View::Playlist { .. } => Some("Playlist"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewRouter {
    current: View,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate_to(&mut self, view: View) {
        self.current = view;
    }

    pub fn navigate_home(&mut self) {
        self.navigate_to(View::Home);
    }

    pub fn navigate_to_search(&mut self, query: impl Into<String>, outcome: SearchOutcome) {
        self.navigate_to(View::Search(SearchPayload {
            query: query.into(),
            outcome,
        }));
    }

    pub fn navigate_to_artist(&mut self, artist_id: impl Into<String>) {
        self.navigate_to(View::Artist {
            artist_id: artist_id.into(),
        });
    }

    pub fn navigate_to_album(&mut self, album_id: impl Into<String>) {
        self.navigate_to(View::Album {
            album_id: album_id.into(),
        });
    }

    pub fn navigate_to_playlist(&mut self, playlist_id: impl Into<String>) {
        self.navigate_to(View::Playlist {
            playlist_id: playlist_id.into(),
        });
    }

    pub fn navigate_to_login(&mut self) {
        self.navigate_to(View::Login);
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn title(&self) -> Option<&'static str> {
        self.current.title()
    }

    /// Every view except Home offers a way back.
    pub fn shows_back(&self) -> bool {
        self.current != View::Home
    }
}
