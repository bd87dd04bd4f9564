//! The ordered list of tracks available for sequential playback.
//!
//! The cursor is either `None` (nothing active) or a valid index; every
//! mutation keeps it that way.

use crate::types::Track;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<Track>,
    active: Option<usize>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new track list wholesale with the cursor on `active`
    /// (clamped to the last entry; `None` for an empty list).
    pub fn replace(&mut self, tracks: Vec<Track>, active: usize) {
        self.active = match tracks.len() {
            0 => None,
            len => Some(active.min(len - 1)),
        };
        self.tracks = tracks;
    }

    /// Moves the cursor to `index` when it is in range.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.active = Some(index);
        self.tracks.get(index)
    }

    pub fn next_index(&self) -> Option<usize> {
        self.active
            .map(|i| i + 1)
            .filter(|&next| next < self.tracks.len())
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.active.and_then(|i| i.checked_sub(1))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active.and_then(|i| self.tracks.get(i))
    }
}

/// Index of the track with `spotify_id` in `tracks`.
pub fn position_of(tracks: &[Track], spotify_id: &str) -> Option<usize> {
    tracks.iter().position(|t| t.spotify_id == spotify_id)
}
