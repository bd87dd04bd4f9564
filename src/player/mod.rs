//! # Player Module
//!
//! The playback and queue state machine. A [`Player`] owns the one audio
//! output of the session (through [`PlaybackEngine`]) and the active
//! [`Queue`], and is their only writer: views and the shell read from it and
//! dispatch intents into it.
//!
//! ## States
//!
//! ```text
//!            play_explicit / play_with_auto_continuation
//!   Idle ─────────────────────────────────────────────→ Active
//!                                                      │    ↑
//!            play_with_auto_continuation  (fetch out)  ↓    │ complete_continuation
//!                                                    Loading
//! ```
//!
//! `Loading` only means a recommendation fetch is in flight; the seed track
//! is already playing and every transport control keeps working. There is no
//! terminal state.
//!
//! ## Auto-continuation
//!
//! Picking a track without a list queues it alone, starts it, and hands back
//! a [`ContinuationRequest`]. The host runs the recommendation fetch however
//! it likes and reports the result with [`Player::complete_continuation`].
//! Each request carries a ticket; results for a superseded request are
//! discarded so a slow fetch cannot overwrite a newer queue.
//!
//! ## Media Events
//!
//! Outputs report what actually happened through [`MediaEvent`]s, fed in via
//! [`Player::handle_media_event`]. Each arrives as an [`OutputEvent`] stamped
//! with the load ticket it belongs to; an event still queued from a replaced
//! track (its `Ended` in particular) is ignored rather than applied to the
//! new one. The autoplay flag is read when the event arrives, never captured
//! earlier.

mod engine;
#[cfg(unix)]
pub mod mpv;
mod output;
mod queue;

use std::fmt::Display;

pub use engine::{EventOutcome, PlaybackEngine};
pub use output::{AudioOutput, MediaEvent, OutputError, OutputEvent};
pub use queue::{Queue, position_of};

use crate::{
    config,
    types::{RecommendationQuery, Track},
    warning,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    pub autoplay: bool,
    pub volume: f64,
    pub recommendation_limit: u32,
    /// Backend base URL the stream URLs are built on.
    pub stream_base: String,
}

impl PlayerOptions {
    pub fn from_config() -> Self {
        Self {
            autoplay: config::autoplay(),
            volume: config::volume(),
            recommendation_limit: config::recommendation_limit(),
            stream_base: config::backend_url(),
        }
    }
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            volume: 1.0,
            recommendation_limit: config::DEFAULT_RECOMMENDATION_LIMIT,
            stream_base: config::DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loading,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationTicket(u64);

/// A recommendation fetch the host must run for the player.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationRequest {
    pub ticket: ContinuationTicket,
    pub seed: Track,
    pub limit: u32,
}

impl ContinuationRequest {
    pub fn query(&self) -> RecommendationQuery {
        RecommendationQuery {
            seed_tracks: vec![self.seed.spotify_id.clone()],
            limit: Some(self.limit),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationOutcome {
    /// The queue now holds the seed followed by this many recommendations.
    Extended(usize),
    /// The fetch failed; the queue stays the seed alone.
    Degraded,
    /// A newer play superseded the request; nothing changed.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub autoplay: bool,
    pub active_index: Option<usize>,
    pub queue_len: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

pub struct Player<O: AudioOutput> {
    engine: PlaybackEngine<O>,
    queue: Queue,
    autoplay: bool,
    recommendation_limit: u32,
    pending: Option<ContinuationRequest>,
    next_ticket: u64,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(output: O, options: PlayerOptions) -> Self {
        Self {
            engine: PlaybackEngine::new(output, options.stream_base, options.volume),
            queue: Queue::new(),
            autoplay: options.autoplay,
            recommendation_limit: options.recommendation_limit,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Plays `track` with `list` as the new queue.
    ///
    /// The cursor lands on `track`'s position in `list`, or on 0 when `list`
    /// does not contain it. An empty `list` queues `track` alone.
    pub fn play_explicit(&mut self, track: Track, list: Vec<Track>) {
        self.pending = None;

        if list.is_empty() {
            self.queue.replace(vec![track.clone()], 0);
        } else {
            let index = position_of(&list, &track.spotify_id).unwrap_or(0);
            self.queue.replace(list, index);
        }

        self.engine.load_and_play(track);
    }

    /// Plays `track` alone right away and asks the host for recommendations
    /// to queue after it.
    pub fn play_with_auto_continuation(&mut self, track: Track) -> ContinuationRequest {
        self.queue.replace(vec![track.clone()], 0);
        self.engine.load_and_play(track.clone());

        self.next_ticket += 1;
        let request = ContinuationRequest {
            ticket: ContinuationTicket(self.next_ticket),
            seed: track,
            limit: self.recommendation_limit,
        };
        self.pending = Some(request.clone());
        request
    }

    /// Applies the result of a recommendation fetch.
    ///
    /// Failures are only logged: the queue stays the seed track alone.
    pub fn complete_continuation<E: Display>(
        &mut self,
        ticket: ContinuationTicket,
        result: Result<Vec<Track>, E>,
    ) -> ContinuationOutcome {
        let Some(request) = self.pending.take_if(|p| p.ticket == ticket) else {
            return ContinuationOutcome::Stale;
        };

        match result {
            Ok(recommended) => {
                let count = recommended.len();
                let mut tracks = Vec::with_capacity(count + 1);
                tracks.push(request.seed);
                tracks.extend(recommended);
                self.queue.replace(tracks, 0);
                ContinuationOutcome::Extended(count)
            }
            Err(e) => {
                warning!("Could not build a playlist from recommendations: {}", e);
                self.queue.replace(vec![request.seed], 0);
                ContinuationOutcome::Degraded
            }
        }
    }

    /// Plays the queue entry at `index`. Out-of-range indices are ignored.
    pub fn play_by_index(&mut self, index: usize) -> bool {
        let Some(track) = self.queue.select(index).cloned() else {
            return false;
        };
        self.engine.load_and_play(track);
        true
    }

    /// Next queue entry; no-op on the last one.
    pub fn advance(&mut self) -> bool {
        match self.queue.next_index() {
            Some(index) => self.play_by_index(index),
            None => false,
        }
    }

    /// Previous queue entry; no-op on the first one.
    pub fn retreat(&mut self) -> bool {
        match self.queue.previous_index() {
            Some(index) => self.play_by_index(index),
            None => false,
        }
    }

    pub fn toggle_play_pause(&mut self) {
        self.engine.toggle_play_pause();
    }

    pub fn seek(&mut self, seconds: f64) {
        self.engine.seek(seconds);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.engine.set_volume(volume);
    }

    pub fn toggle_autoplay(&mut self) -> bool {
        self.autoplay = !self.autoplay;
        self.autoplay
    }

    pub fn handle_media_event(&mut self, event: OutputEvent) -> EventOutcome {
        let outcome = self.engine.apply(event);
        if outcome == EventOutcome::TrackEnded {
            self.on_track_ended();
        }
        outcome
    }

    /// With autoplay on, moves to the next entry; otherwise the engine stays
    /// paused at the end of the track.
    fn on_track_ended(&mut self) {
        if self.autoplay {
            self.advance();
        }
    }

    pub fn state(&self) -> PlayerState {
        if self.engine.current_track().is_none() {
            PlayerState::Idle
        } else if self.pending.is_some() {
            PlayerState::Loading
        } else {
            PlayerState::Active
        }
    }

    pub fn is_loading_playlist(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_autoplay_enabled(&self) -> bool {
        self.autoplay
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.engine.current_track()
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn active_index(&self) -> Option<usize> {
        self.queue.active_index()
    }

    pub fn engine(&self) -> &PlaybackEngine<O> {
        &self.engine
    }

    pub fn output(&self) -> &O {
        self.engine.output()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state(),
            current_track: self.engine.current_track().cloned(),
            is_playing: self.engine.is_playing(),
            position: self.engine.position(),
            duration: self.engine.duration(),
            volume: self.engine.volume(),
            autoplay: self.autoplay,
            active_index: self.queue.active_index(),
            queue_len: self.queue.len(),
            has_next: self.queue.next_index().is_some(),
            has_previous: self.queue.previous_index().is_some(),
        }
    }
}
