use crate::{
    backend::stream_url,
    player::output::{AudioOutput, MediaEvent, OutputEvent},
    types::Track,
    warning,
};

/// What applying a [`MediaEvent`] did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Updated,
    /// The current track played to its end.
    TrackEnded,
    /// The event belonged to a superseded load and was dropped.
    Ignored,
}

/// Wraps the audio output and keeps the playback session in step with it.
///
/// Commands only record an *intent*; the playing flag, position and duration
/// change when the output reports back through [`PlaybackEngine::apply`].
pub struct PlaybackEngine<O: AudioOutput> {
    output: O,
    stream_base: String,
    current: Option<Track>,
    playing: bool,
    position: f64,
    duration: Option<f64>,
    volume: f64,
    /// Play (`true`) or pause (`false`) requested but not yet confirmed.
    intent: Option<bool>,
    ended: bool,
    ticket: u64,
}

impl<O: AudioOutput> PlaybackEngine<O> {
    pub fn new(output: O, stream_base: impl Into<String>, volume: f64) -> Self {
        let mut engine = Self {
            output,
            stream_base: stream_base.into(),
            current: None,
            playing: false,
            position: 0.0,
            duration: None,
            volume,
            intent: None,
            ended: false,
            ticket: 0,
        };
        engine.set_volume(volume);
        engine
    }

    /// Streams `track` from the start.
    ///
    /// A refused load is logged and leaves the playing flag false; it is not
    /// retried.
    pub fn load_and_play(&mut self, track: Track) {
        let url = stream_url(&self.stream_base, &track);
        self.ticket += 1;
        self.current = Some(track);
        self.playing = false;
        self.position = 0.0;
        self.duration = None;
        self.ended = false;

        match self.output.load(&url, self.ticket) {
            Ok(()) => self.intent = Some(true),
            Err(e) => {
                self.intent = None;
                warning!("Playback could not start: {}", e);
            }
        }
    }

    /// Pauses when playing (or about to), resumes otherwise.
    ///
    /// The decision reads the pending intent, so two toggles issued before
    /// the output answers end in the state the second one asked for.
    pub fn toggle_play_pause(&mut self) {
        let Some(track) = self.current.clone() else {
            return;
        };

        let want_play = !self.intended_playing();
        if want_play && self.ended {
            self.load_and_play(track);
            return;
        }

        let result = if want_play {
            self.output.play()
        } else {
            self.output.pause()
        };

        match result {
            Ok(()) => self.intent = Some(want_play),
            Err(e) => warning!("Could not change playback state: {}", e),
        }
    }

    /// Jumps to `seconds`, clamped to the known duration. No-op while the
    /// duration is unknown or after the track ended, when the output has
    /// nothing loaded to seek in.
    pub fn seek(&mut self, seconds: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        if self.ended {
            return;
        }

        let target = seconds.clamp(0.0, duration);
        match self.output.seek(target) {
            Ok(()) => self.position = target,
            Err(e) => warning!("Could not seek: {}", e),
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        if let Err(e) = self.output.set_volume(volume) {
            warning!("Could not change volume: {}", e);
        }
    }

    /// Applies an event from the output. Events stamped with an older load
    /// ticket describe a source that has since been replaced and are ignored.
    pub fn apply(&mut self, event: OutputEvent) -> EventOutcome {
        if event.ticket != self.ticket {
            return EventOutcome::Ignored;
        }

        match event.event {
            MediaEvent::Play => {
                self.playing = true;
                if self.intent == Some(true) {
                    self.intent = None;
                }
            }
            MediaEvent::Pause => {
                self.playing = false;
                if self.intent == Some(false) {
                    self.intent = None;
                }
            }
            MediaEvent::TimeUpdate(seconds) => self.position = seconds,
            MediaEvent::LoadedMetadata(seconds) => {
                if seconds.is_finite() && seconds > 0.0 {
                    self.duration = Some(seconds);
                }
            }
            MediaEvent::Ended => {
                self.playing = false;
                self.intent = None;
                self.ended = true;
                return EventOutcome::TrackEnded;
            }
            MediaEvent::PlayRejected(reason) => {
                self.playing = false;
                self.intent = None;
                let name = self.current.as_ref().map(|t| t.name.as_str()).unwrap_or("track");
                warning!("Playback of '{}' failed: {}", name, reason);
            }
        }

        EventOutcome::Updated
    }

    fn intended_playing(&self) -> bool {
        self.intent.unwrap_or(self.playing)
    }

    /// Ticket of the most recent load; `0` before anything was loaded.
    pub fn load_ticket(&self) -> u64 {
        self.ticket
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
