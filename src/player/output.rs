use std::fmt;

/// Lifecycle events reported by an [`AudioOutput`].
///
/// Outputs deliver them in the order they happen, wrapped in an
/// [`OutputEvent`]; the engine applies each to exactly one field of the
/// playback session.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback actually started or resumed.
    Play,
    /// Playback actually paused.
    Pause,
    /// Current position, in seconds.
    TimeUpdate(f64),
    /// Length of the loaded source became known, in seconds.
    LoadedMetadata(f64),
    /// The source played to its end.
    Ended,
    /// The output could not start the source.
    PlayRejected(String),
}

/// A [`MediaEvent`] stamped with the load ticket of the source it happened
/// to. Events for any load but the latest are dropped by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputEvent {
    pub ticket: u64,
    pub event: MediaEvent,
}

impl OutputEvent {
    pub fn new(ticket: u64, event: MediaEvent) -> Self {
        Self { ticket, event }
    }
}

#[derive(Debug)]
pub enum OutputError {
    /// The output process or connection is gone.
    Unavailable(String),
    /// The output refused the command.
    Rejected(String),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Unavailable(reason) => write!(f, "audio output unavailable: {}", reason),
            OutputError::Rejected(reason) => write!(f, "audio output rejected command: {}", reason),
        }
    }
}

impl std::error::Error for OutputError {}

/// The single streamable-audio resource the player drives.
///
/// Commands are requests: their effect is only confirmed by the
/// [`MediaEvent`]s the output emits afterwards, and a command accepted here
/// may still fail later (reported as [`MediaEvent::PlayRejected`]).
pub trait AudioOutput {
    /// Replaces the current source with `url` and starts playing it.
    ///
    /// `ticket` identifies this load; every event about it carries it back.
    fn load(&mut self, url: &str, ticket: u64) -> Result<(), OutputError>;

    fn play(&mut self) -> Result<(), OutputError>;

    fn pause(&mut self) -> Result<(), OutputError>;

    /// Moves to `seconds` from the start of the source.
    fn seek(&mut self, seconds: f64) -> Result<(), OutputError>;

    /// Applies `volume` (`0.0` silent, `1.0` full) immediately.
    fn set_volume(&mut self, volume: f64) -> Result<(), OutputError>;
}
