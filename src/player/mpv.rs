//! # mpv Output
//!
//! The production [`AudioOutput`]: an `mpv` child process running idle with
//! no video, driven over its JSON IPC socket.
//!
//! ## Wire Protocol
//!
//! Every command is one JSON line, `{"command": [...], "request_id": n}`.
//! mpv answers each with `{"request_id": n, "error": "success" | reason}` and
//! pushes unsolicited `{"event": ...}` lines. On connect the output observes
//! `time-pos`, `duration` and `pause`, and translates:
//!
//! | mpv                                   | [`MediaEvent`]            |
//! |---------------------------------------|---------------------------|
//! | `property-change` `time-pos`          | `TimeUpdate`              |
//! | `property-change` `duration`          | `LoadedMetadata`          |
//! | `property-change` `pause` (file open) | `Pause` / `Play`          |
//! | `file-loaded` while unpaused          | `Play`                    |
//! | `end-file` reason `eof`               | `Ended`                   |
//! | `end-file` reason `error`             | `PlayRejected`            |
//! | `loadfile` reply with an error        | `PlayRejected`            |
//!
//! `loadfile` is sent with the load ticket as its `request_id`. mpv handles
//! commands in order and writes replies and events to the socket in the order
//! they happen, so every event read after the reply to `loadfile` n belongs to
//! load n, and everything before it to an older one. Each translated event is
//! stamped with that ticket. An `eof` of the previous track that is still
//! buffered when the next track is picked therefore carries the old ticket.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use rand::Rng;
use serde_json::{Value, json};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        UnixStream,
        unix::{OwnedReadHalf, OwnedWriteHalf},
    },
    process::{Child, Command},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

use crate::{
    player::output::{AudioOutput, MediaEvent, OutputError, OutputEvent},
    warning,
};

const OBSERVE_TIME_POS: u64 = 1;
const OBSERVE_DURATION: u64 = 2;
const OBSERVE_PAUSE: u64 = 3;

/// Replies to commands other than `loadfile` use this id and are ignored.
const CONTROL_REQUEST_ID: u64 = 0;

const CONNECT_ATTEMPTS: u32 = 50;
const CONNECT_INTERVAL: Duration = Duration::from_millis(100);

pub struct MpvOutput {
    commands: UnboundedSender<String>,
    socket_path: PathBuf,
    _child: Child,
}

impl MpvOutput {
    /// Starts `binary` and connects to its IPC socket. Media events are sent
    /// to `events` until the process exits.
    pub async fn spawn(
        binary: &str,
        events: UnboundedSender<OutputEvent>,
    ) -> Result<Self, OutputError> {
        let socket_path = socket_path();

        let child = Command::new(binary)
            .arg("--idle=yes")
            .arg("--no-video")
            .arg("--no-terminal")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OutputError::Unavailable(format!("failed to start {}: {}", binary, e)))?;

        let stream = connect(&socket_path).await?;
        let (reader, writer) = stream.into_split();

        let (commands, queued) = mpsc::unbounded_channel();

        tokio::spawn(write_commands(writer, queued));
        tokio::spawn(read_events(reader, events));

        let output = Self {
            commands,
            socket_path,
            _child: child,
        };

        output.send(json!(["observe_property", OBSERVE_TIME_POS, "time-pos"]))?;
        output.send(json!(["observe_property", OBSERVE_DURATION, "duration"]))?;
        output.send(json!(["observe_property", OBSERVE_PAUSE, "pause"]))?;

        Ok(output)
    }

    fn send(&self, command: Value) -> Result<(), OutputError> {
        self.send_with_id(command, CONTROL_REQUEST_ID)
    }

    fn send_with_id(&self, command: Value, request_id: u64) -> Result<(), OutputError> {
        let line = json!({ "command": command, "request_id": request_id }).to_string();
        self.commands
            .send(line)
            .map_err(|_| OutputError::Unavailable("mpv connection closed".to_string()))
    }
}

impl AudioOutput for MpvOutput {
    fn load(&mut self, url: &str, ticket: u64) -> Result<(), OutputError> {
        self.send_with_id(json!(["loadfile", url, "replace"]), ticket)?;
        self.send(json!(["set_property", "pause", false]))
    }

    fn play(&mut self) -> Result<(), OutputError> {
        self.send(json!(["set_property", "pause", false]))
    }

    fn pause(&mut self) -> Result<(), OutputError> {
        self.send(json!(["set_property", "pause", true]))
    }

    fn seek(&mut self, seconds: f64) -> Result<(), OutputError> {
        self.send(json!(["seek", seconds, "absolute"]))
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), OutputError> {
        self.send(json!(["set_property", "volume", volume * 100.0]))
    }
}

impl Drop for MpvOutput {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

fn socket_path() -> PathBuf {
    let suffix: u32 = rand::rng().random();
    std::env::temp_dir().join(format!("freesound-mpv-{:08x}.sock", suffix))
}

/// mpv creates the socket shortly after start; poll until it accepts.
async fn connect(path: &Path) -> Result<UnixStream, OutputError> {
    let mut last_error = None;

    for _ in 0..CONNECT_ATTEMPTS {
        match UnixStream::connect(path).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
        tokio::time::sleep(CONNECT_INTERVAL).await;
    }

    Err(OutputError::Unavailable(format!(
        "could not connect to mpv at {}: {}",
        path.display(),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

async fn write_commands(mut writer: OwnedWriteHalf, mut queued: UnboundedReceiver<String>) {
    while let Some(line) = queued.recv().await {
        if writer.write_all(line.as_bytes()).await.is_err()
            || writer.write_all(b"\n").await.is_err()
        {
            warning!("Lost connection to mpv");
            break;
        }
    }
}

async fn read_events(reader: OwnedReadHalf, events: UnboundedSender<OutputEvent>) {
    let mut lines = BufReader::new(reader).lines();
    let mut translator = EventTranslator::default();

    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(message) = serde_json::from_str::<Value>(&line) else {
            continue;
        };

        if let Some(event) = translator.translate(&message) {
            if events.send(event).is_err() {
                break;
            }
        }
    }
}

/// Turns mpv IPC messages into ticketed [`MediaEvent`]s.
///
/// `pause` changes are only reported while a file is open, so the idle
/// player's initial property values do not look like playback.
#[derive(Debug, Default)]
pub struct EventTranslator {
    file_open: bool,
    paused: bool,
    /// Ticket of the last `loadfile` mpv answered.
    ticket: u64,
}

impl EventTranslator {
    pub fn translate(&mut self, message: &Value) -> Option<OutputEvent> {
        if let Some(event) = message.get("event").and_then(Value::as_str) {
            return self
                .translate_event(event, message)
                .map(|event| OutputEvent::new(self.ticket, event));
        }

        // Command reply. Only loadfile replies carry a non-zero id.
        let request_id = message.get("request_id").and_then(Value::as_u64)?;
        let error = message.get("error").and_then(Value::as_str)?;
        if request_id == CONTROL_REQUEST_ID {
            return None;
        }

        self.ticket = request_id;
        (error != "success").then(|| {
            OutputEvent::new(request_id, MediaEvent::PlayRejected(error.to_string()))
        })
    }

    /// Ticket events are currently stamped with.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    fn translate_event(&mut self, event: &str, message: &Value) -> Option<MediaEvent> {
        match event {
            "property-change" => {
                let data = message.get("data");
                match message.get("name").and_then(Value::as_str)? {
                    "time-pos" => data.and_then(Value::as_f64).map(MediaEvent::TimeUpdate),
                    "duration" => data.and_then(Value::as_f64).map(MediaEvent::LoadedMetadata),
                    "pause" => {
                        self.paused = data.and_then(Value::as_bool)?;
                        if !self.file_open {
                            return None;
                        }
                        Some(if self.paused {
                            MediaEvent::Pause
                        } else {
                            MediaEvent::Play
                        })
                    }
                    _ => None,
                }
            }
            "file-loaded" => {
                self.file_open = true;
                (!self.paused).then_some(MediaEvent::Play)
            }
            "end-file" => {
                self.file_open = false;
                match message.get("reason").and_then(Value::as_str) {
                    Some("eof") => Some(MediaEvent::Ended),
                    Some("error") => Some(MediaEvent::PlayRejected(
                        message
                            .get("file_error")
                            .and_then(Value::as_str)
                            .unwrap_or("playback error")
                            .to_string(),
                    )),
                    // stop, quit, redirect: superseded by a newer load or shutdown
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
