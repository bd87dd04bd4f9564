use std::{io::Write, time::Duration};

use colored::Colorize;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

use crate::{
    backend::{ApiError, BackendClient},
    cli::{render, run_login, session_client},
    gate::SessionGate,
    info,
    management::SessionStore,
    player::{
        AudioOutput, ContinuationOutcome, ContinuationRequest, ContinuationTicket, EventOutcome,
        MediaEvent, OutputEvent, Player, PlayerOptions,
    },
    router::{SearchOutcome, View, ViewRouter},
    success,
    types::{AuthStatus, SearchResultItem, Track},
    utils, warning,
};

const SESSION_POLL_INTERVAL: Duration = Duration::from_secs(60);

const HELP: &str = "\
Browse
  search <query>      search tracks, artists, albums and playlists
  home                your home page
  playlists           your playlists
  artist <id>         open an artist
  album <id>          open an album
  playlist <id>       open a playlist
  open <n>            play track n, or open artist/album/playlist n
  playall             play every listed track in order
  back                back to home

Playback
  pause               toggle play/pause
  next, prev          move through the queue
  jump <n>            play queue entry n
  seek <seconds>      jump within the current track
  vol <0-100>         set the volume
  autoplay            toggle advancing when a track ends
  queue               show the queue
  now                 show what is playing

Session
  login, logout, whoami, help, quit";

/// A parsed line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Search(String),
    Home,
    /// 0-based index into the current listing.
    Open(usize),
    PlayAll,
    Artist(String),
    Album(String),
    Playlist(String),
    Playlists,
    Pause,
    Next,
    Prev,
    /// 0-based queue index.
    Jump(usize),
    Seek(f64),
    /// `0.0..=1.0`.
    Volume(f64),
    Autoplay,
    Queue,
    Now,
    Back,
    Login,
    Logout,
    WhoAmI,
    Help,
    Quit,
}

impl ShellCommand {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let required = |usage: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("usage: {}", usage))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match name.to_lowercase().as_str() {
            "search" | "s" => ShellCommand::Search(required("search <query>")?),
            "home" => ShellCommand::Home,
            "open" | "o" => ShellCommand::Open(utils::parse_position(&required("open <n>")?)?),
            "playall" => ShellCommand::PlayAll,
            "artist" => ShellCommand::Artist(required("artist <id>")?),
            "album" => ShellCommand::Album(required("album <id>")?),
            "playlist" => ShellCommand::Playlist(required("playlist <id>")?),
            "playlists" => ShellCommand::Playlists,
            "pause" | "play" | "p" => ShellCommand::Pause,
            "next" | "n" => ShellCommand::Next,
            "prev" | "previous" => ShellCommand::Prev,
            "jump" | "j" => ShellCommand::Jump(utils::parse_position(&required("jump <n>")?)?),
            "seek" => {
                let arg = required("seek <seconds>")?;
                match arg.parse::<f64>() {
                    Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
                        ShellCommand::Seek(seconds)
                    }
                    _ => return Err(format!("'{}' is not a position in seconds", arg)),
                }
            }
            "vol" | "volume" => {
                ShellCommand::Volume(utils::parse_volume_percent(&required("vol <0-100>")?)?)
            }
            "autoplay" => ShellCommand::Autoplay,
            "queue" => ShellCommand::Queue,
            "now" => ShellCommand::Now,
            "back" => ShellCommand::Back,
            "login" => ShellCommand::Login,
            "logout" => ShellCommand::Logout,
            "whoami" => ShellCommand::WhoAmI,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{}'. Type `help`.", other)),
        };

        Ok(Some(command))
    }
}

type ContinuationResult = (ContinuationTicket, Result<Vec<Track>, ApiError>);

struct Shell<O: AudioOutput> {
    client: BackendClient,
    player: Player<O>,
    router: ViewRouter,
    gate: SessionGate,
    /// What `open <n>` and `playall` act on.
    listing: Vec<SearchResultItem>,
    continuations: UnboundedSender<ContinuationResult>,
}

/// Opens the interactive player, optionally starting with a search.
pub async fn play(query: Option<String>) {
    #[cfg(unix)]
    {
        use crate::{config, error, player::mpv::MpvOutput};

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let output = match MpvOutput::spawn(&config::mpv_binary(), event_tx).await {
            Ok(output) => output,
            Err(e) => error!("Cannot start audio output ({}). Is mpv installed?", e),
        };

        let client = session_client().await;
        let player = Player::new(output, PlayerOptions::from_config());
        run(client, player, event_rx, query).await;
    }

    #[cfg(not(unix))]
    {
        let _ = query;
        crate::error!("Audio playback is only supported on Unix systems.");
    }
}

async fn run<O: AudioOutput>(
    client: BackendClient,
    player: Player<O>,
    mut events: UnboundedReceiver<OutputEvent>,
    query: Option<String>,
) {
    let (continuations, mut resolved) = mpsc::unbounded_channel();
    let mut shell = Shell {
        client,
        player,
        router: ViewRouter::new(),
        gate: SessionGate::new(),
        listing: Vec::new(),
        continuations,
    };

    shell.refresh_session().await;
    match query {
        Some(query) if shell.gate.is_authenticated() => {
            shell.handle(ShellCommand::Search(query)).await;
        }
        _ => shell.show_current_view().await,
    }
    info!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session_poll = tokio::time::interval(SESSION_POLL_INTERVAL);
    session_poll.tick().await;

    prompt();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else {
                    break;
                };
                match ShellCommand::parse(&line) {
                    Ok(Some(command)) => {
                        if !shell.handle(command).await {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warning!("{}", e),
                }
                prompt();
            }
            Some(event) = events.recv() => {
                if shell.on_media_event(event) {
                    prompt();
                }
            }
            Some((ticket, result)) = resolved.recv() => {
                if shell.on_continuation(ticket, result) {
                    prompt();
                }
            }
            _ = session_poll.tick() => {
                if shell.refresh_session().await {
                    shell.show_current_view().await;
                    prompt();
                }
            }
        }
    }
}

fn prompt() {
    print!("{} ", "♪>".blue().bold());
    let _ = std::io::stdout().flush();
}

impl<O: AudioOutput> Shell<O> {
    /// Returns `false` when the shell should exit.
    async fn handle(&mut self, command: ShellCommand) -> bool {
        match command {
            ShellCommand::Search(query) => {
                if self.require_login() {
                    self.search(query).await;
                }
            }
            ShellCommand::Home | ShellCommand::Back => {
                if self.require_login() {
                    self.router.navigate_home();
                    self.show_current_view().await;
                }
            }
            ShellCommand::Open(index) => self.open(index).await,
            ShellCommand::PlayAll => self.play_all(),
            ShellCommand::Artist(id) => {
                if self.require_login() {
                    self.router.navigate_to_artist(id);
                    self.show_current_view().await;
                }
            }
            ShellCommand::Album(id) => {
                if self.require_login() {
                    self.router.navigate_to_album(id);
                    self.show_current_view().await;
                }
            }
            ShellCommand::Playlist(id) => {
                if self.require_login() {
                    self.router.navigate_to_playlist(id);
                    self.show_current_view().await;
                }
            }
            ShellCommand::Playlists => {
                if self.require_login() {
                    self.list_playlists().await;
                }
            }
            ShellCommand::Pause => {
                if self.player.current_track().is_none() {
                    warning!("Nothing is playing.");
                } else {
                    self.player.toggle_play_pause();
                }
            }
            ShellCommand::Next => {
                if self.player.advance() {
                    self.announce_track();
                } else {
                    info!("Already at the end of the queue.");
                }
            }
            ShellCommand::Prev => {
                if self.player.retreat() {
                    self.announce_track();
                } else {
                    info!("Already at the start of the queue.");
                }
            }
            ShellCommand::Jump(index) => {
                if self.player.play_by_index(index) {
                    self.announce_track();
                } else {
                    warning!("There is no track {} in the queue.", index + 1);
                }
            }
            ShellCommand::Seek(seconds) => {
                if self.player.engine().duration().is_none() {
                    warning!("The length of this track is not known yet.");
                } else {
                    self.player.seek(seconds);
                }
            }
            ShellCommand::Volume(volume) => {
                self.player.set_volume(volume);
                success!("Volume {}%", (volume * 100.0).round());
            }
            ShellCommand::Autoplay => {
                if self.player.toggle_autoplay() {
                    info!("Autoplay on.");
                } else {
                    info!("Autoplay off.");
                }
            }
            ShellCommand::Queue => self.show_queue(),
            ShellCommand::Now => render::print_now_playing(&self.player.snapshot()),
            ShellCommand::Login => self.login().await,
            ShellCommand::Logout => self.logout().await,
            ShellCommand::WhoAmI => self.whoami().await,
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => return false,
        }

        true
    }

    fn require_login(&self) -> bool {
        if self.gate.is_authenticated() {
            return true;
        }
        warning!("You are not logged in. Type `login` first.");
        false
    }

    /// Polls the session and applies the gate. Returns whether the view
    /// changed.
    async fn refresh_session(&mut self) -> bool {
        self.gate.refresh(&self.client).await;
        self.gate.enforce(&mut self.router)
    }

    async fn search(&mut self, query: String) {
        let pb = render::spinner(format!("Searching for \"{}\"...", query));
        let outcome = match self.client.search(&query).await {
            Ok(response) => SearchOutcome::Results(response),
            Err(e) => SearchOutcome::Failed(e.to_string()),
        };
        pb.finish_and_clear();

        self.router.navigate_to_search(query, outcome);
        self.show_current_view().await;
    }

    /// Renders the routed view, fetching what it needs, and refreshes the
    /// listing `open` works on.
    async fn show_current_view(&mut self) {
        self.listing.clear();
        let view = self.router.current().clone();

        if let Some(title) = view.title() {
            println!("{}  {}", title.bold().underline(), "(back: home)".dimmed());
        }

        match view {
            View::Home => {
                let pb = render::spinner("Loading your home page...");
                let result = self.client.home_content().await;
                pb.finish_and_clear();
                match result {
                    Ok(content) => {
                        render::print_home(&content);
                        self.listing = render::home_items(&content);
                    }
                    Err(e) => warning!("Failed to load home content: {}", e),
                }
            }
            View::Search(payload) => match payload.outcome {
                SearchOutcome::Results(response) => {
                    render::print_search(&payload.query, &response);
                    self.listing = response.items();
                }
                SearchOutcome::Failed(message) => warning!("Search failed: {}", message),
            },
            View::Artist { artist_id } => {
                let pb = render::spinner("Loading artist...");
                let result = self.client.artist(&artist_id).await;
                pb.finish_and_clear();
                match result {
                    Ok(details) => {
                        render::print_artist(&details);
                        self.listing = render::artist_items(&details);
                    }
                    Err(e) => warning!("Failed to load artist: {}", e),
                }
            }
            View::Album { album_id } => {
                let pb = render::spinner("Loading album...");
                let result = self.client.album(&album_id).await;
                pb.finish_and_clear();
                match result {
                    Ok(details) => {
                        render::print_album(&details);
                        self.listing = tracks_as_items(details.playable_tracks());
                    }
                    Err(e) => warning!("Failed to load album: {}", e),
                }
            }
            View::Playlist { playlist_id } => {
                let pb = render::spinner("Loading playlist tracks...");
                let result = self.client.playlist_tracks(&playlist_id, None, None).await;
                pb.finish_and_clear();
                match result {
                    Ok(page) => {
                        render::print_playlist_tracks(&page);
                        self.listing = tracks_as_items(page.playable_tracks());
                    }
                    Err(e) => warning!("Failed to load playlist: {}", e),
                }
            }
            View::Login => {
                info!("You are not logged in. Type `login` to sign in with Spotify.");
            }
        }
    }

    async fn list_playlists(&mut self) {
        let pb = render::spinner("Loading your playlists...");
        let result = self.client.user_playlists().await;
        pb.finish_and_clear();

        match result {
            Ok(response) => {
                render::print_playlists(&response.playlists);
                self.listing = render::playlist_items(&response.playlists);
            }
            Err(e) => warning!("Failed to load playlists: {}", e),
        }
    }

    async fn open(&mut self, index: usize) {
        let Some(item) = self.listing.get(index).cloned() else {
            warning!("There is no item {} in the current listing.", index + 1);
            return;
        };

        match item {
            SearchResultItem::Track(track) => self.play_track(track),
            SearchResultItem::Artist(artist) => {
                self.router.navigate_to_artist(artist.spotify_id);
                self.show_current_view().await;
            }
            SearchResultItem::Album(album) => {
                self.router.navigate_to_album(album.spotify_id);
                self.show_current_view().await;
            }
            SearchResultItem::Playlist(playlist) => {
                self.router.navigate_to_playlist(playlist.spotify_id);
                self.show_current_view().await;
            }
        }
    }

    /// Search and home hits start a recommendation-built queue; tracks picked
    /// from an album, playlist or artist page queue that page's tracks.
    fn play_track(&mut self, track: Track) {
        match self.router.current() {
            View::Search(_) | View::Home => {
                let request = self.player.play_with_auto_continuation(track);
                self.spawn_continuation(request);
            }
            _ => {
                let tracks = self.listed_tracks();
                self.player.play_explicit(track, tracks);
            }
        }
        self.announce_track();
    }

    fn play_all(&mut self) {
        let tracks = self.listed_tracks();
        let Some(first) = tracks.first().cloned() else {
            warning!("There are no tracks in the current listing.");
            return;
        };
        self.player.play_explicit(first, tracks);
        self.announce_track();
    }

    fn listed_tracks(&self) -> Vec<Track> {
        self.listing
            .iter()
            .filter_map(|item| match item {
                SearchResultItem::Track(track) => Some(track.clone()),
                _ => None,
            })
            .collect()
    }

    fn spawn_continuation(&self, request: ContinuationRequest) {
        let client = self.client.clone();
        let resolved = self.continuations.clone();
        tokio::spawn(async move {
            let result = client
                .recommendations(&request.query())
                .await
                .map(|response| response.tracks);
            let _ = resolved.send((request.ticket, result));
        });
    }

    /// Returns whether anything was printed.
    fn on_continuation(
        &mut self,
        ticket: ContinuationTicket,
        result: Result<Vec<Track>, ApiError>,
    ) -> bool {
        match self.player.complete_continuation(ticket, result) {
            ContinuationOutcome::Extended(count) => {
                println!();
                info!("Queued {} recommended tracks.", count);
                true
            }
            ContinuationOutcome::Degraded => true,
            ContinuationOutcome::Stale => false,
        }
    }

    /// Returns whether anything was printed.
    fn on_media_event(&mut self, event: OutputEvent) -> bool {
        let rejected = matches!(event.event, MediaEvent::PlayRejected(_));
        let before = self.player.active_index();

        match self.player.handle_media_event(event) {
            EventOutcome::TrackEnded => {
                println!();
                if self.player.active_index() != before {
                    self.announce_track();
                } else if self.player.is_autoplay_enabled() {
                    info!("End of queue.");
                } else {
                    info!("Track finished. Autoplay is off.");
                }
                true
            }
            EventOutcome::Updated => rejected,
            EventOutcome::Ignored => false,
        }
    }

    fn announce_track(&self) {
        if let Some(track) = self.player.current_track() {
            let position = self
                .player
                .active_index()
                .map(|i| format!(" ({}/{})", i + 1, self.player.queue().len()))
                .unwrap_or_default();
            info!("Playing {} - {}{}", track.name.bold(), track.artist, position);
        }
    }

    fn show_queue(&self) {
        let queue = self.player.queue();
        if queue.is_empty() {
            info!("The queue is empty.");
            return;
        }
        render::print_tracks(queue.tracks(), queue.active_index());
        if self.player.is_loading_playlist() {
            info!("Building a playlist from recommendations...");
        }
    }

    async fn login(&mut self) {
        if self.gate.is_authenticated() {
            info!("Already logged in.");
            return;
        }

        match run_login(&self.client).await {
            Ok(user) => {
                let name = user.map(|u| u.display_name).unwrap_or_default();
                success!("Logged in {}", name);
                self.refresh_session().await;
                self.show_current_view().await;
            }
            Err(e) => warning!("Login failed: {}", e),
        }
    }

    async fn logout(&mut self) {
        if let Err(e) = self.client.logout().await {
            warning!("The server did not confirm the logout: {}", e);
        }
        if let Err(e) = SessionStore::new().clear().await {
            warning!("Failed to remove the stored session: {}", e);
        }
        self.client.set_session_cookie(None).await;

        self.gate.apply_status(Ok::<_, ApiError>(AuthStatus {
            is_authenticated: false,
            user: None,
        }));
        self.gate.enforce(&mut self.router);
        success!("Logged out.");
        self.show_current_view().await;
    }

    async fn whoami(&self) {
        match self.client.me().await {
            Ok(profile) => render::print_profile(&profile),
            Err(e) if e.is_unauthorized() => info!("You are not logged in."),
            Err(e) => match self.gate.user() {
                Some(user) => println!("{} ({})", user.display_name.bold(), user.email),
                None => warning!("Could not load your profile: {}", e),
            },
        }
    }
}

fn tracks_as_items(tracks: Vec<Track>) -> Vec<SearchResultItem> {
    tracks.into_iter().map(SearchResultItem::Track).collect()
}
