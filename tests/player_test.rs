use freesound::player::*;
use freesound::types::Track;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String, u64),
    Play,
    Pause,
    Seek(f64),
    Volume(f64),
}

/// Records every command; optionally refuses loads.
#[derive(Default)]
struct FakeOutput {
    calls: Vec<Call>,
    refuse_loads: bool,
}

impl FakeOutput {
    fn loads(&self) -> Vec<(String, u64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(url, ticket) => Some((url.clone(), *ticket)),
                _ => None,
            })
            .collect()
    }

    fn last_ticket(&self) -> u64 {
        self.loads().last().map(|(_, t)| *t).unwrap_or(0)
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, url: &str, ticket: u64) -> Result<(), OutputError> {
        if self.refuse_loads {
            return Err(OutputError::Rejected("not allowed".to_string()));
        }
        self.calls.push(Call::Load(url.to_string(), ticket));
        Ok(())
    }

    fn play(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), OutputError> {
        self.calls.push(Call::Pause);
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<(), OutputError> {
        self.calls.push(Call::Seek(seconds));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), OutputError> {
        self.calls.push(Call::Volume(volume));
        Ok(())
    }
}

fn create_test_track(id: &str) -> Track {
    Track {
        spotify_id: id.to_string(),
        name: format!("Track {}", id),
        artist: "Daft Punk".to_string(),
        album: "Discovery".to_string(),
        duration: Some(200_000),
        uri: None,
        preview_url: None,
        image: None,
    }
}

fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| create_test_track(id)).collect()
}

fn options(autoplay: bool) -> PlayerOptions {
    PlayerOptions {
        autoplay,
        volume: 0.8,
        recommendation_limit: 15,
        stream_base: "http://backend.test".to_string(),
    }
}

fn new_player(autoplay: bool) -> Player<FakeOutput> {
    Player::new(FakeOutput::default(), options(autoplay))
}

/// Feeds `event` as if reported for the load currently in the output.
fn report(player: &mut Player<FakeOutput>, event: MediaEvent) -> EventOutcome {
    let ticket = player.engine().load_ticket();
    player.handle_media_event(OutputEvent::new(ticket, event))
}

fn current_id(player: &Player<FakeOutput>) -> Option<String> {
    player.current_track().map(|t| t.spotify_id.clone())
}

fn queue_ids(player: &Player<FakeOutput>) -> Vec<String> {
    player
        .queue()
        .tracks()
        .iter()
        .map(|t| t.spotify_id.clone())
        .collect()
}

#[test]
fn test_new_player_is_idle_and_applies_volume() {
    let player = new_player(true);

    assert_eq!(player.state(), PlayerState::Idle);
    assert!(player.queue().is_empty());
    assert_eq!(player.active_index(), None);
    assert_eq!(player.output().calls, vec![Call::Volume(0.8)]);
}

#[test]
fn test_play_explicit_sets_queue_and_cursor() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b", "c"]);

    player.play_explicit(list[1].clone(), list);

    assert_eq!(queue_ids(&player), vec!["a", "b", "c"]);
    assert_eq!(player.active_index(), Some(1));
    assert_eq!(current_id(&player).as_deref(), Some("b"));
    assert_eq!(player.state(), PlayerState::Active);

    // Not playing until the output confirms
    assert!(!player.is_playing());
    report(&mut player, MediaEvent::Play);
    assert!(player.is_playing());
}

#[test]
fn test_play_explicit_track_missing_from_list_starts_cursor_at_zero() {
    let mut player = new_player(true);

    player.play_explicit(create_test_track("x"), tracks(&["a", "b"]));

    assert_eq!(player.active_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("x"));
    assert_eq!(queue_ids(&player), vec!["a", "b"]);
}

#[test]
fn test_play_explicit_with_empty_list_queues_track_alone() {
    let mut player = new_player(true);

    player.play_explicit(create_test_track("x"), Vec::new());

    assert_eq!(queue_ids(&player), vec!["x"]);
    assert_eq!(player.active_index(), Some(0));
}

#[test]
fn test_load_builds_stream_url() {
    let mut player = new_player(true);
    player.play_explicit(create_test_track("abc"), Vec::new());

    let (url, ticket) = player.output().loads()[0].clone();
    assert_eq!(ticket, 1);
    assert!(url.starts_with("http://backend.test/stream/abc?"));
    assert!(url.contains("title=Track+abc"));
    assert!(url.contains("artist=Daft+Punk"));
    assert!(url.contains("duration_ms=200000"));
}

#[test]
fn test_load_resets_position_and_duration() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);
    report(&mut player, MediaEvent::LoadedMetadata(200.0));
    report(&mut player, MediaEvent::TimeUpdate(42.0));

    player.advance();

    let snapshot = player.snapshot();
    assert_eq!(snapshot.position, 0.0);
    assert_eq!(snapshot.duration, None);
    assert!(!snapshot.is_playing);
}

#[test]
fn test_refused_load_leaves_player_stopped() {
    let output = FakeOutput {
        refuse_loads: true,
        ..Default::default()
    };
    let mut player = Player::new(output, options(true));

    player.play_explicit(create_test_track("a"), Vec::new());

    assert!(!player.is_playing());
    assert_eq!(current_id(&player).as_deref(), Some("a"));
    assert!(player.output().loads().is_empty());
}

#[test]
fn test_auto_continuation_success() {
    let mut player = new_player(true);
    let seed = create_test_track("seed");

    let request = player.play_with_auto_continuation(seed.clone());

    // Seed is audible immediately, alone in the queue
    assert_eq!(queue_ids(&player), vec!["seed"]);
    assert_eq!(player.active_index(), Some(0));
    assert_eq!(current_id(&player).as_deref(), Some("seed"));
    assert_eq!(player.state(), PlayerState::Loading);
    assert!(player.is_loading_playlist());

    assert_eq!(request.seed, seed);
    assert_eq!(request.limit, 15);
    let query = request.query();
    assert_eq!(query.seed_tracks, vec!["seed".to_string()]);
    assert_eq!(query.limit, Some(15));

    let outcome = player.complete_continuation::<String>(request.ticket, Ok(tracks(&["r1", "r2"])));

    assert_eq!(outcome, ContinuationOutcome::Extended(2));
    assert_eq!(queue_ids(&player), vec!["seed", "r1", "r2"]);
    assert_eq!(player.active_index(), Some(0));
    assert_eq!(player.state(), PlayerState::Active);
    assert!(!player.is_loading_playlist());
}

#[test]
fn test_auto_continuation_failure_keeps_seed_alone() {
    let mut player = new_player(true);
    let request = player.play_with_auto_continuation(create_test_track("seed"));

    let outcome = player.complete_continuation(request.ticket, Err("network down"));

    assert_eq!(outcome, ContinuationOutcome::Degraded);
    assert_eq!(queue_ids(&player), vec!["seed"]);
    assert_eq!(player.active_index(), Some(0));
    assert!(!player.is_loading_playlist());

    // Still playing the seed
    assert_eq!(current_id(&player).as_deref(), Some("seed"));
}

#[test]
fn test_stale_continuation_is_discarded() {
    let mut player = new_player(true);
    let first = player.play_with_auto_continuation(create_test_track("first"));
    let second = player.play_with_auto_continuation(create_test_track("second"));

    let outcome = player.complete_continuation::<String>(first.ticket, Ok(tracks(&["old1", "old2"])));
    assert_eq!(outcome, ContinuationOutcome::Stale);
    assert_eq!(queue_ids(&player), vec!["second"]);
    assert!(player.is_loading_playlist());

    let outcome = player.complete_continuation::<String>(second.ticket, Ok(tracks(&["new1"])));
    assert_eq!(outcome, ContinuationOutcome::Extended(1));
    assert_eq!(queue_ids(&player), vec!["second", "new1"]);
}

#[test]
fn test_explicit_play_supersedes_pending_continuation() {
    let mut player = new_player(true);
    let request = player.play_with_auto_continuation(create_test_track("seed"));

    let album = tracks(&["a1", "a2", "a3"]);
    player.play_explicit(album[2].clone(), album);
    assert!(!player.is_loading_playlist());

    let outcome = player.complete_continuation::<String>(request.ticket, Ok(tracks(&["r1"])));
    assert_eq!(outcome, ContinuationOutcome::Stale);
    assert_eq!(queue_ids(&player), vec!["a1", "a2", "a3"]);
    assert_eq!(player.active_index(), Some(2));
}

#[test]
fn test_transport_keeps_working_while_loading() {
    let mut player = new_player(true);
    player.play_with_auto_continuation(create_test_track("seed"));
    report(&mut player, MediaEvent::Play);
    report(&mut player, MediaEvent::LoadedMetadata(180.0));

    player.toggle_play_pause();
    player.seek(30.0);
    player.set_volume(0.3);

    let calls = &player.output().calls;
    assert!(calls.contains(&Call::Pause));
    assert!(calls.contains(&Call::Seek(30.0)));
    assert!(calls.contains(&Call::Volume(0.3)));
    assert_eq!(player.state(), PlayerState::Loading);
}

#[test]
fn test_play_by_index() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b", "c"]);
    player.play_explicit(list[0].clone(), list);

    assert!(player.play_by_index(2));
    assert_eq!(player.active_index(), Some(2));
    assert_eq!(current_id(&player).as_deref(), Some("c"));

    // Out of range is a no-op
    assert!(!player.play_by_index(3));
    assert_eq!(player.active_index(), Some(2));
    assert_eq!(current_id(&player).as_deref(), Some("c"));
}

#[test]
fn test_advance_and_retreat_do_not_wrap() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);

    assert!(!player.retreat());
    assert_eq!(player.active_index(), Some(0));

    assert!(player.advance());
    assert_eq!(current_id(&player).as_deref(), Some("b"));

    assert!(!player.advance());
    assert_eq!(player.active_index(), Some(1));

    assert!(player.retreat());
    assert_eq!(current_id(&player).as_deref(), Some("a"));
}

#[test]
fn test_advance_on_empty_queue_is_noop() {
    let mut player = new_player(true);
    assert!(!player.advance());
    assert!(!player.retreat());
    assert_eq!(player.state(), PlayerState::Idle);
}

#[test]
fn test_ended_with_autoplay_advances() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);
    report(&mut player, MediaEvent::Play);

    let outcome = report(&mut player, MediaEvent::Ended);

    assert_eq!(outcome, EventOutcome::TrackEnded);
    assert_eq!(player.active_index(), Some(1));
    assert_eq!(current_id(&player).as_deref(), Some("b"));
    assert_eq!(player.output().loads().len(), 2);
}

#[test]
fn test_ended_on_last_track_stays_put() {
    let mut player = new_player(true);
    player.play_explicit(create_test_track("a"), Vec::new());
    report(&mut player, MediaEvent::Play);

    report(&mut player, MediaEvent::Ended);

    assert_eq!(player.active_index(), Some(0));
    assert!(!player.is_playing());
    assert_eq!(player.output().loads().len(), 1);
}

#[test]
fn test_ended_without_autoplay_pauses_at_end() {
    let mut player = new_player(false);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);
    report(&mut player, MediaEvent::Play);
    report(&mut player, MediaEvent::LoadedMetadata(200.0));
    report(&mut player, MediaEvent::TimeUpdate(200.0));

    report(&mut player, MediaEvent::Ended);

    assert_eq!(player.active_index(), Some(0));
    assert!(!player.is_playing());
    assert_eq!(player.snapshot().position, 200.0);
}

#[test]
fn test_autoplay_is_read_when_track_ends() {
    let mut player = new_player(false);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);

    // Flipped after the track started playing
    assert!(player.toggle_autoplay());
    report(&mut player, MediaEvent::Ended);

    assert_eq!(current_id(&player).as_deref(), Some("b"));
}

#[test]
fn test_toggle_without_track_is_noop() {
    let mut player = new_player(true);
    player.toggle_play_pause();
    assert_eq!(player.output().calls, vec![Call::Volume(0.8)]);
}

#[test]
fn test_double_toggle_before_events_settles_on_second_request() {
    let mut player = new_player(true);
    player.play_explicit(create_test_track("a"), Vec::new());
    report(&mut player, MediaEvent::Play);

    // Pause then play, before the output reports either
    player.toggle_play_pause();
    player.toggle_play_pause();

    let calls = &player.output().calls;
    let tail = &calls[calls.len() - 2..];
    assert_eq!(tail, &[Call::Pause, Call::Play]);

    report(&mut player, MediaEvent::Pause);
    report(&mut player, MediaEvent::Play);
    assert!(player.is_playing());
}

#[test]
fn test_toggle_after_ended_restarts_track() {
    let mut player = new_player(false);
    player.play_explicit(create_test_track("a"), Vec::new());
    report(&mut player, MediaEvent::Play);
    report(&mut player, MediaEvent::Ended);

    player.toggle_play_pause();

    assert_eq!(player.output().loads().len(), 2);
    assert_eq!(player.output().last_ticket(), 2);
}

#[test]
fn test_seek_without_duration_is_noop() {
    let mut player = new_player(true);
    player.play_explicit(create_test_track("a"), Vec::new());

    player.seek(30.0);

    assert!(!player.output().calls.iter().any(|c| matches!(c, Call::Seek(_))));
}

#[test]
fn test_seek_after_ended_is_noop() {
    let mut player = new_player(false);
    player.play_explicit(create_test_track("a"), Vec::new());
    report(&mut player, MediaEvent::LoadedMetadata(200.0));
    report(&mut player, MediaEvent::TimeUpdate(200.0));
    report(&mut player, MediaEvent::Ended);

    player.seek(30.0);

    assert!(!player.output().calls.iter().any(|c| matches!(c, Call::Seek(_))));
    assert_eq!(player.snapshot().position, 200.0);
}

#[test]
fn test_seek_is_clamped_to_duration() {
    let mut player = new_player(true);
    player.play_explicit(create_test_track("a"), Vec::new());
    report(&mut player, MediaEvent::LoadedMetadata(120.0));

    player.seek(500.0);
    player.seek(-5.0);

    let seeks: Vec<&Call> = player
        .output()
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Seek(_)))
        .collect();
    assert_eq!(seeks, vec![&Call::Seek(120.0), &Call::Seek(0.0)]);
    assert_eq!(player.snapshot().position, 0.0);
}

#[test]
fn test_stale_play_rejection_is_swallowed() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);
    let stale_ticket = player.output().last_ticket();

    player.advance();
    report(&mut player, MediaEvent::Play);

    let outcome = player.handle_media_event(OutputEvent::new(
        stale_ticket,
        MediaEvent::PlayRejected("aborted".to_string()),
    ));

    assert_eq!(outcome, EventOutcome::Ignored);
    assert!(player.is_playing());
}

#[test]
fn test_stale_end_after_jump_keeps_picked_track() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b", "c", "d"]);
    player.play_explicit(list[0].clone(), list);
    report(&mut player, MediaEvent::Play);
    let ticket_a = player.engine().load_ticket();

    // "a" finished, but its end arrives after the user picked "c"
    player.play_by_index(2);
    report(&mut player, MediaEvent::Play);
    let outcome = player.handle_media_event(OutputEvent::new(ticket_a, MediaEvent::Ended));

    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(current_id(&player).as_deref(), Some("c"));
    assert_eq!(player.active_index(), Some(2));
    assert!(player.is_playing());
}

#[test]
fn test_stale_end_without_autoplay_leaves_new_track_playing() {
    let mut player = new_player(false);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);
    let ticket_a = player.engine().load_ticket();

    player.advance();
    report(&mut player, MediaEvent::Play);
    player.handle_media_event(OutputEvent::new(ticket_a, MediaEvent::Ended));

    assert!(player.is_playing());

    // Pausing pauses; it does not restart the track
    player.toggle_play_pause();
    assert_eq!(player.output().loads().len(), 2);
    assert_eq!(player.output().calls.last(), Some(&Call::Pause));
}

#[test]
fn test_stale_progress_does_not_touch_new_track() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b"]);
    player.play_explicit(list[0].clone(), list);
    let ticket_a = player.engine().load_ticket();

    player.advance();
    player.handle_media_event(OutputEvent::new(ticket_a, MediaEvent::LoadedMetadata(300.0)));
    player.handle_media_event(OutputEvent::new(ticket_a, MediaEvent::TimeUpdate(250.0)));

    let snapshot = player.snapshot();
    assert_eq!(snapshot.duration, None);
    assert_eq!(snapshot.position, 0.0);
}

#[test]
fn test_current_play_rejection_stops_playback() {
    let mut player = new_player(true);
    player.play_explicit(create_test_track("a"), Vec::new());
    let ticket = player.output().last_ticket();

    let outcome = player.handle_media_event(OutputEvent::new(
        ticket,
        MediaEvent::PlayRejected("no audio".to_string()),
    ));

    assert_eq!(outcome, EventOutcome::Updated);
    assert!(!player.is_playing());
    // No retry
    assert_eq!(player.output().loads().len(), 1);
}

#[test]
fn test_replaying_queued_track_replaces_queue() {
    let mut player = new_player(true);
    let album = tracks(&["a", "b", "c"]);
    player.play_explicit(album[0].clone(), album.clone());

    // Same track again, different list
    player.play_explicit(album[0].clone(), tracks(&["z", "a"]));

    assert_eq!(queue_ids(&player), vec!["z", "a"]);
    assert_eq!(player.active_index(), Some(1));
}

#[test]
fn test_snapshot_reports_neighbours() {
    let mut player = new_player(true);
    let list = tracks(&["a", "b", "c"]);
    player.play_explicit(list[1].clone(), list);

    let snapshot = player.snapshot();
    assert_eq!(snapshot.queue_len, 3);
    assert_eq!(snapshot.active_index, Some(1));
    assert!(snapshot.has_next);
    assert!(snapshot.has_previous);
    assert!(snapshot.autoplay);
    assert_eq!(snapshot.volume, 0.8);
}
