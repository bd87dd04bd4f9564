use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    player::PlayerSnapshot,
    types::{
        AlbumDetails, ArtistDetails, ArtistSummary, HomeContent, ItemTableRow, PlaylistResult,
        PlaylistTableRow, PlaylistTracksResponse, SearchResponse, SearchResultItem, Track,
        TrackTableRow, UserPlaylist, UserProfile,
    },
    utils,
};

/// Spinner shown while a request is in flight. Call `finish_and_clear` on it.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Prints a numbered listing of mixed catalog items.
pub fn print_items(items: &[SearchResultItem]) {
    let rows: Vec<ItemTableRow> = items
        .iter()
        .enumerate()
        .map(|(i, item)| ItemTableRow {
            index: i + 1,
            kind: item.kind_label().to_string(),
            name: utils::truncate(item.name(), 40),
            subtitle: utils::truncate(&item.subtitle(), 40),
            extra: item.extra_info(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

/// Prints a numbered track list, marking the entry at `active`.
pub fn print_tracks(tracks: &[Track], active: Option<usize>) {
    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| TrackTableRow {
            index: if Some(i) == active {
                format!("▶ {}", i + 1)
            } else {
                (i + 1).to_string()
            },
            name: utils::truncate(&track.name, 40),
            artist: utils::truncate(&track.artist, 30),
            album: utils::truncate(&track.album, 30),
            duration: utils::format_duration(track.duration),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn print_search(query: &str, response: &SearchResponse) {
    println!("{} \"{}\"", "Search Results for".bold(), query);

    if let Some(total) = &response.total_found {
        println!(
            "{} tracks, {} artists, {} albums, {} playlists",
            total.tracks, total.artists, total.albums, total.playlists
        );
    }

    if response.is_empty() {
        println!("No results found for \"{}\"", query);
        return;
    }

    print_items(&response.items());
}

/// Items of an artist page: top tracks first, then albums.
pub fn artist_items(details: &ArtistDetails) -> Vec<SearchResultItem> {
    details
        .top_tracks
        .iter()
        .cloned()
        .map(SearchResultItem::Track)
        .chain(details.albums.iter().cloned().map(SearchResultItem::Album))
        .collect()
}

pub fn print_artist(details: &ArtistDetails) {
    if let Some(artist) = &details.artist {
        println!("{}", artist.name.bold());
        let genres = if artist.genres.is_empty() {
            "Various genres".to_string()
        } else {
            artist.genres.join(", ")
        };
        println!("{} followers • {}", artist.followers, genres);
    }

    let items = artist_items(details);
    if items.is_empty() {
        println!("Nothing to show for this artist.");
        return;
    }
    print_items(&items);
}

pub fn print_album(details: &AlbumDetails) {
    if let Some(album) = &details.album {
        println!("{} by {}", album.name.bold(), album.artist);
        let year = album
            .release_date
            .as_deref()
            .map(utils::release_year)
            .unwrap_or_default();
        let total: u64 = details.tracks.iter().filter_map(|t| t.duration).sum();
        println!(
            "{} • {} tracks • {}",
            year,
            album.total_tracks,
            utils::format_duration(Some(total))
        );
    }

    print_tracks(&details.playable_tracks(), None);
}

/// User playlists as catalog items so they can be opened like search hits.
pub fn playlist_items(playlists: &[UserPlaylist]) -> Vec<SearchResultItem> {
    playlists
        .iter()
        .map(|p| {
            SearchResultItem::Playlist(PlaylistResult {
                spotify_id: p.id.clone(),
                name: p.name.clone(),
                image: p.images.first().map(|i| i.url.clone()),
                owner: p.owner.display_name.clone(),
                tracks_total: p.tracks.total,
                description: String::new(),
            })
        })
        .collect()
}

pub fn print_playlists(playlists: &[UserPlaylist]) {
    if playlists.is_empty() {
        println!("No playlists in your library.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .iter()
        .enumerate()
        .map(|(i, p)| PlaylistTableRow {
            index: i + 1,
            name: utils::truncate(&p.name, 40),
            owner: p.owner.display_name.clone(),
            tracks: p.tracks.total,
            id: p.id.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn print_playlist_tracks(page: &PlaylistTracksResponse) {
    let tracks = page.playable_tracks();
    if tracks.is_empty() {
        println!("This playlist has no playable tracks.");
        return;
    }

    print_tracks(&tracks, None);
    let shown_to = page.offset as usize + page.items.len();
    println!("Showing {}-{} of {}", page.offset + 1, shown_to, page.total);
}

/// Home sections in display order, flattened into one numbered listing.
pub fn home_items(content: &HomeContent) -> Vec<SearchResultItem> {
    content
        .values()
        .flat_map(|section| section.items.iter().cloned())
        .collect()
}

pub fn print_home(content: &HomeContent) {
    if content.values().all(|s| s.items.is_empty()) {
        println!("Nothing on your home page yet. Try a search.");
        return;
    }

    let mut offset = 0;
    for section in content.values().filter(|s| !s.items.is_empty()) {
        println!("{}", section.title.bold());
        let rows: Vec<ItemTableRow> = section
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| ItemTableRow {
                index: offset + i + 1,
                kind: item.kind_label().to_string(),
                name: utils::truncate(item.name(), 40),
                subtitle: utils::truncate(&item.subtitle(), 40),
                extra: item.extra_info(),
            })
            .collect();
        offset += section.items.len();
        println!("{}\n", Table::new(rows));
    }
}

pub fn print_profile(profile: &UserProfile) {
    println!("{}", profile.display_name.bold());
    if !profile.email.is_empty() {
        println!("{}", profile.email);
    }
    println!("id: {}", profile.id);
}

pub fn print_top_artists(artists: &[ArtistSummary]) {
    if artists.is_empty() {
        println!("No top artists yet.");
        return;
    }
    let items: Vec<SearchResultItem> = artists
        .iter()
        .cloned()
        .map(SearchResultItem::Artist)
        .collect();
    print_items(&items);
}

/// One-line now-playing bar.
pub fn print_now_playing(snapshot: &PlayerSnapshot) {
    let Some(track) = &snapshot.current_track else {
        println!("Nothing playing.");
        return;
    };

    let state = if snapshot.is_playing {
        "▶".green()
    } else {
        "⏸".yellow()
    };
    let duration = snapshot
        .duration
        .map(utils::format_time)
        .unwrap_or_else(|| utils::format_duration(track.duration));
    let mut flags = Vec::new();
    if snapshot.autoplay {
        flags.push("autoplay".to_string());
    }
    if snapshot.state == crate::player::PlayerState::Loading {
        flags.push("building playlist...".to_string());
    }
    flags.push(format!("vol {}%", (snapshot.volume * 100.0).round()));

    println!(
        "{} {} - {} [{} / {}] ({})",
        state,
        track.name.bold(),
        track.artist,
        utils::format_time(snapshot.position),
        duration,
        flags.join(", ")
    );
}
