use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub spotify_id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Length in milliseconds. `None` or `0` means the catalog did not report it.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "displayName", alias = "display_name", default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    pub id: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeCodeRequest {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeCodeResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub spotify_id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub spotify_id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistResult {
    pub spotify_id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub tracks_total: u32,
    #[serde(default)]
    pub description: String,
}

/// One entry of a polymorphic search or home listing, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResultItem {
    Track(Track),
    Artist(ArtistSummary),
    Album(AlbumSummary),
    Playlist(PlaylistResult),
}

impl SearchResultItem {
    pub fn name(&self) -> &str {
        match self {
            SearchResultItem::Track(t) => &t.name,
            SearchResultItem::Artist(a) => &a.name,
            SearchResultItem::Album(a) => &a.name,
            SearchResultItem::Playlist(p) => &p.name,
        }
    }

    pub fn spotify_id(&self) -> &str {
        match self {
            SearchResultItem::Track(t) => &t.spotify_id,
            SearchResultItem::Artist(a) => &a.spotify_id,
            SearchResultItem::Album(a) => &a.spotify_id,
            SearchResultItem::Playlist(p) => &p.spotify_id,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            SearchResultItem::Track(_) => "Track",
            SearchResultItem::Artist(_) => "Artist",
            SearchResultItem::Album(_) => "Album",
            SearchResultItem::Playlist(_) => "Playlist",
        }
    }

    pub fn subtitle(&self) -> String {
        match self {
            SearchResultItem::Track(t) if t.artist.is_empty() => "Unknown artist".to_string(),
            SearchResultItem::Track(t) => t.artist.clone(),
            SearchResultItem::Artist(a) => format!("{} followers", a.followers),
            SearchResultItem::Album(a) => format!("{} • {} tracks", a.artist, a.total_tracks),
            SearchResultItem::Playlist(p) => format!("{} • {} tracks", p.owner, p.tracks_total),
        }
    }

    pub fn extra_info(&self) -> String {
        match self {
            SearchResultItem::Track(t) => utils::format_duration(t.duration),
            SearchResultItem::Artist(a) if a.genres.is_empty() => "Various genres".to_string(),
            SearchResultItem::Artist(a) => a
                .genres
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            SearchResultItem::Album(a) => a
                .release_date
                .as_deref()
                .map(utils::release_year)
                .unwrap_or_default(),
            SearchResultItem::Playlist(p) => utils::truncate(&p.description, 50),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalFound {
    #[serde(default)]
    pub tracks: u64,
    #[serde(default)]
    pub artists: u64,
    #[serde(default)]
    pub albums: u64,
    #[serde(default)]
    pub playlists: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
    #[serde(default)]
    pub by_type: Option<BTreeMap<String, Vec<SearchResultItem>>>,
    #[serde(default)]
    pub total_found: Option<TotalFound>,
}

impl SearchResponse {
    /// Items to show: the typed `results` when the backend sent them,
    /// otherwise the bare `tracks` list.
    pub fn items(&self) -> Vec<SearchResultItem> {
        if !self.results.is_empty() {
            return self.results.clone();
        }
        self.tracks
            .iter()
            .cloned()
            .map(SearchResultItem::Track)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.tracks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistDetails {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub artist: Option<ArtistSummary>,
    #[serde(rename = "topTracks", default)]
    pub top_tracks: Vec<Track>,
    #[serde(default)]
    pub albums: Vec<AlbumSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub spotify_id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub spotify_id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub track_number: u32,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl AlbumTrack {
    /// Playable track; the album artwork takes precedence over the track's own.
    pub fn to_track(&self, album_image: Option<&str>) -> Track {
        Track {
            spotify_id: self.spotify_id.clone(),
            name: self.name.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            duration: self.duration,
            uri: None,
            preview_url: self.preview_url.clone(),
            image: album_image
                .map(str::to_string)
                .or_else(|| self.image.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumDetails {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub album: Option<AlbumInfo>,
    #[serde(default)]
    pub tracks: Vec<AlbumTrack>,
}

impl AlbumDetails {
    pub fn playable_tracks(&self) -> Vec<Track> {
        let image = self.album.as_ref().and_then(|a| a.image.as_deref());
        self.tracks.iter().map(|t| t.to_track(image)).collect()
    }
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistOwner {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCount {
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub owner: PlaylistOwner,
    pub tracks: TrackCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPlaylistsResponse {
    pub playlists: Vec<UserPlaylist>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    /// `None` for local files or tracks no longer available.
    pub track: Option<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistTrackItem>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PlaylistTracksResponse {
    pub fn playable_tracks(&self) -> Vec<Track> {
        self.items.iter().filter_map(|i| i.track.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationQuery {
    pub seed_tracks: Vec<String>,
    pub seed_artists: Vec<String>,
    pub seed_genres: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSection {
    pub title: String,
    #[serde(default)]
    pub items: Vec<SearchResultItem>,
}

pub type HomeContent = BTreeMap<String, HomeSection>;

#[derive(Tabled)]
pub struct ItemTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Details")]
    pub subtitle: String,
    #[tabled(rename = "")]
    pub extra: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub index: String,
    #[tabled(rename = "Title")]
    pub name: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Album")]
    pub album: String,
    #[tabled(rename = "Time")]
    pub duration: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Owner")]
    pub owner: String,
    #[tabled(rename = "Tracks")]
    pub tracks: u32,
    #[tabled(rename = "Id")]
    pub id: String,
}
