use freesound::types::*;
use serde_json::json;

fn create_test_track(id: &str, name: &str) -> Track {
    Track {
        spotify_id: id.to_string(),
        name: name.to_string(),
        artist: "Daft Punk".to_string(),
        album: "Discovery".to_string(),
        duration: Some(320_000),
        uri: None,
        preview_url: None,
        image: None,
    }
}

#[test]
fn test_search_result_item_tagged_by_type() {
    let items: Vec<SearchResultItem> = serde_json::from_value(json!([
        {
            "type": "track",
            "spotify_id": "t1",
            "name": "One More Time",
            "artist": "Daft Punk",
            "album": "Discovery",
            "duration": 320000
        },
        {
            "type": "artist",
            "spotify_id": "a1",
            "name": "Daft Punk",
            "followers": 9000000,
            "genres": ["french house", "electro", "filter house"]
        },
        {
            "type": "album",
            "spotify_id": "al1",
            "name": "Discovery",
            "artist": "Daft Punk",
            "total_tracks": 14,
            "release_date": "2001-03-12"
        },
        {
            "type": "playlist",
            "spotify_id": "p1",
            "name": "This Is Daft Punk",
            "owner": "Spotify",
            "tracks_total": 50,
            "description": "The essential tracks, all in one playlist."
        }
    ]))
    .unwrap();

    let kinds: Vec<&str> = items.iter().map(|i| i.kind_label()).collect();
    assert_eq!(kinds, vec!["Track", "Artist", "Album", "Playlist"]);

    let ids: Vec<&str> = items.iter().map(|i| i.spotify_id()).collect();
    assert_eq!(ids, vec!["t1", "a1", "al1", "p1"]);

    assert_eq!(items[0].subtitle(), "Daft Punk");
    assert_eq!(items[0].extra_info(), "5:20");

    assert_eq!(items[1].subtitle(), "9000000 followers");
    // Only the first two genres are shown
    assert_eq!(items[1].extra_info(), "french house, electro");

    assert_eq!(items[2].subtitle(), "Daft Punk • 14 tracks");
    assert_eq!(items[2].extra_info(), "2001");

    assert_eq!(items[3].subtitle(), "Spotify • 50 tracks");
}

#[test]
fn test_search_result_item_fallback_labels() {
    let track = SearchResultItem::Track(Track {
        artist: String::new(),
        duration: None,
        ..create_test_track("t1", "Untitled")
    });
    assert_eq!(track.subtitle(), "Unknown artist");
    assert_eq!(track.extra_info(), "--:--");

    let artist = SearchResultItem::Artist(ArtistSummary {
        spotify_id: "a1".to_string(),
        name: "Nobody".to_string(),
        image: None,
        followers: 0,
        genres: Vec::new(),
    });
    assert_eq!(artist.extra_info(), "Various genres");
}

#[test]
fn test_search_response_items_prefers_results() {
    let response: SearchResponse = serde_json::from_value(json!({
        "tracks": [
            { "spotify_id": "t1", "name": "One More Time" }
        ],
        "results": [
            { "type": "artist", "spotify_id": "a1", "name": "Daft Punk" }
        ],
        "total_found": { "tracks": 1, "artists": 1, "albums": 0, "playlists": 0 }
    }))
    .unwrap();

    let items = response.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind_label(), "Artist");
    assert_eq!(response.total_found.unwrap().artists, 1);
}

#[test]
fn test_search_response_items_falls_back_to_tracks() {
    let response: SearchResponse = serde_json::from_value(json!({
        "tracks": [
            { "spotify_id": "t1", "name": "One More Time" },
            { "spotify_id": "t2", "name": "Aerodynamic" }
        ]
    }))
    .unwrap();

    let items = response.items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.kind_label() == "Track"));
    assert!(!response.is_empty());

    let empty: SearchResponse = serde_json::from_value(json!({ "tracks": [] })).unwrap();
    assert!(empty.is_empty());
    assert!(empty.items().is_empty());
}

#[test]
fn test_album_track_prefers_album_artwork() {
    let details: AlbumDetails = serde_json::from_value(json!({
        "success": true,
        "album": {
            "spotify_id": "al1",
            "name": "Discovery",
            "artist": "Daft Punk",
            "image": "https://img/album.jpg",
            "release_date": "2001-03-12",
            "total_tracks": 2
        },
        "tracks": [
            {
                "spotify_id": "t1",
                "name": "One More Time",
                "artist": "Daft Punk",
                "album": "Discovery",
                "duration": 320000,
                "track_number": 1,
                "explicit": false,
                "image": "https://img/track.jpg"
            },
            {
                "spotify_id": "t2",
                "name": "Aerodynamic",
                "track_number": 2
            }
        ]
    }))
    .unwrap();

    let tracks = details.playable_tracks();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].image.as_deref(), Some("https://img/album.jpg"));
    assert_eq!(tracks[1].image.as_deref(), Some("https://img/album.jpg"));
    assert_eq!(tracks[0].duration, Some(320_000));
    assert_eq!(tracks[1].duration, None);
}

#[test]
fn test_album_track_keeps_own_artwork_without_album_image() {
    let track = AlbumTrack {
        spotify_id: "t1".to_string(),
        name: "One More Time".to_string(),
        artist: "Daft Punk".to_string(),
        album: "Discovery".to_string(),
        duration: Some(320_000),
        track_number: 1,
        explicit: false,
        preview_url: None,
        image: Some("https://img/track.jpg".to_string()),
    };

    assert_eq!(
        track.to_track(None).image.as_deref(),
        Some("https://img/track.jpg")
    );
}

#[test]
fn test_artist_details_defaults() {
    let details: ArtistDetails = serde_json::from_value(json!({
        "artist": { "spotify_id": "a1", "name": "Daft Punk" },
        "topTracks": [ { "spotify_id": "t1", "name": "One More Time" } ]
    }))
    .unwrap();

    // Missing success flag means success
    assert!(details.success);
    assert_eq!(details.top_tracks.len(), 1);
    assert!(details.albums.is_empty());
}

#[test]
fn test_playlist_tracks_skip_null_tracks() {
    let page: PlaylistTracksResponse = serde_json::from_value(json!({
        "items": [
            { "track": { "spotify_id": "t1", "name": "One More Time" } },
            { "track": null },
            { "track": { "spotify_id": "t2", "name": "Aerodynamic" } }
        ],
        "total": 3,
        "limit": 50,
        "offset": 0,
        "next": null,
        "previous": null
    }))
    .unwrap();

    let ids: Vec<String> = page
        .playable_tracks()
        .into_iter()
        .map(|t| t.spotify_id)
        .collect();
    assert_eq!(ids, vec!["t1", "t2"]);
}

#[test]
fn test_auth_status_wire_names() {
    let status: AuthStatus = serde_json::from_value(json!({
        "isAuthenticated": true,
        "user": { "displayName": "Thomas", "email": "thomas@example.com", "id": "u1" }
    }))
    .unwrap();
    assert!(status.is_authenticated);
    assert_eq!(status.user.unwrap().display_name, "Thomas");

    let signed_out: AuthStatus =
        serde_json::from_value(json!({ "isAuthenticated": false })).unwrap();
    assert!(!signed_out.is_authenticated);
    assert!(signed_out.user.is_none());
}

#[test]
fn test_home_content_sections() {
    let content: HomeContent = serde_json::from_value(json!({
        "recentlyPlayed": {
            "title": "Recently played",
            "items": [ { "type": "track", "spotify_id": "t1", "name": "One More Time" } ]
        },
        "topArtists": {
            "title": "Your top artists",
            "items": [ { "type": "artist", "spotify_id": "a1", "name": "Daft Punk" } ]
        }
    }))
    .unwrap();

    assert_eq!(content.len(), 2);
    assert_eq!(content["topArtists"].items[0].kind_label(), "Artist");
}
