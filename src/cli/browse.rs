use crate::{
    cli::{render, session_client},
    warning,
};

pub async fn artist(artist_id: &str) {
    let client = session_client().await;
    let pb = render::spinner("Loading artist...");
    let result = client.artist(artist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(details) => render::print_artist(&details),
        Err(e) => warning!("Failed to load artist: {}", e),
    }
}

pub async fn album(album_id: &str) {
    let client = session_client().await;
    let pb = render::spinner("Loading album...");
    let result = client.album(album_id).await;
    pb.finish_and_clear();

    match result {
        Ok(details) => render::print_album(&details),
        Err(e) => warning!("Failed to load album: {}", e),
    }
}

pub async fn playlists() {
    let client = session_client().await;
    let pb = render::spinner("Loading your playlists...");
    let result = client.user_playlists().await;
    pb.finish_and_clear();

    match result {
        Ok(response) => render::print_playlists(&response.playlists),
        Err(e) => warning!("Failed to load playlists: {}", e),
    }
}

pub async fn playlist(playlist_id: &str, limit: Option<u32>, offset: Option<u32>) {
    let client = session_client().await;
    let pb = render::spinner("Loading playlist tracks...");
    let result = client.playlist_tracks(playlist_id, limit, offset).await;
    pb.finish_and_clear();

    match result {
        Ok(page) => render::print_playlist_tracks(&page),
        Err(e) => warning!("Failed to load playlist: {}", e),
    }
}

pub async fn home() {
    let client = session_client().await;
    let pb = render::spinner("Loading your home page...");
    let result = client.home_content().await;
    pb.finish_and_clear();

    match result {
        Ok(content) => render::print_home(&content),
        Err(e) => warning!("Failed to load home content: {}", e),
    }
}

/// Profile plus top artists.
pub async fn profile() {
    let client = session_client().await;
    let pb = render::spinner("Loading profile...");
    let (me, top) = tokio::join!(client.me(), client.top_artists());
    pb.finish_and_clear();

    match me {
        Ok(profile) => render::print_profile(&profile),
        Err(e) if e.is_unauthorized() => {
            warning!("Not logged in. Run `freesound auth login` first.");
            return;
        }
        Err(e) => warning!("Failed to load profile: {}", e),
    }

    match top {
        Ok(artists) => {
            println!();
            render::print_top_artists(&artists);
        }
        Err(e) => warning!("Failed to load top artists: {}", e),
    }
}
