use reqwest::Method;

use super::{ApiError, BackendClient, handle_response};
use crate::types::{PlaylistTracksResponse, UserPlaylistsResponse};

impl BackendClient {
    pub async fn user_playlists(&self) -> Result<UserPlaylistsResponse, ApiError> {
        let request = self.request(Method::GET, "/spotify/playlists").await;
        let response = self.send(request).await?;
        handle_response(response).await
    }

    /// One page of a playlist's tracks. Without `limit`/`offset` the backend
    /// applies its own defaults (50 from the start).
    pub async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<PlaylistTracksResponse, ApiError> {
        let path = format!("/spotify/playlists/{}/tracks", playlist_id);

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            params.push(("offset", offset.to_string()));
        }

        let request = self.request(Method::GET, &path).await.query(&params);
        let response = self.send(request).await?;
        handle_response(response).await
    }
}
