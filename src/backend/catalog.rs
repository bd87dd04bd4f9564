use reqwest::Method;

use super::{ApiError, BackendClient, handle_response};
use crate::types::{AlbumDetails, ArtistDetails, ArtistSummary, HomeContent};

impl BackendClient {
    /// Artist profile with top tracks and albums.
    ///
    /// A payload carrying `success: false` is reported as
    /// [`ApiError::Rejected`] with the backend's message.
    pub async fn artist(&self, artist_id: &str) -> Result<ArtistDetails, ApiError> {
        let path = format!("/spotify/artist/{}", artist_id);
        let request = self.request(Method::GET, &path).await;
        let response = self.send(request).await?;
        let details: ArtistDetails = handle_response(response).await?;

        if !details.success {
            return Err(ApiError::Rejected(details.message.unwrap_or_else(|| {
                "Could not load the artist details".to_string()
            })));
        }

        Ok(details)
    }

    /// Album metadata and its track listing.
    pub async fn album(&self, album_id: &str) -> Result<AlbumDetails, ApiError> {
        let path = format!("/spotify/album/{}", album_id);
        let request = self.request(Method::GET, &path).await;
        let response = self.send(request).await?;
        let details: AlbumDetails = handle_response(response).await?;

        if !details.success {
            return Err(ApiError::Rejected(details.message.unwrap_or_else(|| {
                "Could not load the album details".to_string()
            })));
        }

        Ok(details)
    }

    /// Personalised home sections, keyed by section id.
    pub async fn home_content(&self) -> Result<HomeContent, ApiError> {
        let request = self.request(Method::GET, "/api/home/content").await;
        let response = self.send(request).await?;
        handle_response(response).await
    }

    /// The logged-in user's most listened artists.
    pub async fn top_artists(&self) -> Result<Vec<ArtistSummary>, ApiError> {
        let request = self.request(Method::GET, "/api/me/top/artists").await;
        let response = self.send(request).await?;
        handle_response(response).await
    }
}
