use reqwest::Method;

use super::{ApiError, BackendClient, handle_response};
use crate::types::{SearchRequest, SearchResponse};

impl BackendClient {
    /// Searches the catalog for tracks, artists, albums and playlists.
    ///
    /// Older backends only fill `tracks`; newer ones add the typed `results`
    /// list and per-type totals. [`SearchResponse::items`] hides the
    /// difference.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let body = SearchRequest {
            query: query.to_string(),
        };
        let request = self.request(Method::POST, "/search").await.json(&body);
        let response = self.send(request).await?;
        handle_response(response).await
    }
}
