use reqwest::Method;

use super::{ApiError, BackendClient, handle_response};
use crate::types::{RecommendationQuery, RecommendationsResponse};

impl BackendClient {
    /// Tracks recommended from the given seeds.
    ///
    /// Seeds are sent comma-joined; empty seed lists are left out of the
    /// query entirely.
    pub async fn recommendations(
        &self,
        query: &RecommendationQuery,
    ) -> Result<RecommendationsResponse, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        for (key, seeds) in [
            ("seed_tracks", &query.seed_tracks),
            ("seed_artists", &query.seed_artists),
            ("seed_genres", &query.seed_genres),
        ] {
            if !seeds.is_empty() {
                params.push((key, seeds.join(",")));
            }
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let request = self
            .request(Method::GET, "/spotify/recommendations")
            .await
            .query(&params);
        let response = self.send(request).await?;
        handle_response(response).await
    }
}
