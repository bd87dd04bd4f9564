use reqwest::Url;

use crate::types::Track;

/// Builds the URL the audio output streams `track` from.
///
/// The backend locates (or synthesises) the audio from the track id plus
/// title, artist and length, so all four travel in the URL:
/// `{base}/stream/{id}?title=..&artist=..&duration_ms=..`. An unknown length
/// is sent as `0`.
pub fn stream_url(base_url: &str, track: &Track) -> String {
    let raw = format!(
        "{}/stream/{}",
        base_url.trim_end_matches('/'),
        track.spotify_id
    );

    match Url::parse(&raw) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("title", &track.name)
                .append_pair("artist", &track.artist)
                .append_pair("duration_ms", &track.duration.unwrap_or(0).to_string());
            url.to_string()
        }
        // Not an absolute URL; keep the path and skip the metadata.
        Err(_) => raw,
    }
}
