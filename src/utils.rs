/// Formats a track length given in milliseconds as `m:ss`.
///
/// Unknown lengths (`None` or `0`) render as `--:--` so a track the catalog
/// did not measure never shows a bogus time.
///
/// # Example
///
/// ```
/// assert_eq!(format_duration(Some(215_000)), "3:35");
/// assert_eq!(format_duration(None), "--:--");
/// ```
pub fn format_duration(duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) if ms > 0 => {
            let total_seconds = ms / 1000;
            format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
        }
        _ => "--:--".to_string(),
    }
}

/// Formats a playback position given in seconds as `m:ss`.
///
/// Non-finite or negative values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total_seconds = seconds.floor() as u64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Year part of a catalog release date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
pub fn release_year(release_date: &str) -> String {
    let year: String = release_date.chars().take(4).collect();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        year
    } else {
        String::new()
    }
}

/// Cuts `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// Parses a volume given in percent (`0`-`100`) into the `0.0..=1.0` range
/// the player works with.
pub fn parse_volume_percent(input: &str) -> Result<f64, String> {
    let percent: f64 = input
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{}' is not a number", input.trim()))?;

    if !(0.0..=100.0).contains(&percent) {
        return Err(format!("volume must be between 0 and 100, got {}", percent));
    }

    Ok(percent / 100.0)
}

/// Parses a 1-based list position typed by the user into a 0-based index.
pub fn parse_position(input: &str) -> Result<usize, String> {
    match input.trim().parse::<usize>() {
        Ok(0) => Err("positions start at 1".to_string()),
        Ok(n) => Ok(n - 1),
        Err(_) => Err(format!("'{}' is not a list position", input.trim())),
    }
}
