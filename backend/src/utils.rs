use url::Url;

/// Largest page the YouTube Data API hands out for search results.
pub const MAX_RESULTS_LIMIT: u32 = 50;

pub fn clamp_max_results(max_results: u32) -> u32 {
    max_results.clamp(1, MAX_RESULTS_LIMIT)
}

pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    let parsed_url = Url::parse(url).ok()?;
    let host = parsed_url.host_str()?;

    match host {
        "www.youtube.com" | "youtube.com" | "m.youtube.com" => {
            // https://www.youtube.com/watch?v=VIDEO_ID or /embed/VIDEO_ID, /shorts/VIDEO_ID
            if parsed_url.path() == "/watch" {
                parsed_url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.to_string())
            } else {
                let mut segments = parsed_url.path_segments()?;
                match (segments.next(), segments.next()) {
                    (Some("embed" | "shorts" | "live"), Some(id)) if !id.is_empty() => {
                        Some(id.to_string())
                    }
                    _ => None,
                }
            }
        }
        "youtu.be" => parsed_url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string()),
        _ => None,
    }
}

/// Accepts either a bare video id or any YouTube video link.
pub fn normalize_video_id(input: &str) -> String {
    extract_youtube_video_id(input).unwrap_or_else(|| input.trim().to_string())
}
