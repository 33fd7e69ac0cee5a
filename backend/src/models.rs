use crate::services::readability::{self, ReadabilityScores};
use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub channel_id: String,
    pub video_url: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub channel_url: String,
    pub uploads_playlist_id: String,
}

/// One page of a playlist. Never cached: playlist contents change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistPage {
    pub playlist_id: String,
    pub video_ids: Vec<String>,
}

/// A search hit joined with its channel. Scores are computed from the video
/// description when the result is built and never recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    video: Arc<Video>,
    channel: Arc<Channel>,
    grade_level: f64,
    reading_ease: f64,
    tags: Option<Vec<String>>,
}

impl SearchResult {
    pub fn new(video: Arc<Video>, channel: Arc<Channel>) -> Self {
        let ReadabilityScores {
            grade_level,
            reading_ease,
        } = readability::score(&video.description);

        Self {
            video,
            channel,
            grade_level,
            reading_ease,
            tags: None,
        }
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn grade_level(&self) -> f64 {
        self.grade_level
    }

    pub fn reading_ease(&self) -> f64 {
        self.reading_ease
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRecord {
    search_term: String,
    searched_at: DateTime<Utc>,
    results: Vec<SearchResult>,
    avg_grade_level: f64,
    avg_reading_ease: f64,
}

impl SearchRecord {
    pub fn new(search_term: String, results: Vec<SearchResult>) -> Self {
        let avg_grade_level = mean(results.iter().map(SearchResult::grade_level));
        let avg_reading_ease = mean(results.iter().map(SearchResult::reading_ease));

        Self {
            search_term,
            searched_at: Utc::now(),
            results,
            avg_grade_level,
            avg_reading_ease,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn searched_at(&self) -> DateTime<Utc> {
        self.searched_at
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn avg_grade_level(&self) -> f64 {
        self.avg_grade_level
    }

    pub fn avg_reading_ease(&self) -> f64 {
        self.avg_reading_ease
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelProfile {
    pub channel: Arc<Channel>,
    pub recent_videos: Vec<Arc<Video>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoPage {
    pub video: Arc<Video>,
    pub channel: Arc<Channel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub cached_videos: usize,
    pub cached_channels: usize,
    pub searches: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: Status,
    pub error: String,
    pub message: String,
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
