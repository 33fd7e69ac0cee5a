//! In-memory stand-in for the YouTube API used across the service tests.

use crate::error::FetchError;
use crate::models::{Channel, PlaylistPage, Video};
use crate::services::metadata_client::MetadataClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeClient {
    videos: HashMap<String, Video>,
    channels: HashMap<String, Channel>,
    playlists: HashMap<String, Vec<String>>,
    searches: HashMap<String, Vec<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<HashMap<String, FetchError>>,
    calls: Mutex<HashMap<String, usize>>,
    completed: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, video_id: &str, channel_id: &str, description: &str) -> Self {
        self.videos.insert(
            video_id.to_string(),
            Video {
                video_id: video_id.to_string(),
                title: format!("Video {video_id}"),
                description: description.to_string(),
                thumbnail_url: format!("https://i.ytimg.com/vi/{video_id}/mqdefault.jpg"),
                channel_id: channel_id.to_string(),
                video_url: format!("https://www.youtube.com/watch?v={video_id}"),
                tags: vec![],
            },
        );
        self
    }

    pub fn with_channel(mut self, channel_id: &str, uploads_playlist_id: &str) -> Self {
        self.channels.insert(
            channel_id.to_string(),
            Channel {
                channel_id: channel_id.to_string(),
                title: format!("Channel {channel_id}"),
                description: String::new(),
                thumbnail_url: String::new(),
                channel_url: format!("https://www.youtube.com/@{channel_id}"),
                uploads_playlist_id: uploads_playlist_id.to_string(),
            },
        );
        self
    }

    pub fn with_playlist(mut self, playlist_id: &str, video_ids: &[&str]) -> Self {
        self.playlists.insert(
            playlist_id.to_string(),
            video_ids.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    pub fn with_search(mut self, term: &str, video_ids: &[&str]) -> Self {
        self.searches.insert(
            term.to_string(),
            video_ids.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    /// Delays every lookup of `id` (video, channel, playlist or search term).
    pub fn with_delay(self, id: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(id.to_string(), delay);
        self
    }

    /// Fails every lookup of `id` until cleared.
    pub fn with_failure(self, id: &str, error: FetchError) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(id.to_string(), error);
        self
    }

    pub fn clear_delay(&self, id: &str) {
        self.delays.lock().unwrap().remove(id);
    }

    pub fn clear_failure(&self, id: &str) {
        self.failures.lock().unwrap().remove(id);
    }

    /// Number of network calls made for `kind` ("video", "channel",
    /// "playlist", "search") and `id`.
    pub fn calls(&self, kind: &str, id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&format!("{kind}:{id}"))
            .copied()
            .unwrap_or(0)
    }

    /// `kind:id` keys in the order their lookups finished.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    async fn lookup<T: Clone>(
        &self,
        kind: &'static str,
        id: &str,
        found: Option<&T>,
    ) -> Result<T, FetchError> {
        let key = format!("{kind}:{id}");
        *self.calls.lock().unwrap().entry(key.clone()).or_insert(0) += 1;

        let delay = self.delays.lock().unwrap().get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().unwrap().get(id).cloned();
        self.completed.lock().unwrap().push(key);
        if let Some(error) = failure {
            return Err(error);
        }

        found.cloned().ok_or_else(|| FetchError::not_found(kind, id))
    }
}

#[async_trait]
impl MetadataClient for FakeClient {
    async fn fetch_video(&self, video_id: &str) -> Result<Video, FetchError> {
        self.lookup("video", video_id, self.videos.get(video_id))
            .await
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, FetchError> {
        self.lookup("channel", channel_id, self.channels.get(channel_id))
            .await
    }

    async fn fetch_playlist(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<PlaylistPage, FetchError> {
        let video_ids = self
            .lookup("playlist", playlist_id, self.playlists.get(playlist_id))
            .await?;

        Ok(PlaylistPage {
            playlist_id: playlist_id.to_string(),
            video_ids: video_ids.into_iter().take(max_results as usize).collect(),
        })
    }

    async fn search(&self, term: &str, max_results: u32) -> Result<Vec<String>, FetchError> {
        // unknown terms simply match nothing
        let empty = Vec::new();
        let ids = self
            .lookup("search", term, Some(self.searches.get(term).unwrap_or(&empty)))
            .await?;
        Ok(ids.into_iter().take(max_results as usize).collect())
    }
}
