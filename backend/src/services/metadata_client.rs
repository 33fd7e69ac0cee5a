use crate::error::FetchError;
use crate::models::{Channel, PlaylistPage, Video};
use async_trait::async_trait;

/// Remote metadata service. One network call per lookup, no caching.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataClient: Send + Sync {
    async fn fetch_video(&self, video_id: &str) -> Result<Video, FetchError>;

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, FetchError>;

    /// First page of a playlist, at most `max_results` entries.
    async fn fetch_playlist(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<PlaylistPage, FetchError>;

    /// Video ids matching `term`, in the service's relevance order.
    async fn search(&self, term: &str, max_results: u32) -> Result<Vec<String>, FetchError>;
}
