use crate::error::FetchError;
use crate::models::{
    CacheStats, Channel, ChannelProfile, PlaylistPage, SearchRecord, SearchResult, Video,
    VideoPage, WordCount,
};
use crate::services::cache::{with_timeout, EntityCache};
use crate::services::metadata_client::MetadataClient;
use crate::services::word_frequency;
use crate::utils::clamp_max_results;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;

#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Applied to every call made to the metadata service.
    pub fetch_timeout: Duration,
    pub playlist_page_size: u32,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            playlist_page_size: 10,
        }
    }
}

/// Every request the coordinator answers.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Video { video_id: String },
    Channel { channel_id: String },
    Playlist { playlist_id: String },
    VideoPage { video_id: String },
    ChannelProfile { channel_id: String },
    Search { term: String, max_results: u32 },
    WordStats { term: String, max_results: u32 },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Response {
    Video(Arc<Video>),
    Channel(Arc<Channel>),
    Playlist(PlaylistPage),
    VideoPage(VideoPage),
    ChannelProfile(ChannelProfile),
    SearchHistory(Vec<Arc<SearchRecord>>),
    WordStats(Vec<WordCount>),
}

/// Answers lookups from the entity cache and joins them into aggregate views.
///
/// Cloning is cheap; clones share the cache and the search history.
#[derive(Clone)]
pub struct Coordinator {
    cache: EntityCache,
    client: Arc<dyn MetadataClient>,
    options: CoordinatorOptions,
    // newest first
    history: Arc<Mutex<VecDeque<Arc<SearchRecord>>>>,
}

impl Coordinator {
    pub fn new(client: Arc<dyn MetadataClient>, options: CoordinatorOptions) -> Self {
        Self {
            cache: EntityCache::new(Arc::clone(&client), options.fetch_timeout),
            client,
            options,
            history: Arc::default(),
        }
    }

    pub async fn dispatch(&self, request: Request) -> Result<Response, FetchError> {
        Ok(match request {
            Request::Video { video_id } => Response::Video(self.video(&video_id).await?),
            Request::Channel { channel_id } => Response::Channel(self.channel(&channel_id).await?),
            Request::Playlist { playlist_id } => {
                Response::Playlist(self.playlist(&playlist_id).await?)
            }
            Request::VideoPage { video_id } => Response::VideoPage(self.video_page(&video_id).await?),
            Request::ChannelProfile { channel_id } => {
                Response::ChannelProfile(self.channel_profile(&channel_id).await?)
            }
            Request::Search { term, max_results } => {
                Response::SearchHistory(self.search(&term, max_results).await?)
            }
            Request::WordStats { term, max_results } => {
                Response::WordStats(self.word_stats(&term, max_results).await?)
            }
        })
    }

    pub async fn video(&self, video_id: &str) -> Result<Arc<Video>, FetchError> {
        self.cache.get_or_fetch_video(video_id).await
    }

    pub async fn channel(&self, channel_id: &str) -> Result<Arc<Channel>, FetchError> {
        self.cache.get_or_fetch_channel(channel_id).await
    }

    /// Always hits the metadata service.
    pub async fn playlist(&self, playlist_id: &str) -> Result<PlaylistPage, FetchError> {
        with_timeout(
            self.options.fetch_timeout,
            self.client
                .fetch_playlist(playlist_id, self.options.playlist_page_size),
        )
        .await
    }

    pub async fn video_page(&self, video_id: &str) -> Result<VideoPage, FetchError> {
        let video = self.video(video_id).await?;
        let channel = self.channel(&video.channel_id).await?;
        Ok(VideoPage { video, channel })
    }

    /// The channel with the videos of the first page of its uploads playlist,
    /// in playlist order.
    pub async fn channel_profile(&self, channel_id: &str) -> Result<ChannelProfile, FetchError> {
        let channel = self.channel(channel_id).await?;
        let uploads = self.playlist(&channel.uploads_playlist_id).await?;

        info!(
            "Fetching {} recent videos for channel {channel_id}",
            uploads.video_ids.len()
        );
        let recent_videos = self
            .fan_out(&uploads.video_ids, |cache, video_id| async move {
                cache.get_or_fetch_video(&video_id).await
            })
            .await?;

        Ok(ChannelProfile {
            channel,
            recent_videos,
        })
    }

    /// Runs a search, records it and returns the whole history, newest first.
    pub async fn search(
        &self,
        term: &str,
        max_results: u32,
    ) -> Result<Vec<Arc<SearchRecord>>, FetchError> {
        let record = Arc::new(self.build_search_record(term, max_results).await?);
        info!(
            "Search '{term}' returned {} results (avg grade {:.2}, avg ease {:.2})",
            record.results().len(),
            record.avg_grade_level(),
            record.avg_reading_ease()
        );

        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.push_front(record);
        Ok(history.iter().cloned().collect())
    }

    /// Word counts over the descriptions of a search's results. The search is
    /// not recorded in the history.
    pub async fn word_stats(&self, term: &str, max_results: u32) -> Result<Vec<WordCount>, FetchError> {
        let record = self.build_search_record(term, max_results).await?;
        let descriptions: Vec<&str> = record
            .results()
            .iter()
            .map(|result| result.video().description.as_str())
            .collect();

        Ok(word_frequency::count_words(&descriptions))
    }

    pub fn history(&self) -> Vec<Arc<SearchRecord>> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            cached_videos: self.cache.cached_video_count(),
            cached_channels: self.cache.cached_channel_count(),
            searches: self.history.lock().unwrap_or_else(PoisonError::into_inner).len(),
        }
    }

    async fn build_search_record(
        &self,
        term: &str,
        max_results: u32,
    ) -> Result<SearchRecord, FetchError> {
        let max_results = clamp_max_results(max_results);
        let video_ids = with_timeout(
            self.options.fetch_timeout,
            self.client.search(term, max_results),
        )
        .await?;

        let results = self
            .fan_out(&video_ids, |cache, video_id| async move {
                let video = cache.get_or_fetch_video(&video_id).await?;
                let channel = cache.get_or_fetch_channel(&video.channel_id).await?;
                Ok::<_, FetchError>(SearchResult::new(video, channel))
            })
            .await?;

        Ok(SearchRecord::new(term.to_string(), results))
    }

    /// Runs `branch` for every id on its own task and returns the outputs in
    /// the order of `ids`. The first failing branch fails the whole fan-out
    /// and aborts the branches still running.
    async fn fan_out<T, F, Fut>(&self, ids: &[String], branch: F) -> Result<Vec<T>, FetchError>
    where
        T: Send + 'static,
        F: Fn(EntityCache, String) -> Fut,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        for (index, id) in ids.iter().enumerate() {
            let branch = branch(self.cache.clone(), id.clone());
            tasks.spawn(async move { (index, branch.await) });
        }

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(ids.len()).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| FetchError::Aborted(e.to_string()))?;
            slots[index] = Some(result?);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<T>>>()
            .ok_or_else(|| FetchError::Aborted("fan-out branch produced no result".to_string()))
    }
}
