use crate::error::FetchError;
use crate::models::{Channel, PlaylistPage, Video};
use crate::services::metadata_client::MetadataClient;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 client.
///
/// Documentation: https://developers.google.com/youtube/v3/docs
pub struct YoutubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(base_url: &str, api_key: String) -> anyhow::Result<Self> {
        // fail early on a bad base url rather than on the first request
        Url::parse(base_url)?;

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/{resource}", self.base_url))
            .map_err(|e| FetchError::Network(format!("invalid endpoint url: {e}")))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get_json(&self, kind: &'static str, id: &str, url: Url) -> Result<Value, FetchError> {
        debug!("GET {} ({kind} {id})", url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(kind, id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("YouTube API returned {status} for {kind} {id}: {body}");
            return Err(FetchError::Network(format!("YouTube API returned {status}")));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl MetadataClient for YoutubeClient {
    async fn fetch_video(&self, video_id: &str) -> Result<Video, FetchError> {
        let url = self.endpoint("videos", &[("part", "snippet"), ("id", video_id)])?;
        let json = self.get_json("video", video_id, url).await?;
        parse_video(video_id, &json)
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, FetchError> {
        let url = self.endpoint(
            "channels",
            &[("part", "snippet,contentDetails"), ("id", channel_id)],
        )?;
        let json = self.get_json("channel", channel_id, url).await?;
        parse_channel(channel_id, &json)
    }

    async fn fetch_playlist(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<PlaylistPage, FetchError> {
        let max_results = max_results.to_string();
        let url = self.endpoint(
            "playlistItems",
            &[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", &max_results),
            ],
        )?;
        let json = self.get_json("playlist", playlist_id, url).await?;
        parse_playlist(playlist_id, &json)
    }

    async fn search(&self, term: &str, max_results: u32) -> Result<Vec<String>, FetchError> {
        let max_results = max_results.to_string();
        let url = self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("q", term),
                ("maxResults", &max_results),
            ],
        )?;
        let json = self.get_json("search", term, url).await?;
        Ok(parse_search(&json))
    }
}

fn required_str<'a>(value: &'a Value, pointer: &str) -> Result<&'a str, FetchError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::MalformedResponse(format!("missing field {pointer}")))
}

fn first_item<'a>(json: &'a Value, kind: &'static str, id: &str) -> Result<&'a Value, FetchError> {
    json["items"]
        .as_array()
        .and_then(|items| items.first())
        .ok_or_else(|| FetchError::not_found(kind, id))
}

pub(crate) fn parse_video(video_id: &str, json: &Value) -> Result<Video, FetchError> {
    let item = first_item(json, "video", video_id)?;

    Ok(Video {
        video_id: video_id.to_string(),
        title: required_str(item, "/snippet/title")?.to_string(),
        description: required_str(item, "/snippet/description")?.to_string(),
        thumbnail_url: required_str(item, "/snippet/thumbnails/medium/url")?.to_string(),
        channel_id: required_str(item, "/snippet/channelId")?.to_string(),
        video_url: format!("https://www.youtube.com/watch?v={video_id}"),
        tags: item["snippet"]["tags"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

pub(crate) fn parse_channel(channel_id: &str, json: &Value) -> Result<Channel, FetchError> {
    let item = first_item(json, "channel", channel_id)?;
    let custom_url = item["snippet"]["customUrl"].as_str().unwrap_or("");

    Ok(Channel {
        channel_id: channel_id.to_string(),
        title: required_str(item, "/snippet/title")?.to_string(),
        description: required_str(item, "/snippet/description")?.to_string(),
        thumbnail_url: required_str(item, "/snippet/thumbnails/medium/url")?.to_string(),
        channel_url: format!("https://www.youtube.com/{custom_url}"),
        uploads_playlist_id: required_str(item, "/contentDetails/relatedPlaylists/uploads")?
            .to_string(),
    })
}

pub(crate) fn parse_playlist(playlist_id: &str, json: &Value) -> Result<PlaylistPage, FetchError> {
    let video_ids = match json["items"].as_array() {
        Some(items) => items
            .iter()
            .map(|item| required_str(item, "/snippet/resourceId/videoId").map(String::from))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(PlaylistPage {
        playlist_id: playlist_id.to_string(),
        video_ids,
    })
}

/// Search hits that are not videos carry no `id.videoId` and are skipped.
pub(crate) fn parse_search(json: &Value) -> Vec<String> {
    json["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["id"]["videoId"].as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
