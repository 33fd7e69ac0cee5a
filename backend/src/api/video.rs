use crate::api::failure;
use crate::models::{ErrorResponse, Video, VideoPage};
use crate::utils::normalize_video_id;
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};
use std::sync::Arc;

/// `id` may also be a (percent-encoded) YouTube link.
#[get("/<id>")]
pub async fn get_video(state: &State<AppState>, id: &str) -> Result<Json<Arc<Video>>, ErrorResponse> {
    let video_id = normalize_video_id(id);
    state
        .coordinator
        .video(&video_id)
        .await
        .map(Json)
        .map_err(|e| failure(&format!("Failed to fetch video {video_id}"), e))
}

#[get("/<id>/page")]
pub async fn get_video_page(
    state: &State<AppState>,
    id: &str,
) -> Result<Json<VideoPage>, ErrorResponse> {
    let video_id = normalize_video_id(id);
    state
        .coordinator
        .video_page(&video_id)
        .await
        .map(Json)
        .map_err(|e| failure(&format!("Failed to build page for video {video_id}"), e))
}
