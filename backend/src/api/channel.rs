use crate::api::failure;
use crate::models::{Channel, ChannelProfile, ErrorResponse};
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};
use std::sync::Arc;

#[get("/<channel_id>")]
pub async fn get_channel(
    state: &State<AppState>,
    channel_id: &str,
) -> Result<Json<Arc<Channel>>, ErrorResponse> {
    state
        .coordinator
        .channel(channel_id)
        .await
        .map(Json)
        .map_err(|e| failure(&format!("Failed to fetch channel {channel_id}"), e))
}

#[get("/<channel_id>/profile")]
pub async fn get_channel_profile(
    state: &State<AppState>,
    channel_id: &str,
) -> Result<Json<ChannelProfile>, ErrorResponse> {
    state
        .coordinator
        .channel_profile(channel_id)
        .await
        .map(Json)
        .map_err(|e| failure(&format!("Failed to build profile for channel {channel_id}"), e))
}
