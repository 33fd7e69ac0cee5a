use crate::api::failure;
use crate::models::{ErrorResponse, PlaylistPage};
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/<playlist_id>")]
pub async fn get_playlist(
    state: &State<AppState>,
    playlist_id: &str,
) -> Result<Json<PlaylistPage>, ErrorResponse> {
    state
        .coordinator
        .playlist(playlist_id)
        .await
        .map(Json)
        .map_err(|e| failure(&format!("Failed to fetch playlist {playlist_id}"), e))
}
