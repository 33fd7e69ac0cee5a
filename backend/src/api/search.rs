use crate::api::{bad_request, failure};
use crate::models::{ErrorResponse, SearchRecord, WordCount};
use crate::AppState;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, State};
use std::sync::Arc;

/// Runs a search and returns the whole search history, newest first.
#[get("/?<query>&<max_results>")]
pub async fn search_videos(
    query: String,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<Arc<SearchRecord>>>, ErrorResponse> {
    let query = query.trim();
    if query.is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let max_results = max_results.unwrap_or(state.search_max_results);
    info!("Searching for '{query}' (max {max_results})");

    state
        .coordinator
        .search(query, max_results)
        .await
        .map(Json)
        .map_err(|e| failure(&format!("Search for '{query}' failed"), e))
}

#[get("/history")]
pub async fn search_history(state: &State<AppState>) -> Json<Vec<Arc<SearchRecord>>> {
    Json(state.coordinator.history())
}

/// Word frequencies across the descriptions of a search's results.
#[get("/stats?<query>&<max_results>")]
pub async fn search_stats(
    query: String,
    max_results: Option<u32>,
    state: &State<AppState>,
) -> Result<Json<Vec<WordCount>>, ErrorResponse> {
    let query = query.trim();
    if query.is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let max_results = max_results.unwrap_or(state.stats_max_results);
    state
        .coordinator
        .word_stats(query, max_results)
        .await
        .map(Json)
        .map_err(|e| failure(&format!("Word stats for '{query}' failed"), e))
}
