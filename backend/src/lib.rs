pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use rocket::{routes, Build, Rocket};
use services::coordinator::Coordinator;

pub struct AppState {
    pub coordinator: Coordinator,
    pub search_max_results: u32,
    pub stats_max_results: u32,
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/api", routes![api::cache_stats, api::dispatch_request])
        .mount("/api/video", routes![api::get_video, api::get_video_page])
        .mount(
            "/api/channel",
            routes![api::get_channel, api::get_channel_profile],
        )
        .mount("/api/playlist", routes![api::get_playlist])
        .mount(
            "/api/search",
            routes![api::search_videos, api::search_history, api::search_stats],
        )
}
