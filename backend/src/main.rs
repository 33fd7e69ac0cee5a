use anyhow::Result;
use log::info;
use std::sync::Arc;
use ytstats::config::{create_cors, init_logger, load_environment, AppConfig};
use ytstats::services::coordinator::Coordinator;
use ytstats::services::youtube_client::YoutubeClient;
use ytstats::{build_rocket, AppState};

#[rocket::main]
async fn main() -> Result<()> {
    load_environment();
    init_logger();

    let config = AppConfig::from_env()?;
    info!(
        "Using YouTube API at {} (fetch timeout {}ms)",
        config.youtube_api_base_url,
        config.fetch_timeout.as_millis()
    );

    let client = YoutubeClient::new(&config.youtube_api_base_url, config.youtube_api_key.clone())?;
    let state = AppState {
        coordinator: Coordinator::new(Arc::new(client), config.coordinator_options()),
        search_max_results: config.search_max_results,
        stats_max_results: config.stats_max_results,
    };

    let _rocket = build_rocket(state)
        .attach(create_cors(&config.cors_allowed_origin)?)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;

    Ok(())
}
