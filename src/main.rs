//! Weekpulse API Server
//!
//! Run with: cargo run --bin weekpulse
//!
//! Loads configuration (see `weekpulse-cli config`), fetches the default
//! date range once at startup and serves the dashboard API.

use std::sync::Arc;
use weekpulse::api::{serve, ApiConfig, AppState};
use weekpulse::config::Config;
use weekpulse::fetch::{EngagementClient, FetchWorkflow};
use weekpulse::store::{MetricsStore, StoreHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_startup();
    config.logging.init();

    tracing::info!("Starting Weekpulse v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Engagement API: {}", config.api.base_url);

    let client = EngagementClient::new(config.api.client_config())?;
    let store = StoreHandle::new(MetricsStore::with_default_range(
        config.dashboard.default_range_days,
    ));
    let workflow = FetchWorkflow::new(Arc::new(client), store.clone());

    if config.server.fetch_on_start {
        let (start, end) = store.read(|s| (s.start_date().to_string(), s.end_date().to_string()));
        tracing::info!("Initial fetch for {} .. {}", start, end);
        workflow.spawn_fetch();
    }

    let api_config = ApiConfig::from(&config.server);
    let state = AppState::new(workflow, config.api.base_url.clone());

    serve(state, &api_config).await?;

    tracing::info!("Weekpulse stopped");
    Ok(())
}
