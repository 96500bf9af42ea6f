use std::sync::Arc;

use tracing::error;

use riftscope::assets::AssetResolver;
use riftscope::config::Config;
use riftscope::error::AppError;
use riftscope::logging;
use riftscope::profile::ProfileService;
use riftscope::riot::{ConcurrencyLimiter, RiotClient};
use riftscope::server::{self, AppState};

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(e) = run().await {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let limiter = ConcurrencyLimiter::new(config.max_in_flight_requests);
    let client = RiotClient::from_config(&config, limiter);
    let service = ProfileService::new(Arc::new(client));
    let assets = AssetResolver::from_config(&config);

    server::run(AppState::new(service, assets), config.listen_addr).await
}
