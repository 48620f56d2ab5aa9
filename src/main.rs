use classroom_polls::catalog::YamlFileSource;
use classroom_polls::config::Config;
use classroom_polls::server::{self, state::AppState};
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    info!("Serving polls from {}", config.poll_file.display());
    let state = AppState::new(Arc::new(YamlFileSource::new(&config.poll_file)));

    if let Err(why) = server::serve(&config.address(), state).await {
        error!("Server error: {:?}", why);
    }
}
