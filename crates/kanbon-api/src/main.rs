//! Kanbon API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p kanbon-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use kanbon_common::{init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&TracingConfig::default());
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    init_tracing(&TracingConfig::for_environment(config.app.env));
    info!(
        env = ?config.app.env,
        port = config.api.port,
        "Starting Kanbon API server"
    );

    if let Err(e) = kanbon_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
