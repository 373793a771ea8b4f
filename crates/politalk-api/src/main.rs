//! PoliTalk API server
//!
//! Configuration comes from flat environment variables (`.env` is read when
//! present), or from the file named by `POLITALK_CONFIG` layered under
//! `POLITALK__*` variables. Production logs are JSON.

use politalk_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        upload_dir = %config.storage.upload_dir,
        "Starting PoliTalk API server"
    );

    if let Err(e) = politalk_api::run(config).await {
        error!(error = %e, "Server stopped with an error");
        std::process::exit(1);
    }
}

fn load_config() -> Result<AppConfig, politalk_common::ConfigError> {
    match std::env::var("POLITALK_CONFIG") {
        Ok(path) => AppConfig::load(Some(path.as_str())),
        Err(_) => AppConfig::from_env(),
    }
}
