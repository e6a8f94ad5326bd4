#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use clash_royale_proxy::infrastructure::{
    config::{AppConfig, LogFormat, LoggingConfig},
    http::start_server,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig { level: "info".to_string(), format: LogFormat::Pretty });
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting Clash Royale API Proxy");
    info!(
        "Configuration loaded: server will bind to {}:{}, upstream {}",
        config.server.host, config.server.port, config.upstream.base_url
    );

    if let Err(e) = start_server(config).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Initialize structured logging; `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("clash_royale_proxy={level},tower_http={level}", level = logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}
