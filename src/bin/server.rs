use log::{error, info, warn};
use std::net::SocketAddr;

use stranger_socks::config::ServerConfig;
use stranger_socks::core::create_pairing_engine;
use stranger_socks::handlers::routes;
use stranger_socks::operator::{run_console, start_population_reporter};

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from .env
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, outbox_capacity={}",
        config.host, config.port, config.outbox_capacity
    );

    let engine = create_pairing_engine();

    if let Some(every) = config.stats_interval {
        start_population_reporter(engine.clone(), every);
    }

    if config.enable_console {
        tokio::spawn(run_console(engine.clone()));
    }

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting Stranger Socks server on {}", addr);

    warp::serve(routes(engine, &config)).run(addr).await;
}
