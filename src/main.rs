mod classifier;
mod config;
mod decoder;
mod logging;
mod models;
mod request_id;
mod router;
mod state;

use clap::Parser;
use config::Config;
use state::AppState;
use std::str::FromStr;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "pddd-service")]
#[command(about = "Plant disease detection HTTP service")]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0")]
    ip: String,

    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Path to YAML config file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Also write logs to this file, capped at 10 MiB
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    logging::init_logging(log_level, args.log_file.as_deref());

    let config = match &args.config {
        Some(path) => {
            let config = Config::from_file(path)?;
            info!("Configuration loaded successfully from: {}", path);
            config
        }
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };

    let app_state = AppState::from_config(&config);
    info!("Using classifier: {}", app_state.classifier.name());

    let app = router::build_router(app_state, &config)?;

    let bind_address = format!("{}:{}", args.ip, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server started on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
