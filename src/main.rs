//! Teebox Edge Server
//!
//! Run with: cargo run --bin teebox
//!
//! # Configuration
//!
//! Optional TOML file via `--config`, otherwise the default locations.
//! Environment variables:
//! - `PORT`: Port to listen on (default: 5000)
//! - `TEEBOX_HOST`: Host to bind to (default: 0.0.0.0)
//! - `TEEBOX_UPSTREAM_URL`: Booking API origin (default: http://127.0.0.1:8000)
//! - `TEEBOX_STATIC_DIR`: Built frontend (default: frontend/dist/frontend)
//! - `TEEBOX_HEALTH_PATH`: Mount point for health endpoints (default: none)
//! - `RUST_LOG`: Log filter (default: teebox=info,tower_http=info)

use clap::Parser;
use std::path::PathBuf;
use teebox::config::{generate_default_config, Config};
use teebox::edge::{serve, EdgeState};

#[derive(Parser)]
#[command(name = "teebox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the tee-time frontend and proxy its API")]
struct Args {
    /// Config file (default: standard locations, then environment)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = teebox::logging::bootstrap(|| Config::resolve(args.config.as_deref()))?;
    teebox::logging::init(&config.logging);

    tracing::info!("Starting Teebox edge server v{}", env!("CARGO_PKG_VERSION"));

    if !config.edge.index_path().is_file() {
        tracing::warn!(
            "Entry document {:?} not found; navigational paths will fail until the frontend is built",
            config.edge.index_path()
        );
    }

    let state = EdgeState::new(config.edge.clone())?;
    serve(state, &config.edge).await?;

    tracing::info!("Teebox edge server stopped");
    Ok(())
}
