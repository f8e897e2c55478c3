//! Teebox CLI
//!
//! Command-line front end for the tee-time client:
//! - Load tee times from one of the four sources
//! - Print them as a table, JSON or CSV
//! - Generate a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use teebox::client::{LoadOutcome, TeeTimeBoard, TeeTimeClient};
use teebox::config::{generate_default_config, Config};
use teebox::render::{render, OutputFormat};
use teebox::TeeTimeSource;

#[derive(Parser)]
#[command(name = "teebox-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse golf tee-time availability")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and TEEBOX_API_BASE)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Only show tee times that can be booked
    #[arg(short, long, global = true)]
    pub available_only: bool,

    /// Config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tee times from the generic/test collection
    All,

    /// ChronoGolf tee times
    Chronogolf,

    /// ForeUp tee times
    Foreup,

    /// Eaglewood tee times
    Eaglewood,

    /// Tee times from a named source
    Fetch {
        #[arg(value_enum)]
        source: TeeTimeSource,
    },

    /// List the sources and the paths they are loaded from
    Sources,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let source = match cli.command {
        Commands::All => TeeTimeSource::All,
        Commands::Chronogolf => TeeTimeSource::ChronoGolf,
        Commands::Foreup => TeeTimeSource::ForeUp,
        Commands::Eaglewood => TeeTimeSource::Eaglewood,
        Commands::Fetch { source } => source,
        Commands::Sources => {
            println!("{:<12} {}", "Source", "Path");
            println!("{}", "-".repeat(40));
            for source in TeeTimeSource::all() {
                println!("{:<12} {}", source, source.path());
            }
            return Ok(());
        }
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
            return Ok(());
        }
    };

    let mut config = teebox::logging::bootstrap(|| Config::resolve(cli.config.as_deref()))?;
    teebox::logging::init(&config.logging);

    if let Some(api_url) = cli.api_url {
        config.client.base_url = api_url;
    }

    let client = TeeTimeClient::new(&config.client)?;
    let board = TeeTimeBoard::new(Arc::new(client));

    let outcome = board.load(source).await;
    let state = board.snapshot().await;

    print!("{}", render(&state, cli.format, cli.available_only)?);

    if let LoadOutcome::Failed(e) = outcome {
        eprintln!("{}: {}", state.error, e);
        eprintln!();
        eprintln!("Make sure the edge server and booking API are reachable at {}", config.client.base_url);
        std::process::exit(1);
    }

    Ok(())
}
