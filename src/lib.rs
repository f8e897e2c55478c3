//! # Teebox
//!
//! Golf tee-time browsing: a typed client for the tee-time API and an edge
//! server that hosts the single-page frontend and proxies API calls to the
//! booking backend.
//!
//! ## Modules
//!
//! - [`teetime`]: Tee-time record and the upstream sources
//! - [`client`]: HTTP client and the loading/error view state
//! - [`render`]: Table, JSON and CSV output
//! - [`edge`]: Static file server and reverse proxy built with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use teebox::{render, ClientConfig, TeeTimeBoard, TeeTimeClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TeeTimeClient::new(&ClientConfig::default())?;
//!     let board = TeeTimeBoard::new(Arc::new(client));
//!
//!     board.load_foreup().await;
//!
//!     let state = board.snapshot().await;
//!     print!("{}", render::render(&state, render::OutputFormat::Table, false)?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod edge;
pub mod logging;
pub mod render;
pub mod teetime;

#[cfg(test)]
pub(crate) mod test_support;

pub use teetime::{TeeTimeRecord, TeeTimeSource};

pub use client::{
    BoardState, ClientError, FetchError, FetchErrorKind, LoadOutcome, TeeTimeBoard,
    TeeTimeClient, TeeTimeFetcher,
};

pub use edge::{build_router, serve, EdgeError, EdgeState};

pub use config::{ClientConfig, Config, ConfigError, EdgeConfig, LoggingConfig};
