//! Tee-Time Client
//!
//! - [`TeeTimeClient`]: HTTP transport for the four tee-time collections
//! - [`TeeTimeBoard`]: view state (`tee_times`, `loading`, `error`) fed by
//!   any [`TeeTimeFetcher`]
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use teebox::client::{TeeTimeBoard, TeeTimeClient};
//! use teebox::config::ClientConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TeeTimeClient::new(&ClientConfig::new("http://127.0.0.1:5000"))?;
//!     let board = TeeTimeBoard::new(Arc::new(client));
//!
//!     board.load_chronogolf().await;
//!
//!     let state = board.snapshot().await;
//!     println!("{} tee times", state.tee_times.len());
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod error;
pub mod http;

pub use board::{BoardState, LoadOutcome, TeeTimeBoard};
pub use error::{ClientError, FetchError, FetchErrorKind};
pub use http::{decode_records, TeeTimeClient, TeeTimeFetcher};
