//! Edge State
//!
//! Shared state accessible by all edge handlers.
//! Wrapped in Arc for sharing across async tasks.

use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::{EdgeError, EdgeResult};
use crate::config::EdgeConfig;

/// Shared state for all handlers
#[derive(Clone)]
pub struct EdgeState {
    /// Origin proxied requests are forwarded to
    pub upstream: Url,
    /// Pooled client used for every forwarded request
    pub client: Client,
    /// Edge configuration
    pub config: Arc<EdgeConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl EdgeState {
    pub fn new(config: EdgeConfig) -> EdgeResult<Self> {
        let upstream = parse_upstream(&config.upstream_url)?;

        // Redirects are relayed to the caller rather than followed.
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| EdgeError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            upstream,
            client,
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn parse_upstream(raw: &str) -> EdgeResult<Url> {
    let url = Url::parse(raw).map_err(|e| EdgeError::InvalidUpstream {
        url: raw.to_string(),
        error: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(EdgeError::InvalidUpstream {
            url: raw.to_string(),
            error: "expected an http(s) origin".to_string(),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_upstream() {
        let state = EdgeState::new(EdgeConfig::default()).unwrap();
        assert_eq!(state.upstream.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn test_rejects_bad_upstream() {
        for raw in ["127.0.0.1:8000", "ftp://files.example.com", "not a url"] {
            let config = EdgeConfig {
                upstream_url: raw.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(EdgeState::new(config), Err(EdgeError::InvalidUpstream { .. })),
                "{raw} should be rejected"
            );
        }
    }
}
