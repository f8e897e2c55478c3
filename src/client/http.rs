//! Tee-Time HTTP Client
//!
//! Issues GET requests against the tee-time collections and decodes the
//! JSON array of records.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use std::time::Duration;

use super::error::{ClientError, FetchError};
use crate::config::ClientConfig;
use crate::teetime::{TeeTimeRecord, TeeTimeSource};

/// Anything that can produce the records of a tee-time source
#[async_trait]
pub trait TeeTimeFetcher: Send + Sync {
    async fn fetch(&self, source: TeeTimeSource) -> Result<Vec<TeeTimeRecord>, FetchError>;
}

/// REST client for the tee-time endpoints
pub struct TeeTimeClient {
    client: Client,
    base_url: String,
}

impl TeeTimeClient {
    /// Create a client for the configured base URL
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            error: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a source's collection
    pub fn url_for(&self, source: TeeTimeSource) -> String {
        format!("{}{}", self.base_url, source.path())
    }

    /// Generic/test collection
    pub async fn fetch_all(&self) -> Result<Vec<TeeTimeRecord>, FetchError> {
        self.get(TeeTimeSource::All).await
    }

    /// Provider A (ChronoGolf)
    pub async fn fetch_from_chronogolf(&self) -> Result<Vec<TeeTimeRecord>, FetchError> {
        self.get(TeeTimeSource::ChronoGolf).await
    }

    /// Provider B (ForeUp)
    pub async fn fetch_from_foreup(&self) -> Result<Vec<TeeTimeRecord>, FetchError> {
        self.get(TeeTimeSource::ForeUp).await
    }

    /// Provider C (Eaglewood)
    pub async fn fetch_from_eaglewood(&self) -> Result<Vec<TeeTimeRecord>, FetchError> {
        self.get(TeeTimeSource::Eaglewood).await
    }

    async fn get(&self, source: TeeTimeSource) -> Result<Vec<TeeTimeRecord>, FetchError> {
        let url = self.url_for(source);
        tracing::debug!(%url, %source, "Fetching tee times");

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        decode_records(&bytes)
    }
}

#[async_trait]
impl TeeTimeFetcher for TeeTimeClient {
    async fn fetch(&self, source: TeeTimeSource) -> Result<Vec<TeeTimeRecord>, FetchError> {
        self.get(source).await
    }
}

/// Parse a response body into records, rejecting out-of-range values
pub fn decode_records(body: &[u8]) -> Result<Vec<TeeTimeRecord>, FetchError> {
    let records: Vec<TeeTimeRecord> = serde_json::from_slice(body)?;

    for (i, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|e| FetchError::Decode(format!("record {}: {}", i, e)))?;
    }

    Ok(records)
}
