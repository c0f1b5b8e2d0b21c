//! Reqwest-backed randomuser.me source adapter.
//!
//! This adapter owns transport details only: the batch-size query, timeout
//! and HTTP error mapping, and JSON decoding into raw user records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::RandomUserResponseDto;
use crate::domain::RawUserRecord;
use crate::domain::ports::{RANDOM_USER_BATCH_SIZE, RandomUserSource, RandomUserSourceError};

/// Public randomuser.me API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://randomuser.me/api/";

const USER_AGENT: &str = concat!("random-user-etl/", env!("CARGO_PKG_VERSION"));

/// Source adapter that performs one HTTP GET per extraction.
pub struct RandomUserHttpSource {
    client: Client,
    endpoint: Url,
}

impl RandomUserHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    ///
    /// use random_user_etl::domain::ports::RandomUserSource;
    /// use random_user_etl::outbound::random_user::{DEFAULT_ENDPOINT, RandomUserHttpSource};
    /// use reqwest::Url;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let endpoint = Url::parse(DEFAULT_ENDPOINT)?;
    /// let source = RandomUserHttpSource::new(endpoint, Duration::from_secs(30))?;
    /// let users = source.fetch_users().await?;
    /// println!("fetched {} users", users.len());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl RandomUserSource for RandomUserHttpSource {
    async fn fetch_users(&self) -> Result<Vec<RawUserRecord>, RandomUserSourceError> {
        let batch_size = RANDOM_USER_BATCH_SIZE.to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("results", batch_size.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_users(body.as_ref())
    }
}

fn parse_users(body: &[u8]) -> Result<Vec<RawUserRecord>, RandomUserSourceError> {
    let decoded: RandomUserResponseDto = serde_json::from_slice(body).map_err(|error| {
        RandomUserSourceError::decode(format!(
            "invalid JSON payload: {error}; body: {}",
            body_preview(body)
        ))
    })?;
    decoded.into_raw_users().map_err(|reason| {
        RandomUserSourceError::decode(format!("{reason}; body: {}", body_preview(body)))
    })
}

fn map_transport_error(error: reqwest::Error) -> RandomUserSourceError {
    if error.is_timeout() {
        RandomUserSourceError::timeout(error.to_string())
    } else {
        RandomUserSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RandomUserSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    RandomUserSourceError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
