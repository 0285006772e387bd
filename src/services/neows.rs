use crate::config::NasaSettings;
use crate::core::dates::DATE_FORMAT;
use crate::models::{DateRange, FeedPage};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when querying the NeoWs feed
#[derive(Debug, Error)]
pub enum NeoWsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("NeoWs rate limit exceeded")]
    RateLimited,

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl NeoWsError {
    /// Whether a later attempt might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestError(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited => true,
            Self::ApiError { status, .. } => *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Next retry delay, doubling up to `Duration::MAX`
fn backoff(delay: Duration) -> Duration {
    delay.saturating_mul(2)
}

/// Source of NeoWs feed pages, one per date range
///
/// Ranges handed to a source never exceed the upstream span limit.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self, range: DateRange) -> Result<FeedPage, NeoWsError>;
}

/// NeoWs feed API client
pub struct NeoWsClient {
    base_url: String,
    api_key: String,
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl NeoWsClient {
    /// Create a new NeoWs client without retries
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, NeoWsError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            max_retries: 0,
            retry_delay: Duration::ZERO,
        })
    }

    pub fn from_settings(settings: &NasaSettings) -> Result<Self, NeoWsError> {
        Ok(Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?
        .with_retries(settings.max_retries, Duration::from_millis(settings.retry_delay_ms)))
    }

    /// Retry retryable failures up to `max_retries` times, doubling the delay each time
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Fetch the feed for one range
    pub async fn get_feed(&self, range: DateRange) -> Result<FeedPage, NeoWsError> {
        let mut delay = self.retry_delay;
        let mut attempt = 0;

        loop {
            match self.request_feed(range).await {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "NeoWs request for {} failed ({}), retry {}/{} in {:?}",
                        range,
                        e,
                        attempt,
                        self.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = backoff(delay);
                }
                result => return result,
            }
        }
    }

    async fn request_feed(&self, range: DateRange) -> Result<FeedPage, NeoWsError> {
        let start_date = range.start.format(DATE_FORMAT).to_string();
        let end_date = range.end.format(DATE_FORMAT).to_string();

        tracing::info!("GET NeoWs feed {} {}", start_date, end_date);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(NeoWsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("NeoWs feed for {} failed: {} - {}", range, status, body);
            return Err(NeoWsError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let page: FeedPage = serde_json::from_str(&body).map_err(|e| {
            NeoWsError::InvalidResponse(format!("Failed to parse feed for {}: {}", range, e))
        })?;

        tracing::debug!(
            "NeoWs feed for {}: {} days, element_count {:?}",
            range,
            page.near_earth_objects.len(),
            page.element_count
        );

        Ok(page)
    }
}

#[async_trait]
impl FeedSource for NeoWsClient {
    async fn fetch_feed(&self, range: DateRange) -> Result<FeedPage, NeoWsError> {
        self.get_feed(range).await
    }
}
