//! HTTP client with session cookies and rate limiting for getodi.com
//!
//! This module provides the transport and session collaborators: a cookie
//! carrying client that signs in once and then fetches the student listings
//! page, with retry logic and exponential backoff for transient errors.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{OdiError, Result};
use crate::types::Credentials;

/// Base URL for getodi.com
pub const ODI_BASE_URL: &str = "https://getodi.com";

/// Sign-in form endpoint
const SIGN_IN_PATH: &str = "/sign-in/";

/// Markers in the landing URL that mean the sign-in did not take
const SIGN_IN_FAILURE_MARKERS: [&str; 2] = ["wrong_credentials", "sign-in"];

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header for Turkish content
const DEFAULT_ACCEPT_LANGUAGE: &str = "tr-TR,tr;q=0.9,en;q=0.8";

/// Maximum number of retry attempts for transient errors
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_RETRY_DELAY_MS: u64 = 1000;

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Example
    /// ```
    /// use odi_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// ```
    ///
    /// A rate that is zero, negative or NaN disables throttling.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::try_from_secs_f64(1.0 / requests_per_second).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Wait until the minimum interval since the last request has passed
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the getodi.com HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root, without trailing slash (default: https://getodi.com)
    pub base_url: String,
    /// Maximum requests per second (default: 1.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Retries on 429 and 5xx responses (default: 3)
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds (default: 1000)
    pub retry_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ODI_BASE_URL.to_string(),
            requests_per_second: 1.0,
            timeout_secs: 30,
            max_retries: MAX_RETRIES,
            retry_delay_ms: BASE_RETRY_DELAY_MS,
        }
    }
}

/// HTTP client for getodi.com
///
/// This client automatically:
/// - Keeps session cookies between sign-in and listing requests
/// - Limits request rate
/// - Retries on transient errors (429, 5xx) with exponential backoff
pub struct OdiClient {
    /// Underlying HTTP client, owns the cookie jar
    client: reqwest::Client,
    /// Rate limiter for request throttling
    rate_limiter: RateLimiter,
    base_url: String,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl OdiClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Sign in and keep the session cookie for later requests.
    ///
    /// A 200 response is not enough: the site answers failed sign-ins by
    /// landing back on the sign-in page, so the final URL is checked too.
    ///
    /// # Errors
    /// - `OdiError::AuthFailed` - Non-success status, or landed on the sign-in page
    /// - `OdiError::Transport` - Network error
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let url = format!("{}{}", self.base_url, SIGN_IN_PATH);
        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        self.rate_limiter.acquire().await;
        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "sign-in request rejected");
            return Err(OdiError::AuthFailed(format!("HTTP {}", status.as_u16())));
        }

        let landing = response.url().as_str();
        if let Some(marker) = SIGN_IN_FAILURE_MARKERS.iter().find(|m| landing.contains(**m)) {
            tracing::warn!(landing, marker, "sign-in landed back on the sign-in page");
            return Err(OdiError::AuthFailed(
                "incorrect credentials or still on sign-in page".to_string(),
            ));
        }

        tracing::info!(username = %credentials.username, "signed in");
        Ok(())
    }

    /// Fetch HTML content from a getodi.com path
    ///
    /// # Arguments
    /// * `path` - Relative path (e.g., "/student/?city=35")
    ///
    /// # Errors
    /// - `OdiError::Transport` - Network error
    /// - `OdiError::FetchFailed` - Non-success status after all retries
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire().await;

            let response = self.client.get(&url).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.text().await?);
            }

            let transient =
                status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if transient && attempt < self.max_retries {
                let delay = self.calculate_backoff_delay(attempt);
                tracing::warn!(
                    status = status.as_u16(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient error fetching {}, retrying",
                    url
                );
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(OdiError::FetchFailed {
                status: status.as_u16(),
                url,
            });
        }
    }

    /// Fetch the student listings page for a city.
    ///
    /// # Errors
    /// - `OdiError::InvalidCityId` - City id is not a plate code 1..=81
    /// - Any error from [`OdiClient::fetch`]
    pub async fn fetch_listings(&self, city_id: &str) -> Result<String> {
        let city_id = validate_city_id(city_id)?;
        let path = format!("/student/?city={}", urlencoding::encode(city_id));
        self.fetch(&path).await
    }

    /// Calculate exponential backoff delay for retry
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: 1s, 2s, 4s, ...
        Duration::from_millis(self.retry_delay_ms * 2u64.pow(attempt))
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

/// Validate a city id: Turkish licence plate codes run from 1 to 81.
///
/// Returns the trimmed id.
///
/// # Example
/// ```
/// use odi_core::client::validate_city_id;
///
/// assert_eq!(validate_city_id(" 35 ").unwrap(), "35");
/// assert!(validate_city_id("82").is_err());
/// ```
pub fn validate_city_id(city_id: &str) -> Result<&str> {
    let trimmed = city_id.trim();
    match trimmed.parse::<u8>() {
        Ok(code) if (1..=81).contains(&code) => Ok(trimmed),
        _ => Err(OdiError::InvalidCityId(city_id.to_string())),
    }
}
