//! HTTP client for the Modash raw media API.
//!
//! Each supported platform has its own media endpoint; all of them take the
//! public post URL as the `url` query parameter and answer with the
//! platform's native payload. The client surfaces rate limiting, missing
//! content and provider-side `error` bodies as typed [`ModashError`]s.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use roster_core::{AppConfig, Platform};
use serde_json::Value;

use crate::error::ModashError;
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.modash.io/v1";

/// Client for the Modash raw media endpoints.
///
/// Use [`ModashClient::new`] for production or [`ModashClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ModashClient {
    client: Client,
    api_key: String,
    base_url: Url,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    backoff_base_secs: u64,
}

impl ModashClient {
    /// Creates a client pointed at the production Modash API.
    ///
    /// # Errors
    ///
    /// Returns [`ModashError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ModashError> {
        Self::with_base_url(
            api_key,
            DEFAULT_BASE_URL,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ModashError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ModashError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ModashError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ModashError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`ModashError::MissingApiKey`] if `MODASH_API_KEY` is unset,
    /// otherwise the errors of [`ModashClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ModashError> {
        let api_key = config
            .modash_api_key
            .as_deref()
            .ok_or(ModashError::MissingApiKey)?;
        Self::with_base_url(
            api_key,
            &config.modash_base_url,
            config.modash_request_timeout_secs,
            &config.modash_user_agent,
            config.modash_max_retries,
            config.modash_retry_backoff_base_secs,
        )
    }

    /// Fetches the raw media payload for a post on `platform`.
    ///
    /// Transient failures (429, 5xx, network) are retried with backoff.
    ///
    /// # Errors
    ///
    /// - [`ModashError::NotFound`]: the provider has no such content.
    /// - [`ModashError::Provider`]: the body carried an `error` field, or a
    ///   4xx response explained itself with one.
    /// - [`ModashError::RateLimited`] / [`ModashError::Http`]: after retries
    ///   are exhausted.
    /// - [`ModashError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ModashError::Deserialize`]: the body is not JSON.
    pub async fn get_media_info(
        &self,
        platform: Platform,
        content_url: &str,
    ) -> Result<Value, ModashError> {
        let url = self.media_url(platform, content_url)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .bearer_auth(&self.api_key)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ModashError::RateLimited { retry_after_secs });
                }

                if status == StatusCode::NOT_FOUND {
                    return Err(ModashError::NotFound {
                        url: content_url.to_owned(),
                    });
                }

                let body = response.text().await?;

                if status.is_client_error() {
                    // Modash explains most 4xx answers with an `error` body.
                    if let Ok(value) = serde_json::from_str::<Value>(&body) {
                        check_provider_error(&value)?;
                    }
                }

                if !status.is_success() {
                    return Err(ModashError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.path().to_owned(),
                    });
                }

                let payload =
                    serde_json::from_str::<Value>(&body).map_err(|e| ModashError::Deserialize {
                        context: format!("{platform} media info for {content_url}"),
                        source: e,
                    })?;
                check_provider_error(&payload)?;
                Ok(payload)
            }
        })
        .await
    }

    /// Builds the media endpoint URL for `platform` with the post URL as the
    /// `url` query parameter.
    fn media_url(&self, platform: Platform, content_url: &str) -> Result<Url, ModashError> {
        let mut url =
            self.base_url
                .join(media_endpoint(platform))
                .map_err(|e| ModashError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut().append_pair("url", content_url);
        Ok(url)
    }
}

/// Path of the raw media endpoint for each platform, relative to the base URL.
fn media_endpoint(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => "raw/ig/post-info",
        Platform::TikTok => "raw/tiktok/media-info",
        Platform::YouTube => "raw/youtube/video-info",
    }
}

/// Message carried by a truthy `error` field, if any.
///
/// Modash signals failures either as `"error": true` next to a `message`, or
/// as `"error": "<message>"`. `false`, `null` and empty strings mean success.
#[must_use]
pub fn provider_error_message(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::Bool(true)) => Some(
            body.get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_owned(),
        ),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Object(obj)) => Some(
            obj.get("message")
                .and_then(Value::as_str)
                .map_or_else(|| Value::Object(obj.clone()).to_string(), str::to_owned),
        ),
        _ => None,
    }
}

fn check_provider_error(body: &Value) -> Result<(), ModashError> {
    match provider_error_message(body) {
        Some(message) => Err(ModashError::Provider(message)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
