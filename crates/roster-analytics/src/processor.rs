//! Classification, fetch and extraction for a single content link.

use std::fmt;
use std::time::Duration;

use roster_core::{detect_platform_from_url, ContentAnalytics};
use roster_modash::{provider_error_message, ModashError};
use serde::Serialize;

use crate::extract::extract_content_analytics;
use crate::fetcher::MediaFetcher;
use crate::pacing::RequestGate;

/// Why a link contributed nothing to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedPlatform,
    NotFound,
    RateLimited,
    ProviderError(String),
    Network(String),
    TimedOut,
    UnrecognizedPayload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPlatform => f.write_str("unsupported platform"),
            Self::NotFound => f.write_str("content not found"),
            Self::RateLimited => f.write_str("rate limited by provider"),
            Self::ProviderError(msg) => write!(f, "provider error: {msg}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::UnrecognizedPayload => f.write_str("unrecognized payload"),
        }
    }
}

impl From<&ModashError> for SkipReason {
    fn from(err: &ModashError) -> Self {
        match err {
            ModashError::NotFound { .. } => Self::NotFound,
            ModashError::RateLimited { .. } => Self::RateLimited,
            ModashError::Provider(msg) => Self::ProviderError(msg.clone()),
            ModashError::Http(e) => Self::Network(e.to_string()),
            ModashError::Deserialize { .. } => Self::UnrecognizedPayload,
            ModashError::UnexpectedStatus { .. }
            | ModashError::InvalidBaseUrl { .. }
            | ModashError::MissingApiKey => Self::ProviderError(err.to_string()),
        }
    }
}

/// A link that was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLink {
    pub url: String,
    pub reason: SkipReason,
}

/// Result of processing one link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    Extracted(ContentAnalytics),
    Skipped(SkippedLink),
}

impl LinkOutcome {
    fn skipped(url: &str, reason: SkipReason) -> Self {
        Self::Skipped(SkippedLink {
            url: url.to_owned(),
            reason,
        })
    }
}

/// Classifies `url`, fetches its payload within `timeout` and extracts a
/// record.
///
/// Never fails: every problem becomes [`LinkOutcome::Skipped`] and is logged
/// at `warn`.
pub async fn process_content_link<F>(fetcher: &F, url: &str, timeout: Duration) -> LinkOutcome
where
    F: MediaFetcher + ?Sized,
{
    process_paced_link(fetcher, url, timeout, &RequestGate::new(Duration::ZERO)).await
}

/// Like [`process_content_link`], but a classified link waits for a slot on
/// `gate` before it is fetched. The wait is not counted against `timeout`.
pub(crate) async fn process_paced_link<F>(
    fetcher: &F,
    url: &str,
    timeout: Duration,
    gate: &RequestGate,
) -> LinkOutcome
where
    F: MediaFetcher + ?Sized,
{
    let outcome = fetch_and_extract(fetcher, url, timeout, gate).await;
    if let LinkOutcome::Skipped(skipped) = &outcome {
        tracing::warn!(url, reason = %skipped.reason, "skipping content link");
    }
    outcome
}

async fn fetch_and_extract<F>(
    fetcher: &F,
    url: &str,
    timeout: Duration,
    gate: &RequestGate,
) -> LinkOutcome
where
    F: MediaFetcher + ?Sized,
{
    let Some(platform) = detect_platform_from_url(url) else {
        return LinkOutcome::skipped(url, SkipReason::UnsupportedPlatform);
    };

    gate.wait_for_slot().await;
    let raw = match tokio::time::timeout(timeout, fetcher.fetch_media(platform, url)).await {
        Err(_) => return LinkOutcome::skipped(url, SkipReason::TimedOut),
        Ok(Err(err)) => return LinkOutcome::skipped(url, SkipReason::from(&err)),
        Ok(Ok(raw)) => raw,
    };

    if let Some(message) = provider_error_message(&raw) {
        return LinkOutcome::skipped(url, SkipReason::ProviderError(message));
    }

    match extract_content_analytics(platform, url, &raw) {
        Some(record) => {
            tracing::debug!(url, %platform, views = record.views, "extracted content analytics");
            LinkOutcome::Extracted(record)
        }
        None => LinkOutcome::skipped(url, SkipReason::UnrecognizedPayload),
    }
}
