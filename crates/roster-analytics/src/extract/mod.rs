//! Per-platform extraction of engagement counters from raw provider payloads.
//!
//! Each platform module deserializes the payload into its own struct family
//! with every field optional, then maps it onto [`ContentAnalytics`].
//! Missing counters read as 0. A payload with no recognizable metric
//! container yields `None`.

mod counter;
mod instagram;
mod tiktok;
mod youtube;

use roster_core::{ContentAnalytics, Platform};
use serde_json::Value;

/// Extracts a normalized record for `url` from a raw `platform` payload.
///
/// The engagement rate is computed here, once, for every platform.
#[must_use]
pub fn extract_content_analytics(
    platform: Platform,
    url: &str,
    raw: &Value,
) -> Option<ContentAnalytics> {
    let record = match platform {
        Platform::Instagram => instagram::extract(url, raw),
        Platform::TikTok => tiktok::extract(url, raw),
        Platform::YouTube => youtube::extract(url, raw),
    }?;
    Some(record.with_engagement_rate())
}
