//! Content-link analytics pipeline.
//!
//! Takes the post URLs that belong to an influencer, fetches each post's raw
//! provider payload, normalizes it into [`ContentAnalytics`], folds the
//! records into one [`AggregatedAnalytics`] and persists the result. Links
//! that cannot be fetched or understood are skipped, never fatal; only a
//! persistence failure makes an update fail.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod processor;
pub mod store;
pub mod updater;

mod locks;
mod pacing;

#[cfg(test)]
mod testing;

pub use aggregate::aggregate;
pub use error::AnalyticsError;
pub use extract::extract_content_analytics;
pub use fetcher::MediaFetcher;
pub use processor::{process_content_link, LinkOutcome, SkipReason, SkippedLink};
pub use roster_core::{AggregatedAnalytics, ContentAnalytics, Platform};
pub use store::{AnalyticsStore, AnalyticsSummary};
pub use updater::{
    sanitize_links, AnalyticsUpdater, BatchUpdateResult, InfluencerLinks, ResetReason,
    UpdateOutcome, UpdaterSettings,
};
