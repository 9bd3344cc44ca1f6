//! The analytics update orchestrator.
//!
//! [`AnalyticsUpdater`] drives one influencer's content links through the
//! link processor, aggregates the surviving records and persists the result.
//! An update with nothing usable (no links, no well-formed links, or every
//! link skipped) resets the influencer's analytics to zero and still counts
//! as a success. Only a persistence failure fails the update.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use roster_core::{AggregatedAnalytics, AppConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::error::AnalyticsError;
use crate::fetcher::MediaFetcher;
use crate::locks::KeyedLocks;
use crate::pacing::RequestGate;
use crate::processor::{process_paced_link, LinkOutcome, SkippedLink};
use crate::store::{AnalyticsStore, AnalyticsSummary};

/// Tuning knobs for link processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdaterSettings {
    /// Budget for fetching a single link.
    pub link_timeout: Duration,
    /// Links fetched at once for one influencer. `1` is strictly sequential.
    pub max_concurrent_links: usize,
    /// Minimum gap between the starts of two provider requests, shared by
    /// every update this updater runs.
    pub inter_request_delay: Duration,
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self {
            link_timeout: Duration::from_secs(10),
            max_concurrent_links: 1,
            inter_request_delay: Duration::from_millis(250),
        }
    }
}

impl UpdaterSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            link_timeout: Duration::from_secs(config.analytics_link_timeout_secs),
            max_concurrent_links: config.analytics_max_concurrent_links,
            inter_request_delay: Duration::from_millis(config.analytics_inter_request_delay_ms),
        }
    }
}

/// Why an update cleared the influencer's analytics instead of writing them.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetReason {
    NoLinks,
    NoValidLinks,
    NoUsableContent { skipped: Vec<SkippedLink> },
}

impl fmt::Display for ResetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLinks => f.write_str("no content links"),
            Self::NoValidLinks => f.write_str("no well-formed content links"),
            Self::NoUsableContent { skipped } => {
                write!(f, "no usable content ({} link(s) skipped)", skipped.len())
            }
        }
    }
}

/// What a successful update did.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Reset {
        reason: ResetReason,
    },
    Updated {
        summary: AggregatedAnalytics,
        skipped: Vec<SkippedLink>,
    },
}

/// One influencer's links in a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluencerLinks {
    pub influencer_id: Uuid,
    #[serde(default)]
    pub content_links: Vec<String>,
}

/// Tally of a batch update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdateResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Keeps the links that are non-blank and start with `http://` or
/// `https://`, trimmed, in input order.
#[must_use]
pub fn sanitize_links(links: &[String]) -> Vec<&str> {
    links
        .iter()
        .map(|link| link.trim())
        .filter(|link| {
            !link.is_empty() && (link.starts_with("http://") || link.starts_with("https://"))
        })
        .collect()
}

/// Updates influencer analytics from content links.
pub struct AnalyticsUpdater<F, S> {
    fetcher: F,
    store: S,
    settings: UpdaterSettings,
    locks: KeyedLocks,
    gate: RequestGate,
}

impl<F, S> AnalyticsUpdater<F, S>
where
    F: MediaFetcher,
    S: AnalyticsStore,
{
    pub fn new(fetcher: F, store: S, settings: UpdaterSettings) -> Self {
        Self {
            fetcher,
            store,
            settings,
            locks: KeyedLocks::default(),
            gate: RequestGate::new(settings.inter_request_delay),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Updates one influencer and reports plain success.
    ///
    /// Returns `false` only when persisting failed; the error is logged.
    pub async fn update_from_content_links(&self, influencer_id: Uuid, links: &[String]) -> bool {
        match self.try_update_from_content_links(influencer_id, links).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(%influencer_id, error = %e, "analytics update failed");
                false
            }
        }
    }

    /// Updates one influencer from `links`.
    ///
    /// Updates for the same influencer are serialized; different influencers
    /// proceed independently.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Db`] if the reset or the write fails.
    pub async fn try_update_from_content_links(
        &self,
        influencer_id: Uuid,
        links: &[String],
    ) -> Result<UpdateOutcome, AnalyticsError> {
        let _guard = self.locks.lock(influencer_id).await;

        if links.is_empty() {
            return self.reset(influencer_id, ResetReason::NoLinks).await;
        }

        let valid = sanitize_links(links);
        if valid.is_empty() {
            return self.reset(influencer_id, ResetReason::NoValidLinks).await;
        }

        let mut records = Vec::with_capacity(valid.len());
        let mut skipped = Vec::new();
        for outcome in self.process_links(&valid).await {
            match outcome {
                LinkOutcome::Extracted(record) => records.push(record),
                LinkOutcome::Skipped(link) => skipped.push(link),
            }
        }

        if records.is_empty() {
            return self
                .reset(influencer_id, ResetReason::NoUsableContent { skipped })
                .await;
        }

        let summary = aggregate(&records);
        let written = self.store.write_aggregated(influencer_id, &summary).await?;
        if written.influencer_rows == 0 {
            tracing::warn!(%influencer_id, "analytics computed for unknown influencer");
        }

        tracing::info!(
            %influencer_id,
            content_count = summary.content_count,
            skipped = skipped.len(),
            total_views = summary.total_views,
            avg_engagement_rate = summary.avg_engagement_rate,
            "influencer analytics updated"
        );

        Ok(UpdateOutcome::Updated { summary, skipped })
    }

    /// Updates each influencer in turn.
    ///
    /// A failure is counted and described in `errors`; it never stops the
    /// remaining influencers.
    pub async fn batch_update(&self, updates: &[InfluencerLinks]) -> BatchUpdateResult {
        let mut result = BatchUpdateResult::default();

        for update in updates {
            match self
                .try_update_from_content_links(update.influencer_id, &update.content_links)
                .await
            {
                Ok(_) => result.success += 1,
                Err(e) => {
                    tracing::error!(
                        influencer_id = %update.influencer_id,
                        error = %e,
                        "analytics update failed"
                    );
                    result.failed += 1;
                    result.errors.push(format!(
                        "failed to update analytics for influencer {}: {e}",
                        update.influencer_id
                    ));
                }
            }
        }

        tracing::info!(
            success = result.success,
            failed = result.failed,
            "batch analytics update finished"
        );
        result
    }

    /// Persisted analytics for display, or `None` for an unknown influencer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Db`] if the read fails.
    pub async fn analytics_summary(
        &self,
        influencer_id: Uuid,
    ) -> Result<Option<AnalyticsSummary>, AnalyticsError> {
        let row = self.store.load_analytics(influencer_id).await?;
        Ok(row.map(AnalyticsSummary::from))
    }

    async fn reset(
        &self,
        influencer_id: Uuid,
        reason: ResetReason,
    ) -> Result<UpdateOutcome, AnalyticsError> {
        let written = self.store.reset_to_zero(influencer_id).await?;
        if written.influencer_rows == 0 {
            tracing::warn!(%influencer_id, "analytics reset for unknown influencer");
        }
        tracing::info!(%influencer_id, %reason, "influencer analytics reset");
        Ok(UpdateOutcome::Reset { reason })
    }

    /// Runs the link processor over `links`, results in input order.
    fn process_links<'a>(
        &'a self,
        links: &'a [&'a str],
    ) -> impl Future<Output = Vec<LinkOutcome>> + Send + 'a {
        let timeout = self.settings.link_timeout;
        let fetcher = &self.fetcher;
        let gate = &self.gate;

        stream::iter(links.iter().copied())
            .map(move |url: &'a str| process_paced_link(fetcher, url, timeout, gate))
            .buffered(self.settings.max_concurrent_links.max(1))
            .collect()
    }
}

#[cfg(test)]
#[path = "updater_test.rs"]
mod tests;
