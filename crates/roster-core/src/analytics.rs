//! Canonical per-content and per-influencer analytics records.
//!
//! Extractors produce [`ContentAnalytics`] from provider payloads, the
//! aggregator folds them into one [`AggregatedAnalytics`], and the database
//! layer stores that summary together with the [`DerivedMetrics`] computed
//! from it.

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Share of average views a sponsored post is expected to reach, in percent.
pub const PROMOTION_VIEW_PERCENT: u64 = 15;

/// Engagement counters for a single piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalytics {
    pub platform: Platform,
    /// The source post URL, kept for traceability.
    pub url: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    /// `None` when the platform does not report shares.
    pub shares: Option<u64>,
    /// `None` when the platform does not report saves.
    pub saves: Option<u64>,
    /// Percentage of views that engaged. `None` when `views == 0`.
    pub engagement_rate: Option<f64>,
}

impl ContentAnalytics {
    /// An all-zero record for `url` on `platform`.
    #[must_use]
    pub fn new(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
            views: 0,
            likes: 0,
            comments: 0,
            shares: None,
            saves: None,
            engagement_rate: None,
        }
    }

    /// Likes + comments + shares + saves, with unreported counters as 0.
    #[must_use]
    pub fn engagements(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares.unwrap_or(0))
            .saturating_add(self.saves.unwrap_or(0))
    }

    /// `engagements / views * 100`, or `None` when there are no views.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute_engagement_rate(&self) -> Option<f64> {
        if self.views == 0 {
            return None;
        }
        Some(self.engagements() as f64 / self.views as f64 * 100.0)
    }

    /// Returns the record with `engagement_rate` filled in from its counters.
    #[must_use]
    pub fn with_engagement_rate(mut self) -> Self {
        self.engagement_rate = self.compute_engagement_rate();
        self
    }
}

/// Influencer-level totals over every successfully processed content item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedAnalytics {
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub total_shares: u64,
    pub total_saves: u64,
    /// Mean of the per-content rates that could be computed.
    pub avg_engagement_rate: f64,
    pub content_count: usize,
}

impl AggregatedAnalytics {
    /// `true` when no content contributed, which callers treat as a reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_count == 0
    }

    #[must_use]
    pub fn total_engagements(&self) -> u64 {
        self.total_likes
            .saturating_add(self.total_comments)
            .saturating_add(self.total_shares)
            .saturating_add(self.total_saves)
    }

    /// Metrics stored alongside the raw totals.
    #[must_use]
    pub fn derived(&self) -> DerivedMetrics {
        let count = u64::try_from(self.content_count).unwrap_or(u64::MAX);
        let total_avg_views = if count == 0 {
            0
        } else {
            self.total_views.saturating_add(count / 2) / count
        };
        let estimated_promotion_views = total_avg_views
            .saturating_mul(PROMOTION_VIEW_PERCENT)
            .saturating_add(50)
            / 100;

        DerivedMetrics {
            total_avg_views,
            estimated_promotion_views,
            total_engagements: self.total_engagements(),
            estimated_reach: self.total_views,
        }
    }
}

/// Values computed from an [`AggregatedAnalytics`] for persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// `total_views / content_count`, rounded half up.
    pub total_avg_views: u64,
    /// 15% of `total_avg_views`, rounded half up.
    pub estimated_promotion_views: u64,
    pub total_engagements: u64,
    /// Set equal to `total_views`.
    pub estimated_reach: u64,
}
