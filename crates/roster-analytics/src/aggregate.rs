//! Folding per-content records into influencer-level totals.

use roster_core::{AggregatedAnalytics, ContentAnalytics};

/// Sums the counters of `records` and averages their engagement rates.
///
/// Records without a computable rate (zero views) still count towards the
/// sums and `content_count` but are left out of the mean. Empty input gives
/// the all-zero summary.
#[must_use]
pub fn aggregate(records: &[ContentAnalytics]) -> AggregatedAnalytics {
    let mut summary = AggregatedAnalytics {
        content_count: records.len(),
        ..AggregatedAnalytics::default()
    };
    let mut rate_sum = 0.0;
    let mut rate_samples = 0u32;

    for record in records {
        summary.total_views = summary.total_views.saturating_add(record.views);
        summary.total_likes = summary.total_likes.saturating_add(record.likes);
        summary.total_comments = summary.total_comments.saturating_add(record.comments);
        summary.total_shares = summary
            .total_shares
            .saturating_add(record.shares.unwrap_or(0));
        summary.total_saves = summary.total_saves.saturating_add(record.saves.unwrap_or(0));

        if let Some(rate) = record.engagement_rate.filter(|r| r.is_finite()) {
            rate_sum += rate;
            rate_samples += 1;
        }
    }

    if rate_samples > 0 {
        summary.avg_engagement_rate = rate_sum / f64::from(rate_samples);
    }
    summary
}
