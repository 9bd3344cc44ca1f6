//! Analytics columns on the `influencers` and `influencer_platforms` tables.
//!
//! Both writers overwrite the analytics fields wholesale; the only value that
//! survives an update is a larger previously stored `total_followers`.

use chrono::{DateTime, Utc};
use roster_core::AggregatedAnalytics;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Largest value a `NUMERIC(10,2)` rate column can hold.
const MAX_STORED_RATE: f64 = 99_999_999.99;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Persisted analytics totals for one influencer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfluencerAnalyticsRow {
    pub id: Uuid,
    pub name: String,
    pub total_followers: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_engagements: i64,
    pub total_avg_views: i64,
    pub estimated_reach: i64,
    pub estimated_promotion_views: i64,
    pub avg_engagement_rate: Decimal,
    pub total_engagement_rate: Decimal,
    pub analytics_updated_at: Option<DateTime<Utc>>,
    pub modash_last_updated: Option<DateTime<Utc>>,
}

/// Number of rows touched by a write, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub influencer_rows: u64,
    pub platform_rows: u64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Overwrite an influencer's analytics with a freshly aggregated summary.
///
/// Updates the `influencers` row and every `influencer_platforms` row for the
/// influencer inside one transaction. `total_followers` is only ever raised:
/// it becomes `GREATEST(total_followers, total_views)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either update or the commit fails.
pub async fn write_influencer_analytics(
    pool: &PgPool,
    influencer_id: Uuid,
    summary: &AggregatedAnalytics,
) -> Result<WriteSummary, DbError> {
    let derived = summary.derived();
    let rate = rate_for_storage(summary.avg_engagement_rate);

    let mut tx = pool.begin().await?;

    let influencer = sqlx::query(
        "UPDATE influencers SET \
             total_followers           = GREATEST(total_followers, $2), \
             total_engagement_rate     = ROUND($3::float8::numeric, 2), \
             total_avg_views           = $4, \
             estimated_promotion_views = $5, \
             total_engagements         = $6, \
             avg_engagement_rate       = ROUND($3::float8::numeric, 2), \
             estimated_reach           = $7, \
             total_likes               = $8, \
             total_comments            = $9, \
             total_views               = $2, \
             analytics_updated_at      = NOW(), \
             modash_last_updated       = NOW(), \
             updated_at                = NOW() \
         WHERE id = $1",
    )
    .bind(influencer_id)
    .bind(to_i64(summary.total_views))
    .bind(rate)
    .bind(to_i64(derived.total_avg_views))
    .bind(to_i64(derived.estimated_promotion_views))
    .bind(to_i64(derived.total_engagements))
    .bind(to_i64(derived.estimated_reach))
    .bind(to_i64(summary.total_likes))
    .bind(to_i64(summary.total_comments))
    .execute(&mut *tx)
    .await?;

    let platforms = sqlx::query(
        "UPDATE influencer_platforms SET \
             avg_views       = $2, \
             engagement_rate = ROUND($3::float8::numeric, 2), \
             last_synced     = NOW(), \
             updated_at      = NOW() \
         WHERE influencer_id = $1",
    )
    .bind(influencer_id)
    .bind(to_i64(derived.total_avg_views))
    .bind(rate)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(WriteSummary {
        influencer_rows: influencer.rows_affected(),
        platform_rows: platforms.rows_affected(),
    })
}

/// Zero every analytics field for an influencer and stamp
/// `analytics_updated_at`.
///
/// Non-analytics columns (name, niche, handles) are left untouched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either update or the commit fails.
pub async fn reset_influencer_analytics(
    pool: &PgPool,
    influencer_id: Uuid,
) -> Result<WriteSummary, DbError> {
    let mut tx = pool.begin().await?;

    let influencer = sqlx::query(
        "UPDATE influencers SET \
             total_followers           = 0, \
             total_engagement_rate     = 0, \
             total_avg_views           = 0, \
             estimated_promotion_views = 0, \
             total_engagements         = 0, \
             avg_engagement_rate       = 0, \
             estimated_reach           = 0, \
             total_likes               = 0, \
             total_comments            = 0, \
             total_views               = 0, \
             analytics_updated_at      = NOW(), \
             updated_at                = NOW() \
         WHERE id = $1",
    )
    .bind(influencer_id)
    .execute(&mut *tx)
    .await?;

    let platforms = sqlx::query(
        "UPDATE influencer_platforms SET \
             avg_views       = 0, \
             engagement_rate = 0, \
             updated_at      = NOW() \
         WHERE influencer_id = $1",
    )
    .bind(influencer_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(WriteSummary {
        influencer_rows: influencer.rows_affected(),
        platform_rows: platforms.rows_affected(),
    })
}

/// Fetch the persisted analytics for an influencer, or `None` if the row
/// does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_influencer_analytics(
    pool: &PgPool,
    influencer_id: Uuid,
) -> Result<Option<InfluencerAnalyticsRow>, DbError> {
    let row = sqlx::query_as::<_, InfluencerAnalyticsRow>(
        "SELECT id, name, total_followers, total_views, total_likes, total_comments, \
                total_engagements, total_avg_views, estimated_reach, \
                estimated_promotion_views, avg_engagement_rate, total_engagement_rate, \
                analytics_updated_at, modash_last_updated \
         FROM influencers \
         WHERE id = $1",
    )
    .bind(influencer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Clamp a percentage into what the `NUMERIC(10,2)` columns accept.
fn rate_for_storage(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, MAX_STORED_RATE)
    } else {
        0.0
    }
}
