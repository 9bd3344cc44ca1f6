//! The persistence seam between the pipeline and the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::AggregatedAnalytics;
use roster_db::{DbError, InfluencerAnalyticsRow, WriteSummary};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Reads and writes influencer-level analytics.
///
/// Implementations must overwrite every analytics field on each write; the
/// only value carried over from the previous state is the follower count's
/// max-guard.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn write_aggregated(
        &self,
        influencer_id: Uuid,
        summary: &AggregatedAnalytics,
    ) -> Result<WriteSummary, DbError>;

    async fn reset_to_zero(&self, influencer_id: Uuid) -> Result<WriteSummary, DbError>;

    async fn load_analytics(
        &self,
        influencer_id: Uuid,
    ) -> Result<Option<InfluencerAnalyticsRow>, DbError>;
}

#[async_trait]
impl AnalyticsStore for PgPool {
    async fn write_aggregated(
        &self,
        influencer_id: Uuid,
        summary: &AggregatedAnalytics,
    ) -> Result<WriteSummary, DbError> {
        roster_db::write_influencer_analytics(self, influencer_id, summary).await
    }

    async fn reset_to_zero(&self, influencer_id: Uuid) -> Result<WriteSummary, DbError> {
        roster_db::reset_influencer_analytics(self, influencer_id).await
    }

    async fn load_analytics(
        &self,
        influencer_id: Uuid,
    ) -> Result<Option<InfluencerAnalyticsRow>, DbError> {
        roster_db::get_influencer_analytics(self, influencer_id).await
    }
}

/// Persisted analytics for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub influencer_id: Uuid,
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
    pub analytics_updated_at: Option<DateTime<Utc>>,
    pub modash_last_updated: Option<DateTime<Utc>>,
}

impl From<InfluencerAnalyticsRow> for AnalyticsSummary {
    fn from(row: InfluencerAnalyticsRow) -> Self {
        Self {
            influencer_id: row.id,
            name: row.name,
            total_followers: row.total_followers,
            total_views: row.total_views,
            total_likes: row.total_likes,
            total_comments: row.total_comments,
            total_engagements: row.total_engagements,
            total_avg_views: row.total_avg_views,
            estimated_reach: row.estimated_reach,
            estimated_promotion_views: row.estimated_promotion_views,
            avg_engagement_rate: row.avg_engagement_rate,
            analytics_updated_at: row.analytics_updated_at,
            modash_last_updated: row.modash_last_updated,
        }
    }
}
