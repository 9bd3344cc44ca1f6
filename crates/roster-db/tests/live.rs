//! Live integration tests for roster-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/roster-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use roster_core::AggregatedAnalytics;
use roster_db::{get_influencer_analytics, reset_influencer_analytics, write_influencer_analytics};
use rust_decimal::Decimal;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a minimal influencer row and return its generated `id`.
async fn insert_test_influencer(pool: &sqlx::PgPool, name: &str, total_followers: i64) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO influencers (name, niche, total_followers) \
         VALUES ($1, 'fitness', $2) RETURNING id",
    )
    .bind(name)
    .bind(total_followers)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_influencer failed for '{name}': {e}"))
}

async fn insert_test_platform(pool: &sqlx::PgPool, influencer_id: Uuid, platform: &str) {
    sqlx::query(
        "INSERT INTO influencer_platforms (influencer_id, platform, handle) \
         VALUES ($1, $2, 'handle')",
    )
    .bind(influencer_id)
    .bind(platform)
    .execute(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_platform failed for '{platform}': {e}"));
}

async fn platform_metrics(pool: &sqlx::PgPool, influencer_id: Uuid) -> Vec<(i64, Decimal, bool)> {
    sqlx::query_as::<_, (i64, Decimal, bool)>(
        "SELECT avg_views, engagement_rate, last_synced IS NOT NULL \
         FROM influencer_platforms WHERE influencer_id = $1 ORDER BY platform",
    )
    .bind(influencer_id)
    .fetch_all(pool)
    .await
    .expect("platform metrics query failed")
}

fn sample_summary() -> AggregatedAnalytics {
    AggregatedAnalytics {
        total_views: 3000,
        total_likes: 240,
        total_comments: 45,
        total_shares: 15,
        total_saves: 0,
        avg_engagement_rate: 10.004,
        content_count: 3,
    }
}

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn write_overwrites_totals_and_derived_metrics(pool: sqlx::PgPool) {
    let id = insert_test_influencer(&pool, "Ava", 0).await;
    insert_test_platform(&pool, id, "tiktok").await;

    let written = write_influencer_analytics(&pool, id, &sample_summary())
        .await
        .expect("write failed");
    assert_eq!(written.influencer_rows, 1);
    assert_eq!(written.platform_rows, 1);

    let row = get_influencer_analytics(&pool, id)
        .await
        .expect("read failed")
        .expect("row exists");

    assert_eq!(row.total_views, 3000);
    assert_eq!(row.total_likes, 240);
    assert_eq!(row.total_comments, 45);
    assert_eq!(row.total_engagements, 300);
    assert_eq!(row.total_avg_views, 1000);
    assert_eq!(row.estimated_promotion_views, 150);
    assert_eq!(row.estimated_reach, 3000);
    assert_eq!(row.avg_engagement_rate, Decimal::new(1000, 2));
    assert_eq!(row.total_engagement_rate, Decimal::new(1000, 2));
    assert_eq!(row.total_followers, 3000);
    assert!(row.analytics_updated_at.is_some());
    assert!(row.modash_last_updated.is_some());

    let platforms = platform_metrics(&pool, id).await;
    assert_eq!(platforms, vec![(1000, Decimal::new(1000, 2), true)]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn write_never_lowers_known_follower_count(pool: sqlx::PgPool) {
    let id = insert_test_influencer(&pool, "Ben", 250_000).await;

    write_influencer_analytics(&pool, id, &sample_summary())
        .await
        .expect("write failed");

    let row = get_influencer_analytics(&pool, id)
        .await
        .expect("read failed")
        .expect("row exists");
    assert_eq!(row.total_followers, 250_000);
    assert_eq!(row.total_views, 3000);
}

#[sqlx::test(migrations = "../../migrations")]
async fn write_for_unknown_influencer_touches_no_rows(pool: sqlx::PgPool) {
    let written = write_influencer_analytics(&pool, Uuid::new_v4(), &sample_summary())
        .await
        .expect("write should not fail for a missing row");
    assert_eq!(written.influencer_rows, 0);
    assert_eq!(written.platform_rows, 0);
}

// ---------------------------------------------------------------------------
// Reset path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn reset_zeroes_analytics_but_keeps_identity(pool: sqlx::PgPool) {
    let id = insert_test_influencer(&pool, "Cleo", 9_000).await;
    insert_test_platform(&pool, id, "instagram").await;
    insert_test_platform(&pool, id, "youtube").await;

    write_influencer_analytics(&pool, id, &sample_summary())
        .await
        .expect("write failed");
    reset_influencer_analytics(&pool, id)
        .await
        .expect("reset failed");

    let row = get_influencer_analytics(&pool, id)
        .await
        .expect("read failed")
        .expect("row exists");
    assert_eq!(row.name, "Cleo");
    assert_eq!(row.total_followers, 0);
    assert_eq!(row.total_views, 0);
    assert_eq!(row.total_likes, 0);
    assert_eq!(row.total_comments, 0);
    assert_eq!(row.total_engagements, 0);
    assert_eq!(row.total_avg_views, 0);
    assert_eq!(row.estimated_reach, 0);
    assert_eq!(row.estimated_promotion_views, 0);
    assert_eq!(row.avg_engagement_rate, Decimal::ZERO);
    assert_eq!(row.total_engagement_rate, Decimal::ZERO);
    assert!(row.analytics_updated_at.is_some());

    let niche: Option<String> =
        sqlx::query_scalar("SELECT niche FROM influencers WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .expect("niche query failed");
    assert_eq!(niche.as_deref(), Some("fitness"));

    for (avg_views, rate, _) in platform_metrics(&pool, id).await {
        assert_eq!(avg_views, 0);
        assert_eq!(rate, Decimal::ZERO);
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn reset_is_repeatable(pool: sqlx::PgPool) {
    let id = insert_test_influencer(&pool, "Dev", 10).await;

    for _ in 0..3 {
        let written = reset_influencer_analytics(&pool, id)
            .await
            .expect("reset failed");
        assert_eq!(written.influencer_rows, 1);
    }

    let row = get_influencer_analytics(&pool, id)
        .await
        .expect("read failed")
        .expect("row exists");
    assert_eq!(row.total_views, 0);
    assert_eq!(row.total_followers, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_returns_none_for_unknown_influencer(pool: sqlx::PgPool) {
    let row = get_influencer_analytics(&pool, Uuid::new_v4())
        .await
        .expect("read failed");
    assert!(row.is_none());
}
