//! In-memory fakes for the fetcher and store seams.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use roster_core::{AggregatedAnalytics, Platform};
use roster_db::{DbError, InfluencerAnalyticsRow, WriteSummary};
use roster_modash::ModashError;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::time::Instant;
use uuid::Uuid;

use crate::fetcher::MediaFetcher;
use crate::store::AnalyticsStore;

type ErrorFactory = Arc<dyn Fn() -> ModashError + Send + Sync>;

#[derive(Clone)]
enum Scripted {
    Media(Value),
    Delayed(Duration, Value),
    Error(ErrorFactory),
    Hang,
}

/// Fetcher answering from a URL-keyed script. Unscripted URLs are not found.
#[derive(Default)]
pub(crate) struct MockFetcher {
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_media(mut self, url: &str, payload: Value) -> Self {
        self.responses
            .insert(url.to_string(), Scripted::Media(payload));
        self
    }

    pub(crate) fn on_delayed(mut self, url: &str, delay: Duration, payload: Value) -> Self {
        self.responses
            .insert(url.to_string(), Scripted::Delayed(delay, payload));
        self
    }

    pub(crate) fn on_error(
        mut self,
        url: &str,
        make: impl Fn() -> ModashError + Send + Sync + 'static,
    ) -> Self {
        self.responses
            .insert(url.to_string(), Scripted::Error(Arc::new(make)));
        self
    }

    pub(crate) fn on_hang(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Scripted::Hang);
        self
    }

    /// URLs fetched so far, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.started().into_iter().map(|(url, _)| url).collect()
    }

    /// URLs fetched so far with the instant each fetch started.
    pub(crate) fn started(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaFetcher for MockFetcher {
    async fn fetch_media(&self, _platform: Platform, url: &str) -> Result<Value, ModashError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Instant::now()));
        match self.responses.get(url).cloned() {
            Some(Scripted::Media(payload)) => Ok(payload),
            Some(Scripted::Delayed(delay, payload)) => {
                tokio::time::sleep(delay).await;
                Ok(payload)
            }
            Some(Scripted::Error(make)) => Err(make()),
            Some(Scripted::Hang) => std::future::pending::<Result<Value, ModashError>>().await,
            None => Err(ModashError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

/// What the in-memory store holds per influencer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredInfluencer {
    pub(crate) name: String,
    pub(crate) total_followers: u64,
    pub(crate) analytics: AggregatedAnalytics,
    pub(crate) writes: usize,
    pub(crate) resets: usize,
}

/// Store keeping influencers in a map, with per-id failure injection.
#[derive(Default)]
pub(crate) struct MemoryStore {
    influencers: Mutex<HashMap<Uuid, StoredInfluencer>>,
    failing: HashSet<Uuid>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_influencer(self, id: Uuid, name: &str, total_followers: u64) -> Self {
        self.influencers.lock().unwrap().insert(
            id,
            StoredInfluencer {
                name: name.to_string(),
                total_followers,
                analytics: AggregatedAnalytics::default(),
                writes: 0,
                resets: 0,
            },
        );
        self
    }

    /// Every write or reset for `id` fails as if the pool were exhausted.
    pub(crate) fn failing_for(mut self, id: Uuid) -> Self {
        self.failing.insert(id);
        self
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<StoredInfluencer> {
        self.influencers.lock().unwrap().get(&id).cloned()
    }

    fn check(&self, id: Uuid) -> Result<(), DbError> {
        if self.failing.contains(&id) {
            Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn write_aggregated(
        &self,
        influencer_id: Uuid,
        summary: &AggregatedAnalytics,
    ) -> Result<WriteSummary, DbError> {
        self.check(influencer_id)?;
        let mut influencers = self.influencers.lock().unwrap();
        let Some(row) = influencers.get_mut(&influencer_id) else {
            return Ok(WriteSummary::default());
        };
        row.total_followers = row.total_followers.max(summary.total_views);
        row.analytics = summary.clone();
        row.writes += 1;
        Ok(WriteSummary {
            influencer_rows: 1,
            platform_rows: 0,
        })
    }

    async fn reset_to_zero(&self, influencer_id: Uuid) -> Result<WriteSummary, DbError> {
        self.check(influencer_id)?;
        let mut influencers = self.influencers.lock().unwrap();
        let Some(row) = influencers.get_mut(&influencer_id) else {
            return Ok(WriteSummary::default());
        };
        row.total_followers = 0;
        row.analytics = AggregatedAnalytics::default();
        row.resets += 1;
        Ok(WriteSummary {
            influencer_rows: 1,
            platform_rows: 0,
        })
    }

    async fn load_analytics(
        &self,
        influencer_id: Uuid,
    ) -> Result<Option<InfluencerAnalyticsRow>, DbError> {
        self.check(influencer_id)?;
        let influencers = self.influencers.lock().unwrap();
        Ok(influencers.get(&influencer_id).map(|row| {
            let derived = row.analytics.derived();
            let rate = Decimal::try_from(row.analytics.avg_engagement_rate)
                .unwrap_or_default()
                .round_dp(2);
            let int = |v: u64| i64::try_from(v).unwrap();
            InfluencerAnalyticsRow {
                id: influencer_id,
                name: row.name.clone(),
                total_followers: int(row.total_followers),
                total_views: int(row.analytics.total_views),
                total_likes: int(row.analytics.total_likes),
                total_comments: int(row.analytics.total_comments),
                total_engagements: int(derived.total_engagements),
                total_avg_views: int(derived.total_avg_views),
                estimated_reach: int(derived.estimated_reach),
                estimated_promotion_views: int(derived.estimated_promotion_views),
                avg_engagement_rate: rate,
                total_engagement_rate: rate,
                analytics_updated_at: (row.writes + row.resets > 0).then(chrono::Utc::now),
                modash_last_updated: (row.writes > 0).then(chrono::Utc::now),
            }
        }))
    }
}
