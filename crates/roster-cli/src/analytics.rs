//! Analytics command handlers for the CLI.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use roster_analytics::{
    AnalyticsSummary, AnalyticsUpdater, InfluencerLinks, ResetReason, SkippedLink, UpdateOutcome,
    UpdaterSettings,
};
use roster_core::AppConfig;
use roster_modash::ModashClient;
use serde::Deserialize;
use uuid::Uuid;

/// Sub-commands available under `analytics`.
#[derive(Debug, Subcommand)]
pub enum AnalyticsCommands {
    /// Recompute one influencer's analytics from content links
    Update {
        /// Influencer id
        #[arg(long)]
        influencer: Uuid,
        /// Post URLs; none resets the influencer's analytics
        links: Vec<String>,
    },
    /// Recompute analytics for every influencer listed in a JSON file
    Batch {
        /// JSON file: `[{"influencer_id", "content_links"}]` or `{"updates": [...]}`
        #[arg(long)]
        file: PathBuf,
        /// Validate the file and print what would run
        #[arg(long)]
        dry_run: bool,
    },
    /// Show persisted analytics for an influencer
    Summary {
        /// Influencer id
        #[arg(long)]
        influencer: Uuid,
    },
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: AnalyticsCommands,
) -> anyhow::Result<()> {
    match command {
        AnalyticsCommands::Update { influencer, links } => {
            run_update(pool, config, influencer, &links).await
        }
        AnalyticsCommands::Batch { file, dry_run } => {
            run_batch(pool, config, &file, dry_run).await
        }
        AnalyticsCommands::Summary { influencer } => run_summary(pool, influencer).await,
    }
}

fn build_updater(
    pool: &sqlx::PgPool,
    config: &AppConfig,
) -> anyhow::Result<AnalyticsUpdater<ModashClient, sqlx::PgPool>> {
    let modash = ModashClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Modash client: {e}"))?;
    Ok(AnalyticsUpdater::new(
        modash,
        pool.clone(),
        UpdaterSettings::from_app_config(config),
    ))
}

/// Update one influencer and print what happened.
///
/// # Errors
///
/// Returns an error if the Modash client cannot be built or persisting fails.
async fn run_update(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    influencer_id: Uuid,
    links: &[String],
) -> anyhow::Result<()> {
    let updater = build_updater(pool, config)?;
    tracing::info!(%influencer_id, links = links.len(), "updating influencer analytics");
    let outcome = updater
        .try_update_from_content_links(influencer_id, links)
        .await?;

    match outcome {
        UpdateOutcome::Updated { summary, skipped } => {
            let derived = summary.derived();
            println!("updated analytics for {influencer_id}");
            println!("  content:          {}", summary.content_count);
            println!("  total views:      {}", summary.total_views);
            println!("  total likes:      {}", summary.total_likes);
            println!("  total comments:   {}", summary.total_comments);
            println!("  engagements:      {}", derived.total_engagements);
            println!("  avg views:        {}", derived.total_avg_views);
            println!("  engagement rate:  {:.2}%", summary.avg_engagement_rate);
            print_skipped(&skipped);
        }
        UpdateOutcome::Reset { reason } => {
            println!("reset analytics for {influencer_id}: {reason}");
            if let ResetReason::NoUsableContent { skipped } = &reason {
                print_skipped(skipped);
            }
        }
    }
    Ok(())
}

async fn run_batch(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    file: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
    let updates = parse_batch_file(&contents)?;
    tracing::info!(
        file = %file.display(),
        influencers = updates.len(),
        dry_run,
        "loaded batch file"
    );

    if dry_run {
        println!("dry-run: would update {} influencer(s)", updates.len());
        for update in &updates {
            println!(
                "  {}  {} link(s)",
                update.influencer_id,
                update.content_links.len()
            );
        }
        return Ok(());
    }

    let updater = build_updater(pool, config)?;
    let result = updater.batch_update(&updates).await;

    println!(
        "batch finished: {} succeeded, {} failed",
        result.success, result.failed
    );
    for error in &result.errors {
        tracing::error!(error = %error, "batch entry failed");
        println!("  {error}");
    }

    if result.failed > 0 {
        anyhow::bail!("{} influencer update(s) failed", result.failed);
    }
    Ok(())
}

async fn run_summary(pool: &sqlx::PgPool, influencer_id: Uuid) -> anyhow::Result<()> {
    let summary = roster_db::get_influencer_analytics(pool, influencer_id)
        .await?
        .map(AnalyticsSummary::from)
        .ok_or_else(|| anyhow::anyhow!("influencer {influencer_id} not found"))?;

    let updated = summary
        .analytics_updated_at
        .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string());

    println!("{} ({})", summary.name, summary.influencer_id);
    println!("  followers:          {}", summary.total_followers);
    println!("  total views:        {}", summary.total_views);
    println!("  total likes:        {}", summary.total_likes);
    println!("  total comments:     {}", summary.total_comments);
    println!("  engagements:        {}", summary.total_engagements);
    println!("  avg views:          {}", summary.total_avg_views);
    println!("  est. reach:         {}", summary.estimated_reach);
    println!("  est. promo views:   {}", summary.estimated_promotion_views);
    println!("  engagement rate:    {}%", summary.avg_engagement_rate);
    println!("  analytics updated:  {updated}");
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    List(Vec<InfluencerLinks>),
    Wrapped { updates: Vec<InfluencerLinks> },
}

/// Parses a batch file, either a bare list or wrapped in `{"updates": ...}`.
pub(crate) fn parse_batch_file(contents: &str) -> anyhow::Result<Vec<InfluencerLinks>> {
    let file: BatchFile = serde_json::from_str(contents)
        .map_err(|e| anyhow::anyhow!("invalid batch file: {e}"))?;
    Ok(match file {
        BatchFile::List(updates) | BatchFile::Wrapped { updates } => updates,
    })
}

fn print_skipped(skipped: &[SkippedLink]) {
    if skipped.is_empty() {
        return;
    }
    println!("  skipped {} link(s):", skipped.len());
    for link in skipped {
        tracing::debug!(url = %link.url, reason = %link.reason, "link skipped");
        println!("    {}  ({})", link.url, link.reason);
    }
}
