mod analytics;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::analytics::AnalyticsCommands;

#[derive(Debug, Parser)]
#[command(name = "roster-cli")]
#[command(about = "Roster influencer analytics command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Content-link analytics
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("roster-cli: run with --help to list commands");
        return Ok(());
    };

    let config = roster_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = roster_db::PoolConfig::from_app_config(&config);
    let pool = roster_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            roster_db::health_check(&pool).await?;
            println!("database ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = roster_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} new migration(s)");
        }
        Commands::Analytics { command } => {
            analytics::run(&pool, &config, command).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
