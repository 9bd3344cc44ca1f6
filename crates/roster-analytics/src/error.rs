use roster_db::DbError;
use thiserror::Error;

/// Failures that abort an analytics update.
///
/// Per-link fetch and extraction problems never surface here; they become
/// [`crate::SkipReason`]s instead.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("failed to persist analytics: {0}")]
    Db(#[from] DbError),
}
