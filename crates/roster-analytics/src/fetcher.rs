//! The media-fetching seam between the pipeline and the data provider.

use async_trait::async_trait;
use roster_core::Platform;
use roster_modash::{ModashClient, ModashError};
use serde_json::Value;

/// Fetches the raw provider payload for one post.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Returns the platform-specific JSON describing the post at `url`.
    async fn fetch_media(&self, platform: Platform, url: &str) -> Result<Value, ModashError>;
}

#[async_trait]
impl MediaFetcher for ModashClient {
    async fn fetch_media(&self, platform: Platform, url: &str) -> Result<Value, ModashError> {
        self.get_media_info(platform, url).await
    }
}
