use roster_core::{ContentAnalytics, Platform};
use serde::Deserialize;
use serde_json::Value;

use super::counter::counter;

#[derive(Debug, Default, Deserialize)]
struct PostInfo {
    #[serde(default)]
    items: Option<Vec<PostItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct PostItem {
    #[serde(default, deserialize_with = "counter")]
    play_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    view_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    video_view_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    like_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    comment_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    share_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    save_count: Option<u64>,
}

/// Instagram post info: counters live on the first entry of `items`.
pub(super) fn extract(url: &str, raw: &Value) -> Option<ContentAnalytics> {
    let info = PostInfo::deserialize(raw).ok()?;
    let item = info.items?.into_iter().next()?;

    Some(ContentAnalytics {
        // Reels report plays, older videos report views.
        views: item
            .play_count
            .or(item.view_count)
            .or(item.video_view_count)
            .unwrap_or(0),
        likes: item.like_count.unwrap_or(0),
        comments: item.comment_count.unwrap_or(0),
        shares: item.share_count,
        saves: item.save_count,
        ..ContentAnalytics::new(Platform::Instagram, url)
    })
}
