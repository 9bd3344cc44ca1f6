use roster_core::{ContentAnalytics, Platform};
use serde::Deserialize;
use serde_json::Value;

use super::counter::counter;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaInfo {
    #[serde(default)]
    stats: Option<Stats>,
    #[serde(default)]
    item_info: Option<ItemInfo>,
    #[serde(default)]
    item_struct: Option<ItemStruct>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemInfo {
    #[serde(default)]
    item_struct: Option<ItemStruct>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemStruct {
    #[serde(default)]
    stats: Option<Stats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    #[serde(default, deserialize_with = "counter")]
    play_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    digg_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    comment_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    share_count: Option<u64>,
}

impl MediaInfo {
    fn into_stats(self) -> Option<Stats> {
        self.stats
            .or_else(|| self.item_info.and_then(|info| info.item_struct?.stats))
            .or_else(|| self.item_struct.and_then(|item| item.stats))
    }
}

/// TikTok media info: counters live in a `stats` object, which may sit at
/// the top level or under the web item structure. Saves are not reported.
pub(super) fn extract(url: &str, raw: &Value) -> Option<ContentAnalytics> {
    let stats = MediaInfo::deserialize(raw).ok()?.into_stats()?;

    Some(ContentAnalytics {
        views: stats.play_count.unwrap_or(0),
        likes: stats.digg_count.unwrap_or(0),
        comments: stats.comment_count.unwrap_or(0),
        shares: Some(stats.share_count.unwrap_or(0)),
        saves: None,
        ..ContentAnalytics::new(Platform::TikTok, url)
    })
}
