use roster_core::{ContentAnalytics, Platform};
use serde::Deserialize;
use serde_json::Value;

use super::counter::counter;

#[derive(Debug, Default, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    statistics: Option<Statistics>,
    #[serde(default)]
    items: Option<Vec<VideoItem>>,
    #[serde(default, deserialize_with = "counter")]
    view_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    like_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    comment_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    views: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    likes: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    comments: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoItem {
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default, deserialize_with = "counter")]
    view_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    like_count: Option<u64>,
    #[serde(default, deserialize_with = "counter")]
    comment_count: Option<u64>,
}

impl VideoInfo {
    fn into_statistics(self) -> Option<Statistics> {
        if let Some(statistics) = self.statistics {
            return Some(statistics);
        }
        if let Some(statistics) = self
            .items
            .and_then(|items| items.into_iter().next())
            .and_then(|item| item.statistics)
        {
            return Some(statistics);
        }

        let flat = Statistics {
            view_count: self.view_count.or(self.views),
            like_count: self.like_count.or(self.likes),
            comment_count: self.comment_count.or(self.comments),
        };
        let any = flat.view_count.is_some()
            || flat.like_count.is_some()
            || flat.comment_count.is_some();
        any.then_some(flat)
    }
}

/// YouTube video info: a `statistics` object (Data API style, counters as
/// strings) or a flat shape. Shares and saves are not reported.
pub(super) fn extract(url: &str, raw: &Value) -> Option<ContentAnalytics> {
    let statistics = VideoInfo::deserialize(raw).ok()?.into_statistics()?;

    Some(ContentAnalytics {
        views: statistics.view_count.unwrap_or(0),
        likes: statistics.like_count.unwrap_or(0),
        comments: statistics.comment_count.unwrap_or(0),
        shares: None,
        saves: None,
        ..ContentAnalytics::new(Platform::YouTube, url)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    #[test]
    fn reads_statistics_object_with_string_counters() {
        let raw = json!({
            "statistics": { "viewCount": "150000", "likeCount": "7000", "commentCount": "800" }
        });
        let record = extract(URL, &raw).unwrap();
        assert_eq!(record.platform, Platform::YouTube);
        assert_eq!(record.views, 150_000);
        assert_eq!(record.likes, 7_000);
        assert_eq!(record.comments, 800);
        assert_eq!(record.shares, None);
        assert_eq!(record.saves, None);
    }

    #[test]
    fn reads_statistics_under_first_item() {
        let raw = json!({ "items": [{ "statistics": { "viewCount": 10, "likeCount": 2 } }] });
        let record = extract(URL, &raw).unwrap();
        assert_eq!(record.views, 10);
        assert_eq!(record.likes, 2);
        assert_eq!(record.comments, 0);
    }

    #[test]
    fn reads_flat_shapes() {
        let raw = json!({ "view_count": 900, "like_count": 45, "comment_count": 3 });
        let record = extract(URL, &raw).unwrap();
        assert_eq!((record.views, record.likes, record.comments), (900, 45, 3));

        let raw = json!({ "views": "12", "likes": 1 });
        let record = extract(URL, &raw).unwrap();
        assert_eq!((record.views, record.likes, record.comments), (12, 1, 0));
    }

    #[test]
    fn no_metric_container_yields_nothing() {
        assert!(extract(URL, &json!({})).is_none());
        assert!(extract(URL, &json!({ "title": "a video" })).is_none());
        assert!(extract(URL, &json!({ "items": [] })).is_none());
    }
}
