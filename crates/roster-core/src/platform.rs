//! Social platform tags and URL classification.
//!
//! Classification is host-based: the URL is parsed with WHATWG rules and its
//! host is matched against each platform's known domains (the bare domain or
//! any subdomain of it).

use serde::{Deserialize, Serialize};
use url::Url;

/// A social platform whose post metrics can be fetched and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    #[serde(rename = "tiktok")]
    TikTok,
    #[serde(rename = "youtube")]
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::TikTok, Platform::YouTube];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }

    fn domains(self) -> &'static [&'static str] {
        match self {
            Platform::Instagram => &["instagram.com", "instagr.am"],
            Platform::TikTok => &["tiktok.com"],
            Platform::YouTube => &["youtube.com", "youtu.be"],
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Determine which platform a post URL belongs to.
///
/// Returns `None` ("unknown") for anything that is not a recognized
/// Instagram, `TikTok` or `YouTube` host. Never fails.
#[must_use]
pub fn detect_platform_from_url(url: &str) -> Option<Platform> {
    let host = extract_host(url)?;
    Platform::ALL.into_iter().find(|platform| {
        platform
            .domains()
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    })
}

fn extract_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed
        .host_str()?
        .trim_end_matches('.')
        .to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}
