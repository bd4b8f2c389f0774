use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Article,
    Pdf,
    Video,
    PressRelease,
    Podcast,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Pdf => "pdf",
            ContentType::Video => "video",
            ContentType::PressRelease => "press_release",
            ContentType::Podcast => "podcast",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news item as it flows through collection, enrichment, dedup and
/// categorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_date: DateTime<Utc>,
    pub summary: String,
    #[serde(default)]
    pub body_text: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default = "default_read_time")]
    pub estimated_read_time: u32,
    #[serde(default)]
    pub found_via: Option<String>,
}

fn default_read_time() -> u32 {
    1
}

impl Article {
    /// Creates a raw article the way collectors hand them over: everything
    /// derived is left at its default until the enricher runs.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        published_date: DateTime<Utc>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: source.into(),
            published_date,
            summary: summary.into(),
            body_text: String::new(),
            content_type: ContentType::Article,
            category: None,
            relevance_score: 0.0,
            organization: None,
            domain: None,
            estimated_read_time: 1,
            found_via: None,
        }
    }

    pub fn with_body(mut self, body_text: impl Into<String>) -> Self {
        self.body_text = body_text.into();
        self
    }

    pub fn with_found_via(mut self, found_via: impl Into<String>) -> Self {
        self.found_via = Some(found_via.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub url: String,
    pub healthy: bool,
}

/// Reachability of every configured source, keyed by source name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHealthReport {
    pub rss: BTreeMap<String, SourceStatus>,
    pub scrape: BTreeMap<String, SourceStatus>,
}

impl SourceHealthReport {
    pub fn total(&self) -> usize {
        self.rss.len() + self.scrape.len()
    }

    pub fn healthy(&self) -> usize {
        self.rss
            .values()
            .chain(self.scrape.values())
            .filter(|s| s.healthy)
            .count()
    }
}
