use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mw_core::config::RssSource;
use mw_core::{truncate_chars, Article, Collector, Error, Result};
use tracing::{info, warn};

pub const MAX_ENTRIES_PER_FEED: usize = 10;
pub const MAX_SUMMARY_CHARS: usize = 500;
const UNTITLED: &str = "No Title";

pub struct RssCollector {
    feeds: Vec<RssSource>,
    client: reqwest::Client,
}

impl RssCollector {
    pub fn new(feeds: Vec<RssSource>, client: reqwest::Client) -> Self {
        Self { feeds, client }
    }

    async fn fetch_feed(&self, feed: &RssSource) -> Result<Vec<Article>> {
        let bytes = self
            .client
            .get(&feed.url)
            .send()
            .await
            .map_err(Error::from_request)?
            .error_for_status()?
            .bytes()
            .await?;
        parse_feed(&bytes, &feed.name, Utc::now())
    }
}

/// Turns a feed document into articles. Entries without a link are skipped;
/// undated entries get `now`.
pub fn parse_feed(bytes: &[u8], source: &str, now: DateTime<Utc>) -> Result<Vec<Article>> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| Error::Feed(format!("{}: {}", source, e)))?;

    let articles = feed
        .entries
        .into_iter()
        .take(MAX_ENTRIES_PER_FEED)
        .filter_map(|entry| {
            let url = entry.links.first().map(|l| l.href.clone())?;
            if url.trim().is_empty() {
                return None;
            }
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            let summary = entry
                .summary
                .map(|s| s.content)
                .filter(|s| !s.trim().is_empty())
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            let published = entry.published.or(entry.updated).unwrap_or(now);

            Some(Article::new(
                title,
                url,
                source,
                published,
                truncate_chars(&summary, MAX_SUMMARY_CHARS),
            ))
        })
        .collect();
    Ok(articles)
}

#[async_trait]
impl Collector for RssCollector {
    fn name(&self) -> &str {
        "rss"
    }

    async fn collect(&self) -> Result<Vec<Article>> {
        if self.feeds.is_empty() {
            warn!("No RSS feeds configured.");
            return Ok(Vec::new());
        }

        let mut articles = Vec::new();
        for feed in &self.feeds {
            info!(source = %feed.name, url = %feed.url, "Fetching RSS feed");
            match self.fetch_feed(feed).await {
                Ok(found) => articles.extend(found),
                Err(e) => warn!(source = %feed.name, error = %e, "Failed to fetch feed"),
            }
        }
        info!("Collected {} articles from RSS feeds.", articles.len());
        Ok(articles)
    }
}
