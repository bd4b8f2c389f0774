use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mw_core::config::SearchAgentConfig;
use mw_core::{Article, Collector, Error, Result};
use tracing::{info, warn};
use url::Url;

pub const GOOGLE_NEWS_SEARCH: &str = "https://news.google.com/rss/search";
pub const RESULTS_PER_QUERY: usize = 5;
const DEFAULT_PUBLISHER: &str = "Google News";

/// Active search over Google News RSS, restricted to the last day and to
/// Swedish results.
pub struct SearchAgent {
    queries: Vec<String>,
    client: reqwest::Client,
}

impl SearchAgent {
    pub fn new(config: &SearchAgentConfig, client: reqwest::Client) -> Self {
        let queries = if config.enabled {
            config.queries.clone()
        } else {
            Vec::new()
        };
        Self { queries, client }
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>> {
        let url = search_url(query)?;
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Error::from_request)?
            .error_for_status()?
            .bytes()
            .await?;
        parse_results(&bytes, query, Utc::now())
    }
}

pub fn search_url(query: &str) -> Result<Url> {
    let q = format!("{} when:1d", query);
    Url::parse_with_params(
        GOOGLE_NEWS_SEARCH,
        &[("q", q.as_str()), ("hl", "sv"), ("gl", "SE"), ("ceid", "SE:sv")],
    )
    .map_err(|e| Error::InvalidUrl(e.to_string()))
}

/// Google News titles end in " - Publisher".
pub fn publisher_from_title(title: &str) -> &str {
    title
        .rsplit_once(" - ")
        .map(|(_, publisher)| publisher.trim())
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PUBLISHER)
}

pub fn parse_results(bytes: &[u8], query: &str, now: DateTime<Utc>) -> Result<Vec<Article>> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|e| Error::Feed(format!("search '{}': {}", query, e)))?;

    Ok(feed
        .entries
        .into_iter()
        .take(RESULTS_PER_QUERY)
        .filter_map(|entry| {
            let url = entry.links.first().map(|l| l.href.clone())?;
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let source = format!("{} (via Google News)", publisher_from_title(&title));
            let published = entry.published.or(entry.updated).unwrap_or(now);
            Some(
                Article::new(
                    title,
                    url,
                    source,
                    published,
                    format!("Found via search for: {}", query),
                )
                .with_found_via(format!("Google News: '{}'", query)),
            )
        })
        .collect())
}

#[async_trait]
impl Collector for SearchAgent {
    fn name(&self) -> &str {
        "search"
    }

    async fn collect(&self) -> Result<Vec<Article>> {
        if self.queries.is_empty() {
            return Ok(Vec::new());
        }

        info!("Agent: Starting active search...");
        let mut articles = Vec::new();
        for query in &self.queries {
            info!(query = %query, "Agent: Searching");
            match self.search(query).await {
                Ok(found) => articles.extend(found),
                Err(e) => warn!(query = %query, error = %e, "Google News search failed"),
            }
        }
        info!("Agent: Found {} articles via active search.", articles.len());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RESULTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>"omställning" - Google News</title>
<item>
  <title>Teatrar varslar personal - Dagens Nyheter</title>
  <link>https://news.google.com/rss/articles/abc</link>
  <pubDate>Mon, 03 Mar 2025 06:00:00 GMT</pubDate>
</item>
<item>
  <title>Rubrik utan publicist</title>
  <link>https://news.google.com/rss/articles/def</link>
</item>
</channel></rss>"#;

    #[test]
    fn test_search_url() {
        let url = search_url("omställning scenkonst").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(url.host_str(), Some("news.google.com"));
        assert_eq!(pairs[0], ("q".to_string(), "omställning scenkonst when:1d".to_string()));
        assert!(pairs.contains(&("ceid".to_string(), "SE:sv".to_string())));
    }

    #[test]
    fn test_publisher_from_title() {
        assert_eq!(publisher_from_title("Varsel på operan - SVT Nyheter"), "SVT Nyheter");
        assert_eq!(publisher_from_title("A - B - Sydsvenskan"), "Sydsvenskan");
        assert_eq!(publisher_from_title("Ingen publicist"), "Google News");
    }

    #[test]
    fn test_parse_results() {
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        let articles = parse_results(RESULTS.as_bytes(), "varsel teater", now).unwrap();
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.source, "Dagens Nyheter (via Google News)");
        assert_eq!(first.summary, "Found via search for: varsel teater");
        assert_eq!(first.found_via.as_deref(), Some("Google News: 'varsel teater'"));
        assert_eq!(first.relevance_score, 0.0);
        assert!(first.body_text.is_empty());

        assert_eq!(articles[1].source, "Google News (via Google News)");
        assert_eq!(articles[1].published_date, now);
    }

    #[test]
    fn test_disabled_agent_has_no_queries() {
        let config = SearchAgentConfig {
            enabled: false,
            queries: vec!["x".to_string()],
        };
        let agent = SearchAgent::new(&config, reqwest::Client::new());
        assert!(agent.queries.is_empty());
    }
}
