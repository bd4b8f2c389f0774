use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use mw_core::{Article, Collector, Config, Error, Result};
use tracing::{info, warn};

use crate::email::EmailCollector;
use crate::manager::ScrapeManager;
use crate::rss::RssCollector;
use crate::scrapers::{Scraper, WebScraper};
use crate::search::SearchAgent;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which collectors a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceKind {
    Rss,
    Scrape,
    Search,
    Email,
    #[default]
    All,
}

impl SourceKind {
    pub fn includes(self, other: SourceKind) -> bool {
        self == SourceKind::All || self == other
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Rss => "rss",
            SourceKind::Scrape => "scrape",
            SourceKind::Search => "search",
            SourceKind::Email => "email",
            SourceKind::All => "all",
        };
        f.write_str(name)
    }
}

/// Shared HTTP client with a desktop User-Agent; following redirects is the
/// reqwest default.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(CLIENT_TIMEOUT)
        .build()
        .map_err(Error::Http)
}

/// Web scraping as a collector: one `WebScraper` per enabled site, run
/// through the bounded manager.
pub struct ScrapeCollector {
    scrapers: Vec<Arc<dyn Scraper>>,
    manager: ScrapeManager,
}

impl ScrapeCollector {
    pub fn from_config(config: &Config, client: &reqwest::Client) -> Self {
        let scrapers = config
            .sources
            .scrape
            .iter()
            .filter(|site| site.enabled)
            .map(|site| Arc::new(WebScraper::new(site.clone(), config, client.clone())) as Arc<dyn Scraper>)
            .collect();
        Self {
            scrapers,
            manager: ScrapeManager::from_config(config),
        }
    }
}

#[async_trait::async_trait]
impl Collector for ScrapeCollector {
    fn name(&self) -> &str {
        "scrape"
    }

    async fn collect(&self) -> Result<Vec<Article>> {
        if self.scrapers.is_empty() {
            warn!("No scrape sources configured.");
            return Ok(Vec::new());
        }
        let articles = self.manager.scrape_all(self.scrapers.clone()).await;
        info!("Collected {} valid articles from web scraping.", articles.len());
        Ok(articles)
    }
}

/// Collectors selected by `kind`, in the fixed order rss, scrape, email,
/// search.
pub fn collectors_for(config: &Config, kind: SourceKind, client: &reqwest::Client) -> Vec<Box<dyn Collector>> {
    let mut collectors: Vec<Box<dyn Collector>> = Vec::new();
    if kind.includes(SourceKind::Rss) {
        collectors.push(Box::new(RssCollector::new(config.sources.rss.clone(), client.clone())));
    }
    if kind.includes(SourceKind::Scrape) {
        collectors.push(Box::new(ScrapeCollector::from_config(config, client)));
    }
    if kind.includes(SourceKind::Email) {
        collectors.push(Box::new(EmailCollector::from_config(&config.email)));
    }
    if kind.includes(SourceKind::Search) {
        collectors.push(Box::new(SearchAgent::new(&config.search_agent, client.clone())));
    }
    collectors
}

/// Runs the selected collectors one after another. A failing collector is
/// logged and contributes nothing.
pub async fn collect_all(config: &Config, kind: SourceKind, client: &reqwest::Client) -> Vec<Article> {
    let mut articles = Vec::new();
    for collector in collectors_for(config, kind, client) {
        match collector.collect().await {
            Ok(found) => {
                info!(collector = collector.name(), count = found.len(), "Collector finished");
                articles.extend(found);
            }
            Err(e) => warn!(collector = collector.name(), error = %e, "Collector failed"),
        }
    }
    articles
}
