use std::sync::Arc;
use std::time::Duration;

use mw_core::{Article, Config};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, warn};

use crate::logging::SiteLogger;
use crate::scrapers::Scraper;

pub const MAX_ARTICLES_PER_SITE: usize = 5;
pub const MAX_CONSECUTIVE_TIMEOUTS: u32 = 3;

type SharedScraper = Arc<dyn Scraper>;

/// Aborts the wrapped task when dropped, so aborting a supervisor also
/// stops its worker.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs site scrapers on a bounded pool. Every site gets a supervising task
/// that enforces the per-site timeout; the whole phase is bounded as well.
#[derive(Debug, Clone)]
pub struct ScrapeManager {
    concurrency: usize,
    site_timeout: Duration,
    phase_timeout: Duration,
    max_articles_per_site: usize,
}

impl ScrapeManager {
    pub fn new(concurrency: usize, site_timeout: Duration, phase_timeout: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            site_timeout,
            phase_timeout,
            max_articles_per_site: MAX_ARTICLES_PER_SITE,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.app.scrape_concurrency,
            Duration::from_secs(config.app.site_timeout_secs),
            Duration::from_secs(config.app.scrape_phase_timeout_secs),
        )
    }

    pub fn with_max_articles_per_site(mut self, max: usize) -> Self {
        self.max_articles_per_site = max;
        self
    }

    /// Scrapes every site and returns the articles grouped by site in
    /// completion order. Sites still running when the phase deadline passes
    /// contribute nothing.
    pub async fn scrape_all(&self, scrapers: Vec<SharedScraper>) -> Vec<Article> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut supervisors = JoinSet::new();
        let site_count = scrapers.len();

        for scraper in scrapers {
            let semaphore = semaphore.clone();
            let site_timeout = self.site_timeout;
            let max = self.max_articles_per_site;
            supervisors.spawn(async move {
                // acquire before starting the clock so queued sites are not
                // charged for waiting
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (scraper.source().to_string(), Vec::new());
                };
                supervise(scraper, site_timeout, max).await
            });
        }

        let mut articles = Vec::new();
        let mut finished = 0usize;
        let deadline = tokio::time::sleep(self.phase_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                joined = supervisors.join_next() => match joined {
                    Some(Ok((site, site_articles))) => {
                        finished += 1;
                        info!(site = %site, count = site_articles.len(), "Site finished");
                        articles.extend(site_articles);
                    }
                    Some(Err(e)) => {
                        finished += 1;
                        warn!(error = %e, "Site supervisor failed");
                    }
                    None => break,
                },
                _ = &mut deadline => {
                    warn!(
                        unfinished = site_count - finished,
                        "Scrape phase timed out after {:?}, aborting remaining sites",
                        self.phase_timeout
                    );
                    supervisors.abort_all();
                    break;
                }
            }
        }

        info!(sites = site_count, articles = articles.len(), "Scrape phase finished");
        articles
    }
}

/// Drains the worker's channel until it closes or the site deadline passes.
/// On timeout the worker is aborted and whatever it already sent is kept.
async fn supervise(scraper: SharedScraper, timeout: Duration, max: usize) -> (String, Vec<Article>) {
    let site = scraper.source().to_string();
    let logger = SiteLogger::new(&site);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let worker = AbortOnDrop(tokio::spawn(run_site(scraper, tx, max)));

    let mut articles = Vec::new();
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(article) => articles.push(article),
                None => break,
            },
            _ = &mut deadline => {
                worker.0.abort();
                while let Ok(article) = rx.try_recv() {
                    articles.push(article);
                }
                logger.warn(&format!(
                    "Timed out after {:?}, keeping {} articles",
                    timeout,
                    articles.len()
                ));
                break;
            }
        }
    }

    (site, articles)
}

async fn run_site(scraper: SharedScraper, tx: mpsc::UnboundedSender<Article>, max: usize) {
    let logger = SiteLogger::new(scraper.source());
    let links = match scraper.get_article_urls().await {
        Ok(links) => links,
        Err(e) => {
            logger.warn(&format!("Failed to load listing: {}", e));
            return;
        }
    };

    let mut sent = 0usize;
    let mut consecutive_timeouts = 0u32;
    for link in links {
        if sent >= max {
            break;
        }
        if consecutive_timeouts >= MAX_CONSECUTIVE_TIMEOUTS {
            logger.warn("Skipping remaining links after repeated timeouts");
            break;
        }

        match scraper.scrape_article(&link).await {
            Ok(Some(article)) => {
                consecutive_timeouts = 0;
                if tx.send(article).is_err() {
                    return;
                }
                sent += 1;
            }
            Ok(None) => consecutive_timeouts = 0,
            Err(e) if e.is_timeout() => {
                consecutive_timeouts += 1;
                logger.warn(&format!(
                    "Timeout fetching {} ({}/{})",
                    link.url, consecutive_timeouts, MAX_CONSECUTIVE_TIMEOUTS
                ));
            }
            Err(e) => logger.debug(&format!("Failed to fetch {}: {}", link.url, e)),
        }
    }
    logger.info(&format!("Collected {} articles", sent));
}
