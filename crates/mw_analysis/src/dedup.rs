use std::collections::HashSet;

use chrono::{DateTime, Utc};
use mw_core::time::age_cutoff;
use mw_core::{Article, Config};
use tracing::{debug, info};

use crate::lexicon::{contains_any, ADVERTISING_MARKERS};

/// Removes stale, paid and duplicate articles while keeping first-seen order.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    threshold: f64,
    max_age_days: i64,
}

impl Deduplicator {
    pub fn new(threshold: f64, max_age_days: i64) -> Self {
        Self { threshold, max_age_days }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.app.deduplication_threshold, config.app.dedup_max_age_days)
    }

    pub fn deduplicate(&self, articles: Vec<Article>) -> Vec<Article> {
        self.deduplicate_at(articles, Utc::now())
    }

    pub fn deduplicate_at(&self, articles: Vec<Article>, now: DateTime<Utc>) -> Vec<Article> {
        let total = articles.len();
        let cutoff = age_cutoff(now, self.max_age_days);

        let mut old_count = 0;
        let mut fresh = Vec::with_capacity(total);
        for article in articles {
            if article.published_date < cutoff {
                old_count += 1;
                continue;
            }
            let text = format!("{} {}", article.title, article.summary).to_lowercase();
            if contains_any(&text, ADVERTISING_MARKERS) {
                debug!(title = %article.title, "Dropping advertising");
                continue;
            }
            fresh.push(article);
        }
        if old_count > 0 {
            info!("Filtered out {} articles older than {} days", old_count, self.max_age_days);
        }

        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut seen_titles: Vec<String> = Vec::new();
        let mut unique = Vec::with_capacity(fresh.len());

        for article in fresh {
            if seen_urls.contains(&article.url) {
                debug!(url = %article.url, "Duplicate URL");
                continue;
            }

            let title = article.title.to_lowercase();
            if let Some(previous) = seen_titles.iter().find(|seen| self.is_similar(&title, seen)) {
                debug!(title = %article.title, previous = %previous, "Near-duplicate title");
                continue;
            }

            seen_urls.insert(article.url.clone());
            seen_titles.push(title);
            unique.push(article);
        }

        info!("Deduplication: Reduced {} to {} articles.", total, unique.len());
        unique
    }

    pub fn is_similar(&self, a: &str, b: &str) -> bool {
        similarity(a, b) > self.threshold
    }
}

/// Normalized edit similarity in [0, 1]; 1.0 for identical strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

pub fn deduplicate(articles: Vec<Article>, config: &Config) -> Vec<Article> {
    Deduplicator::from_config(config).deduplicate(articles)
}
