use mw_core::{Article, Config};
use tracing::{info, warn};

use crate::categorizer::{CategorizedArticles, Categorizer};
use crate::dedup::Deduplicator;
use crate::enricher::enrich_all;

/// Output of one processing run.
#[derive(Debug, Clone, Default)]
pub struct ProcessedRun {
    pub categorized: CategorizedArticles,
    /// Flat deduplicated list, before relevance filtering.
    pub articles: Vec<Article>,
}

/// enrich → drop URL-less articles → deduplicate → categorize
pub fn process(articles: Vec<Article>, config: &Config) -> ProcessedRun {
    let collected = articles.len();
    let enriched = enrich_all(articles);

    let valid: Vec<Article> = enriched
        .into_iter()
        .filter(|a| {
            if a.url.trim().is_empty() {
                warn!(title = %a.title, source = %a.source, "Dropping article without URL");
                false
            } else {
                true
            }
        })
        .collect();

    let unique = Deduplicator::from_config(config).deduplicate(valid);
    let categorized = Categorizer::from_config(config).categorize(unique.clone());

    info!(
        collected,
        unique = unique.len(),
        categorized = categorized.total(),
        "Processing finished"
    );
    ProcessedRun {
        categorized,
        articles: unique,
    }
}
