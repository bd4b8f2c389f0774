use chrono::{DateTime, Utc};
use mw_core::config::{BlocklistConfig, CategoryConfig};
use mw_core::time::age_cutoff;
use mw_core::{Article, Config};
use serde::Serialize;
use tracing::{debug, info};

use crate::lexicon::{contains_any, CONCEPT_CLUSTERS, HIGH_TRUST_DOMAINS, LOW_TRUST_DOMAINS};
use crate::scorer::RelevanceScorer;

pub const OTHER_CATEGORY: &str = "Other";
pub const OTHER_ICON: &str = "📌";

const HIGH_TRUST_THRESHOLD: f64 = 0.1;
const LOW_TRUST_THRESHOLD: f64 = 0.50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub name: String,
    pub icon: String,
    pub articles: Vec<Article>,
}

/// Buckets in configuration order, followed by the catch-all bucket unless
/// the configuration already defines one named `Other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorizedArticles {
    pub categories: Vec<CategoryBucket>,
}

impl CategorizedArticles {
    pub fn get(&self, name: &str) -> Option<&CategoryBucket> {
        self.categories.iter().find(|b| b.name == name)
    }

    pub fn non_empty(&self) -> impl Iterator<Item = &CategoryBucket> {
        self.categories.iter().filter(|b| !b.articles.is_empty())
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(|b| b.articles.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Rejection {
    Blocked,
    TooOld,
    TooThin,
    Irrelevant(f64, String),
}

#[derive(Debug, Clone)]
pub struct Categorizer {
    categories: Vec<CategoryConfig>,
    blocklist: BlocklistConfig,
    max_age_days: i64,
    min_content_length: usize,
    max_per_category: usize,
    min_relevance_score: f64,
    scorer: RelevanceScorer,
}

impl Categorizer {
    pub fn from_config(config: &Config) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|c| CategoryConfig {
                name: c.name.clone(),
                keywords: c
                    .keywords
                    .iter()
                    .filter(|k| !k.trim().is_empty())
                    .map(|k| k.to_lowercase())
                    .collect(),
                icon: c.icon.clone(),
            })
            .collect();

        Self {
            categories,
            blocklist: BlocklistConfig {
                titles: lowercase_all(&config.blocklist.titles),
                urls: lowercase_all(&config.blocklist.urls),
            },
            max_age_days: config.app.max_article_age_days,
            min_content_length: config.app.min_content_length,
            max_per_category: config.app.max_articles_per_category,
            min_relevance_score: config.app.min_relevance_score,
            scorer: RelevanceScorer::new(),
        }
    }

    pub fn categorize(&self, articles: Vec<Article>) -> CategorizedArticles {
        self.categorize_at(articles, Utc::now())
    }

    pub fn categorize_at(&self, articles: Vec<Article>, now: DateTime<Utc>) -> CategorizedArticles {
        let mut buckets: Vec<CategoryBucket> = self
            .categories
            .iter()
            .map(|c| CategoryBucket {
                name: c.name.clone(),
                icon: c.icon.clone(),
                articles: Vec::new(),
            })
            .collect();
        let other = match buckets.iter().position(|b| b.name == OTHER_CATEGORY) {
            Some(index) => {
                if buckets[index].icon.is_empty() {
                    buckets[index].icon = OTHER_ICON.to_string();
                }
                index
            }
            None => {
                buckets.push(CategoryBucket {
                    name: OTHER_CATEGORY.to_string(),
                    icon: OTHER_ICON.to_string(),
                    articles: Vec::new(),
                });
                buckets.len() - 1
            }
        };

        let cutoff = age_cutoff(now, self.max_age_days);
        let mut excluded = 0usize;

        for mut article in articles {
            match self.check(&article, cutoff) {
                Ok(score) => {
                    article.relevance_score = score;
                    let index = self.category_index(&article).unwrap_or(other);
                    let bucket = &mut buckets[index];
                    info!(
                        title = %article.title,
                        score = %format!("{:.2}", score),
                        category = %bucket.name,
                        "Included"
                    );
                    article.category = Some(bucket.name.clone());
                    bucket.articles.push(article);
                }
                Err(rejection) => {
                    excluded += 1;
                    match rejection {
                        Rejection::Irrelevant(score, reason) => info!(
                            title = %article.title,
                            score = %format!("{:.2}", score),
                            reason = %reason,
                            "Excluded"
                        ),
                        rejection => debug!(title = %article.title, reason = ?rejection, "Excluded"),
                    }
                }
            }
        }

        for bucket in buckets.iter_mut() {
            bucket.articles.sort_by(|a, b| b.published_date.cmp(&a.published_date));
            bucket.articles.truncate(self.max_per_category);
        }

        let result = CategorizedArticles { categories: buckets };
        info!(kept = result.total(), excluded, "Categorization finished");
        result
    }

    fn check(&self, article: &Article, cutoff: DateTime<Utc>) -> Result<f64, Rejection> {
        let title = article.title.to_lowercase();
        let url = article.url.to_lowercase();
        if self.blocklist.titles.iter().any(|t| title.contains(t.as_str()))
            || self.blocklist.urls.iter().any(|u| url.contains(u.as_str()))
        {
            return Err(Rejection::Blocked);
        }

        if article.published_date < cutoff {
            return Err(Rejection::TooOld);
        }

        let length = article.body_text.chars().count();
        if length > 0 && length < self.min_content_length {
            return Err(Rejection::TooThin);
        }

        let (score, reason) = self.scorer.calculate_relevance(article);
        let domain = article.domain.as_deref().unwrap_or_default();
        if !self.should_include(score, domain) {
            return Err(Rejection::Irrelevant(score, reason));
        }
        Ok(score)
    }

    /// Tiered inclusion: high-trust domains need 0.1, low-trust 0.5, anything
    /// else the configured minimum.
    pub fn should_include(&self, score: f64, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        if contains_any(&domain, HIGH_TRUST_DOMAINS) {
            score >= HIGH_TRUST_THRESHOLD
        } else if contains_any(&domain, LOW_TRUST_DOMAINS) {
            score >= LOW_TRUST_THRESHOLD
        } else {
            score >= self.min_relevance_score
        }
    }

    /// Index of the matching configured category; `None` means catch-all.
    fn category_index(&self, article: &Article) -> Option<usize> {
        let text = format!("{} {}", article.title, article.summary).to_lowercase();

        if let Some(index) = self
            .categories
            .iter()
            .position(|c| c.keywords.iter().any(|k| text.contains(k.as_str())))
        {
            return Some(index);
        }

        for (cluster, terms) in CONCEPT_CLUSTERS {
            if contains_any(&text, terms) {
                if let Some(index) = self.categories.iter().position(|c| c.name == *cluster) {
                    return Some(index);
                }
            }
        }

        None
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

pub fn categorize(articles: Vec<Article>, config: &Config) -> CategorizedArticles {
    Categorizer::from_config(config).categorize(articles)
}
