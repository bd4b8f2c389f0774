pub mod categorizer;
pub mod dedup;
pub mod enricher;
pub mod lexicon;
pub mod pipeline;
pub mod scorer;

pub use categorizer::{categorize, CategorizedArticles, CategoryBucket, Categorizer, OTHER_CATEGORY};
pub use dedup::{deduplicate, Deduplicator};
pub use enricher::{enrich, enrich_all};
pub use pipeline::{process, ProcessedRun};
pub use scorer::RelevanceScorer;

pub mod prelude {
    pub use super::{process, CategorizedArticles, ProcessedRun, RelevanceScorer};
    pub use mw_core::{Article, Config, Result};
}
