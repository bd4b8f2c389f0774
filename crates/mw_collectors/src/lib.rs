pub mod cli;
pub mod email;
pub mod health;
pub mod imap;
pub mod logging;
pub mod manager;
pub mod rss;
pub mod scrapers;
pub mod search;

pub use cli::{collect_all, collectors_for, http_client, ScrapeCollector, SourceKind};
pub use health::check_sources_health;
pub use manager::ScrapeManager;
pub use scrapers::{Scraper, WebScraper};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use mw_core::{Article, Collector, Error, Result};
}
