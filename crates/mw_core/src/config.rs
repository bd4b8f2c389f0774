use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

pub const SMTP_PASSWORD_ENV: &str = "MW_SMTP_PASSWORD";
pub const IMAP_PASSWORD_ENV: &str = "MW_IMAP_PASSWORD";
/// Upper bound for both article age windows.
pub const MAX_AGE_WINDOW_DAYS: i64 = 3650;

/// TOML-backed configuration, loaded once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub blocklist: BlocklistConfig,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub search_agent: SearchAgentConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub version: String,
    pub log_level: String,
    pub log_dir: PathBuf,
    /// Age window of the categorizer and scraper.
    pub max_article_age_days: i64,
    /// Age window of the deduplicator, independent of `max_article_age_days`.
    pub dedup_max_age_days: i64,
    pub min_content_length: usize,
    pub deduplication_threshold: f64,
    pub max_articles_per_category: usize,
    /// Inclusion threshold for sources outside the high/low trust lists.
    pub min_relevance_score: f64,
    pub scrape_concurrency: usize,
    pub site_timeout_secs: u64,
    pub scrape_phase_timeout_secs: u64,
    pub preview_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            max_article_age_days: 2,
            dedup_max_age_days: 7,
            min_content_length: 300,
            deduplication_threshold: 0.85,
            max_articles_per_category: 10,
            min_relevance_score: 0.30,
            scrape_concurrency: 5,
            site_timeout_secs: 60,
            scrape_phase_timeout_secs: 300,
            preview_path: PathBuf::from("data/preview.html"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlocklistConfig {
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// A digest category. `name` and `keywords` are required: a half-written
/// entry is rejected at load time instead of being skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub rss: Vec<RssSource>,
    #[serde(default)]
    pub scrape: Vec<ScrapeSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RssSource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeSource {
    pub name: String,
    pub url: String,
    #[serde(default = "default_selector")]
    pub selector: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_selector() -> String {
    "a".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchAgentConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub queries: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub subject_prefix: String,
    pub primary_recipient: Option<String>,
    pub imap_enabled: bool,
    pub imap_server: Option<String>,
    pub imap_port: u16,
    pub imap_user: Option<String>,
    pub imap_password: Option<String>,
    pub imap_folder: String,
    pub smtp: SmtpConfig,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            subject_prefix: "Omvärldsbevakning".to_string(),
            primary_recipient: None,
            imap_enabled: false,
            imap_server: None,
            imap_port: 993,
            imap_user: None,
            imap_password: None,
            imap_folder: "INBOX".to_string(),
            smtp: SmtpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub server: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_email: Option<String>,
    pub from_name: String,
    pub use_tls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: 587,
            username: None,
            password: None,
            from_email: None,
            from_name: "Omvärldsbevakning".to_string(),
            use_tls: true,
        }
    }
}

impl Config {
    /// Reads, parses and validates the config file. Password environment
    /// variables take precedence over values in the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var(SMTP_PASSWORD_ENV) {
            self.email.smtp.password = Some(password);
        }
        if let Ok(password) = std::env::var(IMAP_PASSWORD_ENV) {
            self.email.imap_password = Some(password);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let app = &self.app;
        if !(app.deduplication_threshold > 0.0 && app.deduplication_threshold <= 1.0) {
            return Err(Error::Config(format!(
                "app.deduplication_threshold must be in (0, 1], got {}",
                app.deduplication_threshold
            )));
        }
        if !(0.0..=1.0).contains(&app.min_relevance_score) {
            return Err(Error::Config(format!(
                "app.min_relevance_score must be in [0, 1], got {}",
                app.min_relevance_score
            )));
        }
        if app.scrape_concurrency == 0 {
            return Err(Error::Config("app.scrape_concurrency must be at least 1".to_string()));
        }
        for (key, days) in [
            ("app.max_article_age_days", app.max_article_age_days),
            ("app.dedup_max_age_days", app.dedup_max_age_days),
        ] {
            if !(0..=MAX_AGE_WINDOW_DAYS).contains(&days) {
                return Err(Error::Config(format!(
                    "{} must be in [0, {}], got {}",
                    key, MAX_AGE_WINDOW_DAYS, days
                )));
            }
        }

        for (i, category) in self.categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(Error::Config(format!("categories[{}] has an empty name", i)));
            }
            if category.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "category '{}' has no keywords",
                    category.name
                )));
            }
        }

        for source in &self.sources.rss {
            if source.url.trim().is_empty() {
                return Err(Error::Config(format!("rss source '{}' has no url", source.name)));
            }
        }
        for source in &self.sources.scrape {
            if source.url.trim().is_empty() {
                return Err(Error::Config(format!("scrape source '{}' has no url", source.name)));
            }
        }
        Ok(())
    }

    pub fn category_icon(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.icon.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[app]
version = "2.1"
max_article_age_days = 3

[blocklist]
titles = ["Melodifestivalen"]

[[categories]]
name = "Omställning"
keywords = ["omställning", "varsel"]
icon = "🔄"

[[categories]]
name = "Scenkonst"
keywords = ["teater"]

[[sources.rss]]
name = "Sveriges Radio"
url = "https://sverigesradio.se/rss"

[[sources.scrape]]
name = "Scensverige"
url = "https://scensverige.se/nyheter"
selector = "article h2"
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.app.version, "2.1");
        assert_eq!(config.app.max_article_age_days, 3);
        assert_eq!(config.app.dedup_max_age_days, 7);
        assert_eq!(config.app.max_articles_per_category, 10);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.category_icon("Omställning"), Some("🔄"));
        assert_eq!(config.category_icon("Scenkonst"), Some(""));
        assert!(config.sources.scrape[0].enabled);
        assert_eq!(config.sources.scrape[0].selector, "article h2");
        assert!(!config.search_agent.enabled);
        assert_eq!(config.email.imap_port, 993);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.app.min_content_length, 300);
        assert_eq!(config.app.deduplication_threshold, 0.85);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_trailing_category_without_keywords_fails() {
        let toml = format!("{}\n[[categories]]\nname = \"Trasig\"\n", SAMPLE);
        let err = Config::from_toml(&toml).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_trailing_category_without_name_fails() {
        let toml = format!("{}\n[[categories]]\nkeywords = [\"x\"]\n", SAMPLE);
        assert!(matches!(Config::from_toml(&toml), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_keywords_fail() {
        let toml = "[[categories]]\nname = \"Tom\"\nkeywords = []\n";
        assert!(matches!(Config::from_toml(toml), Err(Error::Config(_))));
    }

    #[test]
    fn test_threshold_range() {
        let toml = "[app]\ndeduplication_threshold = 1.5\n";
        assert!(matches!(Config::from_toml(toml), Err(Error::Config(_))));
    }

    #[test]
    fn test_age_window_range() {
        for toml in [
            "[app]\nmax_article_age_days = 100000000\n",
            "[app]\ndedup_max_age_days = 3651\n",
            "[app]\nmax_article_age_days = -1\n",
        ] {
            assert!(matches!(Config::from_toml(toml), Err(Error::Config(_))), "{}", toml);
        }
        let config = Config::from_toml("[app]\ndedup_max_age_days = 3650\n").unwrap();
        assert_eq!(config.app.dedup_max_age_days, MAX_AGE_WINDOW_DAYS);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.sources.rss[0].name, "Sveriges Radio");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
