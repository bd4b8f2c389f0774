use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mw_core::config::ScrapeSource;
use mw_core::{Article, Config, Error, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::logging::SiteLogger;

pub mod jsonld;

pub const LISTING_TIMEOUT: Duration = Duration::from_secs(15);
pub const ARTICLE_TIMEOUT: Duration = Duration::from_secs(5);
pub const LISTING_ATTEMPTS: u32 = 3;
pub const MIN_TITLE_CHARS: usize = 15;
pub const SUMMARY_CHARS: usize = 200;

/// Site sections that never hold news.
pub const BLOCKED_PATHS: &[&str] = &[
    "/medlem",
    "/om-oss",
    "/om-forbundet",
    "/om-scen-film",
    "/kontakt",
    "/integritet",
    "/cookies",
    "/tillganglighet",
    "/logga-in",
    "/mina-sidor",
    "/faktabanken",
    "/upphovsratt",
    "/yrkesavdelningar",
    "/kurser",
    "/kalender",
    "/pressrum",
    "/press",
    "/media",
    "/kollektivavtal",
    "/medlemsformaner",
    "/stipendier",
    "/sok-stipendium",
];

const META_DATE_SELECTORS: &[&str] = &[
    "meta[property='article:published_time']",
    "meta[name='article:published_time']",
    "meta[name='date']",
    "meta[name='DC.date.issued']",
    "meta[name='pubdate']",
    "meta[property='og:published_time']",
];

/// A link found on a listing page, not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    pub url: String,
    pub title: String,
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the name of the site
    fn source(&self) -> &str;

    /// Returns candidate article links from the listing page
    async fn get_article_urls(&self) -> Result<Vec<ArticleLink>>;

    /// Fetches and validates one candidate. `Ok(None)` means the page was
    /// reachable but is not a usable article (undated, stale or thin).
    async fn scrape_article(&self, link: &ArticleLink) -> Result<Option<Article>>;
}

/// Config-driven scraper for one `[[sources.scrape]]` entry.
#[derive(Debug, Clone)]
pub struct WebScraper {
    site: ScrapeSource,
    client: reqwest::Client,
    title_blocklist: Vec<String>,
    max_age_days: i64,
    min_content_length: usize,
    logger: SiteLogger,
}

impl WebScraper {
    pub fn new(site: ScrapeSource, config: &Config, client: reqwest::Client) -> Self {
        let logger = SiteLogger::new(&site.name);
        Self {
            site,
            client,
            title_blocklist: config
                .blocklist
                .titles
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            max_age_days: config.app.max_article_age_days,
            min_content_length: config.app.min_content_length,
            logger,
        }
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(Error::from_request)?
            .error_for_status()?;
        response.text().await.map_err(Error::from_request)
    }

    /// Listing fetch with retries on transport errors and 5xx, backing off
    /// 1s then 2s.
    async fn fetch_listing(&self) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch(&self.site.url, LISTING_TIMEOUT).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < LISTING_ATTEMPTS && is_retryable(&e) => {
                    self.logger
                        .warn(&format!("Listing fetch failed (attempt {}): {}", attempt, e));
                    tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_retryable(err: &Error) -> bool {
    match err {
        Error::Timeout(_) => true,
        Error::Http(e) => e.status().map_or(true, |s| s.is_server_error()),
        _ => false,
    }
}

#[async_trait]
impl Scraper for WebScraper {
    fn source(&self) -> &str {
        &self.site.name
    }

    async fn get_article_urls(&self) -> Result<Vec<ArticleLink>> {
        let html = self.fetch_listing().await?;
        let links = utils::extract_links(&html, &self.site.url, &self.site.selector, &self.title_blocklist)?;
        self.logger.info(&format!("Found {} candidate links", links.len()));
        Ok(links)
    }

    async fn scrape_article(&self, link: &ArticleLink) -> Result<Option<Article>> {
        let html = self.fetch(&link.url, ARTICLE_TIMEOUT).await?;
        let cutoff = mw_core::time::age_cutoff(Utc::now(), self.max_age_days);
        let article = utils::parse_article(&html, link, &self.site.name, cutoff, self.min_content_length);
        if article.is_none() {
            self.logger.debug(&format!("Skipping {}", link.url));
        }
        Ok(article)
    }
}

/// Common utilities for scrapers
pub mod utils {
    use super::*;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| Error::Scraping(format!("Invalid selector '{}': {:?}", selector, e)))
    }

    /// Only absolute http(s) links qualify for a deep fetch.
    pub fn is_valid_deep_link(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    pub fn is_relevant_path(url: &Url) -> bool {
        let path = url.path().to_lowercase();
        !BLOCKED_PATHS.iter().any(|blocked| path.starts_with(blocked))
    }

    pub fn element_text(element: ElementRef<'_>) -> String {
        element
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Applies `selector` to a listing page and returns candidate links in
    /// document order, without duplicates.
    pub fn extract_links(
        html: &str,
        base_url: &str,
        selector: &str,
        title_blocklist: &[String],
    ) -> Result<Vec<ArticleLink>> {
        let base = parse_url(base_url)?;
        let selector = parse_selector(selector)?;
        let anchor = parse_selector("a")?;
        let document = Html::parse_document(html);

        let mut links: Vec<ArticleLink> = Vec::new();
        for element in document.select(&selector) {
            let link = if element.value().name() == "a" {
                Some(element)
            } else {
                element.select(&anchor).next()
            };
            let Some(link) = link else { continue };
            let Some(href) = link.value().attr("href") else { continue };
            let Ok(url) = base.join(href.trim()) else { continue };

            if !is_valid_deep_link(&url) || !is_relevant_path(&url) {
                continue;
            }

            let title = element_text(link);
            if title.chars().count() < MIN_TITLE_CHARS {
                continue;
            }
            let lowered = title.to_lowercase();
            if title_blocklist.iter().any(|t| lowered.contains(t.as_str())) {
                continue;
            }

            let url = url.to_string();
            if links.iter().any(|l| l.url == url) {
                continue;
            }
            links.push(ArticleLink { url, title });
        }
        Ok(links)
    }

    /// Publication date in priority order: JSON-LD, meta tags, `<time>`,
    /// then a `/YYYY/MM/DD/` segment of the URL.
    pub fn extract_date(document: &Html, url: &str) -> Option<DateTime<Utc>> {
        if let Some(date) = jsonld::extract_date_published(document) {
            return Some(date);
        }

        for raw in META_DATE_SELECTORS {
            let Ok(selector) = Selector::parse(raw) else { continue };
            let date = document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .find_map(mw_core::time::parse_datetime);
            if date.is_some() {
                return date;
            }
        }

        if let Ok(selector) = Selector::parse("time[datetime]") {
            if let Some(date) = document
                .select(&selector)
                .filter_map(|el| el.value().attr("datetime"))
                .find_map(mw_core::time::parse_datetime)
            {
                return Some(date);
            }
        }

        date_from_url(url)
    }

    pub fn date_from_url(url: &str) -> Option<DateTime<Utc>> {
        let pattern = regex::Regex::new(r"/(\d{4})/(\d{2})/(\d{2})/").ok()?;
        let caps = pattern.captures(url)?;
        let date = chrono::NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        Some(mw_core::time::localize(date.and_hms_opt(0, 0, 0)?))
    }

    /// Joined text of every `<p>` that is not inside navigation chrome.
    pub fn extract_body(document: &Html) -> String {
        let Ok(paragraph) = Selector::parse("p") else {
            return String::new();
        };
        document
            .select(&paragraph)
            .filter(|p| {
                !p.ancestors().filter_map(ElementRef::wrap).any(|a| {
                    matches!(a.value().name(), "nav" | "header" | "footer" | "script" | "style")
                })
            })
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn parse_article(
        html: &str,
        link: &ArticleLink,
        source: &str,
        cutoff: DateTime<Utc>,
        min_content_length: usize,
    ) -> Option<Article> {
        let document = Html::parse_document(html);
        let published = extract_date(&document, &link.url)?;
        if published < cutoff {
            return None;
        }

        let body = extract_body(&document);
        if body.chars().count() < min_content_length {
            return None;
        }

        let summary = format!("{}...", mw_core::truncate_chars(&body, SUMMARY_CHARS));
        Some(Article::new(&link.title, &link.url, source, published, summary).with_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::utils;
    use super::*;
    use chrono::TimeZone;

    const LISTING: &str = r#"
        <html><body>
          <nav><a href="/om-oss">Om oss och vår verksamhet i stort</a></nav>
          <article><h2><a href="/nyheter/varsel-pa-operan">Varsel på operan i Malmö</a></h2></article>
          <article><h2><a href="https://annan.se/2025/03/02/nytt-avtal">Nytt avtal för scenkonsten klart</a></h2></article>
          <article><h2><a href="mailto:info@example.se">Skriv till oss om du har frågor</a></h2></article>
          <article><h2><a href="/kort">Kort</a></h2></article>
          <article><h2><a href="/nyheter/melodifestivalen">Melodifestivalen: allt du behöver veta</a></h2></article>
          <article><h2><span>Ingen länk i den här rubriken</span></h2></article>
          <article><h2><a href="/nyheter/varsel-pa-operan">Varsel på operan i Malmö</a></h2></article>
        </body></html>
    "#;

    fn link(url: &str) -> ArticleLink {
        ArticleLink {
            url: url.to_string(),
            title: "Varsel på operan i Malmö".to_string(),
        }
    }

    #[test]
    fn test_parse_url() {
        assert!(utils::parse_url("https://example.com").is_ok());
        assert!(utils::parse_url("invalid-url").is_err());
    }

    #[test]
    fn test_extract_links() {
        let blocklist = vec!["melodifestivalen".to_string()];
        let links =
            utils::extract_links(LISTING, "https://scensverige.se/nyheter", "article h2", &blocklist).unwrap();
        assert_eq!(
            links,
            vec![
                ArticleLink {
                    url: "https://scensverige.se/nyheter/varsel-pa-operan".to_string(),
                    title: "Varsel på operan i Malmö".to_string(),
                },
                ArticleLink {
                    url: "https://annan.se/2025/03/02/nytt-avtal".to_string(),
                    title: "Nytt avtal för scenkonsten klart".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_default_selector_and_blocked_paths() {
        let links = utils::extract_links(LISTING, "https://scensverige.se/", "a", &[]).unwrap();
        assert!(links.iter().all(|l| !l.url.contains("/om-oss")));
        assert!(links.iter().any(|l| l.url.ends_with("/nyheter/melodifestivalen")));
    }

    #[test]
    fn test_invalid_selector() {
        assert!(utils::extract_links(LISTING, "https://scensverige.se/", "[[", &[]).is_err());
    }

    #[test]
    fn test_relevant_path() {
        let ok = Url::parse("https://trs.se/nyheter/x").unwrap();
        let press = Url::parse("https://trs.se/Pressrum/x").unwrap();
        assert!(utils::is_relevant_path(&ok));
        assert!(!utils::is_relevant_path(&press));
        assert!(!utils::is_valid_deep_link(&Url::parse("ftp://trs.se/a").unwrap()));
    }

    #[test]
    fn test_date_priority() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"datePublished":"2025-03-03T09:00:00Z"}</script>
            <meta property="article:published_time" content="2025-01-01T09:00:00Z">
            </head><body><time datetime="2024-01-01T00:00:00Z">1 jan</time></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(
            utils::extract_date(&document, "https://x.se/2020/01/01/a"),
            Some(Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap())
        );

        let html = r#"<html><head><meta name="pubdate" content="2025-02-01T12:00:00+00:00"></head>
            <body><time datetime="2024-01-01T00:00:00Z">1 jan</time></body></html>"#;
        assert_eq!(
            utils::extract_date(&Html::parse_document(html), "https://x.se/a"),
            Some(Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap())
        );

        let html = r#"<html><body><time datetime="2024-01-01T00:00:00Z">1 jan</time></body></html>"#;
        assert_eq!(
            utils::extract_date(&Html::parse_document(html), "https://x.se/a"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_date_from_url() {
        assert!(utils::date_from_url("https://x.se/2025/03/02/nytt-avtal").is_some());
        assert!(utils::date_from_url("https://x.se/2025/13/02/fel").is_none());
        assert!(utils::date_from_url("https://x.se/nyheter/a").is_none());
    }

    #[test]
    fn test_body_skips_navigation() {
        let html = r#"<html><body>
            <header><p>Meny</p></header>
            <main><p>Första stycket.</p><div><p> Andra  stycket. </p></div></main>
            <footer><p>Kontakta oss</p></footer>
            </body></html>"#;
        let body = utils::extract_body(&Html::parse_document(html));
        assert_eq!(body, "Första stycket. Andra  stycket.");
    }

    #[test]
    fn test_parse_article() {
        let paragraph = "Ledningen på Malmö Opera har lagt ett varsel om uppsägning. ".repeat(8);
        let html = format!(
            r#"<html><head><meta property="article:published_time" content="2025-03-03T08:00:00Z"></head>
            <body><p>{}</p></body></html>"#,
            paragraph
        );
        let cutoff = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let article = utils::parse_article(&html, &link("https://operan.se/a"), "Malmö Opera", cutoff, 300).unwrap();
        assert_eq!(article.source, "Malmö Opera");
        assert_eq!(article.summary.chars().count(), SUMMARY_CHARS + 3);
        assert!(article.summary.ends_with("..."));
        assert!(article.body_text.chars().count() >= 300);

        // too old
        let late_cutoff = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
        assert!(utils::parse_article(&html, &link("https://operan.se/a"), "x", late_cutoff, 300).is_none());
        // too thin
        assert!(utils::parse_article(&html, &link("https://operan.se/a"), "x", cutoff, 10_000).is_none());
        // undated
        let undated = format!("<html><body><p>{}</p></body></html>", paragraph);
        assert!(utils::parse_article(&undated, &link("https://operan.se/a"), "x", cutoff, 300).is_none());
    }
}
