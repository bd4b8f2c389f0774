use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mail_parser::MessageParser;
use mw_core::config::EmailConfig;
use mw_core::{Article, Collector, Error, Result};
use regex::Regex;
use tracing::{info, warn};
use url::Url;

use crate::imap::ImapSession;

pub const ALERT_SENDER: &str = "googlealerts-noreply@google.com";
pub const MAX_MESSAGES: usize = 5;
pub const ALERT_SOURCE: &str = "Google Alerts";

#[derive(Debug, Clone)]
pub struct ImapSettings {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub folder: String,
}

impl ImapSettings {
    /// `None` unless IMAP is enabled and server, user and password are set.
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        if !config.imap_enabled {
            return None;
        }
        match (&config.imap_server, &config.imap_user, &config.imap_password) {
            (Some(server), Some(user), Some(password)) => Some(Self {
                server: server.clone(),
                port: config.imap_port,
                user: user.clone(),
                password: password.clone(),
                folder: config.imap_folder.clone(),
            }),
            _ => {
                warn!("IMAP configuration incomplete.");
                None
            }
        }
    }
}

/// Reads unread Google Alerts messages and turns every alert link into an
/// article.
pub struct EmailCollector {
    settings: Option<ImapSettings>,
}

impl EmailCollector {
    pub fn new(settings: Option<ImapSettings>) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &EmailConfig) -> Self {
        Self::new(ImapSettings::from_config(config))
    }
}

fn fetch_alert_messages(settings: &ImapSettings) -> Result<Vec<Vec<u8>>> {
    info!(server = %settings.server, "Connecting to IMAP server");
    let mut session = ImapSession::connect(&settings.server, settings.port)?;
    session.login(&settings.user, &settings.password)?;
    session.select(&settings.folder)?;

    let ids = session.search(&format!("UNSEEN FROM \"{}\"", ALERT_SENDER))?;
    info!("Found {} new Google Alerts emails.", ids.len());

    let mut messages = Vec::new();
    for id in ids.iter().take(MAX_MESSAGES) {
        match session.fetch_message(id) {
            Ok(raw) => messages.push(raw),
            Err(e) => warn!(id = %id, error = %e, "Failed to fetch message"),
        }
    }
    if let Err(e) = session.logout() {
        warn!(error = %e, "IMAP logout failed");
    }
    Ok(messages)
}

/// Unwraps the `url` parameter of every Google redirect link in `html`,
/// keeping first-seen order.
pub fn extract_alert_links(html: &str) -> Vec<String> {
    let Ok(pattern) = Regex::new(r#"href="(https://www\.google\.com/url\?[^"]+)""#) else {
        return Vec::new();
    };

    let mut links: Vec<String> = Vec::new();
    for cap in pattern.captures_iter(html) {
        let href = cap[1].replace("&amp;", "&");
        let Ok(redirect) = Url::parse(&href) else { continue };
        let Some(target) = redirect
            .query_pairs()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
        else {
            continue;
        };
        if !links.contains(&target) {
            links.push(target);
        }
    }
    links
}

/// Articles for one raw alert message. Messages without an HTML body yield
/// nothing.
pub fn parse_alert(raw: &[u8], now: DateTime<Utc>) -> Vec<Article> {
    let Some(message) = MessageParser::default().parse(raw) else {
        warn!("Unparseable alert message");
        return Vec::new();
    };
    let subject = message.subject().unwrap_or_default().trim().to_string();
    let published = message
        .date()
        .and_then(|d| DateTime::from_timestamp(d.to_timestamp(), 0))
        .unwrap_or(now);
    let Some(html) = message.body_html(0) else {
        return Vec::new();
    };

    extract_alert_links(&html)
        .into_iter()
        .map(|url| {
            Article::new(
                format!("Google Alert: {}", subject),
                url,
                ALERT_SOURCE,
                published,
                format!("Found via Google Alert: {}", subject),
            )
            .with_found_via(ALERT_SOURCE)
        })
        .collect()
}

#[async_trait]
impl Collector for EmailCollector {
    fn name(&self) -> &str {
        "email"
    }

    async fn collect(&self) -> Result<Vec<Article>> {
        let Some(settings) = self.settings.clone() else {
            return Ok(Vec::new());
        };

        let messages = tokio::task::spawn_blocking(move || fetch_alert_messages(&settings))
            .await
            .map_err(|e| Error::Email(format!("IMAP task failed: {}", e)))??;

        let now = Utc::now();
        let articles: Vec<Article> = messages.iter().flat_map(|raw| parse_alert(raw, now)).collect();
        info!("Collected {} articles from emails.", articles.len());
        Ok(articles)
    }
}
