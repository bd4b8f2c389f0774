use mw_core::{Article, ContentType};
use tracing::debug;
use url::Url;

use crate::lexicon::ORGANIZATION_ALIASES;

const WORDS_PER_MINUTE: f64 = 200.0;
const UNKNOWN_ORGANIZATION: &str = "Unknown";

/// Derives content type, domain, organization and read time in place.
pub fn enrich(article: &mut Article) {
    article.content_type = detect_content_type(&article.url);

    let domain = extract_domain(&article.url);
    article.organization = Some(organization_for(&article.source, &domain));
    article.domain = Some(domain);

    article.estimated_read_time = estimate_read_time(&article.body_text, &article.summary);
}

pub fn enrich_all(mut articles: Vec<Article>) -> Vec<Article> {
    for article in articles.iter_mut() {
        enrich(article);
    }
    debug!(count = articles.len(), "Enriched articles");
    articles
}

pub fn detect_content_type(url: &str) -> ContentType {
    let url = url.to_lowercase();
    if url.ends_with(".pdf") {
        ContentType::Pdf
    } else if ["youtube.com", "vimeo.com", "play."].iter().any(|s| url.contains(s)) {
        ContentType::Video
    } else if url.contains("press") {
        // also covers "pressmeddelande"
        ContentType::PressRelease
    } else if url.contains("podd") || url.contains("podcast") {
        ContentType::Podcast
    } else {
        ContentType::Article
    }
}

/// Host of `url` without a leading `www.`, or an empty string when the URL
/// does not parse.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .map(|host| host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
        .unwrap_or_default()
}

pub fn organization_for(source: &str, domain: &str) -> String {
    let source = source.trim();
    if !source.is_empty() && !source.contains('.') {
        return source.to_string();
    }
    if domain.is_empty() {
        return UNKNOWN_ORGANIZATION.to_string();
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return domain.to_string();
    }
    let name = labels[labels.len() - 2];
    ORGANIZATION_ALIASES
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, alias)| alias.to_string())
        .unwrap_or_else(|| capitalize(name))
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

pub fn estimate_read_time(body_text: &str, summary: &str) -> u32 {
    let mut words = body_text.split_whitespace().count();
    if words == 0 {
        words = summary.split_whitespace().count();
    }
    let minutes = (words as f64 / WORDS_PER_MINUTE).round_ties_even() as u32;
    minutes.max(1)
}
