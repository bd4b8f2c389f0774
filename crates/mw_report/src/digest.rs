use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use mw_analysis::CategorizedArticles;
use mw_core::{Article, ContentType, Error, Result, SourceHealthReport};
use tracing::info;

use crate::report::search_report;

const WEEKDAYS: [&str; 7] = ["Måndag", "Tisdag", "Onsdag", "Torsdag", "Fredag", "Lördag", "Söndag"];
const MONTHS: [&str; 12] = [
    "januari",
    "februari",
    "mars",
    "april",
    "maj",
    "juni",
    "juli",
    "augusti",
    "september",
    "oktober",
    "november",
    "december",
];

/// `Måndagen den 3 mars 2025`
pub fn swedish_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{}en den {} {} {}", weekday, date.day(), month, date.year())
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn content_label(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Article => "Artikel",
        ContentType::Pdf => "PDF",
        ContentType::Video => "Video",
        ContentType::PressRelease => "Pressmeddelande",
        ContentType::Podcast => "Podd",
    }
}

/// Everything the digest page shows.
pub struct Digest<'a> {
    pub categorized: &'a CategorizedArticles,
    /// Flat deduplicated list; drives the source count and search report.
    pub articles: &'a [Article],
    pub health: &'a SourceHealthReport,
    pub date: NaiveDate,
}

impl Digest<'_> {
    pub fn date_line(&self) -> String {
        swedish_date(self.date)
    }

    pub fn render(&self) -> String {
        let total_articles = self.categorized.total();
        let total_sources = self
            .articles
            .iter()
            .map(|a| a.source.as_str())
            .collect::<HashSet<_>>()
            .len();
        let total_categories = self.categorized.non_empty().count();

        let mut sections = String::new();
        for bucket in self.categorized.non_empty() {
            let mut items = String::new();
            for article in &bucket.articles {
                items.push_str(&render_article(article));
            }
            sections.push_str(&format!(
                r#"<section class="category">
<h2>{icon} {name} <span class="count">({count})</span></h2>
{items}</section>
"#,
                icon = escape_html(&bucket.icon),
                name = escape_html(&bucket.name),
                count = bucket.articles.len(),
            ));
        }
        if sections.is_empty() {
            sections.push_str(r#"<p class="empty">Inga relevanta artiklar hittades i dag.</p>"#);
        }

        let report = escape_html(&search_report(self.articles, self.health)).replace('\n', "<br>\n");

        format!(
            r#"<!DOCTYPE html>
<html lang="sv">
<head>
<meta charset="utf-8">
<title>Omvärldsbevakning - {date}</title>
<style>
body{{font-family:Arial,Helvetica,sans-serif;color:#222;max-width:720px;margin:0 auto;padding:16px;}}
h1{{font-size:22px;margin-bottom:4px;}}
.date{{color:#666;margin-top:0;}}
.totals{{background:#f4f6f8;padding:10px 14px;border-radius:6px;}}
.category h2{{font-size:18px;border-bottom:2px solid #e0e4e8;padding-bottom:4px;}}
.count{{color:#888;font-weight:normal;font-size:14px;}}
.article{{margin:0 0 14px 0;}}
.article a{{font-weight:bold;color:#0b4f8a;text-decoration:none;}}
.meta{{font-size:12px;color:#666;}}
.badge{{background:#e8eef5;border-radius:3px;padding:1px 5px;}}
.report{{font-size:12px;color:#555;border-top:1px solid #ddd;margin-top:24px;padding-top:8px;}}
</style>
</head>
<body>
<h1>Omvärldsbevakning</h1>
<p class="date">{date}</p>
<p class="totals">{total_articles} artiklar från {total_sources} källor i {total_categories} kategorier</p>
{sections}<div class="report">{report}</div>
</body>
</html>
"#,
            date = escape_html(&self.date_line()),
        )
    }
}

pub fn render_digest(
    categorized: &CategorizedArticles,
    articles: &[Article],
    health: &SourceHealthReport,
    today: NaiveDate,
) -> String {
    Digest {
        categorized,
        articles,
        health,
        date: today,
    }
    .render()
}

fn render_article(article: &Article) -> String {
    let organization = article
        .organization
        .as_deref()
        .unwrap_or(article.source.as_str());
    let summary = if article.summary.is_empty() {
        String::new()
    } else {
        format!("\n<p>{}</p>", escape_html(&article.summary))
    };
    format!(
        r#"<div class="article">
<a href="{url}">{title}</a>
<div class="meta">{organization} · <span class="badge">{label}</span> · {minutes} min läsning</div>{summary}
</div>
"#,
        url = escape_html(&article.url),
        title = escape_html(&article.title),
        organization = escape_html(organization),
        label = content_label(article.content_type),
        minutes = article.estimated_read_time,
    )
}

/// Writes the rendered digest, creating parent directories as needed.
pub fn write_preview(html: &str, path: &Path) -> Result<()> {
    let report_err = |e: std::io::Error| Error::Report(format!("failed to write {}: {}", path.display(), e));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(report_err)?;
    }
    std::fs::write(path, html).map_err(report_err)?;
    info!("Preview saved to {}", path.display());
    Ok(())
}
