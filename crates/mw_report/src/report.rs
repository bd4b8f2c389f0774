use mw_core::{Article, SourceHealthReport};

/// Plain-text run summary appended to the digest: source reachability,
/// search agent hits and the article total.
pub fn search_report(articles: &[Article], health: &SourceHealthReport) -> String {
    let mut lines = vec![format!(
        "Källstatus: {}/{} källor nåbara.",
        health.healthy(),
        health.total()
    )];

    let unhealthy: Vec<String> = health
        .rss
        .iter()
        .filter(|(_, status)| !status.healthy)
        .map(|(name, _)| format!("RSS: {}", name))
        .chain(
            health
                .scrape
                .iter()
                .filter(|(_, status)| !status.healthy)
                .map(|(name, _)| format!("Webb: {}", name)),
        )
        .collect();
    if !unhealthy.is_empty() {
        lines.push("⚠️ Problem med följande källor:".to_string());
        lines.extend(unhealthy.iter().map(|u| format!("  - {}", u)));
    }

    let found = articles.iter().filter(|a| is_search_hit(a)).count();
    if found > 0 {
        lines.push(format!("\nSökagenten hittade {} artiklar via aktiv sökning.", found));
    } else {
        lines.push("\nSökagenten hittade inga nya artiklar via aktiv sökning.".to_string());
    }

    lines.push(format!("\nTotalt {} artiklar i dagens utskick.", articles.len()));
    lines.join("\n")
}

fn is_search_hit(article: &Article) -> bool {
    article.source.contains("via Google News") || article.source.contains("Google Alert")
}
