use chrono::{Duration, Utc};
use mw_analysis::prelude::*;
use mw_core::ContentType;

const CONFIG: &str = r#"
[app]
max_article_age_days = 2

[[categories]]
name = "Omställning"
keywords = ["varsel", "omställning"]
icon = "🔄"

[[categories]]
name = "Scenkonst"
keywords = ["teater", "opera"]
icon = "🎭"
"#;

fn article(title: &str, url: &str, source: &str, body: &str) -> Article {
    Article::new(title, url, source, Utc::now() - Duration::hours(3), "").with_body(body)
}

fn malmo_body() -> String {
    "Ledningen har lagt ett varsel om uppsägning. Orsaken är arbetsbrist efter minskade anslag. "
        .repeat(4)
}

#[test]
fn test_process_full_run() {
    let config = Config::from_toml(CONFIG).unwrap();
    let input = vec![
        article(
            "Varsel på Malmö Opera – 20 tjänster försvinner",
            "https://sverigesradio.se/artikel/malmo-opera",
            "Sveriges Radio",
            &malmo_body(),
        ),
        article(
            "Varsel på Malmö Opera – 20 tjänster försvinner.",
            "https://sverigesradio.se/artikel/malmo-opera-2",
            "Sveriges Radio",
            &malmo_body(),
        ),
        article(
            "Gör vild föreställning om Folkhemmets mormor",
            "https://www.tv4.se/artikel/folkhemmets-mormor",
            "tv4.se",
            "",
        ),
        article(
            "Regeringen presenterar ny kulturpolitik",
            "https://www.dn.se/kultur/ny-kulturpolitik",
            "dn.se",
            "",
        ),
        article("Artikel utan länk", "", "Okänd", ""),
    ];

    let run = process(input, &config);

    let urls: Vec<&str> = run.articles.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://sverigesradio.se/artikel/malmo-opera",
            "https://www.tv4.se/artikel/folkhemmets-mormor",
            "https://www.dn.se/kultur/ny-kulturpolitik",
        ]
    );

    let dn = &run.articles[2];
    assert_eq!(dn.domain.as_deref(), Some("dn.se"));
    assert_eq!(dn.organization.as_deref(), Some("Dagens Nyheter"));
    assert_eq!(dn.content_type, ContentType::Article);

    assert_eq!(run.categorized.total(), 1);
    let bucket = run.categorized.get("Omställning").unwrap();
    assert_eq!(bucket.articles.len(), 1);
    let kept = &bucket.articles[0];
    assert!(kept.relevance_score > 0.0);
    assert_eq!(kept.category.as_deref(), Some("Omställning"));
    assert_eq!(kept.organization.as_deref(), Some("Sveriges Radio"));
}

#[test]
fn test_review_is_not_categorized() {
    let config = Config::from_toml(CONFIG).unwrap();
    let run = process(
        vec![article(
            "Gör vild föreställning om Folkhemmets mormor",
            "https://www.tv4.se/artikel/folkhemmets-mormor",
            "tv4.se",
            "",
        )],
        &config,
    );
    assert_eq!(run.articles.len(), 1);
    assert_eq!(run.categorized.total(), 0);
    assert_eq!(RelevanceScorer::new().calculate_relevance(&run.articles[0]).0, 0.0);
}

#[test]
fn test_empty_input() {
    let config = Config::from_toml(CONFIG).unwrap();
    let run = process(Vec::new(), &config);
    assert!(run.articles.is_empty());
    assert_eq!(run.categorized.categories.len(), 3);
}
