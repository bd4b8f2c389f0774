use chrono::{DateTime, Utc};
use mw_core::time::parse_datetime;
use scraper::{Html, Selector};
use serde_json::Value;

/// Extracts `datePublished` from the document's JSON-LD blocks. Top-level
/// arrays and `@graph` lists are searched in order; the first parseable
/// value wins.
pub fn extract_date_published(document: &Html) -> Option<DateTime<Utc>> {
    let script_selector = Selector::parse("script[type='application/ld+json']").ok()?;

    for script in document.select(&script_selector) {
        let raw = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };
        if let Some(date) = date_from_value(&json) {
            return Some(date);
        }
    }
    None
}

fn date_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Array(items) => items.iter().find_map(date_from_value),
        Value::Object(obj) => {
            if let Some(date) = obj
                .get("datePublished")
                .and_then(|d| d.as_str())
                .and_then(parse_datetime)
            {
                return Some(date);
            }
            obj.get("@graph").and_then(date_from_value)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc(json: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><head><script type="application/ld+json">{}</script></head><body></body></html>"#,
            json
        ))
    }

    #[test]
    fn test_object() {
        let document = doc(r#"{"@type":"NewsArticle","datePublished":"2025-03-03T08:00:00+01:00"}"#);
        assert_eq!(
            extract_date_published(&document),
            Some(Utc.with_ymd_and_hms(2025, 3, 3, 7, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_array_and_graph() {
        let document = doc(r#"[{"@type":"WebPage"},{"datePublished":"2025-03-01T10:00:00Z"}]"#);
        assert!(extract_date_published(&document).is_some());

        let document = doc(r#"{"@graph":[{"@type":"Organization"},{"datePublished":"2025-03-01T10:00:00Z"}]}"#);
        assert_eq!(
            extract_date_published(&document),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let document = doc("{not json");
        assert_eq!(extract_date_published(&document), None);
    }
}
