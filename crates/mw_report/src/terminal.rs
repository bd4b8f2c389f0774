use mw_analysis::CategorizedArticles;

/// Test-mode output: every non-empty category with its articles.
pub fn render_terminal(categorized: &CategorizedArticles) -> String {
    let mut out = String::new();
    for bucket in categorized.non_empty() {
        out.push_str(&format!("\n--- {} ({}) ---\n", bucket.name, bucket.articles.len()));
        for article in &bucket.articles {
            out.push_str(&format!(
                "[{}] {} ({})\n   {}\n",
                article.content_type.as_str().to_uppercase(),
                article.title,
                article.source,
                article.url
            ));
        }
    }
    out
}

pub fn print_terminal(categorized: &CategorizedArticles) {
    print!("{}", render_terminal(categorized));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mw_analysis::CategoryBucket;
    use mw_core::{Article, ContentType};

    #[test]
    fn test_render_terminal() {
        let mut article = Article::new("Varsel på operan", "https://a.se/1", "SR", Utc::now(), "");
        article.content_type = ContentType::Pdf;
        let categorized = CategorizedArticles {
            categories: vec![
                CategoryBucket {
                    name: "Omställning".to_string(),
                    icon: "🔄".to_string(),
                    articles: vec![article],
                },
                CategoryBucket {
                    name: "Tom".to_string(),
                    icon: String::new(),
                    articles: Vec::new(),
                },
            ],
        };
        assert_eq!(
            render_terminal(&categorized),
            "\n--- Omställning (1) ---\n[PDF] Varsel på operan (SR)\n   https://a.se/1\n"
        );
    }
}
