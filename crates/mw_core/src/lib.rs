pub mod collector;
pub mod config;
pub mod error;
pub mod time;
pub mod types;

pub use collector::Collector;
pub use config::Config;
pub use error::{Error, Result};
pub use types::{Article, ContentType, SourceHealthReport, SourceStatus};

/// Truncates to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Malmö Opera", 5), "Malmö");
        assert_eq!(truncate_chars("kort", 10), "kort");
        assert_eq!(truncate_chars("", 3), "");
    }
}
