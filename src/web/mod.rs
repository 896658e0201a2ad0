//! Web Search Capability
//!
//! Escalation target when the dataset snapshot cannot be trusted for a
//! turn. The provider behind the trait is interchangeable; the shipped
//! implementation talks to the Tavily search API.

pub mod tavily;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use tavily::TavilyClient;

/// Domains the movie escalation search is confined to
pub const MOVIE_DOMAINS: &[&str] = &[
    "imdb.com",
    "themoviedb.org",
    "rottentomatoes.com",
    "wikipedia.org",
];

/// One ranked web document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebHit {
    pub title: String,
    /// Title with site decoration stripped
    pub cleaned_title: String,
    pub url: String,
    pub snippet: String,
    /// Human-readable source name derived from the URL
    pub source: String,
}

/// Web-search capability (external collaborator)
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        domains: &[&str],
        max_results: usize,
    ) -> Result<Vec<WebHit>>;
}

/// Strip site decoration from a result title
pub fn clean_title(title: &str) -> String {
    title
        .trim_end_matches(" - IMDb")
        .trim_end_matches(" - Wikipedia")
        .trim()
        .to_string()
}

/// Human-readable source name for a result URL
pub fn source_name(url: &str) -> &'static str {
    if url.contains("imdb.com") {
        "IMDb"
    } else if url.contains("themoviedb.org") {
        "TMDb"
    } else if url.contains("rottentomatoes.com") {
        "Rotten Tomatoes"
    } else if url.contains("wikipedia.org") {
        "Wikipedia"
    } else {
        "Web"
    }
}

/// Bound a snippet to `max_chars` characters (UTF-8 safe)
pub fn truncate_snippet(snippet: &str, max_chars: usize) -> String {
    if snippet.chars().count() <= max_chars {
        return snippet.to_string();
    }
    let mut out: String = snippet.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_strips_site_suffix() {
        assert_eq!(
            clean_title("The Shawshank Redemption (1994) - IMDb"),
            "The Shawshank Redemption (1994)"
        );
        assert_eq!(clean_title("Plain Title"), "Plain Title");
    }

    #[test]
    fn test_source_name() {
        assert_eq!(source_name("https://www.imdb.com/title/tt0111161/"), "IMDb");
        assert_eq!(source_name("https://en.wikipedia.org/wiki/X"), "Wikipedia");
        assert_eq!(source_name("https://example.com/x"), "Web");
    }

    #[test]
    fn test_truncate_snippet_is_char_safe() {
        let korean = "감옥 탈출 영화".repeat(100);
        let truncated = truncate_snippet(&korean, 50);
        assert_eq!(truncated.chars().count(), 53);
        assert!(truncated.ends_with("..."));

        let short = "short";
        assert_eq!(truncate_snippet(short, 50), "short");
    }
}
