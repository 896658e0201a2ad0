//! Movie Dataset Tools
//!
//! Wraps the dataset-search capability as callable tools. An empty
//! result set is reported as `success: false` in the payload, not as a
//! failure outcome.

use super::{Tool, ToolCatalog, ToolMetadata, ToolParameter};
use crate::dataset::{MovieSearch, SearchCriteria, DEFAULT_RESULTS};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Search the movie dataset by keywords and filters
pub struct SearchMoviesTool {
    search: Arc<dyn MovieSearch>,
}

impl SearchMoviesTool {
    pub fn new(search: Arc<dyn MovieSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for SearchMoviesTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "search_movies".to_string(),
            description: "Search the movie dataset snapshot by keywords, genre, director, actor and rating".to_string(),
            parameters: vec![
                ToolParameter::optional("keywords", "array", "Keywords to search for (OR semantics)"),
                ToolParameter::optional("genre", "string", "Movie genre filter"),
                ToolParameter::optional("director", "string", "Director name filter"),
                ToolParameter::optional("actor", "string", "Actor name filter"),
                ToolParameter::optional("min_rating", "number", "Minimum rating"),
                ToolParameter::optional("max_rating", "number", "Maximum rating"),
                ToolParameter::optional("limit", "integer", "Maximum number of results")
                    .with_default(json!(DEFAULT_RESULTS)),
            ],
        }
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let criteria: SearchCriteria =
            serde_json::from_value(args).context("invalid search criteria")?;
        let movies = self.search.search(&criteria);

        if movies.is_empty() {
            return Ok(json!({
                "success": false,
                "message": "no movies matched the search criteria",
                "count": 0,
                "movies": [],
            }));
        }

        Ok(json!({
            "success": true,
            "message": format!("found {} movies", movies.len()),
            "count": movies.len(),
            "movies": movies,
        }))
    }
}

/// Look up one movie by title
///
/// Title matching is a case-insensitive substring check; when several
/// titles match, the first one in dataset order wins (documented
/// limitation, not an error).
pub struct GetMovieDetailsTool {
    search: Arc<dyn MovieSearch>,
}

impl GetMovieDetailsTool {
    pub fn new(search: Arc<dyn MovieSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for GetMovieDetailsTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "get_movie_details".to_string(),
            description: "Get detailed information about a specific movie by title".to_string(),
            parameters: vec![ToolParameter::required(
                "title",
                "string",
                "Title of the movie to look up",
            )],
        }
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let title = args["title"]
            .as_str()
            .context("'title' must be a string")?;

        match self.search.find_by_title(title) {
            Some(movie) => Ok(json!({
                "success": true,
                "message": format!("details for '{}'", movie.title),
                "movie": movie,
            })),
            None => Ok(json!({
                "success": false,
                "message": format!("no movie matching '{}' was found", title),
                "movie": null,
            })),
        }
    }
}

impl ToolCatalog {
    /// Catalog with the movie tools registered in declaration order
    pub fn with_movie_tools(search: Arc<dyn MovieSearch>) -> Self {
        let mut catalog = Self::new();
        catalog.register(Arc::new(SearchMoviesTool::new(search.clone())));
        catalog.register(Arc::new(GetMovieDetailsTool::new(search)));
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MovieCatalog;
    use crate::tools::{ToolErrorCode, ToolOutcome};

    fn catalog() -> ToolCatalog {
        ToolCatalog::with_movie_tools(Arc::new(MovieCatalog::seed()))
    }

    #[tokio::test]
    async fn test_search_movies_finds_prison_films() {
        let catalog = catalog();
        let envelope = catalog
            .call("search_movies", json!({"keywords": ["prison", "escape"]}))
            .await;

        let payload = envelope.payload().unwrap();
        assert_eq!(payload["success"], json!(true));
        assert!(payload["count"].as_u64().unwrap() >= 2);
        assert_eq!(payload["movies"][0]["title"], "The Shawshank Redemption");
    }

    #[tokio::test]
    async fn test_empty_result_is_success_false_not_error() {
        let catalog = catalog();
        let envelope = catalog
            .call("search_movies", json!({"min_rating": 9.5}))
            .await;

        assert!(envelope.is_success());
        let payload = envelope.payload().unwrap();
        assert_eq!(payload["success"], json!(false));
        assert_eq!(payload["count"], json!(0));
    }

    #[tokio::test]
    async fn test_search_movies_applies_default_limit() {
        let catalog = catalog();
        let envelope = catalog.call("search_movies", json!({})).await;
        let payload = envelope.payload().unwrap();
        assert_eq!(payload["count"].as_u64(), Some(DEFAULT_RESULTS as u64));
    }

    #[tokio::test]
    async fn test_get_movie_details_substring_match() {
        let catalog = catalog();
        let envelope = catalog
            .call("get_movie_details", json!({"title": "shawshank"}))
            .await;

        let payload = envelope.payload().unwrap();
        assert_eq!(payload["success"], json!(true));
        assert_eq!(payload["movie"]["title"], "The Shawshank Redemption");
    }

    #[tokio::test]
    async fn test_get_movie_details_not_found() {
        let catalog = catalog();
        let envelope = catalog
            .call("get_movie_details", json!({"title": "No Such Film"}))
            .await;

        let payload = envelope.payload().unwrap();
        assert_eq!(payload["success"], json!(false));
        assert!(payload["movie"].is_null());
    }

    #[tokio::test]
    async fn test_get_movie_details_requires_title() {
        let catalog = catalog();
        let envelope = catalog.call("get_movie_details", json!({})).await;
        match envelope.outcome {
            ToolOutcome::Failure { code, message } => {
                assert_eq!(code, ToolErrorCode::InvalidArguments);
                assert!(message.contains("'title'"));
            }
            ToolOutcome::Success { .. } => panic!("expected failure"),
        }
    }
}
