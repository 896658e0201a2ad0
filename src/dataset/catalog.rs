//! JSON-Snapshot Movie Catalog
//!
//! Information Hiding:
//! - Snapshot file format and in-memory layout hidden
//! - Matching and ranking rules internalized

use super::{MovieRecord, MovieSearch, SearchCriteria};
use anyhow::{Context, Result};
use std::path::Path;

/// Compiled-in snapshot so the assistant runs without external files
const SEED_SNAPSHOT: &str = include_str!("../../data/movies.json");

/// In-memory movie catalog backed by a JSON snapshot
pub struct MovieCatalog {
    records: Vec<MovieRecord>,
}

impl MovieCatalog {
    /// Load the compiled-in seed snapshot
    pub fn seed() -> Self {
        // The seed ships inside the binary; a parse failure is a build defect.
        let records = serde_json::from_str(SEED_SNAPSHOT)
            .unwrap_or_else(|e| panic!("embedded movie snapshot is invalid: {}", e));
        Self { records }
    }

    /// Load a snapshot from a JSON file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let records: Vec<MovieRecord> =
            serde_json::from_str(raw).context("failed to parse movie snapshot")?;
        tracing::info!(records = records.len(), "loaded movie snapshot");
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matches_keywords(record: &MovieRecord, keywords: &[String]) -> bool {
        if keywords.is_empty() {
            return true;
        }
        keywords.iter().any(|kw| {
            let kw = kw.to_lowercase();
            if kw.is_empty() {
                return false;
            }
            record.title.to_lowercase().contains(&kw)
                || record.synopsis.to_lowercase().contains(&kw)
                || record.director.to_lowercase().contains(&kw)
                || record.genres.iter().any(|g| g.to_lowercase().contains(&kw))
                || record.cast.iter().any(|c| c.to_lowercase().contains(&kw))
        })
    }

    fn matches_filters(record: &MovieRecord, criteria: &SearchCriteria) -> bool {
        if let Some(genre) = &criteria.genre {
            let genre = genre.to_lowercase();
            if !record.genres.iter().any(|g| g.to_lowercase() == genre) {
                return false;
            }
        }
        if let Some(director) = &criteria.director {
            if !record
                .director
                .to_lowercase()
                .contains(&director.to_lowercase())
            {
                return false;
            }
        }
        if let Some(actor) = &criteria.actor {
            let actor = actor.to_lowercase();
            if !record.cast.iter().any(|c| c.to_lowercase().contains(&actor)) {
                return false;
            }
        }
        if let Some(min) = criteria.min_rating {
            if record.rating < min {
                return false;
            }
        }
        if let Some(max) = criteria.max_rating {
            if record.rating > max {
                return false;
            }
        }
        true
    }
}

impl MovieSearch for MovieCatalog {
    fn search(&self, criteria: &SearchCriteria) -> Vec<MovieRecord> {
        let mut hits: Vec<&MovieRecord> = self
            .records
            .iter()
            .filter(|r| Self::matches_keywords(r, &criteria.keywords))
            .filter(|r| Self::matches_filters(r, criteria))
            .collect();

        // Rating descending; stable sort keeps snapshot order for ties.
        hits.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        hits.truncate(criteria.effective_limit());
        hits.into_iter().cloned().collect()
    }

    fn find_by_title(&self, title: &str) -> Option<MovieRecord> {
        let needle = title.to_lowercase();
        self.records
            .iter()
            .find(|r| r.title.to_lowercase().contains(&needle))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MAX_RESULTS;

    #[test]
    fn test_seed_snapshot_loads() {
        let catalog = MovieCatalog::seed();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_keyword_or_semantics() {
        let catalog = MovieCatalog::seed();
        let criteria = SearchCriteria::from_keywords(vec![
            "prison".to_string(),
            "wormhole".to_string(),
        ]);
        let results = catalog.search(&criteria);

        let titles: Vec<&str> = results.iter().map(|m| m.title.as_str()).collect();
        assert!(titles.contains(&"The Shawshank Redemption"));
        assert!(titles.contains(&"Interstellar"));
    }

    #[test]
    fn test_results_ranked_by_rating_descending() {
        let catalog = MovieCatalog::seed();
        let criteria = SearchCriteria {
            limit: 10,
            ..SearchCriteria::default()
        };
        let results = catalog.search(&criteria);

        assert_eq!(results[0].title, "The Shawshank Redemption");
        for pair in results.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
        }
    }

    #[test]
    fn test_filters_are_intersected() {
        let catalog = MovieCatalog::seed();
        let criteria = SearchCriteria {
            director: Some("christopher nolan".to_string()),
            min_rating: Some(8.7),
            limit: 10,
            ..SearchCriteria::default()
        };
        let results = catalog.search(&criteria);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|m| m.director == "Christopher Nolan"));
        assert!(results.iter().all(|m| m.rating >= 8.7));
    }

    #[test]
    fn test_actor_filter() {
        let catalog = MovieCatalog::seed();
        let criteria = SearchCriteria {
            actor: Some("Tom Hanks".to_string()),
            limit: 10,
            ..SearchCriteria::default()
        };
        let results = catalog.search(&criteria);

        assert_eq!(results.len(), 2);
        let titles: Vec<&str> = results.iter().map(|m| m.title.as_str()).collect();
        assert!(titles.contains(&"Forrest Gump"));
        assert!(titles.contains(&"The Green Mile"));
    }

    #[test]
    fn test_no_film_above_min_rating() {
        let catalog = MovieCatalog::seed();
        let criteria = SearchCriteria {
            min_rating: Some(9.5),
            ..SearchCriteria::default()
        };
        assert!(catalog.search(&criteria).is_empty());
    }

    #[test]
    fn test_empty_criteria_returns_top_n() {
        let catalog = MovieCatalog::seed();
        let results = catalog.search(&SearchCriteria::default());
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].title, "The Shawshank Redemption");
    }

    #[test]
    fn test_limit_is_clamped() {
        let criteria = SearchCriteria {
            limit: 10_000,
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.effective_limit(), MAX_RESULTS);

        let criteria = SearchCriteria {
            limit: 0,
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.effective_limit(), 1);
    }

    #[test]
    fn test_find_by_title_case_insensitive_substring() {
        let catalog = MovieCatalog::seed();
        let movie = catalog.find_by_title("shawshank").unwrap();
        assert_eq!(movie.title, "The Shawshank Redemption");
        assert!(catalog.find_by_title("No Such Film").is_none());
    }

    #[test]
    fn test_find_by_title_ambiguous_takes_first_in_snapshot_order() {
        // "the g" matches several titles; first snapshot entry wins.
        let catalog = MovieCatalog::seed();
        let movie = catalog.find_by_title("the g").unwrap();
        assert_eq!(movie.title, "The Godfather");
    }

    #[test]
    fn test_from_path() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title":"Test Film","year":2001,"rating":7.5,"genres":["Drama"],
                "director":"Someone","cast":["A","B"],"synopsis":"A test.","votes":10}}]"#
        )
        .unwrap();

        let catalog = MovieCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_title("test film").unwrap().year, 2001);
    }
}
