//! Movie Dataset Access
//!
//! Information Hiding:
//! - Snapshot storage and filtering implementation hidden behind trait
//! - Ranking and tie-break rules internalized in the catalog
//! - Consumers only see criteria in, ranked records out

pub mod catalog;

use serde::{Deserialize, Serialize};

pub use catalog::MovieCatalog;

/// Hard cap on the number of records a single search may return
pub const MAX_RESULTS: usize = 50;

/// Default result limit when the caller does not specify one
pub const DEFAULT_RESULTS: usize = 5;

/// Read-only projection of one movie in the dataset snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub year: u16,
    /// IMDb-style rating on a 0.0-10.0 scale
    pub rating: f64,
    pub genres: Vec<String>,
    pub director: String,
    /// Top-billed cast, dataset order, up to 4 entries
    pub cast: Vec<String>,
    pub synopsis: String,
    pub votes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross: Option<u64>,
}

/// Search criteria for the dataset capability
///
/// Keywords are unioned (OR) across matches; the remaining filter fields
/// are intersected (AND). All fields except `limit` are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_rating: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_RESULTS
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            genre: None,
            director: None,
            actor: None,
            min_rating: None,
            max_rating: None,
            limit: DEFAULT_RESULTS,
        }
    }
}

impl SearchCriteria {
    pub fn from_keywords(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            ..Self::default()
        }
    }

    /// Effective limit, clamped to `1..=MAX_RESULTS`
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_RESULTS)
    }
}

/// Dataset-search capability
///
/// The snapshot is read-only; results are ranked by rating descending
/// with ties broken by the snapshot's own order.
pub trait MovieSearch: Send + Sync {
    /// Search the snapshot. Empty criteria returns the top-N by rating.
    fn search(&self, criteria: &SearchCriteria) -> Vec<MovieRecord>;

    /// Case-insensitive substring match against titles, first match in
    /// snapshot order.
    fn find_by_title(&self, title: &str) -> Option<MovieRecord>;
}
