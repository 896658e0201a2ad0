//! Structured Intent Parsing
//!
//! The intent-extraction completion is free text that is expected to
//! contain a JSON decision object. Parsing is modeled as a tagged
//! result; every consumer has to handle the unparsed case explicitly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentAction {
    SearchMovies,
    RespondText,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
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
    pub limit: Option<usize>,
}

/// Decision object the intent persona is asked to produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentIntent {
    pub action: IntentAction,
    #[serde(default)]
    pub search_params: Option<SearchParams>,
    #[serde(default)]
    pub response_text: String,
    #[serde(default)]
    pub next_question: Option<String>,
    #[serde(default)]
    pub reason_no_match: Option<String>,
}

/// Tagged parse result; never assume the structured variant
#[derive(Debug, Clone)]
pub enum IntentOutcome {
    Parsed(AgentIntent),
    Unparsed(String),
}

impl IntentOutcome {
    /// Parse a completion into a structured intent. Tries the raw text
    /// first, then the outermost brace span, then degrades to the raw
    /// text as a plain response.
    pub fn parse(raw: &str) -> Self {
        if let Ok(intent) = serde_json::from_str::<AgentIntent>(raw) {
            return Self::Parsed(intent);
        }

        if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
            if start < end {
                if let Ok(intent) = serde_json::from_str::<AgentIntent>(&raw[start..=end]) {
                    return Self::Parsed(intent);
                }
            }
        }

        tracing::debug!("intent completion did not parse, degrading to plain text");
        Self::Unparsed(raw.to_string())
    }

    /// The follow-up question to close the turn with, if the intent
    /// carried one
    pub fn next_question(&self) -> Option<&str> {
        match self {
            Self::Parsed(intent) => intent.next_question.as_deref().filter(|q| !q.is_empty()),
            Self::Unparsed(_) => None,
        }
    }

    pub fn reason_no_match(&self) -> Option<&str> {
        match self {
            Self::Parsed(intent) => intent.reason_no_match.as_deref().filter(|r| !r.is_empty()),
            Self::Unparsed(_) => None,
        }
    }
}
