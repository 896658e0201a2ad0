//! Result Quality Gate
//!
//! Decides, per turn, whether dataset results can stand alone or a
//! web-search escalation is needed. Pure policy: no network, no state.

use crate::dataset::MovieRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Terms whose presence means the fixed dataset snapshot is presumed
/// unable to cover the request, regardless of what it returned.
/// Korean and English forms of the same domain vocabulary.
const RECENCY_TERMS: &[&str] = &[
    "2020", "2021", "2022", "2023", "2024", "2025",
    "최근", "신작", "넷플릭스", "디즈니", "마블", "아마존",
    "좀비", "바이러스", "팬데믹", "코로나", "메타버스",
    "인공지능", "가상현실",
    "recent", "netflix", "disney+", "marvel", "streaming",
    "zombie", "pandemic", "metaverse", "ai ", "nft", "vr ",
];

static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(19|20)\d{2}\b").unwrap_or_else(|e| panic!("year regex: {}", e))
});

/// Why the gate decided the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    NoResults,
    RecencySignal,
    StaleSnapshot,
    InsufficientCount,
    Sufficient,
}

/// Per-turn escalation decision; derived, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationDecision {
    pub escalate: bool,
    pub reason: EscalationReason,
}

impl EscalationDecision {
    fn escalate(reason: EscalationReason) -> Self {
        Self {
            escalate: true,
            reason,
        }
    }

    fn sufficient() -> Self {
        Self {
            escalate: false,
            reason: EscalationReason::Sufficient,
        }
    }
}

/// Heuristic escalation policy over dataset results
#[derive(Debug, Clone)]
pub struct QualityGate {
    /// Fewer results than this escalates
    pub min_results: usize,
    /// Years a referenced year may exceed the newest result before the
    /// snapshot counts as stale
    pub year_gap: u16,
    /// Years from this one onward count as "recent" references
    pub recent_floor: u16,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            min_results: 3,
            year_gap: 4,
            recent_floor: 2020,
        }
    }
}

impl QualityGate {
    /// Evaluate the rules in order; first match wins.
    pub fn evaluate(&self, user_text: &str, results: &[MovieRecord]) -> EscalationDecision {
        if results.is_empty() {
            return EscalationDecision::escalate(EscalationReason::NoResults);
        }

        let lower = user_text.to_lowercase();
        if let Some(term) = RECENCY_TERMS.iter().find(|t| lower.contains(*t)) {
            tracing::debug!(term, "recency vocabulary hit");
            return EscalationDecision::escalate(EscalationReason::RecencySignal);
        }

        if let Some(asked) = self.referenced_recent_year(user_text) {
            let newest = results.iter().map(|m| m.year).max().unwrap_or(0);
            if newest + self.year_gap < asked {
                tracing::debug!(asked, newest, "snapshot materially older than request");
                return EscalationDecision::escalate(EscalationReason::StaleSnapshot);
            }
        }

        if results.len() < self.min_results {
            return EscalationDecision::escalate(EscalationReason::InsufficientCount);
        }

        EscalationDecision::sufficient()
    }

    /// Most recent explicit year in the text, if it is at or past the floor
    fn referenced_recent_year(&self, text: &str) -> Option<u16> {
        YEAR_RE
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<u16>().ok())
            .filter(|y| *y >= self.recent_floor)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, year: u16, rating: f64) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            year,
            rating,
            genres: vec!["Drama".to_string()],
            director: "Someone".to_string(),
            cast: vec!["A".to_string()],
            synopsis: String::new(),
            votes: 1000,
            poster: None,
            gross: None,
        }
    }

    fn nineties_results(n: usize) -> Vec<MovieRecord> {
        (0..n)
            .map(|i| movie(&format!("Film {}", i), 1994 + i as u16, 8.5))
            .collect()
    }

    #[test]
    fn test_empty_results_always_escalate() {
        let gate = QualityGate::default();
        for text in ["액션 영화", "anything at all", ""] {
            let decision = gate.evaluate(text, &[]);
            assert!(decision.escalate);
            assert_eq!(decision.reason, EscalationReason::NoResults);
        }
    }

    #[test]
    fn test_good_results_without_recency_terms_pass() {
        let gate = QualityGate::default();
        let decision = gate.evaluate("액션 영화", &nineties_results(5));
        assert!(!decision.escalate);
        assert_eq!(decision.reason, EscalationReason::Sufficient);
    }

    #[test]
    fn test_recency_term_fires_before_count_rule() {
        let gate = QualityGate::default();
        let decision = gate.evaluate("2024년 영화", &nineties_results(3));
        assert!(decision.escalate);
        assert_eq!(decision.reason, EscalationReason::RecencySignal);
    }

    #[test]
    fn test_streaming_platform_triggers_recency() {
        let gate = QualityGate::default();
        let decision = gate.evaluate("넷플릭스에서 볼만한 거", &nineties_results(5));
        assert_eq!(decision.reason, EscalationReason::RecencySignal);
    }

    #[test]
    fn test_stale_snapshot_on_recent_year_outside_vocabulary() {
        // 2027 is past the vocabulary's literal years, so rule 2 does not
        // fire and the year-gap rule has to catch it.
        let gate = QualityGate::default();
        let decision = gate.evaluate("2027 movies", &nineties_results(5));
        assert!(decision.escalate);
        assert_eq!(decision.reason, EscalationReason::StaleSnapshot);
    }

    #[test]
    fn test_old_year_reference_is_not_stale() {
        let gate = QualityGate::default();
        let decision = gate.evaluate("1994 drama", &nineties_results(5));
        assert!(!decision.escalate);
    }

    #[test]
    fn test_insufficient_count_escalates() {
        let gate = QualityGate::default();
        let decision = gate.evaluate("괜찮은 드라마", &nineties_results(2));
        assert!(decision.escalate);
        assert_eq!(decision.reason, EscalationReason::InsufficientCount);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let gate = QualityGate::default();
        let results = nineties_results(5);
        let first = gate.evaluate("액션 영화", &results);
        let second = gate.evaluate("액션 영화", &results);
        assert_eq!(first, second);
    }
}
