//! Cineseek - Conversational movie identification assistant
//!
//! Turns vague natural-language clues ("a movie about escaping prison")
//! into concrete suggestions by combining a multi-provider completion
//! chain, a local movie catalog behind a tool-invocation layer, and a
//! quality gate that escalates thin results to web search.

pub mod agent;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod gate;
pub mod llm;
pub mod tools;
pub mod utils;
pub mod web;

pub use agent::{Message, Role, Session, TurnOutcome};
pub use config::Settings;
pub use dataset::{MovieCatalog, MovieRecord, MovieSearch, SearchCriteria};
pub use gate::{EscalationDecision, EscalationReason, QualityGate};
pub use llm::{FallbackClient, FALLBACK_REPLY};
pub use tools::{ToolCatalog, ToolOutcome, ToolResultEnvelope};
