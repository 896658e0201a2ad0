//! Conversation Session - Per-Turn Orchestration
//!
//! Information Hiding:
//! - Turn pipeline sequencing hidden behind `process`
//! - History windowing and prompt construction internalized
//! - Per-step failures absorbed here; a turn never errors outward

use crate::agent::intent::IntentOutcome;
use crate::agent::keywords::{mapped_keywords, mentions_movies, synthesize_web_query};
use crate::agent::prompts::{
    commentary_prompt, intent_persona, DIRECT_PERSONA, KEYWORD_EXTRACTION_PROMPT,
};
use crate::config::Settings;
use crate::dataset::{MovieRecord, MovieSearch};
use crate::gate::{EscalationDecision, QualityGate};
use crate::llm::{ChatMessage, ClientStatus, FallbackClient, FALLBACK_REPLY};
use crate::tools::{ToolCatalog, ToolMetadata, ToolResultEnvelope};
use crate::web::{WebSearch, MOVIE_DOMAINS};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Number of history entries replayed into the direct-answer prompt
/// (three user/agent turn pairs)
const DIRECT_HISTORY_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
}

/// One conversation entry; immutable once appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Everything one turn produced
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub response: String,
    pub suggested_movies: Vec<MovieRecord>,
    pub escalation: EscalationDecision,
}

/// One conversation session. Owns its history exclusively; turns run one
/// at a time against it.
pub struct Session {
    settings: Settings,
    client: Arc<FallbackClient>,
    tools: ToolCatalog,
    gate: QualityGate,
    web: Option<Arc<dyn WebSearch>>,
    history: Vec<Message>,
    last_suggested: Vec<MovieRecord>,
}

impl Session {
    pub fn new(
        settings: Settings,
        client: Arc<FallbackClient>,
        search: Arc<dyn MovieSearch>,
        web: Option<Arc<dyn WebSearch>>,
    ) -> Self {
        let gate = QualityGate {
            min_results: settings.gate.min_results,
            year_gap: settings.gate.year_gap,
            recent_floor: settings.gate.recent_floor,
        };

        Self {
            client,
            tools: ToolCatalog::with_movie_tools(search),
            gate,
            web,
            history: Vec::new(),
            last_suggested: Vec::new(),
            settings,
        }
    }

    /// Build a session from configuration: completion chain from
    /// environment credentials, catalog from the configured snapshot (or
    /// the compiled-in seed), web search if a Tavily key is present.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        use crate::dataset::MovieCatalog;
        use crate::web::TavilyClient;

        let client = Arc::new(FallbackClient::from_settings(&settings));
        let search: Arc<dyn MovieSearch> = match &settings.search.snapshot_path {
            Some(path) => Arc::new(MovieCatalog::from_path(path)?),
            None => Arc::new(MovieCatalog::seed()),
        };
        let web = TavilyClient::from_env(settings.web.timeout_secs)
            .map(|c| Arc::new(c) as Arc<dyn WebSearch>);

        Ok(Self::new(settings, client, search, web))
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Latest structured result set, for a surrounding UI to read
    pub fn last_suggested(&self) -> &[MovieRecord] {
        &self.last_suggested
    }

    pub fn completion_status(&self) -> ClientStatus {
        self.client.status()
    }

    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.list_tools()
    }

    /// Run one turn end to end. Never errors; every sub-step degrades to
    /// a templated partial on failure.
    pub async fn process(&mut self, user_text: &str) -> TurnOutcome {
        tracing::info!(turn = self.history.len() / 2 + 1, "processing turn");

        // The three leading steps are independent; run them concurrently.
        let (direct, intent, envelope) = futures::join!(
            self.direct_answer(user_text),
            self.extract_intent(user_text),
            self.dataset_search(user_text),
        );

        let (search_section, movies) = self.read_search_envelope(envelope);

        let decision = self.gate.evaluate(user_text, &movies);
        tracing::info!(escalate = decision.escalate, reason = ?decision.reason, "quality gate");

        let commentary = self.commentary(user_text, &movies).await;

        // Web escalation is sequenced strictly after the gate: whether it
        // runs depends on the dataset outcome.
        let web_section = if decision.escalate || movies.len() < self.gate.min_results {
            Some(self.web_escalation(user_text).await)
        } else {
            None
        };

        let response = self.compose(&direct, &search_section, &commentary, web_section, &intent);

        self.history.push(Message {
            role: Role::User,
            content: user_text.to_string(),
        });
        self.history.push(Message {
            role: Role::Agent,
            content: response.clone(),
        });
        self.last_suggested = movies.clone();

        TurnOutcome {
            response,
            suggested_movies: movies,
            escalation: decision,
        }
    }

    /// Conversational reply against a bounded window of recent history
    async fn direct_answer(&self, user_text: &str) -> String {
        let mut messages = vec![ChatMessage::system(DIRECT_PERSONA)];
        let window_start = self.history.len().saturating_sub(DIRECT_HISTORY_WINDOW);
        for entry in &self.history[window_start..] {
            messages.push(match entry.role {
                Role::User => ChatMessage::user(&entry.content),
                Role::Agent => ChatMessage::assistant(&entry.content),
            });
        }
        messages.push(ChatMessage::user(user_text));

        self.client
            .complete(messages, self.settings.llm.temperature, 300)
            .await
    }

    /// Structured decision object against the full history
    async fn extract_intent(&self, user_text: &str) -> IntentOutcome {
        let mut messages = vec![ChatMessage::system(intent_persona(
            &self.tools.tools_description(),
        ))];
        for entry in &self.history {
            messages.push(match entry.role {
                Role::User => ChatMessage::user(&entry.content),
                Role::Agent => ChatMessage::assistant(&entry.content),
            });
        }
        messages.push(ChatMessage::user(user_text));

        let raw = self
            .client
            .complete(
                messages,
                self.settings.llm.temperature,
                self.settings.llm.max_tokens,
            )
            .await;

        IntentOutcome::parse(&raw)
    }

    /// Derive search keywords, then run the dataset tool with them
    async fn dataset_search(&self, user_text: &str) -> ToolResultEnvelope {
        let keywords = self.derive_keywords(user_text).await;
        tracing::debug!(?keywords, "derived search keywords");

        self.tools
            .call(
                "search_movies",
                json!({
                    "keywords": keywords,
                    "limit": self.settings.search.default_limit,
                }),
            )
            .await
    }

    /// Keyword derivation ladder: deterministic table, generic movie
    /// mention, completion-assisted extraction, raw text. Never empty.
    async fn derive_keywords(&self, user_text: &str) -> Vec<String> {
        let mapped = mapped_keywords(user_text);
        if !mapped.is_empty() {
            return mapped;
        }

        if mentions_movies(user_text) {
            return vec!["movie".to_string(), "film".to_string()];
        }

        let reply = self
            .client
            .complete(
                vec![
                    ChatMessage::system(KEYWORD_EXTRACTION_PROMPT),
                    ChatMessage::user(user_text),
                ],
                0.3,
                50,
            )
            .await;

        if reply != FALLBACK_REPLY {
            let keywords: Vec<String> = reply
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .take(3)
                .collect();
            if !keywords.is_empty() {
                return keywords;
            }
        }

        vec![user_text.to_string()]
    }

    /// Turn the tool envelope into a display section and a record list.
    /// Anything malformed counts as an empty result set.
    fn read_search_envelope(&self, envelope: ToolResultEnvelope) -> (String, Vec<MovieRecord>) {
        let payload = match envelope.payload() {
            Some(p) => p,
            None => {
                tracing::warn!(id = envelope.id, "dataset search failed, treating as empty");
                return (
                    "The dataset search was unavailable this turn.".to_string(),
                    Vec::new(),
                );
            }
        };

        if payload["success"] != json!(true) {
            let message = payload["message"].as_str().unwrap_or("no matches found");
            return (format!("No dataset matches: {}", message), Vec::new());
        }

        let movies: Vec<MovieRecord> =
            match serde_json::from_value(payload["movies"].clone()) {
                Ok(movies) => movies,
                Err(e) => {
                    tracing::warn!(error = %e, "malformed search payload, treating as empty");
                    return (
                        "The dataset search returned an unreadable result.".to_string(),
                        Vec::new(),
                    );
                }
            };

        let mut section = format!("Found {} matching films:\n", movies.len());
        for (i, movie) in movies.iter().take(3).enumerate() {
            section.push_str(&format!(
                "{}. {} ({}) ⭐{}\n",
                i + 1,
                movie.title,
                movie.year,
                movie.rating
            ));
        }

        (section.trim_end().to_string(), movies)
    }

    /// Completion-generated commentary on the structured results
    async fn commentary(&self, user_text: &str, movies: &[MovieRecord]) -> String {
        if movies.is_empty() {
            return "No dataset matches to comment on yet.".to_string();
        }

        self.client
            .complete(
                vec![ChatMessage::system(commentary_prompt(user_text, movies))],
                self.settings.llm.temperature,
                300,
            )
            .await
    }

    /// Run the web-search escalation; partial or erroring results degrade
    /// to an explanatory message.
    async fn web_escalation(&self, user_text: &str) -> String {
        let web = match &self.web {
            Some(web) => web,
            None => {
                return "Web search is not configured, so no supplementary results are available."
                    .to_string();
            }
        };

        let recent_user_turns: Vec<&str> = self
            .history
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();
        let query = synthesize_web_query(&recent_user_turns, user_text);

        match web
            .search(&query, MOVIE_DOMAINS, self.settings.web.max_results)
            .await
        {
            Ok(hits) if !hits.is_empty() => {
                let mut section = format!("Query: {}\n", query);
                for (i, hit) in hits.iter().take(3).enumerate() {
                    section.push_str(&format!(
                        "{}. {} ({})\n   {}\n   {}\n",
                        i + 1,
                        hit.cleaned_title,
                        hit.source,
                        hit.snippet,
                        hit.url
                    ));
                }
                section.trim_end().to_string()
            }
            Ok(_) => "The web search returned no supplementary results.".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "web-search escalation failed");
                format!("The web search could not be completed: {}", e)
            }
        }
    }

    /// Merge the step outputs into one user-facing response, always
    /// closing with an invitation for another clue.
    fn compose(
        &self,
        direct: &str,
        search_section: &str,
        commentary: &str,
        web_section: Option<String>,
        intent: &IntentOutcome,
    ) -> String {
        let mut response = format!(
            "🎬 Movie identification:\n\n{}\n\n---\n\nDataset search:\n{}\n\n---\n\nCommentary:\n{}",
            direct, search_section, commentary
        );

        if let Some(reason) = intent.reason_no_match() {
            response.push_str(&format!("\nPossibly outside the dataset: {}", reason));
        }

        if let Some(web) = web_section {
            response.push_str(&format!("\n\n---\n\nWeb search:\n{}", web));
        }

        let invitation = intent.next_question().unwrap_or(
            "Do you remember any other clue? (actors, plot details, a memorable scene...)",
        );
        response.push_str(&format!("\n\n🤔 Next clue: {}", invitation));

        response
    }
}
