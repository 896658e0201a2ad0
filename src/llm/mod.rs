//! Completion Client - Provider-Redundant Text Completion
//!
//! Information Hiding:
//! - Number and identity of upstream providers hidden behind one client
//! - Failover order, backoff, and error classification internalized
//! - Callers see a `complete` that always yields text

pub mod gemini;
pub mod openai;

use crate::config::Settings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Returned as a last resort when every configured provider has failed
pub const FALLBACK_REPLY: &str =
    "Sorry, the assistant is temporarily unavailable. Please try again in a moment.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// One completion call; constructed fresh per request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("http transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to decode provider response: {0}")]
    Decode(String),
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider returned an empty completion")]
    Empty,
}

impl ProviderError {
    /// Rate-limit and quota errors get a short pause before the chain
    /// advances; everything else advances immediately.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Api { body, .. } => {
                let body = body.to_lowercase();
                body.contains("rate_limit") || body.contains("rate limit") || body.contains("quota")
            }
            _ => false,
        }
    }
}

/// One interchangeable upstream text-completion implementation
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// Observable state of the completion chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientStatus {
    pub providers: Vec<String>,
    pub current_provider: Option<String>,
    pub degraded: bool,
}

/// Ordered-failover completion client
///
/// Walks the provider chain in priority order; first success wins. Never
/// fails outward: total upstream failure yields [`FALLBACK_REPLY`] and
/// flips the degraded flag.
pub struct FallbackClient {
    providers: Vec<Arc<dyn CompletionProvider>>,
    call_timeout: Duration,
    rate_limit_pause: Duration,
    current_provider: RwLock<Option<String>>,
    degraded: AtomicBool,
}

impl FallbackClient {
    pub fn new(
        providers: Vec<Arc<dyn CompletionProvider>>,
        call_timeout: Duration,
        rate_limit_pause: Duration,
    ) -> Self {
        Self {
            providers,
            call_timeout,
            rate_limit_pause,
            current_provider: RwLock::new(None),
            degraded: AtomicBool::new(false),
        }
    }

    /// Build the chain from configuration and environment credentials.
    /// Providers whose keys are absent are excluded from the chain up
    /// front instead of failing on every call.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut providers: Vec<Arc<dyn CompletionProvider>> = Vec::new();

        if let Some(key) = Settings::openai_api_key() {
            providers.push(Arc::new(OpenAiProvider::new(
                "openai-primary",
                key,
                settings.llm.model.clone(),
            )));
        }
        if let Some(key) = Settings::openai_backup_api_key() {
            providers.push(Arc::new(OpenAiProvider::new(
                "openai-backup",
                key,
                settings.llm.model.clone(),
            )));
        }
        if let Some(key) = Settings::google_api_key() {
            providers.push(Arc::new(GeminiProvider::new(
                "gemini",
                key,
                settings.llm.gemini_model.clone(),
            )));
        }

        tracing::info!(
            providers = providers.len(),
            chain = ?providers.iter().map(|p| p.id()).collect::<Vec<_>>(),
            "completion chain configured"
        );

        Self::new(
            providers,
            Duration::from_secs(settings.llm.timeout_secs),
            Duration::from_millis(settings.llm.rate_limit_pause_ms),
        )
    }

    /// Produce a completion. Never errors; the worst case is the fixed
    /// fallback reply with the session marked degraded.
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: u32,
    ) -> String {
        let request = CompletionRequest {
            messages,
            temperature,
            max_tokens,
        };

        for provider in &self.providers {
            let id = provider.id();
            let started = Instant::now();

            let outcome = match tokio::time::timeout(self.call_timeout, provider.complete(&request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.call_timeout)),
            };
            let latency_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::info!(provider = id, latency_ms, outcome = "success");
                    self.record_provider(id);
                    return text;
                }
                Ok(_) => {
                    tracing::warn!(provider = id, latency_ms, outcome = "empty");
                }
                Err(e) => {
                    tracing::warn!(provider = id, latency_ms, outcome = "error", error = %e);
                    if e.is_rate_limit() {
                        tracing::info!(
                            provider = id,
                            pause_ms = self.rate_limit_pause.as_millis() as u64,
                            "rate limit detected, pausing before next provider"
                        );
                        tokio::time::sleep(self.rate_limit_pause).await;
                    }
                }
            }
        }

        tracing::error!("all completion providers failed, returning fallback reply");
        self.degraded.store(true, Ordering::Relaxed);
        self.record_provider("fallback");
        FALLBACK_REPLY.to_string()
    }

    fn record_provider(&self, id: &str) {
        if let Ok(mut current) = self.current_provider.write() {
            *current = Some(id.to_string());
        }
    }

    pub fn current_provider(&self) -> Option<String> {
        self.current_provider.read().ok().and_then(|c| c.clone())
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn status(&self) -> ClientStatus {
        ClientStatus {
            providers: self.providers.iter().map(|p| p.id().to_string()).collect(),
            current_provider: self.current_provider(),
            degraded: self.is_degraded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct StaticProvider {
        id: &'static str,
        reply: Option<&'static str>,
        rate_limited: bool,
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn healthy(id: &'static str, reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: Some(reply),
                rate_limited: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: None,
                rate_limited: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn rate_limited(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: None,
                rate_limited: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl CompletionProvider for StaticProvider {
        fn id(&self) -> &str {
            self.id
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.rate_limited {
                return Err(ProviderError::RateLimited("quota exceeded".to_string()));
            }
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(ProviderError::Api {
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl CompletionProvider for HangingProvider {
        fn id(&self) -> &str {
            "hanging"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("never".to_string())
        }
    }

    fn client(providers: Vec<Arc<dyn CompletionProvider>>) -> FallbackClient {
        FallbackClient::new(
            providers,
            Duration::from_millis(200),
            Duration::from_millis(1),
        )
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let first = StaticProvider::healthy("first", "from first");
        let second = StaticProvider::healthy("second", "from second");
        let client = client(vec![first.clone(), second.clone()]);

        let reply = client.complete(vec![ChatMessage::user("hi")], 0.7, 100).await;

        assert_eq!(reply, "from first");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
        assert_eq!(client.current_provider().as_deref(), Some("first"));
        assert!(!client.is_degraded());
    }

    #[tokio::test]
    async fn test_failure_advances_chain() {
        let first = StaticProvider::failing("first");
        let second = StaticProvider::healthy("second", "from second");
        let client = client(vec![first.clone(), second.clone()]);

        let reply = client.complete(vec![ChatMessage::user("hi")], 0.7, 100).await;

        assert_eq!(reply, "from second");
        assert_eq!(first.call_count(), 1);
        assert_eq!(client.current_provider().as_deref(), Some("second"));
        assert!(!client.is_degraded());
    }

    #[tokio::test]
    async fn test_all_providers_failing_returns_fallback() {
        let first = StaticProvider::failing("first");
        let second = StaticProvider::rate_limited("second");
        let client = client(vec![first, second]);

        let reply = client.complete(vec![ChatMessage::user("hi")], 0.7, 100).await;

        assert_eq!(reply, FALLBACK_REPLY);
        assert!(client.is_degraded());
        assert_eq!(client.current_provider().as_deref(), Some("fallback"));
    }

    #[tokio::test]
    async fn test_empty_chain_returns_fallback() {
        let client = client(vec![]);
        let reply = client.complete(vec![ChatMessage::user("hi")], 0.7, 100).await;
        assert_eq!(reply, FALLBACK_REPLY);
        assert!(client.is_degraded());
    }

    #[tokio::test]
    async fn test_rate_limited_provider_still_advances() {
        let first = StaticProvider::rate_limited("first");
        let second = StaticProvider::healthy("second", "recovered");
        let client = client(vec![first.clone(), second]);

        let reply = client.complete(vec![ChatMessage::user("hi")], 0.7, 100).await;

        assert_eq!(reply, "recovered");
        assert_eq!(first.call_count(), 1);
    }

    #[tokio::test]
    async fn test_hanging_provider_times_out_and_advances() {
        let second = StaticProvider::healthy("second", "after timeout");
        let client = client(vec![Arc::new(HangingProvider), second]);

        let reply = client.complete(vec![ChatMessage::user("hi")], 0.7, 100).await;

        assert_eq!(reply, "after timeout");
    }

    #[tokio::test]
    async fn test_empty_success_is_treated_as_failure() {
        let first = StaticProvider::healthy("first", "   ");
        let second = StaticProvider::healthy("second", "real answer");
        let client = client(vec![first, second]);

        let reply = client.complete(vec![ChatMessage::user("hi")], 0.7, 100).await;

        assert_eq!(reply, "real answer");
    }

    #[test]
    fn test_rate_limit_classification() {
        assert!(ProviderError::RateLimited("x".to_string()).is_rate_limit());
        assert!(ProviderError::Api {
            status: 429,
            body: "Rate limit reached for requests".to_string()
        }
        .is_rate_limit());
        assert!(ProviderError::Api {
            status: 403,
            body: "insufficient quota".to_string()
        }
        .is_rate_limit());
        assert!(!ProviderError::Api {
            status: 500,
            body: "server error".to_string()
        }
        .is_rate_limit());
    }
}
