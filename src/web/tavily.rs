//! Tavily search API adapter

use super::{clean_title, source_name, truncate_snippet, WebHit, WebSearch};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::time::{timeout, Duration};

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Characters a snippet is bounded to before composition
const SNIPPET_LIMIT: usize = 300;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl TavilyClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs,
        }
    }

    /// Build from the `TAVILY_API_KEY` environment variable; `None` when
    /// the key is absent, so the escalation path degrades instead of
    /// failing on every turn.
    pub fn from_env(timeout_secs: u64) -> Option<Self> {
        match std::env::var("TAVILY_API_KEY") {
            Ok(key) if !key.is_empty() => Some(Self::new(key, timeout_secs)),
            _ => {
                tracing::warn!("TAVILY_API_KEY not set, web-search escalation disabled");
                None
            }
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(
        &self,
        query: &str,
        domains: &[&str],
        max_results: usize,
    ) -> Result<Vec<WebHit>> {
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "search_depth": "advanced",
            "max_results": max_results,
            "include_domains": domains,
        });

        tracing::info!(query, "tavily web search");

        let request = async {
            let response = self
                .client
                .post(format!("{}/search", self.base_url))
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(anyhow!("tavily returned {}: {}", status, body));
            }

            let parsed: SearchResponse = response.json().await?;
            Ok::<_, anyhow::Error>(parsed)
        };

        let parsed = timeout(Duration::from_secs(self.timeout_secs), request)
            .await
            .map_err(|_| anyhow!("tavily search timed out after {}s", self.timeout_secs))??;

        let hits = parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|r| WebHit {
                cleaned_title: clean_title(&r.title),
                source: source_name(&r.url).to_string(),
                snippet: truncate_snippet(&r.content, SNIPPET_LIMIT),
                title: r.title,
                url: r.url,
            })
            .collect();

        Ok(hits)
    }
}
