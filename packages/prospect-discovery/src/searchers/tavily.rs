//! Tavily-backed prospect searcher.
//!
//! Tavily returns ranked web hits (url, title, content snippet, score). Each
//! hit becomes one AI-search record with `page_title`, `snippet`,
//! `source_url` and `relevance`; the normalizer derives the prospect name
//! from the page title.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{Result, SearchError, SearchResult};
use crate::security::ApiKey;
use crate::traits::searcher::ProspectSearcher;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Most results Tavily returns for one query.
const TAVILY_MAX_RESULTS: usize = 20;

pub struct TavilyProspectSearcher {
    api_key: ApiKey,
    client: reqwest::Client,
    endpoint: String,
    search_depth: String,
}

impl TavilyProspectSearcher {
    /// Create a new Tavily searcher.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_key(ApiKey::new(api_key))
    }

    /// Key from `TAVILY_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_key(ApiKey::from_env("TAVILY_API_KEY")?))
    }

    fn with_key(api_key: ApiKey) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
            search_depth: "basic".to_string(),
        }
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point at a different endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use Tavily's "advanced" depth (slower, costs more credits).
    pub fn advanced(mut self) -> Self {
        self.search_depth = "advanced".to_string();
        self
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Deserialize)]
struct TavilyHit {
    url: String,
    title: Option<String>,
    content: Option<String>,
    score: Option<f32>,
}

impl TavilyHit {
    fn into_record(self) -> Value {
        let mut record = json!({ "source_url": self.url });
        if let Some(title) = self.title {
            record["page_title"] = Value::String(title);
        }
        if let Some(content) = self.content {
            record["snippet"] = Value::String(content);
        }
        if let Some(score) = self.score {
            record["relevance"] = json!(score);
        }
        record
    }
}

fn status_error(status: reqwest::StatusCode) -> SearchError {
    match status.as_u16() {
        401 | 403 => SearchError::Unauthorized,
        429 | 432 | 433 => SearchError::RateLimited,
        408 | 504 => SearchError::Timeout,
        code => SearchError::Unavailable(format!("Tavily API error: HTTP {code}")),
    }
}

#[async_trait]
impl ProspectSearcher for TavilyProspectSearcher {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult<Vec<Value>> {
        if self.api_key.is_blank() {
            return Err(SearchError::Unauthorized);
        }

        let request = TavilyRequest {
            query,
            search_depth: &self.search_depth,
            max_results: max_results.clamp(1, TAVILY_MAX_RESULTS),
        };

        debug!(query = %query, max_results = request.max_results, "Tavily search starting");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", self.api_key.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Tavily search failed");
            return Err(status_error(status));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(body.results.into_iter().map(TavilyHit::into_record).collect())
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
