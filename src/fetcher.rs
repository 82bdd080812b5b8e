use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{CONFIG, SearchSettings};
use crate::data_models::{ScholarResponse, SearchResult};

const ENGINE: &str = "google_scholar";
/// `scisbd`: 0 ranks by relevance rather than by date added.
const SORT_FLAG: &str = "0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a single page request produced no results. None of these abort the harvest.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rate limited by search service")]
    RateLimited,

    #[error("search service returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("search service error: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Parameters of one paged Scholar request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub keyword: &'a str,
    pub year_from: u16,
    pub year_to: u16,
    pub offset: usize,
    pub num: usize,
    pub language: &'a str,
}

impl<'a> PageRequest<'a> {
    pub fn new(settings: &'a SearchSettings, offset: usize) -> PageRequest<'a> {
        PageRequest {
            keyword: &settings.keyword,
            year_from: settings.year_from,
            year_to: settings.year_to,
            offset,
            num: settings.results_per_request,
            language: &settings.language,
        }
    }

    /// Query string pairs, without the credential.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("engine", ENGINE.to_string()),
            ("q", self.keyword.to_string()),
            ("hl", self.language.to_string()),
            ("as_ylo", self.year_from.to_string()),
            ("as_yhi", self.year_to.to_string()),
            ("num", self.num.to_string()),
            ("start", self.offset.to_string()),
            ("scisbd", SORT_FLAG.to_string()),
        ]
    }
}

/// Anything that can answer a paged Scholar query.
pub trait ScholarSource {
    fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> impl Future<Output = Result<Vec<SearchResult>, FetchError>>;
}

/// SerpAPI-backed [`ScholarSource`].
pub struct SerpApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<SerpApiClient, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(SerpApiClient {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Client using `SERPAPI_BASE_URL` and `SERPAPI_KEY` from the environment.
    pub fn from_config() -> Result<SerpApiClient, FetchError> {
        Self::new(&CONFIG.serpapi_base_url, &CONFIG.serpapi_key)
    }

    fn parse_body(status: StatusCode, body: &str) -> Result<Vec<SearchResult>, FetchError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            // Error bodies are usually `{"error": "..."}`, fall back to the raw text.
            let message = serde_json::from_str::<ScholarResponse>(body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| body.trim().to_string());
            return Err(FetchError::Status { status, message });
        }

        let response: ScholarResponse = serde_json::from_str(body)?;
        if let Some(error) = response.error {
            return Err(FetchError::Api(error));
        }
        Ok(response
            .organic_results
            .into_iter()
            .map(SearchResult::from)
            .collect())
    }
}

impl ScholarSource for SerpApiClient {
    async fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<Vec<SearchResult>, FetchError> {
        let mut params = request.query_params();
        params.push(("api_key", self.api_key.clone()));

        let res = self.client.get(&self.base_url).query(&params).send().await?;
        let status = res.status();
        let body = res.text().await?;
        Self::parse_body(status, &body)
    }
}

/// Walks the page offsets sequentially and accumulates results up to the target.
pub struct Fetcher<S> {
    source: S,
    settings: SearchSettings,
}

impl<S: ScholarSource> Fetcher<S> {
    pub fn new(source: S, settings: SearchSettings) -> Fetcher<S> {
        Fetcher { source, settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Results in fetch order, at most `target_results` long. A failed page is
    /// logged and skipped, it is never retried at the same offset.
    pub async fn fetch_all(&self) -> Vec<SearchResult> {
        let target = self.settings.target_results;
        let mut all_results: Vec<SearchResult> = Vec::new();

        for offset in self.settings.offsets() {
            let request = PageRequest::new(&self.settings, offset);
            match self.source.fetch_page(&request).await {
                Ok(page) => {
                    let found = page.len();
                    all_results.extend(page);
                    log::info!(
                        "found {} papers on page {}, total: {}",
                        found,
                        self.settings.page_number(offset),
                        all_results.len()
                    );
                    if all_results.len() >= target {
                        all_results.truncate(target);
                        break;
                    }
                }
                Err(e) => {
                    log::error!("error at start={offset}: {:#}", e);
                    tokio::time::sleep(self.settings.failure_delay).await;
                    continue;
                }
            }
            tokio::time::sleep(self.settings.success_delay).await;
        }

        all_results
    }
}
