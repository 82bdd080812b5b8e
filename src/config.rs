use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com/search.json";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        // A missing key is not an error here; every page request fails instead.
        serpapi_key: get_env_or_default("SERPAPI_KEY", ""),
        serpapi_base_url: get_env_or_default("SERPAPI_BASE_URL", DEFAULT_SERPAPI_URL),
    }
});

pub struct Config {
    pub serpapi_key: String,
    pub serpapi_base_url: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Fixed parameters of the Scholar harvest. There are no CLI flags, so these
/// are the only knobs; tests shorten the delays.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub keyword: String,
    pub year_from: u16,
    pub year_to: u16,
    /// Hard cap on the number of results kept.
    pub target_results: usize,
    /// Offset increment between consecutive page requests.
    pub page_step: usize,
    /// Offsets are requested while strictly below this bound.
    pub max_offset: usize,
    /// Value sent as `num` on every request.
    pub results_per_request: usize,
    pub language: String,
    pub success_delay: Duration,
    pub failure_delay: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            keyword: "Byzantine Fault Tolerance".to_string(),
            year_from: 2021,
            year_to: 2024,
            target_results: 100,
            page_step: 20,
            max_offset: 200,
            results_per_request: 100,
            language: "en".to_string(),
            success_delay: Duration::from_secs(2),
            failure_delay: Duration::from_secs(5),
        }
    }
}

impl SearchSettings {
    /// Page offsets in request order: `0, step, 2 * step, ...` below `max_offset`.
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.max_offset).step_by(self.page_step.max(1))
    }

    /// One-based page number used in progress lines.
    pub fn page_number(&self, offset: usize) -> usize {
        offset / self.page_step.max(1) + 1
    }
}
