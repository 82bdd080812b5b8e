use serde::{Deserialize, Serialize, Serializer};

pub const NO_TITLE: &str = "No title";
pub const NO_SNIPPET: &str = "No snippet available";
pub const NO_LINK: &str = "No link";

/// Body of a SerpAPI `google_scholar` response. Only the parts the harvest reads.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ScholarResponse {
    /// SerpAPI reports failures in-band, e.g. an invalid key or exhausted quota.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub inline_links: Option<InlineLinks>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct InlineLinks {
    #[serde(default)]
    pub cited_by: Option<CitedBy>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CitedBy {
    #[serde(default)]
    pub total: Option<u64>,
}

/// One organic Scholar result, as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: Option<String>,
    pub cited_by: u64,
}

impl SearchResult {
    pub fn new(title: &str, snippet: &str, link: Option<&str>, cited_by: u64) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            snippet: snippet.to_string(),
            link: link.map(str::to_string),
            cited_by,
        }
    }
}

impl From<OrganicResult> for SearchResult {
    fn from(raw: OrganicResult) -> Self {
        let cited_by = raw
            .inline_links
            .and_then(|links| links.cited_by)
            .and_then(|cited| cited.total)
            .unwrap_or(0);

        SearchResult {
            title: raw.title.unwrap_or_else(|| NO_TITLE.to_string()),
            snippet: raw.snippet.unwrap_or_else(|| NO_SNIPPET.to_string()),
            link: raw.link,
            cited_by,
        }
    }
}

/// A ranked result together with the keywords extracted from its snippet.
/// Field order and names are the CSV columns.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Snippet")]
    pub snippet: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Cites_by")]
    pub cited_by: u64,
    #[serde(rename = "Keywords", serialize_with = "join_keywords")]
    pub keywords: Vec<String>,
}

impl EnrichedRecord {
    pub fn new(result: SearchResult, keywords: Vec<String>) -> EnrichedRecord {
        EnrichedRecord {
            title: result.title,
            snippet: result.snippet,
            link: result.link.unwrap_or_else(|| NO_LINK.to_string()),
            cited_by: result.cited_by,
            keywords,
        }
    }
}

#[allow(clippy::ptr_arg)]
fn join_keywords<S: Serializer>(keywords: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&keywords.join(", "))
}
