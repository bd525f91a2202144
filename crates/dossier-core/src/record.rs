//! Normalized evidence records returned by retrieval providers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One retrieved evidence item.
///
/// `id` is derived from `url` and `title` when the record is built, so the
/// same source always gets the same id across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Content-derived identifier (hex SHA-256 of url + title).
    pub id: String,
    pub title: String,
    pub snippet: String,
    /// Absolute URL; the dedup and citation key.
    pub url: String,
    /// Hostname used for reliability lookup.
    pub domain: String,
    /// ISO-8601 publication timestamp, when the provider knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Combined score in [0, 1]; `None` until scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// 1-based rank reported by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_rank: Option<u32>,
    /// Provider payload, carried along but never interpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl ResultRecord {
    /// Creates an unscored record. The domain is taken from the URL host.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let title = title.into();
        Self {
            id: make_id(&url, &title),
            domain: domain_of(&url),
            title,
            snippet: snippet.into(),
            url,
            published_at: None,
            score: None,
            source_rank: None,
            raw: None,
        }
    }

    /// Overrides the domain derived from the URL.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_source_rank(mut self, rank: u32) -> Self {
        self.source_rank = Some(rank);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Title and snippet joined by a space, the text compared for
    /// near-duplicates and matched against keywords.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }

    /// Title and snippet as a single sentence-like claim.
    pub fn claim_text(&self) -> String {
        format!("{}. {}", self.title, self.snippet)
    }
}

/// Deterministic identifier for a (url, title) pair.
pub fn make_id(url: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(title.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hostname of `url`, or an empty string when it has none.
pub fn domain_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}
