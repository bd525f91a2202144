use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};

use super::{SearchError, SearchProvider};
use crate::config::{MAX_PROVIDER_RESULTS, MOCK_DOMAINS};
use crate::record::ResultRecord;

/// Deterministic offline search, for demos, tests, and as the fallback
/// when a networked provider fails.
///
/// Titles, URLs and ids depend only on the query. The publication time is
/// the current time unless pinned with [`MockSearch::with_published_at`].
#[derive(Debug, Clone, Default)]
pub struct MockSearch {
    published_at: Option<String>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps every result with a fixed publication time.
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Builds the results for `query` without going through the trait.
    pub fn results(&self, query: &str, n: usize) -> Vec<ResultRecord> {
        let published_at = self
            .published_at
            .clone()
            .unwrap_or_else(|| Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());
        let first_word = query.split_whitespace().next().unwrap_or_default();

        (0..n.min(MAX_PROVIDER_RESULTS))
            .map(|i| {
                let rank = i + 1;
                let domain = MOCK_DOMAINS[i % MOCK_DOMAINS.len()];
                let title = format!("Mock result {rank} for '{query}'");
                let url = format!("https://{domain}/article/{rank}/{}", short_hash(&title));
                let snippet = format!(
                    "This is a mock snippet for query '{query}'. Contains key tokens: {first_word}"
                );

                ResultRecord::new(url, title, snippet)
                    .with_domain(domain)
                    .with_published_at(published_at.clone())
                    .with_source_rank(rank as u32)
                    .with_raw(json!({ "mock_rank": rank }))
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(
        &self,
        query: &str,
        n: usize,
        _domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        Ok(self.results(query, n))
    }
}

fn short_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(digest)[..8].to_string()
}
