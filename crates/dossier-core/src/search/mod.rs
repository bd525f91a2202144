//! Retrieval boundary: providers that turn a query into evidence records.
//!
//! Every provider implements [`SearchProvider`]. The offline [`MockSearch`]
//! never fails and doubles as the fallback when a networked provider does.

mod backend;
mod error;
mod google;
mod mock;
mod serper;

pub use backend::SearchBackend;
pub use error::SearchError;
pub use google::GoogleCse;
pub use mock::MockSearch;
pub use serper::SerperSearch;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::record::ResultRecord;

/// A pluggable evidence source.
///
/// Implementations return at most `n` records, ranked by the provider
/// (`source_rank` 1-based). An empty list is a valid answer.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for `query`, optionally restricted to `domain_filters`.
    async fn search(
        &self,
        query: &str,
        n: usize,
        domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError>;
}

#[async_trait]
impl SearchProvider for Box<dyn SearchProvider> {
    async fn search(
        &self,
        query: &str,
        n: usize,
        domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        (**self).search(query, n, domain_filters).await
    }
}

#[async_trait]
impl SearchProvider for Arc<dyn SearchProvider> {
    async fn search(
        &self,
        query: &str,
        n: usize,
        domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        (**self).search(query, n, domain_filters).await
    }
}

/// Runs a search, aborting it once `timeout` elapses.
pub async fn search_within<S: SearchProvider + ?Sized>(
    provider: &S,
    query: &str,
    n: usize,
    domain_filters: &[String],
    timeout: Option<Duration>,
) -> Result<Vec<ResultRecord>, SearchError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, provider.search(query, n, domain_filters))
            .await
            .map_err(|_| SearchError::Timeout(limit.as_secs()))?,
        None => provider.search(query, n, domain_filters).await,
    }
}

/// Prefixes `query` with one `site:` operator per domain filter.
pub(crate) fn scoped_query(query: &str, domain_filters: &[String]) -> String {
    if domain_filters.is_empty() {
        return query.to_string();
    }
    let sites: Vec<String> = domain_filters.iter().map(|d| format!("site:{d}")).collect();
    format!("{} {}", sites.join(" "), query)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StuckProvider;

    #[async_trait]
    impl SearchProvider for StuckProvider {
        async fn search(
            &self,
            _query: &str,
            _n: usize,
            _domain_filters: &[String],
        ) -> Result<Vec<ResultRecord>, SearchError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn search_within_times_out() {
        let result =
            search_within(&StuckProvider, "q", 5, &[], Some(Duration::from_millis(10))).await;
        assert!(matches!(result, Err(SearchError::Timeout(_))));
    }

    #[test]
    fn scoped_query_without_filters_is_unchanged() {
        assert_eq!(scoped_query("rust async", &[]), "rust async");
    }

    #[test]
    fn scoped_query_adds_site_operators() {
        let filters = vec!["nature.com".to_string(), "nih.gov".to_string()];
        assert_eq!(
            scoped_query("fasting", &filters),
            "site:nature.com site:nih.gov fasting"
        );
    }
}
