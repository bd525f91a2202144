use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{scoped_query, SearchError, SearchProvider};
use crate::config::{DEFAULT_GOOGLE_CSE_URL, MAX_PROVIDER_RESULTS};
use crate::record::ResultRecord;

/// Google Custom Search JSON API.
///
/// Requires an API key and a search engine id (`cx`).
pub struct GoogleCse {
    api_key: String,
    cx: String,
    endpoint: String,
    client: Client,
}

impl GoogleCse {
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            cx: cx.into(),
            endpoint: DEFAULT_GOOGLE_CSE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Points the client at a different endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for GoogleCse {
    async fn search(
        &self,
        query: &str,
        n: usize,
        domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        let q = scoped_query(query, domain_filters);
        let num = n.min(MAX_PROVIDER_RESULTS).to_string();

        tracing::debug!(provider = "google", n, "searching");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cx.as_str()),
                ("q", q.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        parse_items(&raw, n)
    }
}

/// Converts a Custom Search response body into ranked records.
fn parse_items(raw: &serde_json::Value, n: usize) -> Result<Vec<ResultRecord>, SearchError> {
    let body: CseResponse =
        serde_json::from_value(raw.clone()).map_err(|e| SearchError::Parse(e.to_string()))?;

    Ok(body
        .items
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, item)| {
            let published = item.published_time();
            let raw_item = item.pagemap;
            let mut record = ResultRecord::new(item.link, item.title, item.snippet)
                .with_source_rank(i as u32 + 1)
                .with_raw(raw_item);
            record.published_at = published;
            record
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    pagemap: serde_json::Value,
}

impl CseItem {
    /// Publication time from the page's `article:published_time` meta tag.
    fn published_time(&self) -> Option<String> {
        self.pagemap
            .get("metatags")?
            .as_array()?
            .iter()
            .find_map(|tags| tags.get("article:published_time")?.as_str())
            .map(str::to_string)
    }
}
