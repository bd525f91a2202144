use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{scoped_query, SearchError, SearchProvider};
use crate::config::{DEFAULT_SERPER_URL, MAX_PROVIDER_RESULTS};
use crate::record::ResultRecord;

/// Serper.dev Google search API.
pub struct SerperSearch {
    api_key: String,
    endpoint: String,
    client: Client,
}

impl SerperSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_SERPER_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    async fn search(
        &self,
        query: &str,
        n: usize,
        domain_filters: &[String],
    ) -> Result<Vec<ResultRecord>, SearchError> {
        let body = json!({
            "q": scoped_query(query, domain_filters),
            "num": n.min(MAX_PROVIDER_RESULTS),
        });

        tracing::debug!(provider = "serper", n, "searching");
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
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

        parse_organic(&raw, n)
    }
}

/// Converts the `organic` section of a Serper response into ranked records.
fn parse_organic(raw: &serde_json::Value, n: usize) -> Result<Vec<ResultRecord>, SearchError> {
    let body: SerperResponse =
        serde_json::from_value(raw.clone()).map_err(|e| SearchError::Parse(e.to_string()))?;

    Ok(body
        .organic
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, hit)| {
            let mut record = ResultRecord::new(hit.link, hit.title, hit.snippet)
                .with_source_rank(hit.position.unwrap_or(i as u32 + 1));
            record.published_at = hit.date;
            record
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<OrganicHit>,
}

#[derive(Debug, Deserialize)]
struct OrganicHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
    date: Option<String>,
    position: Option<u32>,
}
