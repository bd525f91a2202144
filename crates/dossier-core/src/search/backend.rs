use super::{GoogleCse, MockSearch, SearchError, SearchProvider, SerperSearch};
use crate::config::SearchConfig;

/// Retrieval provider selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchBackend {
    /// Deterministic offline results
    #[default]
    Mock,
    /// Google Custom Search
    Google {
        api_key: Option<String>,
        cx: Option<String>,
        endpoint: Option<String>,
    },
    /// Serper.dev
    Serper {
        api_key: Option<String>,
        endpoint: Option<String>,
    },
}

impl SearchBackend {
    /// Creates a backend from SearchConfig.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        match config.provider.to_lowercase().as_str() {
            "mock" | "offline" => Ok(SearchBackend::Mock),
            "google" => Ok(SearchBackend::Google {
                api_key: config.api_key.clone(),
                cx: config.cx.clone(),
                endpoint: config.endpoint.clone(),
            }),
            "serper" => Ok(SearchBackend::Serper {
                api_key: config.api_key.clone(),
                endpoint: config.endpoint.clone(),
            }),
            other => Err(SearchError::UnknownProvider(other.to_string())),
        }
    }

    /// Creates the provider, failing fast when a networked backend has no
    /// credentials.
    pub fn build(self) -> Result<Box<dyn SearchProvider>, SearchError> {
        match self {
            SearchBackend::Mock => Ok(Box::new(MockSearch::new())),

            SearchBackend::Google {
                api_key,
                cx,
                endpoint,
            } => {
                let key = api_key
                    .or_else(|| std::env::var("GOOGLE_CSE_API_KEY").ok())
                    .filter(|k| !k.is_empty());
                let cx = cx
                    .or_else(|| std::env::var("GOOGLE_CSE_CX").ok())
                    .filter(|c| !c.is_empty());

                match (key, cx) {
                    (Some(key), Some(cx)) => {
                        let mut provider = GoogleCse::new(key, cx);
                        if let Some(endpoint) = endpoint {
                            provider = provider.with_endpoint(endpoint);
                        }
                        Ok(Box::new(provider))
                    }
                    _ => Err(SearchError::MissingCredentials {
                        provider: "google".to_string(),
                        hint: "set GOOGLE_CSE_API_KEY and GOOGLE_CSE_CX".to_string(),
                    }),
                }
            }

            SearchBackend::Serper { api_key, endpoint } => {
                let key = api_key
                    .or_else(|| std::env::var("SERPER_API_KEY").ok())
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| SearchError::MissingCredentials {
                        provider: "serper".to_string(),
                        hint: "set SERPER_API_KEY".to_string(),
                    })?;
                let mut provider = SerperSearch::new(key);
                if let Some(endpoint) = endpoint {
                    provider = provider.with_endpoint(endpoint);
                }
                Ok(Box::new(provider))
            }
        }
    }

    /// Builds the provider described by a [`SearchConfig`].
    pub fn build_from_config(config: &SearchConfig) -> Result<Box<dyn SearchProvider>, SearchError> {
        Self::from_config(config)?.build()
    }

    /// Short backend name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SearchBackend::Mock => "mock",
            SearchBackend::Google { .. } => "google",
            SearchBackend::Serper { .. } => "serper",
        }
    }
}
