use super::{ClaudeClient, LLMError, MockLLM, OpenAIClient, LLM};
use crate::config::{
    LLMConfig, DEFAULT_ANTHROPIC_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_OLLAMA_MODEL,
    DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL,
};

/// LLM Provider configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    /// OpenAI-compatible endpoint
    OpenAI {
        base_url: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
    },
    /// Anthropic Claude
    Anthropic {
        api_key: Option<String>,
        model: Option<String>,
        api_version: Option<String>,
        /// Full messages endpoint, for proxies
        api_url: Option<String>,
    },
    /// Local Ollama instance
    Ollama {
        base_url: Option<String>,
        model: String,
    },
    /// Deterministic offline generator
    Mock,
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Mock
    }
}

impl Provider {
    /// Creates a provider from LLMConfig.
    ///
    /// `"auto"` defers to [`Provider::detect`].
    pub fn from_config(config: &LLMConfig) -> Result<Self, LLMError> {
        match config.provider.to_lowercase().as_str() {
            "auto" => Ok(Self::detect()),
            "mock" => Ok(Provider::Mock),
            "anthropic" | "claude" => Ok(Provider::Anthropic {
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                api_version: config.api_version.clone(),
                api_url: config.base_url.clone(),
            }),
            "ollama" => Ok(Provider::Ollama {
                base_url: config.base_url.clone(),
                model: config.model_or_default(),
            }),
            "openai" | "openai-compatible" => Ok(Provider::OpenAI {
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            }),
            other => Err(LLMError::UnknownProvider(other.to_string())),
        }
    }

    /// Creates an LLM client from the provider configuration, with the
    /// default per-request token cap.
    pub fn build(self) -> Result<Box<dyn LLM>, LLMError> {
        self.build_capped(DEFAULT_MAX_TOKENS)
    }

    /// Creates an LLM client whose requests never ask for more than
    /// `max_tokens`.
    ///
    /// Networked providers fail with [`LLMError::MissingApiKey`] when
    /// their credentials are absent; they never fall back to the mock.
    pub fn build_capped(self, max_tokens: u32) -> Result<Box<dyn LLM>, LLMError> {
        match self {
            Provider::OpenAI {
                base_url,
                api_key,
                model,
            } => {
                let base = base_url
                    .or_else(|| std::env::var("DOSSIER_LLM_BASE_URL").ok())
                    .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
                    .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());

                let key = api_key
                    .or_else(|| std::env::var("DOSSIER_LLM_API_KEY").ok())
                    .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                    .unwrap_or_default();

                // Self-hosted compatible servers may run keyless; the hosted API never does.
                if key.is_empty() && base.trim_end_matches('/') == DEFAULT_OPENAI_URL {
                    return Err(LLMError::MissingApiKey("openai".to_string()));
                }

                let mdl = model
                    .or_else(|| std::env::var("DOSSIER_LLM_MODEL").ok())
                    .or_else(|| std::env::var("OPENAI_MODEL").ok())
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

                Ok(Box::new(
                    OpenAIClient::new(base, key, mdl).with_max_tokens(max_tokens),
                ))
            }

            Provider::Anthropic {
                api_key,
                model,
                api_version,
                api_url,
            } => {
                let key = api_key
                    .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| LLMError::MissingApiKey("anthropic".to_string()))?;

                let mdl = model
                    .or_else(|| std::env::var("ANTHROPIC_MODEL").ok())
                    .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string());

                let mut client = ClaudeClient::new(key)
                    .with_model(mdl)
                    .with_max_tokens(max_tokens);
                if let Some(version) = api_version {
                    client = client.with_api_version(version);
                }
                if let Some(url) = api_url {
                    client = client.with_api_url(url);
                }
                Ok(Box::new(client))
            }

            Provider::Ollama { base_url, model } => {
                let base = base_url
                    .or_else(|| {
                        std::env::var("OLLAMA_HOST")
                            .ok()
                            .map(|h| format!("{}/v1", h.trim_end_matches('/')))
                    })
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

                Ok(Box::new(
                    OpenAIClient::new(base, "", model).with_max_tokens(max_tokens),
                ))
            }

            Provider::Mock => Ok(Box::new(MockLLM::new())),
        }
    }

    /// Builds the client described by an [`LLMConfig`].
    pub fn build_from_config(config: &LLMConfig) -> Result<Box<dyn LLM>, LLMError> {
        Self::from_config(config)?.build_capped(config.max_tokens)
    }

    /// Auto-detect provider from environment variables.
    ///
    /// Detection order:
    /// 1. DOSSIER_LLM_BASE_URL set → OpenAI-compatible
    /// 2. ANTHROPIC_API_KEY set → Anthropic
    /// 3. OPENAI_API_KEY set → OpenAI
    /// 4. OLLAMA_HOST set → Ollama
    /// 5. Otherwise the offline mock
    pub fn detect() -> Self {
        if std::env::var("DOSSIER_LLM_BASE_URL").is_ok() {
            return Provider::OpenAI {
                base_url: None,
                api_key: None,
                model: None,
            };
        }

        if std::env::var("ANTHROPIC_API_KEY").is_ok() {
            return Provider::Anthropic {
                api_key: None,
                model: None,
                api_version: None,
                api_url: None,
            };
        }

        if std::env::var("OPENAI_API_KEY").is_ok() {
            return Provider::OpenAI {
                base_url: None,
                api_key: None,
                model: None,
            };
        }

        if std::env::var("OLLAMA_HOST").is_ok() {
            let model = std::env::var("DOSSIER_LLM_MODEL")
                .or_else(|_| std::env::var("OLLAMA_MODEL"))
                .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
            return Provider::Ollama {
                base_url: None,
                model,
            };
        }

        Provider::Mock
    }

    /// Short provider name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "openai",
            Provider::Anthropic { .. } => "anthropic",
            Provider::Ollama { .. } => "ollama",
            Provider::Mock => "mock",
        }
    }
}
