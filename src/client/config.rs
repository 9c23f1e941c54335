// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use crate::core::error::ConfigError;

pub const API_VERSION: &str = "v1";

/// Vectorizer providers whose API key is forwarded as a request header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelService {
    OpenAi,
    Cohere,
    HuggingFace,
}

impl ModelService {
    pub const ALL: [ModelService; 3] = [
        ModelService::OpenAi,
        ModelService::Cohere,
        ModelService::HuggingFace,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ModelService::OpenAi => "openai",
            ModelService::Cohere => "cohere",
            ModelService::HuggingFace => "huggingface",
        }
    }

    /// Header carrying the provider's API key
    pub const fn header(self) -> &'static str {
        match self {
            ModelService::OpenAi => "X-OpenAI-Api-Key",
            ModelService::Cohere => "X-Cohere-Api-Key",
            ModelService::HuggingFace => "X-HuggingFace-Api-Key",
        }
    }
}

impl FromStr for ModelService {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|service| service.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::InvalidModelService {
                value: s.to_string(),
                accepted: Self::ALL
                    .iter()
                    .map(|service| service.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for ModelService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub scheme: String,
    pub host: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
    pub model_service: Option<ModelService>,
    pub model_service_api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
            api_key: None,
            model_service: None,
            model_service_api_key: None,
        }
    }
}

impl ClientConfig {
    /// Load from `WEAVIATE_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; `from_env` uses the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = match lookup("WEAVIATE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(
                |e: std::num::ParseIntError| ConfigError::Parse {
                    key: "WEAVIATE_TIMEOUT_SECS".to_string(),
                    details: e.to_string(),
                },
            )?),
            None => defaults.timeout,
        };

        let model_service = lookup("WEAVIATE_MODEL_SERVICE")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<ModelService>())
            .transpose()?;

        let config = Self {
            scheme: lookup("WEAVIATE_SCHEME").unwrap_or(defaults.scheme),
            host: lookup("WEAVIATE_HOST").unwrap_or(defaults.host),
            timeout,
            api_key: lookup("WEAVIATE_API_KEY").filter(|s| !s.is_empty()),
            model_service,
            model_service_api_key: lookup("WEAVIATE_MODEL_SERVICE_API_KEY")
                .filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConfigError::InvalidScheme(self.scheme.clone()));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(())
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}/{}", self.scheme, self.host, API_VERSION)
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.graphql_url(), "http://localhost:8080/v1/graphql");
    }

    #[test]
    fn test_full_environment() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("WEAVIATE_SCHEME", "https"),
            ("WEAVIATE_HOST", "demo.weaviate.network"),
            ("WEAVIATE_TIMEOUT_SECS", "5"),
            ("WEAVIATE_API_KEY", "secret"),
            ("WEAVIATE_MODEL_SERVICE", "OpenAI"),
            ("WEAVIATE_MODEL_SERVICE_API_KEY", "sk-123"),
        ]))
        .unwrap();

        assert_eq!(config.graphql_url(), "https://demo.weaviate.network/v1/graphql");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model_service, Some(ModelService::OpenAi));
        assert_eq!(config.model_service_api_key.as_deref(), Some("sk-123"));
    }

    #[test]
    fn test_invalid_model_service() {
        let err = ClientConfig::from_lookup(lookup(&[("WEAVIATE_MODEL_SERVICE", "palm")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid model service: palm. Acceptable values are: openai, cohere, huggingface"
        );
    }

    #[test]
    fn test_invalid_scheme_and_timeout() {
        let scheme = ClientConfig::from_lookup(lookup(&[("WEAVIATE_SCHEME", "ftp")]));
        assert!(matches!(scheme, Err(ConfigError::InvalidScheme(_))));

        let timeout = ClientConfig::from_lookup(lookup(&[("WEAVIATE_TIMEOUT_SECS", "soon")]));
        assert!(matches!(timeout, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_model_service_headers() {
        assert_eq!(ModelService::OpenAi.header(), "X-OpenAI-Api-Key");
        assert_eq!(ModelService::Cohere.header(), "X-Cohere-Api-Key");
        assert_eq!(ModelService::HuggingFace.header(), "X-HuggingFace-Api-Key");
    }
}
