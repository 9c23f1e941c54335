// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::config::ClientConfig;
use super::executor::GraphqlExecutor;
use crate::core::error::{ConfigError, QueryError, TransportFault};
use crate::core::types::{RawResult, Variables};

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a Variables,
}

/// Executes documents against `{scheme}://{host}/v1/graphql`
#[derive(Clone, Debug)]
pub struct HttpExecutor {
    endpoint: String,
    client: Client,
}

impl HttpExecutor {
    /// Configuration problems surface as [`QueryError::Config`]; only a
    /// failing reqwest builder is a [`TransportFault::Build`].
    pub fn new(config: &ClientConfig) -> Result<Self, QueryError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|e| TransportFault::Build(e.to_string()))?;

        Ok(Self {
            endpoint: config.graphql_url(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    if let Some(api_key) = &config.api_key {
        headers.insert(
            AUTHORIZATION,
            header_value(AUTHORIZATION.as_str(), &format!("Bearer {}", api_key))?,
        );
    }

    if let (Some(service), Some(key)) = (config.model_service, &config.model_service_api_key) {
        let name = HeaderName::from_bytes(service.header().as_bytes()).map_err(|e| {
            ConfigError::InvalidHeader {
                name: service.header().to_string(),
                details: e.to_string(),
            }
        })?;
        headers.insert(name, header_value(service.header(), key)?);
    }

    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    let mut value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
        name: name.to_string(),
        details: e.to_string(),
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[async_trait]
impl GraphqlExecutor for HttpExecutor {
    async fn execute(
        &self,
        document: &str,
        variables: &Variables,
    ) -> Result<RawResult, TransportFault> {
        let request = GraphqlRequest {
            query: document,
            variables,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "graphql response received");

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| TransportFault::Decode(e.to_string()));
        }

        // Some failures still come back as a GraphQL error payload
        match serde_json::from_str::<RawResult>(&body) {
            Ok(raw) if raw.errors.as_ref().is_some_and(|errors| !errors.is_empty()) => Ok(raw),
            _ => Err(TransportFault::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
