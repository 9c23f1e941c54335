// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

use super::types::GraphqlError;

/// Errors detected while assembling a query, before any network call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    #[error("Argument '{argument}' is not supported by {operation} queries")]
    UnsupportedArgument {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("Malformed filter: {0}")]
    MalformedFilter(String),

    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("{0} queries require an entity name")]
    MissingEntity(&'static str),

    #[error("Explore queries do not take an entity name")]
    UnexpectedEntity,

    #[error("Field selection cannot be empty")]
    EmptySelection,

    #[error("Operation mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Invalid client configuration, detected before any request is sent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid model service: {value}. Acceptable values are: {accepted}")]
    InvalidModelService { value: String, accepted: String },

    #[error("Invalid scheme: {0}. Acceptable values are: http, https")]
    InvalidScheme(String),

    #[error("Host cannot be empty")]
    EmptyHost,

    #[error("Failed to parse environment variable '{key}': {details}")]
    Parse { key: String, details: String },

    #[error("Invalid header '{name}': {details}")]
    InvalidHeader { name: String, details: String },
}

/// Failures reaching the service; surfaced as-is, never retried here
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportFault {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportFault {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFault::Timeout
        } else if err.is_decode() {
            TransportFault::Decode(err.to_string())
        } else {
            TransportFault::Connection(err.to_string())
        }
    }
}

/// Unified error for `get`, `aggregate` and `explore`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportFault),

    #[error("Query failed: {}", join_messages(.0))]
    Execution(Vec<GraphqlError>),

    #[error("Unexpected response shape: {0}")]
    Normalization(String),
}

impl QueryError {
    /// Messages reported by the service, in order; empty for other variants
    pub fn messages(&self) -> Vec<&str> {
        match self {
            QueryError::Execution(errors) => errors.iter().map(|e| e.message.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
