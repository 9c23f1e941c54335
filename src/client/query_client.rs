// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use tracing::{debug, warn};

use super::config::ClientConfig;
use super::executor::GraphqlExecutor;
use super::http::HttpExecutor;
use crate::core::error::{ConstructionError, QueryError};
use crate::core::types::{OperationKind, QuerySpec, Record};
use crate::query::{build, normalize};

/// Runs `Get`, `Aggregate` and `Explore` queries through an executor.
///
/// Building and normalizing are synchronous; the executor call is the only
/// await point.
pub struct QueryClient<E = HttpExecutor> {
    executor: Arc<E>,
}

impl<E> Clone for QueryClient<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

impl QueryClient<HttpExecutor> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, QueryError> {
        Ok(Self::new(HttpExecutor::new(config)?))
    }
}

impl<E: GraphqlExecutor> QueryClient<E> {
    pub fn new(executor: E) -> Self {
        Self::with_shared(Arc::new(executor))
    }

    pub fn with_shared(executor: Arc<E>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub async fn get(&self, spec: &QuerySpec) -> Result<Vec<Record>, QueryError> {
        expect_kind(spec, OperationKind::Get)?;
        self.run(spec).await
    }

    pub async fn aggregate(&self, spec: &QuerySpec) -> Result<Vec<Record>, QueryError> {
        expect_kind(spec, OperationKind::Aggregate)?;
        self.run(spec).await
    }

    pub async fn explore(&self, spec: &QuerySpec) -> Result<Vec<Record>, QueryError> {
        expect_kind(spec, OperationKind::Explore)?;
        self.run(spec).await
    }

    /// Build, execute and normalize `spec`, whatever its operation kind
    pub async fn run(&self, spec: &QuerySpec) -> Result<Vec<Record>, QueryError> {
        let document = build(spec)?;
        debug!(
            operation = spec.kind.name(),
            entity = spec.entity.as_deref().unwrap_or("-"),
            variables = ?document.variables.keys().collect::<Vec<_>>(),
            "executing query: {}",
            document.text
        );

        let raw = self
            .executor
            .execute(&document.text, &document.variables)
            .await
            .map_err(|e| {
                warn!(operation = spec.kind.name(), "transport fault: {}", e);
                e
            })?;

        normalize(spec.kind, spec.entity.as_deref(), raw).map_err(|e| {
            warn!(operation = spec.kind.name(), "query failed: {}", e);
            e
        })
    }
}

fn expect_kind(spec: &QuerySpec, expected: OperationKind) -> Result<(), ConstructionError> {
    if spec.kind == expected {
        Ok(())
    } else {
        Err(ConstructionError::KindMismatch {
            expected: expected.name(),
            actual: spec.kind.name(),
        })
    }
}
