// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::TransportFault;
use crate::core::types::{RawResult, Variables};

/// Sends a document to the service and hands back the unmodified result.
///
/// Service-level GraphQL errors are reported in-band through
/// [`RawResult::errors`]; only failures to reach the service or read its
/// reply are returned as [`TransportFault`].
#[async_trait]
pub trait GraphqlExecutor: Send + Sync {
    async fn execute(
        &self,
        document: &str,
        variables: &Variables,
    ) -> Result<RawResult, TransportFault>;
}

#[async_trait]
impl<E: GraphqlExecutor + ?Sized> GraphqlExecutor for Arc<E> {
    async fn execute(
        &self,
        document: &str,
        variables: &Variables,
    ) -> Result<RawResult, TransportFault> {
        (**self).execute(document, variables).await
    }
}
