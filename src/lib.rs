// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GraphQL search client for a Weaviate-style vector database
//!
//! [`query::build`] turns a [`core::types::QuerySpec`] into a document and
//! variable bindings, [`query::normalize`] extracts records from the raw
//! reply, and [`client::QueryClient`] ties both to a
//! [`client::GraphqlExecutor`].

pub mod client;
pub mod core;
pub mod query;

pub use crate::client::{ClientConfig, GraphqlExecutor, HttpExecutor, QueryClient};
pub use crate::core::{
    ConstructionError, FilterNode, FilterValue, ModifierKind, Operator, QueryError, QuerySpec,
    RawResult, Record,
};
