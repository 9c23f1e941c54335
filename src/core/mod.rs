// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

pub mod error;
pub mod filter;
pub mod literal;
pub mod modifiers;
pub mod types;

pub use error::{ConfigError, ConstructionError, QueryError, TransportFault};
pub use filter::{FilterNode, FilterValue, GeoRange, Operator};
pub use modifiers::{ModifierKind, SearchModifiers};
pub use types::{
    GraphqlError, OperationKind, PathSegment, QuerySpec, RawResult, Record, SortOrder, SortSpec,
    Variables,
};
