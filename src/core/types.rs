// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::filter::FilterNode;
use super::modifiers::{ModifierKind, SearchModifiers};

/// One result row: field name to value
pub type Record = Map<String, JsonValue>;

/// Bound variables sent alongside a document
pub type Variables = Map<String, JsonValue>;

/// Root field of a search query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Get,
    Aggregate,
    Explore,
}

impl OperationKind {
    pub const fn name(self) -> &'static str {
        match self {
            OperationKind::Get => "Get",
            OperationKind::Aggregate => "Aggregate",
            OperationKind::Explore => "Explore",
        }
    }

    /// Whether this operation accepts the given search modifier
    pub fn allows(self, modifier: ModifierKind) -> bool {
        match self {
            OperationKind::Get | OperationKind::Explore => true,
            OperationKind::Aggregate => matches!(
                modifier,
                ModifierKind::NearText
                    | ModifierKind::NearVector
                    | ModifierKind::NearImage
                    | ModifierKind::NearObject
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn token(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SortSpec {
    pub path: Vec<String>,
    #[serde(default)]
    pub order: Option<SortOrder>,
}

/// Caller-side description of one search query
///
/// Built with the chained setters or deserialized from JSON:
///
/// ```
/// use serde_json::json;
/// use weaviate_query::core::types::QuerySpec;
///
/// let spec = QuerySpec::get("Question")
///     .fields(["question", "category"])
///     .near_text(json!({"concepts": ["biology"]}))
///     .limit(1);
/// assert_eq!(spec.entity.as_deref(), Some("Question"));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    pub kind: OperationKind,
    pub entity: Option<String>,
    pub fields: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub after: Option<String>,
    #[serde(default)]
    pub sort: Vec<SortSpec>,
    pub tenant: Option<String>,
    #[serde(rename = "where")]
    pub filter: Option<FilterNode>,
    #[serde(default)]
    pub modifiers: SearchModifiers,
    pub group_by: Option<Vec<String>>,
    pub object_limit: Option<u64>,
}

impl QuerySpec {
    fn new(kind: OperationKind, entity: Option<String>) -> Self {
        Self {
            kind,
            entity,
            fields: Vec::new(),
            limit: None,
            offset: None,
            after: None,
            sort: Vec::new(),
            tenant: None,
            filter: None,
            modifiers: SearchModifiers::new(),
            group_by: None,
            object_limit: None,
        }
    }

    pub fn get(entity: impl Into<String>) -> Self {
        Self::new(OperationKind::Get, Some(entity.into()))
    }

    pub fn aggregate(entity: impl Into<String>) -> Self {
        Self::new(OperationKind::Aggregate, Some(entity.into()))
    }

    pub fn explore() -> Self {
        Self::new(OperationKind::Explore, None)
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn after(mut self, id: impl Into<String>) -> Self {
        self.after = Some(id.into());
        self
    }

    pub fn sort_by<I, S>(mut self, path: I, order: Option<SortOrder>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.push(SortSpec {
            path: path.into_iter().map(Into::into).collect(),
            order,
        });
        self
    }

    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn modifier(mut self, kind: ModifierKind, value: JsonValue) -> Self {
        self.modifiers.insert(kind, value);
        self
    }

    pub fn near_text(self, value: JsonValue) -> Self {
        self.modifier(ModifierKind::NearText, value)
    }

    pub fn near_vector(self, value: JsonValue) -> Self {
        self.modifier(ModifierKind::NearVector, value)
    }

    pub fn near_image(self, value: JsonValue) -> Self {
        self.modifier(ModifierKind::NearImage, value)
    }

    pub fn near_object(self, value: JsonValue) -> Self {
        self.modifier(ModifierKind::NearObject, value)
    }

    pub fn hybrid(self, value: JsonValue) -> Self {
        self.modifier(ModifierKind::Hybrid, value)
    }

    pub fn bm25(self, value: JsonValue) -> Self {
        self.modifier(ModifierKind::Bm25, value)
    }

    pub fn ask(self, value: JsonValue) -> Self {
        self.modifier(ModifierKind::Ask, value)
    }

    pub fn group_by<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = Some(path.into_iter().map(Into::into).collect());
        self
    }

    pub fn object_limit(mut self, limit: u64) -> Self {
        self.object_limit = Some(limit);
        self
    }
}

/// One service-reported GraphQL error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(u64),
}

/// Unmodified payload returned across the execution boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub data: Option<JsonValue>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}
