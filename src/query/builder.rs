// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Query document construction
//!
//! Each operation has one fixed template. Call arguments are collected as
//! `(key, literal)` pairs for the entries that are actually present and then
//! joined, so an absent trailing modifier never leaves a separator behind.
//! Pagination and grouping values travel as bound variables.

use serde_json::Value as JsonValue;

use crate::core::error::ConstructionError;
use crate::core::literal;
use crate::core::types::{OperationKind, QuerySpec, SortSpec, Variables};

/// A complete document plus its variable bindings
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDocument {
    pub text: String,
    pub variables: Variables,
}

type Argument = (&'static str, String);

/// Build the document for `spec`
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use weaviate_query::core::types::QuerySpec;
/// use weaviate_query::query::builder::build;
///
/// let spec = QuerySpec::get("Question")
///     .fields(["question", "category"])
///     .near_text(json!({"concepts": ["biology"]}))
///     .limit(1);
///
/// let document = build(&spec).unwrap();
/// assert_eq!(
///     document.text,
///     "query($after: String, $limit: Int, $offset: Int) { Get { Question(after: $after, limit: $limit, offset: $offset, nearText: {concepts: [\"biology\"]}) { question category } } }"
/// );
/// assert_eq!(document.variables["limit"], json!(1));
/// ```
pub fn build(spec: &QuerySpec) -> Result<QueryDocument, ConstructionError> {
    check_arguments(spec)?;
    let selection = selection(&spec.fields)?;

    let mut variables = Variables::new();
    let text = match spec.kind {
        OperationKind::Get => {
            let entity = entity(spec)?;
            let mut arguments = vec![
                ("after", "$after".to_string()),
                ("limit", "$limit".to_string()),
                ("offset", "$offset".to_string()),
            ];
            arguments.extend(modifier_arguments(spec)?);

            bind(&mut variables, "after", spec.after.clone().map(JsonValue::from));
            bind(&mut variables, "limit", int_variable("limit", spec.limit)?);
            bind(&mut variables, "offset", int_variable("offset", spec.offset)?);

            format!(
                "query($after: String, $limit: Int, $offset: Int) {{ Get {{ {}({}) {{ {} }} }} }}",
                entity,
                join(arguments),
                selection
            )
        }
        OperationKind::Aggregate => {
            let entity = entity(spec)?;
            let mut arguments = vec![
                ("objectLimit", "$object_limit".to_string()),
                ("groupBy", "$group_by".to_string()),
            ];
            arguments.extend(modifier_arguments(spec)?);

            bind(&mut variables, "group_by", spec.group_by.clone().map(JsonValue::from));
            bind(
                &mut variables,
                "object_limit",
                int_variable("objectLimit", spec.object_limit)?,
            );

            format!(
                "query($group_by: [String], $object_limit: Int) {{ Aggregate {{ {}({}) {{ {} }} }} }}",
                entity,
                join(arguments),
                selection
            )
        }
        OperationKind::Explore => {
            if spec.entity.is_some() {
                return Err(ConstructionError::UnexpectedEntity);
            }
            let mut arguments = vec![
                ("limit", "$limit".to_string()),
                ("offset", "$offset".to_string()),
            ];
            arguments.extend(modifier_arguments(spec)?);

            bind(&mut variables, "limit", int_variable("limit", spec.limit)?);
            bind(&mut variables, "offset", int_variable("offset", spec.offset)?);

            format!(
                "query($limit: Int, $offset: Int) {{ Explore({}) {{ {} }} }}",
                join(arguments),
                selection
            )
        }
    };

    Ok(QueryDocument { text, variables })
}

/// Reject arguments the operation's template has no place for
fn check_arguments(spec: &QuerySpec) -> Result<(), ConstructionError> {
    let operation = spec.kind.name();
    let unsupported = |argument: &'static str| {
        Err(ConstructionError::UnsupportedArgument {
            operation,
            argument,
        })
    };

    for kind in spec.modifiers.kinds() {
        if !spec.kind.allows(kind) {
            return unsupported(kind.key());
        }
    }

    match spec.kind {
        OperationKind::Get | OperationKind::Explore => {
            if spec.group_by.is_some() {
                return unsupported("groupBy");
            }
            if spec.object_limit.is_some() {
                return unsupported("objectLimit");
            }
            if spec.kind == OperationKind::Explore && spec.after.is_some() {
                return unsupported("after");
            }
        }
        OperationKind::Aggregate => {
            let present = [
                ("where", spec.filter.is_some()),
                ("sort", !spec.sort.is_empty()),
                ("tenant", spec.tenant.is_some()),
                ("limit", spec.limit.is_some()),
                ("offset", spec.offset.is_some()),
                ("after", spec.after.is_some()),
            ];
            if let Some((argument, _)) = present.iter().find(|(_, set)| *set) {
                return unsupported(*argument);
            }
        }
    }

    Ok(())
}

fn entity(spec: &QuerySpec) -> Result<&str, ConstructionError> {
    let name = spec
        .entity
        .as_deref()
        .ok_or(ConstructionError::MissingEntity(spec.kind.name()))?;
    literal::validate_name(name)
}

fn selection(fields: &[String]) -> Result<String, ConstructionError> {
    if fields.is_empty() {
        return Err(ConstructionError::EmptySelection);
    }
    let names = fields
        .iter()
        .map(|f| literal::validate_name(f))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.join(" "))
}

/// Present modifiers in fixed order: search modes, then where, sort, tenant
fn modifier_arguments(spec: &QuerySpec) -> Result<Vec<Argument>, ConstructionError> {
    let mut arguments = spec.modifiers.render()?;

    if let Some(filter) = &spec.filter {
        arguments.push(("where", filter.serialize()?));
    }
    if !spec.sort.is_empty() {
        let clauses = spec
            .sort
            .iter()
            .map(sort_clause)
            .collect::<Result<Vec<_>, _>>()?;
        arguments.push(("sort", literal::list(clauses)));
    }
    if let Some(tenant) = &spec.tenant {
        arguments.push(("tenant", literal::quote(tenant)));
    }

    Ok(arguments)
}

fn sort_clause(sort: &SortSpec) -> Result<String, ConstructionError> {
    if sort.path.is_empty() {
        return Err(ConstructionError::InvalidValue {
            key: "sort".to_string(),
            reason: "path cannot be empty".to_string(),
        });
    }

    let mut entries = vec![("path", literal::list(sort.path.iter().map(|p| literal::quote(p))))];
    if let Some(order) = sort.order {
        entries.push(("order", order.token().to_string()));
    }
    Ok(literal::object(entries))
}

/// Values bound to `Int` variables must fit GraphQL's signed 32-bit range
fn int_variable(key: &str, value: Option<u64>) -> Result<Option<JsonValue>, ConstructionError> {
    match value {
        Some(n) if n > i32::MAX as u64 => Err(ConstructionError::InvalidValue {
            key: key.to_string(),
            reason: format!("{} exceeds the GraphQL Int maximum of {}", n, i32::MAX),
        }),
        other => Ok(other.map(JsonValue::from)),
    }
}

fn bind(variables: &mut Variables, name: &str, value: Option<JsonValue>) {
    if let Some(value) = value {
        variables.insert(name.to_string(), value);
    }
}

fn join(arguments: Vec<Argument>) -> String {
    arguments
        .into_iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{FilterNode, Operator};
    use crate::core::types::SortOrder;
    use serde_json::json;

    #[test]
    fn test_get_without_modifiers() {
        let spec = QuerySpec::get("Article").fields(["title"]);
        let document = build(&spec).unwrap();

        assert_eq!(
            document.text,
            "query($after: String, $limit: Int, $offset: Int) { Get { Article(after: $after, limit: $limit, offset: $offset) { title } } }"
        );
        assert!(document.variables.is_empty());
    }

    #[test]
    fn test_get_with_where_sort_tenant() {
        let spec = QuerySpec::get("Article")
            .fields(["title", "wordCount"])
            .filter(FilterNode::compare(["wordCount"], Operator::GreaterThan, 1000i64))
            .sort_by(["title"], Some(SortOrder::Desc))
            .tenant("tenantA")
            .offset(20);
        let document = build(&spec).unwrap();

        assert_eq!(
            document.text,
            "query($after: String, $limit: Int, $offset: Int) { Get { Article(after: $after, limit: $limit, offset: $offset, \
             where: {path: [\"wordCount\"], operator: GreaterThan, valueInt: 1000}, \
             sort: [{path: [\"title\"], order: desc}], tenant: \"tenantA\") { title wordCount } } }"
        );
        assert_eq!(document.variables, json!({"offset": 20}).as_object().unwrap().clone());
    }

    #[test]
    fn test_aggregate_template() {
        let spec = QuerySpec::aggregate("Article")
            .fields(["meta"])
            .group_by(["inPublication"])
            .object_limit(10)
            .near_text(json!({"concepts": ["news"]}));
        let document = build(&spec).unwrap();

        assert_eq!(
            document.text,
            "query($group_by: [String], $object_limit: Int) { Aggregate { Article(objectLimit: $object_limit, groupBy: $group_by, nearText: {concepts: [\"news\"]}) { meta } } }"
        );
        assert_eq!(document.variables["group_by"], json!(["inPublication"]));
        assert_eq!(document.variables["object_limit"], json!(10));
    }

    #[test]
    fn test_explore_template() {
        let spec = QuerySpec::explore()
            .fields(["beacon", "certainty", "className"])
            .near_vector(json!({"vector": [0.5, 0.25]}))
            .limit(5);
        let document = build(&spec).unwrap();

        assert_eq!(
            document.text,
            "query($limit: Int, $offset: Int) { Explore(limit: $limit, offset: $offset, nearVector: {vector: [0.5, 0.25]}) { beacon certainty className } }"
        );
    }

    #[test]
    fn test_entity_rules() {
        let mut explore = QuerySpec::explore().fields(["beacon"]);
        explore.entity = Some("Article".to_string());
        assert_eq!(build(&explore), Err(ConstructionError::UnexpectedEntity));

        let mut get = QuerySpec::get("Article").fields(["title"]);
        get.entity = None;
        assert_eq!(build(&get), Err(ConstructionError::MissingEntity("Get")));

        let injected = QuerySpec::get("Article(limit: 1) { id } } }").fields(["title"]);
        assert!(matches!(build(&injected), Err(ConstructionError::InvalidName(_))));
    }

    #[test]
    fn test_field_rules() {
        let empty = QuerySpec::get("Article");
        assert_eq!(build(&empty), Err(ConstructionError::EmptySelection));

        let bad = QuerySpec::get("Article").fields(["title", "id } }"]);
        assert!(matches!(build(&bad), Err(ConstructionError::InvalidName(_))));
    }

    #[test]
    fn test_aggregate_rejects_search_modes() {
        let spec = QuerySpec::aggregate("Article")
            .fields(["meta"])
            .hybrid(json!({"query": "fish"}));
        assert_eq!(
            build(&spec),
            Err(ConstructionError::UnsupportedArgument {
                operation: "Aggregate",
                argument: "hybrid",
            })
        );

        let filtered = QuerySpec::aggregate("Article")
            .fields(["meta"])
            .filter(FilterNode::compare(["a"], Operator::Equal, "b"));
        assert!(matches!(
            build(&filtered),
            Err(ConstructionError::UnsupportedArgument { argument: "where", .. })
        ));
    }

    #[test]
    fn test_get_rejects_grouping() {
        let spec = QuerySpec::get("Article").fields(["title"]).object_limit(3);
        assert!(matches!(
            build(&spec),
            Err(ConstructionError::UnsupportedArgument { argument: "objectLimit", .. })
        ));
    }

    #[test]
    fn test_tenant_is_quoted() {
        let spec = QuerySpec::get("Article").fields(["title"]).tenant("a\") { x");
        let document = build(&spec).unwrap();
        assert!(document.text.contains("tenant: \"a\\\") { x\""));
    }

    #[test]
    fn test_int_variables_stay_in_range() {
        let at_max = QuerySpec::get("Article")
            .fields(["title"])
            .limit(i32::MAX as u64)
            .offset(0);
        let document = build(&at_max).unwrap();
        assert_eq!(document.variables["limit"], json!(i32::MAX));

        let too_large = QuerySpec::get("Article").fields(["title"]).limit(3_000_000_000);
        assert!(matches!(
            build(&too_large),
            Err(ConstructionError::InvalidValue { ref key, .. }) if key == "limit"
        ));

        let offset = QuerySpec::explore()
            .fields(["beacon"])
            .offset(i32::MAX as u64 + 1);
        assert!(matches!(
            build(&offset),
            Err(ConstructionError::InvalidValue { ref key, .. }) if key == "offset"
        ));

        let object_limit = QuerySpec::aggregate("Article")
            .fields(["meta"])
            .object_limit(u64::MAX);
        assert!(matches!(
            build(&object_limit),
            Err(ConstructionError::InvalidValue { ref key, .. }) if key == "objectLimit"
        ));
    }

    fn rejected_argument(spec: &QuerySpec) -> &'static str {
        match build(spec) {
            Err(ConstructionError::UnsupportedArgument { argument, .. }) => argument,
            other => panic!("expected unsupported argument, got {:?}", other),
        }
    }

    #[test]
    fn test_explore_rejects_cursor() {
        let spec = QuerySpec::explore().fields(["beacon"]).after("some-id");
        assert_eq!(rejected_argument(&spec), "after");
    }

    #[test]
    fn test_explore_rejects_grouping() {
        let group_by = QuerySpec::explore().fields(["beacon"]).group_by(["a"]);
        assert_eq!(rejected_argument(&group_by), "groupBy");

        let object_limit = QuerySpec::explore().fields(["beacon"]).object_limit(1);
        assert_eq!(rejected_argument(&object_limit), "objectLimit");
    }

    #[test]
    fn test_aggregate_rejects_sort_and_tenant() {
        let base = QuerySpec::aggregate("Article").fields(["meta"]);

        let sorted = base.clone().sort_by(["title"], Some(SortOrder::Asc));
        assert_eq!(rejected_argument(&sorted), "sort");

        let tenant = base.tenant("tenantA");
        assert_eq!(rejected_argument(&tenant), "tenant");
    }

    #[test]
    fn test_aggregate_rejects_pagination() {
        let base = QuerySpec::aggregate("Article").fields(["meta"]);

        assert_eq!(rejected_argument(&base.clone().limit(1)), "limit");
        assert_eq!(rejected_argument(&base.clone().offset(1)), "offset");
        assert_eq!(rejected_argument(&base.after("some-id")), "after");
    }

    #[test]
    fn test_get_rejects_group_by() {
        let spec = QuerySpec::get("Article").fields(["title"]).group_by(["a"]);
        assert_eq!(rejected_argument(&spec), "groupBy");
    }
}
