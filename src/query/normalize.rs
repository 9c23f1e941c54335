// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response normalization
//!
//! Pulls the record list for one operation out of a raw result, turning
//! service-reported errors and unexpected shapes into [`QueryError`]s.

use serde_json::Value as JsonValue;

use crate::core::error::{ConstructionError, QueryError};
use crate::core::types::{OperationKind, RawResult, Record};

/// Extract the records for `kind` (and `entity`, for Get/Aggregate) from `raw`
pub fn normalize(
    kind: OperationKind,
    entity: Option<&str>,
    raw: RawResult,
) -> Result<Vec<Record>, QueryError> {
    if let Some(errors) = raw.errors {
        if !errors.is_empty() {
            return Err(QueryError::Execution(errors));
        }
    }

    let mut data = match raw.data {
        Some(JsonValue::Object(map)) => map,
        Some(JsonValue::Null) | None => {
            return Err(QueryError::Normalization(
                "response carries neither data nor errors".to_string(),
            ))
        }
        Some(other) => {
            return Err(QueryError::Normalization(format!(
                "data must be an object, got {}",
                type_name(&other)
            )))
        }
    };

    let root = match data.remove(kind.name()) {
        Some(JsonValue::Null) | None => {
            return Err(QueryError::Normalization(format!(
                "missing data.{}",
                kind.name()
            )))
        }
        Some(root) => root,
    };

    let target = match kind {
        OperationKind::Explore => root,
        OperationKind::Get | OperationKind::Aggregate => {
            let entity = entity.ok_or(ConstructionError::MissingEntity(kind.name()))?;
            let mut by_entity = match root {
                JsonValue::Object(map) => map,
                other => {
                    return Err(QueryError::Normalization(format!(
                        "data.{} must be an object, got {}",
                        kind.name(),
                        type_name(&other)
                    )))
                }
            };

            match (kind, by_entity.remove(entity)) {
                (OperationKind::Get, Some(JsonValue::Null) | None) => return Ok(Vec::new()),
                (_, Some(JsonValue::Null) | None) => {
                    return Err(QueryError::Normalization(format!(
                        "missing data.{}.{}",
                        kind.name(),
                        entity
                    )))
                }
                (_, Some(value)) => value,
            }
        }
    };

    records(target)
}

fn records(value: JsonValue) -> Result<Vec<Record>, QueryError> {
    let items = match value {
        JsonValue::Array(items) => items,
        other => {
            return Err(QueryError::Normalization(format!(
                "expected a list of records, got {}",
                type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            JsonValue::Object(record) => Ok(record),
            other => Err(QueryError::Normalization(format!(
                "expected a record object, got {}",
                type_name(&other)
            ))),
        })
        .collect()
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GraphqlError;
    use serde_json::json;

    fn raw(value: JsonValue) -> RawResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_records() {
        let result = normalize(
            OperationKind::Get,
            Some("Question"),
            raw(json!({"data": {"Get": {"Question": [{"category": "SCIENCE", "question": "Q1"}]}}, "errors": null})),
        )
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["category"], json!("SCIENCE"));
        assert_eq!(result[0]["question"], json!("Q1"));
    }

    #[test]
    fn test_get_missing_entity_is_empty() {
        let result = normalize(
            OperationKind::Get,
            Some("Question"),
            raw(json!({"data": {"Get": {}}})),
        )
        .unwrap();
        assert!(result.is_empty());

        let null_entity = normalize(
            OperationKind::Get,
            Some("Question"),
            raw(json!({"data": {"Get": {"Question": null}}})),
        )
        .unwrap();
        assert!(null_entity.is_empty());
    }

    #[test]
    fn test_errors_win_over_data() {
        let result = normalize(
            OperationKind::Get,
            Some("Question"),
            raw(json!({
                "data": {"Get": {"Question": []}},
                "errors": [
                    {"message": "first", "path": ["Get", "Question", 0]},
                    {"message": "second"}
                ]
            })),
        );

        match result {
            Err(QueryError::Execution(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].message, "first");
                assert!(errors[0].path.is_some());
                assert_eq!(
                    errors[1],
                    GraphqlError {
                        message: "second".to_string(),
                        path: None
                    }
                );
            }
            other => panic!("expected execution fault, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_error_list_is_not_a_fault() {
        let result = normalize(
            OperationKind::Explore,
            None,
            raw(json!({"data": {"Explore": []}, "errors": []})),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_shape_mismatches() {
        let no_data = normalize(OperationKind::Get, Some("Question"), raw(json!({})));
        assert!(matches!(no_data, Err(QueryError::Normalization(_))));

        let wrong_root = normalize(
            OperationKind::Aggregate,
            Some("Question"),
            raw(json!({"data": {"Get": {"Question": []}}})),
        );
        assert!(matches!(wrong_root, Err(QueryError::Normalization(_))));

        let missing_aggregate = normalize(
            OperationKind::Aggregate,
            Some("Question"),
            raw(json!({"data": {"Aggregate": {}}})),
        );
        assert!(matches!(missing_aggregate, Err(QueryError::Normalization(_))));

        let not_a_list = normalize(
            OperationKind::Explore,
            None,
            raw(json!({"data": {"Explore": {"beacon": "x"}}})),
        );
        assert!(matches!(not_a_list, Err(QueryError::Normalization(_))));

        let scalar_record = normalize(
            OperationKind::Get,
            Some("Question"),
            raw(json!({"data": {"Get": {"Question": [1, 2]}}})),
        );
        assert!(matches!(scalar_record, Err(QueryError::Normalization(_))));
    }

    #[test]
    fn test_aggregate_records() {
        let result = normalize(
            OperationKind::Aggregate,
            Some("Article"),
            raw(json!({"data": {"Aggregate": {"Article": [{"meta": {"count": 42}}]}}})),
        )
        .unwrap();
        assert_eq!(result[0]["meta"]["count"], json!(42));
    }
}
