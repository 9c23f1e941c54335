// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Filter trees for the `where` argument
//!
//! A filter is either a comparison on a property path or a boolean
//! combinator over nested filters. Serialization writes operator tokens
//! unquoted from a static table and every caller-supplied value as a quoted
//! or typed literal.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::ConstructionError;
use super::literal;

/// Closed set of filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Like,
    WithinGeoRange,
    IsNull,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::And,
        Operator::Or,
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterThanEqual,
        Operator::LessThan,
        Operator::LessThanEqual,
        Operator::Like,
        Operator::WithinGeoRange,
        Operator::IsNull,
    ];

    /// The identifier written into the document
    pub const fn token(self) -> &'static str {
        match self {
            Operator::And => "And",
            Operator::Or => "Or",
            Operator::Equal => "Equal",
            Operator::NotEqual => "NotEqual",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanEqual => "GreaterThanEqual",
            Operator::LessThan => "LessThan",
            Operator::LessThanEqual => "LessThanEqual",
            Operator::Like => "Like",
            Operator::WithinGeoRange => "WithinGeoRange",
            Operator::IsNull => "IsNull",
        }
    }

    const fn snake_case(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanEqual => "greater_than_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanEqual => "less_than_equal",
            Operator::Like => "like",
            Operator::WithinGeoRange => "within_geo_range",
            Operator::IsNull => "is_null",
        }
    }

    /// Accepts both the wire token (`GreaterThan`) and snake case (`greater_than`)
    pub fn parse(name: &str) -> Result<Self, ConstructionError> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.token() == name || op.snake_case() == name)
            .ok_or_else(|| ConstructionError::InvalidOperator(name.to_string()))
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl FromStr for Operator {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Geo-coordinate range for `WithinGeoRange`
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRange {
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum distance in meters
    pub max_distance: f64,
}

/// A comparison value, tagged with its wire kind
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Text(String),
    Int(i64),
    Number(f64),
    Boolean(bool),
    Date(String),
    GeoRange(GeoRange),
    StringArray(Vec<String>),
    TextArray(Vec<String>),
    IntArray(Vec<i64>),
    NumberArray(Vec<f64>),
    BooleanArray(Vec<bool>),
    DateArray(Vec<String>),
}

impl FilterValue {
    /// The `value*` key this value is written under
    pub const fn wire_key(&self) -> &'static str {
        match self {
            FilterValue::String(_) => "valueString",
            FilterValue::Text(_) => "valueText",
            FilterValue::Int(_) => "valueInt",
            FilterValue::Number(_) => "valueNumber",
            FilterValue::Boolean(_) => "valueBoolean",
            FilterValue::Date(_) => "valueDate",
            FilterValue::GeoRange(_) => "valueGeoRange",
            FilterValue::StringArray(_) => "valueStringArray",
            FilterValue::TextArray(_) => "valueTextArray",
            FilterValue::IntArray(_) => "valueIntArray",
            FilterValue::NumberArray(_) => "valueNumberArray",
            FilterValue::BooleanArray(_) => "valueBooleanArray",
            FilterValue::DateArray(_) => "valueDateArray",
        }
    }

    fn render(&self) -> Result<String, ConstructionError> {
        let key = self.wire_key();
        Ok(match self {
            FilterValue::String(s) | FilterValue::Text(s) | FilterValue::Date(s) => {
                literal::quote(s)
            }
            FilterValue::Int(i) => i.to_string(),
            FilterValue::Number(n) => literal::float(key, *n)?,
            FilterValue::Boolean(b) => b.to_string(),
            FilterValue::GeoRange(range) => {
                let coordinates = literal::object([
                    ("latitude", literal::float(key, range.latitude)?),
                    ("longitude", literal::float(key, range.longitude)?),
                ]);
                let distance = literal::object([("max", literal::float(key, range.max_distance)?)]);
                literal::object([("geoCoordinates", coordinates), ("distance", distance)])
            }
            FilterValue::StringArray(items)
            | FilterValue::TextArray(items)
            | FilterValue::DateArray(items) => literal::list(items.iter().map(|s| literal::quote(s))),
            FilterValue::IntArray(items) => literal::list(items.iter().map(|i| i.to_string())),
            FilterValue::NumberArray(items) => literal::list(
                items
                    .iter()
                    .map(|n| literal::float(key, *n))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            FilterValue::BooleanArray(items) => literal::list(items.iter().map(|b| b.to_string())),
        })
    }

    /// Parse the value stored under a `value*` key
    fn from_json(key: &str, value: &JsonValue) -> Result<Self, ConstructionError> {
        let mismatch = |expected: &str| {
            ConstructionError::MalformedFilter(format!("{} must be {}", key, expected))
        };

        match key {
            "valueString" => value
                .as_str()
                .map(|s| FilterValue::String(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            "valueText" => value
                .as_str()
                .map(|s| FilterValue::Text(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            "valueDate" => value
                .as_str()
                .map(|s| FilterValue::Date(s.to_string()))
                .ok_or_else(|| mismatch("a string")),
            "valueInt" => value
                .as_i64()
                .map(FilterValue::Int)
                .ok_or_else(|| mismatch("an integer")),
            "valueNumber" => value
                .as_f64()
                .map(FilterValue::Number)
                .ok_or_else(|| mismatch("a number")),
            "valueBoolean" => value
                .as_bool()
                .map(FilterValue::Boolean)
                .ok_or_else(|| mismatch("a boolean")),
            "valueGeoRange" => {
                let lat = value.pointer("/geoCoordinates/latitude").and_then(|v| v.as_f64());
                let lon = value.pointer("/geoCoordinates/longitude").and_then(|v| v.as_f64());
                let max = value.pointer("/distance/max").and_then(|v| v.as_f64());
                match (lat, lon, max) {
                    (Some(latitude), Some(longitude), Some(max_distance)) => {
                        Ok(FilterValue::GeoRange(GeoRange {
                            latitude,
                            longitude,
                            max_distance,
                        }))
                    }
                    _ => Err(mismatch("{geoCoordinates: {latitude, longitude}, distance: {max}}")),
                }
            }
            "valueStringArray" => array_of(value, |v| v.as_str().map(str::to_string))
                .map(FilterValue::StringArray)
                .ok_or_else(|| mismatch("an array of strings")),
            "valueTextArray" => array_of(value, |v| v.as_str().map(str::to_string))
                .map(FilterValue::TextArray)
                .ok_or_else(|| mismatch("an array of strings")),
            "valueDateArray" => array_of(value, |v| v.as_str().map(str::to_string))
                .map(FilterValue::DateArray)
                .ok_or_else(|| mismatch("an array of strings")),
            "valueIntArray" => array_of(value, JsonValue::as_i64)
                .map(FilterValue::IntArray)
                .ok_or_else(|| mismatch("an array of integers")),
            "valueNumberArray" => array_of(value, JsonValue::as_f64)
                .map(FilterValue::NumberArray)
                .ok_or_else(|| mismatch("an array of numbers")),
            "valueBooleanArray" => array_of(value, JsonValue::as_bool)
                .map(FilterValue::BooleanArray)
                .ok_or_else(|| mismatch("an array of booleans")),
            other => Err(ConstructionError::MalformedFilter(format!(
                "Unknown value kind: {}",
                other
            ))),
        }
    }
}

fn array_of<T>(value: &JsonValue, f: impl Fn(&JsonValue) -> Option<T>) -> Option<Vec<T>> {
    value.as_array()?.iter().map(f).collect()
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Boolean(value)
    }
}

impl From<GeoRange> for FilterValue {
    fn from(value: GeoRange) -> Self {
        FilterValue::GeoRange(value)
    }
}

/// Filter tree for the `where` argument
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JsonValue")]
pub enum FilterNode {
    Comparison {
        path: Vec<String>,
        operator: Operator,
        value: FilterValue,
    },
    Combinator {
        operator: Operator,
        operands: Vec<FilterNode>,
    },
}

impl FilterNode {
    pub fn compare<P, S>(path: P, operator: Operator, value: impl Into<FilterValue>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterNode::Comparison {
            path: path.into_iter().map(Into::into).collect(),
            operator,
            value: value.into(),
        }
    }

    pub fn and(operands: Vec<FilterNode>) -> Self {
        FilterNode::Combinator {
            operator: Operator::And,
            operands,
        }
    }

    pub fn or(operands: Vec<FilterNode>) -> Self {
        FilterNode::Combinator {
            operator: Operator::Or,
            operands,
        }
    }

    /// Serialize the tree into its `where` literal
    ///
    /// # Examples
    ///
    /// ```
    /// use weaviate_query::core::filter::{FilterNode, Operator};
    ///
    /// let filter = FilterNode::compare(["category"], Operator::Equal, "math");
    /// assert_eq!(
    ///     filter.serialize().unwrap(),
    ///     r#"{path: ["category"], operator: Equal, valueString: "math"}"#
    /// );
    /// ```
    pub fn serialize(&self) -> Result<String, ConstructionError> {
        match self {
            FilterNode::Combinator { operator, operands } => {
                if !operator.is_boolean() {
                    return Err(ConstructionError::MalformedFilter(format!(
                        "{} cannot combine operands",
                        operator
                    )));
                }
                if operands.is_empty() {
                    return Err(ConstructionError::MalformedFilter(format!(
                        "{} requires at least one operand",
                        operator
                    )));
                }

                let children = operands
                    .iter()
                    .map(FilterNode::serialize)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(literal::object([
                    ("operator", operator.token().to_string()),
                    ("operands", literal::list(children)),
                ]))
            }
            FilterNode::Comparison {
                path,
                operator,
                value,
            } => {
                check_comparison(path, *operator, value)?;
                Ok(literal::object([
                    ("path", literal::list(path.iter().map(|p| literal::quote(p)))),
                    ("operator", operator.token().to_string()),
                    (value.wire_key(), value.render()?),
                ]))
            }
        }
    }

    /// Parse a filter from the service's JSON `where` shape
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use weaviate_query::core::filter::FilterNode;
    ///
    /// let filter = FilterNode::from_json(&json!({
    ///     "operator": "Or",
    ///     "operands": [
    ///         {"path": ["id"], "operator": "Equal", "valueString": "1"},
    ///         {"path": ["wordCount"], "operator": "greater_than", "valueInt": 100}
    ///     ]
    /// })).unwrap();
    /// assert!(filter.serialize().is_ok());
    /// ```
    pub fn from_json(value: &JsonValue) -> Result<Self, ConstructionError> {
        let map = value.as_object().ok_or_else(|| {
            ConstructionError::MalformedFilter("Filter must be a JSON object".to_string())
        })?;

        let operator = map
            .get("operator")
            .and_then(|op| op.as_str())
            .ok_or_else(|| {
                ConstructionError::MalformedFilter("Filter requires an operator".to_string())
            })
            .and_then(Operator::parse)?;

        if operator.is_boolean() {
            return Self::parse_combinator(operator, map);
        }
        Self::parse_comparison(operator, map)
    }

    fn parse_combinator(
        operator: Operator,
        map: &serde_json::Map<String, JsonValue>,
    ) -> Result<Self, ConstructionError> {
        if let Some(key) = map.keys().find(|k| *k != "operator" && *k != "operands") {
            return Err(ConstructionError::MalformedFilter(format!(
                "Unexpected key '{}' on {} filter",
                key, operator
            )));
        }

        match map.get("operands") {
            Some(JsonValue::Array(operands)) => {
                let mut parsed = Vec::with_capacity(operands.len());
                for operand in operands {
                    parsed.push(Self::from_json(operand)?);
                }
                Ok(FilterNode::Combinator {
                    operator,
                    operands: parsed,
                })
            }
            _ => Err(ConstructionError::MalformedFilter(format!(
                "{} requires an operands array",
                operator
            ))),
        }
    }

    fn parse_comparison(
        operator: Operator,
        map: &serde_json::Map<String, JsonValue>,
    ) -> Result<Self, ConstructionError> {
        let path = map
            .get("path")
            .and_then(|p| array_of(p, |v| v.as_str().map(str::to_string)))
            .ok_or_else(|| {
                ConstructionError::MalformedFilter("path must be an array of strings".to_string())
            })?;

        let mut value = None;
        for (key, raw) in map {
            match key.as_str() {
                "path" | "operator" => {}
                k if k.starts_with("value") => {
                    if value.is_some() {
                        return Err(ConstructionError::MalformedFilter(
                            "Comparison must carry exactly one value".to_string(),
                        ));
                    }
                    value = Some(FilterValue::from_json(k, raw)?);
                }
                other => {
                    return Err(ConstructionError::MalformedFilter(format!(
                        "Unexpected key '{}' on {} filter",
                        other, operator
                    )))
                }
            }
        }

        let value = value.ok_or_else(|| {
            ConstructionError::MalformedFilter(format!("{} filter requires a value", operator))
        })?;

        Ok(FilterNode::Comparison {
            path,
            operator,
            value,
        })
    }
}

fn check_comparison(
    path: &[String],
    operator: Operator,
    value: &FilterValue,
) -> Result<(), ConstructionError> {
    let malformed = |msg: String| Err(ConstructionError::MalformedFilter(msg));

    if operator.is_boolean() {
        return malformed(format!("{} requires operands, not a value", operator));
    }
    if path.is_empty() || path.iter().any(|p| p.is_empty()) {
        return malformed("path must contain at least one non-empty segment".to_string());
    }

    match (operator, value) {
        (Operator::IsNull, FilterValue::Boolean(_)) => Ok(()),
        (Operator::IsNull, _) => malformed("IsNull requires valueBoolean".to_string()),
        (Operator::WithinGeoRange, FilterValue::GeoRange(_)) => Ok(()),
        (Operator::WithinGeoRange, _) => {
            malformed("WithinGeoRange requires valueGeoRange".to_string())
        }
        (_, FilterValue::GeoRange(_)) => {
            malformed(format!("{} cannot compare a geo range", operator))
        }
        (Operator::Like, FilterValue::String(_) | FilterValue::Text(_)) => Ok(()),
        (Operator::Like, _) => malformed("Like requires valueString or valueText".to_string()),
        _ => Ok(()),
    }
}

impl TryFrom<JsonValue> for FilterNode {
    type Error = ConstructionError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}
