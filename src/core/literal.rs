// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GraphQL input literal rendering
//!
//! Everything a caller supplies ends up in the document either as a quoted
//! string, a typed number/boolean literal, or a name that passed
//! [`validate_name`]. Unquoted enum tokens only ever come from static tables.

use serde_json::{Number, Value as JsonValue};

use super::error::ConstructionError;

/// `(modifier, argument)` pairs whose values are GraphQL enums and are
/// written unquoted, with the tokens each accepts.
const ENUM_ARGUMENTS: &[(&str, &str, &[&str])] = &[(
    "hybrid",
    "fusionType",
    &["rankedFusion", "relativeScoreFusion"],
)];

fn enum_tokens(modifier: &str, argument: &str) -> Option<&'static [&'static str]> {
    ENUM_ARGUMENTS
        .iter()
        .find(|(m, a, _)| *m == modifier && *a == argument)
        .map(|(_, _, tokens)| *tokens)
}

/// Returns true if `name` matches `[_A-Za-z][_0-9A-Za-z]*`
pub fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

pub fn validate_name(name: &str) -> Result<&str, ConstructionError> {
    if is_name(name) {
        Ok(name)
    } else {
        Err(ConstructionError::InvalidName(name.to_string()))
    }
}

/// Quote and escape a string as a GraphQL string literal
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a float, rejecting NaN and infinities which have no literal form
pub fn float(key: &str, value: f64) -> Result<String, ConstructionError> {
    Number::from_f64(value)
        .map(|n| n.to_string())
        .ok_or_else(|| ConstructionError::InvalidValue {
            key: key.to_string(),
            reason: format!("{} is not a finite number", value),
        })
}

/// Render a list of already-rendered items as `[a, b, c]`
pub fn list<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    format!("[{}]", items.into_iter().collect::<Vec<_>>().join(", "))
}

/// Render `(key, literal)` pairs as `{k: v, k2: v2}`
pub fn object<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let body = entries
        .into_iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", body)
}

/// Render the value of a search modifier such as `hybrid` or `nearText`.
///
/// Top-level keys of an object value are checked against the enum table for
/// `modifier`; everything else goes through [`render`].
pub fn render_modifier(modifier: &str, value: &JsonValue) -> Result<String, ConstructionError> {
    let map = match value {
        JsonValue::Object(map) => map,
        other => return render(other),
    };

    let mut entries = Vec::with_capacity(map.len());
    for (name, inner) in map {
        let rendered = match enum_tokens(modifier, name) {
            Some(allowed) => match inner.as_str() {
                Some(token) if allowed.contains(&token) => token.to_string(),
                _ => {
                    return Err(ConstructionError::InvalidValue {
                        key: format!("{}.{}", modifier, name),
                        reason: format!("expected one of: {}", allowed.join(", ")),
                    })
                }
            },
            None => render(inner)?,
        };
        entries.push((validate_name(name)?, rendered));
    }
    Ok(object(entries))
}

/// Render an arbitrary JSON value as a GraphQL input literal; strings are
/// always quoted.
pub fn render(value: &JsonValue) -> Result<String, ConstructionError> {
    match value {
        JsonValue::Null => Ok("null".to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::String(s) => Ok(quote(s)),
        JsonValue::Array(items) => {
            let rendered = items.iter().map(render).collect::<Result<Vec<_>, _>>()?;
            Ok(list(rendered))
        }
        JsonValue::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (name, inner) in map {
                entries.push((validate_name(name)?, render(inner)?));
            }
            Ok(object(entries))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names() {
        assert!(is_name("Question"));
        assert!(is_name("_additional"));
        assert!(is_name("field_2"));
        assert!(!is_name(""));
        assert!(!is_name("2field"));
        assert!(!is_name("a b"));
        assert!(!is_name("a){"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("back\\slash"), "\"back\\\\slash\"");
        assert_eq!(quote("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote("\u{01}"), "\"\\u0001\"");
    }

    #[test]
    fn test_render_nested_object() {
        let value = json!({"concepts": ["biology"], "certainty": 0.7});
        assert_eq!(
            render(&value).unwrap(),
            "{certainty: 0.7, concepts: [\"biology\"]}"
        );
    }

    #[test]
    fn test_render_rejects_bad_keys() {
        let value = json!({"concepts) { id } #": ["x"]});
        assert!(matches!(
            render_modifier("nearText", &value),
            Err(ConstructionError::InvalidName(_))
        ));
    }

    #[test]
    fn test_enum_argument_unquoted() {
        let value = json!({"query": "fish", "fusionType": "rankedFusion"});
        assert_eq!(
            render_modifier("hybrid", &value).unwrap(),
            "{fusionType: rankedFusion, query: \"fish\"}"
        );

        let bad = json!({"fusionType": "rankedFusion) { x }"});
        assert!(matches!(
            render_modifier("hybrid", &bad),
            Err(ConstructionError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_enum_tokens_only_for_their_modifier() {
        let elsewhere = json!({"fusionType": "rankedFusion"});
        assert_eq!(
            render_modifier("nearText", &elsewhere).unwrap(),
            "{fusionType: \"rankedFusion\"}"
        );

        let nested = json!({"query": "fish", "options": {"fusionType": "rankedFusion) { x }"}});
        assert_eq!(
            render_modifier("hybrid", &nested).unwrap(),
            "{options: {fusionType: \"rankedFusion) { x }\"}, query: \"fish\"}"
        );
    }

    #[test]
    fn test_float_rejects_nan() {
        assert!(float("valueNumber", f64::NAN).is_err());
        assert_eq!(float("valueNumber", 2.5).unwrap(), "2.5");
    }
}
