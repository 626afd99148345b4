//! Language file parsing.
//!
//! A language file is a single-level JSON object whose values are strings.
//! Nested objects are either rejected or flattened, see [`NestedKeyPolicy`].

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

/// What to do with nested objects and arrays in a language file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NestedKeyPolicy {
    /// Fail the file.
    #[default]
    Reject,
    /// Join nested keys with the key separator, arrays become `key[index]`.
    Flatten,
}

#[derive(Error, Debug)]
pub enum LanguageFileError {
    #[error("Failed to parse JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
    #[error("Key '{key}' holds a nested {found}, only string values are supported")]
    NestedValue { key: String, found: &'static str },
    #[error("Key '{key}' holds a {found}, only string values are supported")]
    NonStringValue { key: String, found: &'static str },
}

/// Parses a language file into `(key, text)` pairs, in file order.
pub fn parse_language_file(
    bytes: &[u8],
    policy: NestedKeyPolicy,
    separator: &str,
) -> Result<Vec<(String, String)>, LanguageFileError> {
    let json: Value = serde_json::from_slice(bytes)?;
    let Value::Object(map) = json else {
        return Err(LanguageFileError::NotAnObject { found: kind_of(&json) });
    };

    let mut result = Vec::with_capacity(map.len());
    match policy {
        NestedKeyPolicy::Reject => {
            for (key, value) in map {
                match value {
                    Value::String(text) => result.push((key, text)),
                    Value::Object(_) | Value::Array(_) => {
                        return Err(LanguageFileError::NestedValue { found: kind_of(&value), key });
                    }
                    _ => {
                        return Err(LanguageFileError::NonStringValue {
                            found: kind_of(&value),
                            key,
                        });
                    }
                }
            }
        }
        NestedKeyPolicy::Flatten => flatten_object(&map, separator, None, &mut result)?,
    }

    Ok(result)
}

fn flatten_object(
    map: &Map<String, Value>,
    separator: &str,
    prefix: Option<&str>,
    result: &mut Vec<(String, String)>,
) -> Result<(), LanguageFileError> {
    for (key, value) in map {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
        flatten_value(value, separator, full_key, result)?;
    }
    Ok(())
}

fn flatten_value(
    value: &Value,
    separator: &str,
    key: String,
    result: &mut Vec<(String, String)>,
) -> Result<(), LanguageFileError> {
    match value {
        Value::String(text) => result.push((key, text.clone())),
        Value::Object(map) => flatten_object(map, separator, Some(&key), result)?,
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(item, separator, format!("{key}[{index}]"), result)?;
            }
        }
        _ => return Err(LanguageFileError::NonStringValue { found: kind_of(value), key }),
    }
    Ok(())
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
