//! Tolerant decoding of generator configuration documents.
//!
//! A submitted document is a JSON object holding the generator's
//! configuration under [`CONFIG_KEY`], with a few environment attributes
//! beside it. Unknown keys are ignored and known keys that are absent or
//! oddly shaped keep their defaults, so documents from older and newer
//! generator versions decode alike. Only a document that is not a JSON
//! object, or has no configuration object, is rejected.

pub mod fields;

use serde_json::{Map, Value};
use tracing::{trace, warn};
use yorc_common::{GeneratorOptions, ParseError};

use fields::{Applied, FIELDS, LANGUAGE_LOCATIONS};

/// Key of the configuration object inside a submitted document.
pub const CONFIG_KEY: &str = "generator-jhipster";

/// Decode a raw document.
pub fn decode_document(raw: &str) -> Result<GeneratorOptions, ParseError> {
    let root: Value = serde_json::from_str(raw)?;
    decode_value(&root)
}

/// Decode an already parsed document.
pub fn decode_value(root: &Value) -> Result<GeneratorOptions, ParseError> {
    let root = root.as_object().ok_or(ParseError::NotAnObject {
        found: json_type(root),
    })?;
    let config = root
        .get(CONFIG_KEY)
        .and_then(Value::as_object)
        .ok_or(ParseError::MissingConfiguration { key: CONFIG_KEY })?;

    let mut options = GeneratorOptions::default();
    for field in FIELDS {
        match field.apply(root, config, &mut options) {
            Applied::Set => {}
            Applied::Absent => trace!(field = field.name, "field absent, using default"),
            Applied::Mismatched(location) => {
                warn!(field = field.name, key = location.key(), "unexpected value shape, using default")
            }
        }
    }
    options.selected_languages = selected_languages(root, config);
    Ok(options)
}

fn selected_languages(
    root: &Map<String, Value>,
    config: &Map<String, Value>,
) -> std::collections::BTreeSet<String> {
    LANGUAGE_LOCATIONS
        .iter()
        .filter_map(|location| location.lookup(root, config))
        .find_map(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
