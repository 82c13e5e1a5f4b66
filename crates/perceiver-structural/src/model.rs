//! Shape-tolerant view over a document node payload.
//!
//! The document tree arrives as loosely versioned JSON. Every accessor here is total:
//! a missing or mistyped field reads as absent rather than failing.

use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> NodeView<'a> {
    /// Returns `None` when the value is not an object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|raw| Self { raw })
    }

    pub fn node_name(&self) -> Option<&'a str> {
        self.raw.get("nodeName").and_then(Value::as_str)
    }

    pub fn node_value(&self) -> Option<&'a str> {
        self.raw.get("nodeValue").and_then(Value::as_str)
    }

    pub fn is_text(&self) -> bool {
        self.node_name() == Some("#text")
    }

    /// Attributes as `(name, value)` pairs.
    ///
    /// Accepts the flat `[name, value, name, value, ...]` encoding and the mapping
    /// encoding. Mapping entries keep their declared order. Empty names and values that
    /// are not scalars are dropped; a trailing name without a value reads as empty.
    pub fn attributes(&self) -> Vec<(String, String)> {
        match self.raw.get("attributes") {
            Some(Value::Array(flat)) => flat
                .chunks(2)
                .filter_map(|pair| {
                    let name = pair.first()?.as_str()?;
                    if name.is_empty() {
                        return None;
                    }
                    let value = match pair.get(1) {
                        Some(value) => attribute_text(value)?,
                        None => String::new(),
                    };
                    Some((name.to_string(), value))
                })
                .collect(),
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(name, _)| !name.is_empty())
                .filter_map(|(name, value)| attribute_text(value).map(|text| (name.clone(), text)))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn children(&self) -> &'a [Value] {
        self.raw
            .get("children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
