use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Borrowed view over one node of a RICO semantic annotation tree.
///
/// Fields are read leniently: a value of the wrong JSON type is treated as
/// absent, so one malformed node never poisons the rest of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord<'a> {
    /// Absolute pixel box: left, top, right, bottom
    pub bounds: Option<[f64; 4]>,
    pub component_label: Option<&'a str>,
    pub content: Option<String>,
    pub clickable: bool,
    pub class: &'a str,
    pub resource_id: &'a str,
    pub children: &'a [Value],
}

/// Content descriptor keys, highest priority first.
pub const CONTENT_KEYS: [&str; 3] = ["iconClass", "text", "textButtonClass"];

impl<'a> ElementRecord<'a> {
    /// Returns `None` when `node` is not a JSON object.
    pub fn from_value(node: &'a Value) -> Option<Self> {
        let obj = node.as_object()?;

        Some(ElementRecord {
            bounds: obj.get("bounds").and_then(parse_bounds),
            component_label: obj.get("componentLabel").and_then(Value::as_str),
            content: content_descriptor(node),
            clickable: obj.get("clickable").and_then(Value::as_bool).unwrap_or(false),
            class: obj.get("class").and_then(Value::as_str).unwrap_or(""),
            resource_id: obj.get("resource-id").and_then(Value::as_str).unwrap_or(""),
            children: obj
                .get("children")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        })
    }
}

/// Pick the content descriptor by key priority.
///
/// The first key that is present wins even when its value is null; values are
/// never combined. A non-string value (number, bool, array, object) is kept as
/// its JSON text, so `"text": 5` yields `"5"`.
pub fn content_descriptor(node: &Value) -> Option<String> {
    let obj = node.as_object()?;

    let value = CONTENT_KEYS.iter().find_map(|key| obj.get(*key))?;
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_bounds(value: &Value) -> Option<[f64; 4]> {
    match value.as_array()?.as_slice() {
        [l, t, r, b] => Some([l.as_f64()?, t.as_f64()?, r.as_f64()?, b.as_f64()?]),
        _ => None,
    }
}

/// One flattened UI element with a relative bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Relative box: x, y, width, height
    pub bounding_box: [f64; 4],
    pub content_or_function: Option<String>,
    pub clickable: bool,
    #[serde(rename = "type")]
    pub r#type: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detections {
    pub detections: Vec<Detection>,
}

impl Detections {
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
