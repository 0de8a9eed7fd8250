use serde_json::Value;

use crate::annotation::element_model::{Detection, ElementRecord};
use crate::annotation::normalize::{ImageDims, to_relative};

/// Build the detection for a single node, ignoring its children.
///
/// Nodes without both `bounds` and `componentLabel` yield nothing.
pub fn element_detection(node: &Value, dims: ImageDims) -> Option<Detection> {
    let element = ElementRecord::from_value(node)?;
    record_detection(&element, dims)
}

fn record_detection(element: &ElementRecord<'_>, dims: ImageDims) -> Option<Detection> {
    let bounds = element.bounds?;
    let label = element.component_label?;

    Some(Detection {
        label: label.to_string(),
        bounding_box: to_relative(bounds, dims),
        content_or_function: element.content.clone(),
        clickable: element.clickable,
        r#type: element.class.to_string(),
        resource_id: element.resource_id.to_string(),
    })
}

/// Depth-first pre-order flattening of `node` and all of its descendants.
pub fn flatten_element(node: &Value, dims: ImageDims) -> Vec<Detection> {
    let mut detections = Vec::new();
    flatten_into(std::slice::from_ref(node), dims, &mut detections);
    detections
}

/// Flatten a whole annotation file. The root node itself is never emitted;
/// traversal starts at its `children`.
pub fn flatten_annotation(root: &Value, dims: ImageDims) -> Vec<Detection> {
    let children = root
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut detections = Vec::new();
    flatten_into(children, dims, &mut detections);
    detections
}

fn flatten_into(roots: &[Value], dims: ImageDims, out: &mut Vec<Detection>) {
    // Pushed in reverse so the first sibling is popped first.
    let mut stack: Vec<&Value> = roots.iter().rev().collect();

    while let Some(node) = stack.pop() {
        let Some(element) = ElementRecord::from_value(node) else {
            continue;
        };

        if let Some(detection) = record_detection(&element, dims) {
            out.push(detection);
        }

        stack.extend(element.children.iter().rev());
    }
}
