use serde_json::{Map, Number, Value};

use super::{FormatAdapter, ParseError};
use crate::errors::{AggregationError, Result};
use crate::node::{Node, NodeKind, ResponseDocument, ScalarType, WireFormat};

/// JSON: objects become keyed [`NodeKind::Object`] nodes, arrays anonymous
/// [`NodeKind::Array`] members. The root may be an object or a bare array.
pub struct JsonAdapter;

fn to_node(tag: &str, value: Value) -> Node {
    match value {
        Value::Object(map) => Node::object(tag)
            .with_children(map.into_iter().map(|(key, value)| to_node(&key, value))),
        Value::Array(values) => {
            Node::array(tag).with_children(values.into_iter().map(|value| to_node("", value)))
        }
        Value::String(s) => Node::scalar(tag, s, ScalarType::Text),
        Value::Number(n) => Node::scalar(tag, n.to_string(), ScalarType::Number),
        Value::Bool(b) => Node::scalar(tag, b.to_string(), ScalarType::Boolean),
        Value::Null => Node::null(tag),
    }
}

fn to_value(node: &Node) -> Result<Value> {
    let text = node.text.as_deref().unwrap_or_default();

    let value = match node.kind {
        NodeKind::Object => {
            let mut map = Map::with_capacity(node.children.len());
            for child in &node.children {
                map.insert(child.tag.clone(), to_value(child)?);
            }
            Value::Object(map)
        }
        NodeKind::Array => Value::Array(
            node.children
                .iter()
                .map(to_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        NodeKind::Scalar(ScalarType::Text) => Value::String(text.to_string()),
        NodeKind::Scalar(ScalarType::Number) => {
            let number: Number = text.parse().map_err(|e| {
                AggregationError::Serialization(format!("invalid number {text:?}: {e}"))
            })?;
            Value::Number(number)
        }
        NodeKind::Scalar(ScalarType::Boolean) => Value::Bool(text == "true"),
        NodeKind::Scalar(ScalarType::Null) => Value::Null,
    };
    Ok(value)
}

impl FormatAdapter for JsonAdapter {
    fn format(&self) -> WireFormat {
        WireFormat::Json
    }

    fn parse(&self, raw: &str) -> Result<ResponseDocument, ParseError> {
        let value: Value = serde_json::from_str(raw).map_err(ParseError::new)?;
        if !matches!(value, Value::Object(_) | Value::Array(_)) {
            return Err(ParseError::new("document root must be an object or an array"));
        }
        Ok(ResponseDocument::new(to_node("", value), WireFormat::Json))
    }

    fn serialize(&self, doc: &ResponseDocument) -> Result<String> {
        let value = to_value(&doc.root)?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| AggregationError::Serialization(e.to_string()))
    }
}
