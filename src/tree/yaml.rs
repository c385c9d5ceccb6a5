//! YAML codec for document trees
//!
//! Bridges between YAML text and the tree model through `serde_yaml`.
//! Scalar styles are applied best-effort on output: quoted styles force
//! string emission, plain scalars round-trip through native YAML types.

use crate::core::error::BuildError;
use crate::tree::{Mapping, Node, Scalar, ScalarStyle, Sequence};
use serde::Deserialize;
use serde_yaml::Value;

/// Parse a single YAML document into a tree
pub fn parse(text: &str) -> Result<Node, BuildError> {
    let value: Value = serde_yaml::from_str(text)?;
    from_value(value)
}

/// Parse a multi-document YAML stream into trees
///
/// Empty documents (e.g. a trailing `---`) are skipped.
pub fn parse_documents(text: &str) -> Result<Vec<Node>, BuildError> {
    let mut nodes = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        nodes.push(from_value(value)?);
    }
    Ok(nodes)
}

/// Serialize a tree into YAML text
pub fn serialize(node: &Node) -> Result<String, BuildError> {
    Ok(serde_yaml::to_string(&to_value(node))?)
}

/// Serialize several trees into one multi-document YAML stream
pub fn serialize_documents(nodes: &[Node]) -> Result<String, BuildError> {
    let mut out = String::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&serialize(node)?);
    }
    Ok(out)
}

fn from_value(value: Value) -> Result<Node, BuildError> {
    match value {
        Value::Null => Ok(Scalar::empty().into()),
        Value::Bool(b) => Ok(Scalar::new(b.to_string()).into()),
        Value::Number(n) => Ok(Scalar::new(n.to_string()).into()),
        Value::String(s) => Ok(Scalar::new(s).into()),
        Value::Sequence(items) => {
            let mut seq = Sequence::new();
            for item in items {
                seq.push(from_value(item)?);
            }
            Ok(seq.into())
        }
        Value::Mapping(entries) => {
            let mut mapping = Mapping::new();
            for (key, value) in entries {
                let key = scalar_key(key)?;
                mapping.set(key, from_value(value)?);
            }
            Ok(mapping.into())
        }
        Value::Tagged(tagged) => from_value(tagged.value),
    }
}

fn scalar_key(key: Value) -> Result<Scalar, BuildError> {
    match key {
        Value::String(s) => Ok(Scalar::new(s)),
        Value::Bool(b) => Ok(Scalar::new(b.to_string())),
        Value::Number(n) => Ok(Scalar::new(n.to_string())),
        other => Err(BuildError::UnsupportedYaml(format!(
            "mapping keys must be scalars, found {:?}",
            other
        ))),
    }
}

fn to_value(node: &Node) -> Value {
    match node {
        Node::Scalar(s) => scalar_value(s),
        Node::Sequence(seq) => Value::Sequence(seq.iter().map(to_value).collect()),
        Node::Mapping(mapping) => {
            let mut out = serde_yaml::Mapping::new();
            for (key, value) in mapping.iter() {
                out.insert(Value::String(key.value().to_string()), to_value(value));
            }
            Value::Mapping(out)
        }
    }
}

fn scalar_value(scalar: &Scalar) -> Value {
    let text = scalar.value();
    match scalar.style {
        // Plain scalars round-trip through native YAML types so numbers
        // and booleans are not quoted on output.
        ScalarStyle::Plain => {
            if text.is_empty() {
                Value::Null
            } else if text == "true" {
                Value::Bool(true)
            } else if text == "false" {
                Value::Bool(false)
            } else if let Ok(i) = text.parse::<i64>() {
                Value::Number(i.into())
            } else if let Ok(f) = text.parse::<f64>() {
                Value::Number(serde_yaml::Number::from(f))
            } else {
                Value::String(text.to_string())
            }
        }
        // Any explicit style forces string emission; the final quoting is
        // up to the serializer.
        _ => Value::String(text.to_string()),
    }
}
