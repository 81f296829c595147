//! Import codec for the name-server JSON topology dump.
//!
//! The document is one object graph under a top-level `topology` key:
//! nested objects are branches, anything else is the value of a leaf.
//! Key order in the document is the child order of the tree.

use serde_json::Value;

use crate::codec::{ImportCodec, ROOT_NAME};
use crate::error::{Result, TopologyError};
use crate::tree::{NodeId, TopologyTree};

/// First line of a name-server JSON topology file.
pub const JSON_SIGNATURE: &str = "{";

pub struct JsonCodec;

impl ImportCodec for JsonCodec {
    fn signatures(&self) -> &[&str] {
        &[JSON_SIGNATURE]
    }

    fn decode(&self, text: &str) -> Result<TopologyTree> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            TopologyError::Format(format!(
                "file format is not supported, JSON parse error: {e}"
            ))
        })?;

        let topology = value
            .as_object()
            .and_then(|map| map.get(ROOT_NAME))
            .ok_or_else(|| {
                TopologyError::Format("file format is not supported".to_string())
            })?;

        let mut tree = TopologyTree::new(ROOT_NAME);
        let root = tree.root();
        build_subtree(&mut tree, root, topology)?;
        Ok(tree)
    }
}

fn build_subtree(tree: &mut TopologyTree, node: NodeId, value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (key, child_value) in map {
                let child = tree.new_child(node, key);
                tree.add_child(node, child)
                    .map_err(super::into_format_error)?;
                build_subtree(tree, child, child_value)?;
            }
            Ok(())
        }
        scalar => tree
            .set_value(node, &scalar_text(scalar))
            .map_err(super::into_format_error),
    }
}

/// Render a scalar the way the topology files spell it: integral numbers
/// as plain integer text (never scientific or decimal notation),
/// fractional input truncated toward zero, booleans and null as their
/// literal text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                (n.as_f64().unwrap_or(0.0) as i64).to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        // Arrays do not occur in name-server output; keep their JSON text.
        other => other.to_string(),
    }
}
