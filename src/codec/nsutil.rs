//! Codec for the tagged stream emitted and consumed by the name-server
//! utility.
//!
//! The stream is framed by `s>topology3` / `s<topology3`. Between the
//! frame lines, `n<level>>name` opens a node at the given depth and
//! `v>value` assigns a value to the most recently opened node. Lines
//! matching none of the tags are tolerated: real dumps interleave
//! diagnostics with the payload.
//!
//! This is the only format the application exports, and its consumer is
//! byte-sensitive, so encoding reproduces the exact framing and newline
//! placement.

use regex::Regex;

use crate::codec::{topology_lines, ExportCodec, ImportCodec, ROOT_NAME};
use crate::error::{Result, TopologyError};
use crate::tree::{NodeId, TopologyTree};

/// Opening frame line and dispatch signature of the stream.
pub const NSUTIL_START: &str = "s>topology3";

/// Closing frame line; also stops decoding early when seen mid-stream.
pub const NSUTIL_END: &str = "s<topology3";

pub struct NsutilCodec {
    tag: Regex,
}

impl NsutilCodec {
    pub fn new() -> Result<Self> {
        let tag = Regex::new(r"^n(\d+)>")
            .map_err(|e| TopologyError::Internal(format!("node tag pattern: {e}")))?;
        Ok(NsutilCodec { tag })
    }
}

impl ImportCodec for NsutilCodec {
    fn signatures(&self) -> &[&str] {
        &[NSUTIL_START]
    }

    fn decode(&self, text: &str) -> Result<TopologyTree> {
        let lines = topology_lines(text);
        if lines.is_empty() {
            return Err(TopologyError::Format(
                "file format is not supported".to_string(),
            ));
        }

        let mut tree = TopologyTree::new(ROOT_NAME);
        let mut cursor = tree.root();

        for line in lines.iter().skip(1) {
            if has_prefix_ignore_case(line, "s<") {
                break;
            }

            if has_prefix_ignore_case(line, "v>") {
                tree.set_value(cursor, &line[2..])
                    .map_err(super::into_format_error)?;
                continue;
            }

            if let Some(caps) = self.tag.captures(line) {
                let tag = caps.get(0).unwrap();
                let level: u32 = caps[1].parse().map_err(|_| {
                    TopologyError::Format(format!(
                        "file format is not supported: bad node level in {line:?}"
                    ))
                })?;
                let name = &line[tag.end()..];

                if level <= tree.node(cursor).level() {
                    cursor = tree
                        .ancestor_at_level(cursor, level)
                        .map_err(super::into_format_error)?;
                }

                let node = tree.new_child(cursor, name);
                tree.add_child(cursor, node)
                    .map_err(super::into_format_error)?;
                cursor = node;
            }
            // Any other line is skipped.
        }

        if cursor == tree.root() {
            // Nothing was ever attached: the body carried no node tags.
            return Err(TopologyError::Format(
                "file format is not supported".to_string(),
            ));
        }

        Ok(tree)
    }
}

impl ExportCodec for NsutilCodec {
    fn encode(&self, tree: &TopologyTree) -> Result<String> {
        let mut out = String::new();
        out.push_str(NSUTIL_START);
        out.push('\n');
        out.push_str(&subtree_text(tree, tree.root()));
        out.push('\n');
        out.push_str(NSUTIL_END);
        out.push('\n');
        Ok(out)
    }
}

/// Node line plus all descendant lines, newline-joined. The root itself
/// contributes nothing, so a tree's text starts with its first child.
fn subtree_text(tree: &TopologyTree, node: NodeId) -> String {
    let mut buf = node_text(tree, node);
    for &child in tree.node(node).children() {
        if !buf.is_empty() {
            buf.push('\n');
        }
        buf.push_str(&subtree_text(tree, child));
    }
    buf
}

fn node_text(tree: &TopologyTree, node: NodeId) -> String {
    let entry = tree.node(node);
    if entry.level() == 0 {
        return String::new();
    }

    let name = format!("n{}>{}", entry.level(), entry.name());
    match entry.value() {
        Some(value) if !value.is_empty() => format!("{name}\nv>{value}"),
        _ => name,
    }
}

/// ASCII-case-insensitive prefix test that never slices mid-character.
fn has_prefix_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
