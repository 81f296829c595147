//! Import codec for the indented full-system-dump topology format.
//!
//! The format is a plain indentation tree: two spaces of leading
//! whitespace per level, one `name=value` or bare `name` entry per line.
//! A non-blank value after the first `=` makes the entry a leaf. The file
//! opens with `''=` (older dumps) or `''` (newer dumps).

use crate::codec::{topology_lines, ImportCodec, ROOT_NAME};
use crate::error::{Result, TopologyError};
use crate::tree::TopologyTree;

/// First line of a full-system-dump topology file, older layout.
pub const FSID_SIGNATURE_V1: &str = "''=";

/// First line of a full-system-dump topology file, newer layout.
pub const FSID_SIGNATURE_V2: &str = "''";

/// Number of leading whitespace characters per topology level.
const SPACES_PER_LEVEL: usize = 2;

pub struct FsidCodec;

impl ImportCodec for FsidCodec {
    fn signatures(&self) -> &[&str] {
        &[FSID_SIGNATURE_V1, FSID_SIGNATURE_V2]
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

        // The first line is the signature; entries follow.
        for (lineno, line) in lines.iter().enumerate().skip(1) {
            let (level, rest) = indent_level(line, lineno + 1)?;

            if level <= tree.node(cursor).level() {
                cursor = tree
                    .ancestor_at_level(cursor, level)
                    .map_err(super::into_format_error)?;
            }

            let node = match rest.split_once('=') {
                Some((name, value)) if !value.trim().is_empty() => {
                    tree.new_leaf(cursor, name, value)
                }
                Some((name, _)) => tree.new_child(cursor, name),
                None => tree.new_child(cursor, rest),
            };

            tree.add_child(cursor, node)
                .map_err(super::into_format_error)?;
            cursor = node;
        }

        Ok(tree)
    }
}

/// Depth of an entry from its leading whitespace, plus the entry text.
/// Anything that is not a multiple of two whitespace characters is not a
/// dump file.
fn indent_level(line: &str, lineno: usize) -> Result<(u32, &str)> {
    let mut count = 0usize;
    let mut offset = 0usize;
    for (pos, ch) in line.char_indices() {
        if ch.is_whitespace() {
            count += 1;
        } else {
            offset = pos;
            break;
        }
    }

    if count % SPACES_PER_LEVEL != 0 {
        return Err(TopologyError::Format(format!(
            "file format is not supported: bad indentation at line {lineno}"
        )));
    }

    Ok(((count / SPACES_PER_LEVEL) as u32, &line[offset..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(text: &str) -> Result<TopologyTree> {
        FsidCodec.decode(text)
    }

    #[test]
    fn single_host_dump() {
        let tree = decode("''=\n  host=\n    vanpghana11").unwrap();
        let root = tree.root();

        assert_eq!(tree.node(root).name(), "topology");
        assert_eq!(tree.node(root).children().len(), 1);

        let host = tree.node(root).children()[0];
        assert_eq!(tree.node(host).name(), "host");
        assert_eq!(tree.node(host).id(), "/host");
        assert!(!tree.node(host).is_leaf());

        let hostname = tree.node(host).children()[0];
        assert_eq!(tree.node(hostname).name(), "vanpghana11");
        assert_eq!(tree.node(hostname).id(), "/host/vanpghana11");
        assert_eq!(tree.node(hostname).value().unwrap_or(""), "");
    }

    #[test]
    fn values_after_the_first_equals_become_leaves() {
        let tree = decode("''\n  host=\n    port=30001\n    filter=a=b").unwrap();
        let host = tree.node(tree.root()).children()[0];

        let port = tree.find_child_by_name(host, "port").unwrap();
        assert!(tree.node(port).is_leaf());
        assert_eq!(tree.node(port).value(), Some("30001"));

        // Only the first `=` splits; the rest belongs to the value.
        let filter = tree.find_child_by_name(host, "filter").unwrap();
        assert_eq!(tree.node(filter).value(), Some("a=b"));
    }

    #[test]
    fn siblings_and_ascent() {
        let text = "''=\n  hosts=\n    a=\n      role=worker\n    b=\n  version=2";
        let tree = decode(text).unwrap();
        let root = tree.root();

        let hosts = tree.find_child_by_name(root, "hosts").unwrap();
        assert_eq!(tree.node(hosts).children().len(), 2);

        let a = tree.find_child_by_name(hosts, "a").unwrap();
        let role = tree.find_child_by_name(a, "role").unwrap();
        assert_eq!(tree.node(role).value(), Some("worker"));
        assert_eq!(tree.node(role).level(), 3);

        let version = tree.find_child_by_name(root, "version").unwrap();
        assert_eq!(tree.node(version).level(), 1);
        assert_eq!(tree.node(version).value(), Some("2"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let tree = decode("''=\n\n  host=\n   \t\n    vanpghana11\n").unwrap();
        let host = tree.find_child_by_name(tree.root(), "host").unwrap();
        assert_eq!(tree.node(host).children().len(), 1);
    }

    #[test]
    fn odd_indentation_is_rejected() {
        let err = decode("''=\n  host=\n   broken").unwrap_err();
        assert!(matches!(err, TopologyError::Format(_)));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn level_jump_that_lands_on_a_leaf_is_rejected() {
        // `port=1` is a leaf; the next line tries to nest under it.
        let err = decode("''=\n  port=1\n    deeper=2\n      more=3").unwrap_err();
        assert!(matches!(err, TopologyError::Format(_)));
    }
}
