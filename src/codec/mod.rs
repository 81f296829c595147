//! Codecs between topology trees and the textual formats produced by the
//! external tools.
//!
//! Every format is recognized by its first non-blank line (its signature);
//! no file extension or MIME type is ever consulted. Import codecs turn
//! text into a [`TopologyTree`], the single export codec does the reverse.

mod controller;
mod fsid;
mod json;
mod nsutil;
mod registry;

pub use controller::TopologyController;
pub use fsid::{FsidCodec, FSID_SIGNATURE_V1, FSID_SIGNATURE_V2};
pub use json::{JsonCodec, JSON_SIGNATURE};
pub use nsutil::{NsutilCodec, NSUTIL_END, NSUTIL_START};
pub use registry::CodecRegistry;

use crate::error::Result;
use crate::tree::TopologyTree;

/// Name given to the root node of every decoded tree.
pub const ROOT_NAME: &str = "topology";

/// A codec that reads one or more input formats.
pub trait ImportCodec: Send + Sync {
    /// Signature lines this codec accepts, matched exactly against the
    /// first non-blank line of the input.
    fn signatures(&self) -> &[&str];

    /// Parse `text` into a topology tree.
    fn decode(&self, text: &str) -> Result<TopologyTree>;
}

/// A codec that writes the export format.
pub trait ExportCodec: Send + Sync {
    /// Serialize the tree, reproducing the target format byte-for-byte.
    fn encode(&self, tree: &TopologyTree) -> Result<String>;
}

/// Re-wrap a tree error raised mid-decode as a format violation: inside a
/// codec, a bad cursor walk or an attach to a leaf means the input text is
/// malformed, not that the caller misused the tree.
pub(crate) fn into_format_error(err: crate::error::TopologyError) -> crate::error::TopologyError {
    crate::error::TopologyError::Format(err.to_string())
}

/// Split `text` into lines, dropping blank and whitespace-only ones.
/// Indentation and other leading whitespace on non-blank lines survives.
pub(crate) fn topology_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// First non-blank line of `text`, if any.
pub(crate) fn first_line(text: &str) -> Option<&str> {
    text.lines().find(|line| !line.trim().is_empty())
}
