//! In-memory topology tree for distributed-system dump files, with codecs
//! for the three textual encodings the surrounding tooling produces: the
//! indented full-system-dump format, the name-server tagged stream, and
//! the name-server JSON graph.
//!
//! Input format detection is driven purely by the first non-blank line of
//! the document. Exports always use the tagged stream, whatever format
//! was imported.

pub mod codec;
pub mod error;
pub mod tree;

pub use codec::{CodecRegistry, TopologyController};
pub use error::{Result, TopologyError};
pub use tree::{NodeId, TopoNode, TopologyTree};
