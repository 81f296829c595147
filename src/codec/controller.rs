//! Application façade over the codec registry.

use crate::codec::CodecRegistry;
use crate::error::Result;
use crate::tree::TopologyTree;

/// What the rest of the application talks to: text in, tree out, and the
/// reverse. Both calls delegate straight to the registry and propagate
/// codec errors untouched.
pub struct TopologyController {
    registry: CodecRegistry,
}

impl TopologyController {
    pub fn new(registry: CodecRegistry) -> Self {
        TopologyController { registry }
    }

    /// Controller over the standard codec set.
    pub fn standard() -> Result<Self> {
        Ok(TopologyController::new(CodecRegistry::standard()?))
    }

    /// Decode `text` with the codec matching its signature line.
    pub fn load(&self, text: &str) -> Result<TopologyTree> {
        self.registry.decode_dispatch(text)
    }

    /// Serialize `tree` in the export format.
    pub fn export(&self, tree: &TopologyTree) -> Result<String> {
        self.registry.encode_dispatch(tree)
    }
}
