//! Signature-keyed codec registry.
//!
//! Built once at startup from a fixed list of codecs and read-only from
//! then on; the registry may be shared freely across threads.

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{first_line, ExportCodec, FsidCodec, ImportCodec, JsonCodec, NsutilCodec};
use crate::error::{Result, TopologyError};
use crate::tree::TopologyTree;

pub struct CodecRegistry {
    imports: HashMap<String, Arc<dyn ImportCodec>>,
    export: Arc<dyn ExportCodec>,
}

impl CodecRegistry {
    /// Build a registry from an explicit codec list. Later codecs win on
    /// signature collisions. There is exactly one export format.
    pub fn new(imports: Vec<Arc<dyn ImportCodec>>, export: Arc<dyn ExportCodec>) -> Self {
        let mut map: HashMap<String, Arc<dyn ImportCodec>> = HashMap::new();
        for codec in imports {
            for signature in codec.signatures() {
                map.insert((*signature).to_string(), Arc::clone(&codec));
            }
        }
        CodecRegistry {
            imports: map,
            export,
        }
    }

    /// The full set of codecs the application ships: both dump layouts,
    /// the name-server stream, the name-server JSON graph; exports go out
    /// as the stream.
    pub fn standard() -> Result<Self> {
        let nsutil = Arc::new(NsutilCodec::new()?);
        Ok(Self::new(
            vec![Arc::new(FsidCodec), nsutil.clone(), Arc::new(JsonCodec)],
            nsutil,
        ))
    }

    /// Pick the import codec whose signature equals the first non-blank
    /// line of `text` and decode with it.
    pub fn decode_dispatch(&self, text: &str) -> Result<TopologyTree> {
        let signature = first_line(text).unwrap_or_default();
        match self.imports.get(signature) {
            Some(codec) => codec.decode(text),
            None => Err(TopologyError::UnsupportedFormat(signature.to_string())),
        }
    }

    /// Serialize with the single export codec.
    pub fn encode_dispatch(&self, tree: &TopologyTree) -> Result<String> {
        self.export.encode(tree)
    }

    /// Signatures with a registered import codec, unordered.
    pub fn import_signatures(&self) -> Vec<&str> {
        self.imports.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FSID_SIGNATURE_V1, FSID_SIGNATURE_V2, JSON_SIGNATURE, NSUTIL_START};
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_registry_covers_all_input_formats() {
        let registry = CodecRegistry::standard().unwrap();
        let mut signatures = registry.import_signatures();
        signatures.sort_unstable();

        let mut expected = vec![
            FSID_SIGNATURE_V1,
            FSID_SIGNATURE_V2,
            NSUTIL_START,
            JSON_SIGNATURE,
        ];
        expected.sort_unstable();
        assert_eq!(signatures, expected);
    }

    #[test]
    fn dispatch_ignores_leading_blank_lines() {
        let registry = CodecRegistry::standard().unwrap();
        let tree = registry
            .decode_dispatch("\n   \ns>topology3\nn1>host\ns<topology3\n")
            .unwrap();
        assert_eq!(tree.node(tree.root()).children().len(), 1);
    }

    #[test]
    fn unknown_signature_is_unsupported() {
        let registry = CodecRegistry::standard().unwrap();
        let err = registry.decode_dispatch("TEST_NO_PROCESSOR_MATCH").unwrap_err();
        assert!(matches!(err, TopologyError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn blank_input_is_unsupported_not_a_panic() {
        let registry = CodecRegistry::standard().unwrap();
        let err = registry.decode_dispatch("  \n \n").unwrap_err();
        assert!(matches!(err, TopologyError::UnsupportedFormat(_)));
    }
}
