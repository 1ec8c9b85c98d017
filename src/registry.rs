use ahash::AHashMap;
use serde_json::Value;

use crate::{meta, node::NodeId};

/// A schema document tracked by the registry: either still raw and awaiting
/// compilation, or already compiled into the node graph.
#[derive(Debug)]
pub(crate) enum Entry {
    Raw(Value),
    Compiled(NodeId),
}

/// Absolute URI -> schema document.
///
/// Preloaded documents (the bundled meta-schemas and any user-supplied
/// resources) start out raw and are compiled on demand the first time a
/// reference resolves to them. After the deferred-reference queue drains the
/// registry is never mutated again.
#[derive(Debug)]
pub(crate) struct Registry {
    entries: AHashMap<String, Entry>,
}

impl Registry {
    /// A registry holding the bundled Draft 2020-12 meta-schema documents.
    pub(crate) fn with_specifications() -> Registry {
        let mut entries = AHashMap::with_capacity(meta::META_SCHEMAS.len());
        for (uri, schema) in meta::META_SCHEMAS.iter() {
            entries.insert((*uri).to_string(), Entry::Raw((*schema).clone()));
        }
        Registry { entries }
    }

    pub(crate) fn insert_raw(&mut self, uri: impl Into<String>, schema: Value) {
        self.entries.insert(uri.into(), Entry::Raw(schema));
    }

    /// Record the compiled node for a URI, replacing any raw entry.
    pub(crate) fn register(&mut self, uri: impl Into<String>, node: NodeId) {
        self.entries.insert(uri.into(), Entry::Compiled(node));
    }

    pub(crate) fn get(&self, uri: &str) -> Option<&Entry> {
        self.entries.get(uri)
    }
}
