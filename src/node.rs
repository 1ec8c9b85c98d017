use ahash::AHashMap;
use fancy_regex::Regex;
use serde_json::Value;

use crate::{scope::ScopeId, vocabulary::VocabularySet};

/// Index of a [`SchemaNode`] in the arena owned by the validator.
///
/// The schema graph may be cyclic through `$ref` edges, so nodes refer to
/// each other by id instead of ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(u32::try_from(index).expect("Schema graph exceeds u32::MAX nodes"))
    }
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One keyword slot of a compiled schema.
///
/// Compilation replaces the raw values of recognized applicator and core
/// keywords with compiled children; everything else stays [`Field::Raw`].
#[derive(Debug)]
pub(crate) enum Field {
    Raw(Value),
    /// A single compiled subschema (`items`, `not`, linked `$ref`, ...).
    Schema(NodeId),
    /// An ordered sequence of subschemas (`allOf`, `prefixItems`, ...).
    SchemaList(Vec<NodeId>),
    /// Named subschemas in document order (`properties`, `$defs`, ...).
    SchemaMap(Vec<(String, NodeId)>),
    /// `patternProperties`: compiled regexes paired with their subschemas.
    Patterns(Vec<(Regex, NodeId)>),
    /// A compiled `pattern` regex.
    Regex(Regex),
    /// A `$dynamicRef` prepared for evaluation-time resolution.
    DynamicRef(DynamicRef),
}

/// The compiled form of a `$dynamicRef`.
#[derive(Debug, Clone)]
pub(crate) enum DynamicRef {
    /// The reference has no bare-name fragment; the statically linked target
    /// is used directly, just like `$ref`.
    Static(NodeId),
    /// A bare-name fragment: the anchor is re-resolved against the dynamic
    /// scope on every evaluation, starting from the scope of `base`.
    Anchor { base: NodeId, name: String },
}

/// A compiled schema. Boolean schemas are normalized before compilation:
/// `true` becomes an empty node, `false` a node holding `{"not": {}}`.
#[derive(Debug)]
pub(crate) struct SchemaNode {
    fields: AHashMap<String, Field>,
    parent: Option<NodeId>,
    scope: ScopeId,
    uri: Option<String>,
    vocabularies: VocabularySet,
}

impl SchemaNode {
    pub(crate) fn new(
        parent: Option<NodeId>,
        scope: ScopeId,
        vocabularies: VocabularySet,
    ) -> SchemaNode {
        SchemaNode {
            fields: AHashMap::new(),
            parent,
            scope,
            uri: None,
            vocabularies,
        }
    }

    pub(crate) fn field(&self, keyword: &str) -> Option<&Field> {
        self.fields.get(keyword)
    }

    /// The raw value of a keyword that has not been compiled into children.
    pub(crate) fn raw(&self, keyword: &str) -> Option<&Value> {
        match self.fields.get(keyword) {
            Some(Field::Raw(value)) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn insert(&mut self, keyword: impl Into<String>, field: Field) {
        self.fields.insert(keyword.into(), field);
    }

    pub(crate) fn remove(&mut self, keyword: &str) -> Option<Field> {
        self.fields.remove(keyword)
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn scope(&self) -> ScopeId {
        self.scope
    }

    pub(crate) fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub(crate) fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = Some(uri.into());
    }

    pub(crate) fn vocabularies(&self) -> VocabularySet {
        self.vocabularies
    }
}
