//! Compilation of raw schemas into the interlinked node graph.
//!
//! Compilation runs in two phases. The first walks the raw document
//! top-down: boolean schemas are normalized, `$id` opens lexical scopes and
//! registers absolute URIs, anchors are recorded, and every active
//! vocabulary replaces its recognized keywords with compiled subschemas.
//! `$ref` and `$dynamicRef` are only queued during this phase. The second
//! phase drains that queue against the fully populated registry, so forward
//! and cyclic references resolve; documents from the preloaded pool are
//! compiled on demand the first time a reference lands on them.

use std::collections::VecDeque;

use serde_json::{Map, Value};

use crate::{
    error::{ReferenceError, SchemaError},
    node::{Field, NodeId, SchemaNode},
    registry::{Entry, Registry},
    resolver,
    scope::{LexicalScope, ScopeId},
    uri,
    validator::Validator,
    vocabulary::{Vocabulary, VocabularySet},
};

struct Deferred {
    node: NodeId,
    keyword: &'static str,
    reference: String,
}

pub(crate) struct Compiler {
    nodes: Vec<SchemaNode>,
    scopes: Vec<LexicalScope>,
    registry: Registry,
    deferred: VecDeque<Deferred>,
}

impl Compiler {
    pub(crate) fn new() -> Compiler {
        Compiler {
            nodes: Vec::new(),
            scopes: Vec::new(),
            registry: Registry::with_specifications(),
            deferred: VecDeque::new(),
        }
    }

    /// Preload an external document under its registry URI.
    pub(crate) fn preload(&mut self, uri: impl Into<String>, schema: Value) {
        self.registry.insert_raw(uri, schema);
    }

    /// Compile a root schema and link every queued reference.
    pub(crate) fn compile(mut self, schema: &Value) -> Result<Validator, SchemaError> {
        let root = self.compile_schema(schema, None, None)?;
        self.link()?;
        Ok(Validator::new(self.nodes, self.scopes, root))
    }

    pub(crate) fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SchemaNode {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &LexicalScope {
        &self.scopes[id.index()]
    }

    /// Queue a reference for the linking phase.
    pub(crate) fn defer(&mut self, node: NodeId, keyword: &'static str, reference: String) {
        self.deferred.push_back(Deferred {
            node,
            keyword,
            reference,
        });
    }

    /// Take a keyword's raw value out of a node for compilation.
    ///
    /// Vocabulary compile handlers run once per node and are sequenced, so a
    /// recognized keyword is still raw when its handler takes it.
    pub(crate) fn take_raw(&mut self, node: NodeId, keyword: &str) -> Option<Value> {
        match self.nodes[node.index()].remove(keyword) {
            Some(Field::Raw(value)) => Some(value),
            Some(field) => {
                self.nodes[node.index()].insert(keyword, field);
                None
            }
            None => None,
        }
    }

    pub(crate) fn compile_subschema(
        &mut self,
        raw: &Value,
        parent: NodeId,
    ) -> Result<NodeId, SchemaError> {
        self.compile_schema(raw, Some(parent), None)
    }

    /// Look up a document by absolute URI, compiling it first if the
    /// registry still holds it raw.
    pub(crate) fn document(&mut self, uri: &str) -> Result<NodeId, SchemaError> {
        match self.registry.get(uri) {
            Some(Entry::Compiled(id)) => Ok(*id),
            Some(Entry::Raw(schema)) => {
                let schema = schema.clone();
                let id = self.compile_schema(&schema, None, Some(uri))?;
                self.registry.register(uri, id);
                Ok(id)
            }
            None => Err(ReferenceError::unresolvable(uri).into()),
        }
    }

    fn compile_schema(
        &mut self,
        raw: &Value,
        parent: Option<NodeId>,
        document_uri: Option<&str>,
    ) -> Result<NodeId, SchemaError> {
        let normalized;
        let schema: &Map<String, Value> = match raw {
            Value::Object(map) => map,
            Value::Bool(true) => {
                normalized = Map::new();
                &normalized
            }
            Value::Bool(false) => {
                // An always-failing node
                let mut map = Map::new();
                map.insert("not".to_string(), Value::Object(Map::new()));
                normalized = map;
                &normalized
            }
            _ => return Err(SchemaError::invalid_schema(json_type_name(raw))),
        };

        let vocabularies = match schema.get("$schema") {
            Some(Value::String(meta_uri)) => self.meta_vocabularies(meta_uri)?,
            Some(_) => return Err(SchemaError::invalid_keyword("$schema", "a string")),
            None => match parent {
                Some(parent) => self.node(parent).vocabularies(),
                None => VocabularySet::DEFAULT,
            },
        };

        let id = NodeId::new(self.nodes.len());
        let scope = if parent.is_none() || schema.contains_key("$id") {
            let scope = ScopeId::new(self.scopes.len());
            self.scopes.push(LexicalScope::new(id));
            scope
        } else {
            self.node(parent.expect("Parent is present")).scope()
        };

        let mut node = SchemaNode::new(parent, scope, vocabularies);
        for (keyword, value) in schema {
            node.insert(keyword.clone(), Field::Raw(value.clone()));
        }
        if parent.is_none() {
            if let Some(uri) = document_uri {
                node.set_uri(uri);
            }
        }
        self.nodes.push(node);

        if let Some(value) = schema.get("$id") {
            let Some(identifier) = value.as_str() else {
                return Err(SchemaError::invalid_keyword("$id", "a string"));
            };
            let resolved = if uri::is_absolute(identifier) {
                identifier.to_string()
            } else {
                let base = self.nearest_base(id, identifier)?;
                uri::resolve_against(&base, identifier)
            };
            self.nodes[id.index()].set_uri(resolved.clone());
            self.registry.register(resolved, id);
        }
        if let Some(value) = schema.get("$anchor") {
            let Some(name) = value.as_str() else {
                return Err(SchemaError::invalid_keyword("$anchor", "a string"));
            };
            self.scopes[scope.index()].add_anchor(name, id);
        }
        if let Some(value) = schema.get("$dynamicAnchor") {
            let Some(name) = value.as_str() else {
                return Err(SchemaError::invalid_keyword("$dynamicAnchor", "a string"));
            };
            self.scopes[scope.index()].add_dynamic_anchor(name, id);
        }

        for vocabulary in Vocabulary::ORDER {
            if vocabularies.contains(vocabulary) {
                vocabulary.compile(self, id)?;
            }
        }
        Ok(id)
    }

    /// The absolute URI of the nearest enclosing scope, used to resolve a
    /// relative `$id`. Walks outward from the node through scope roots.
    fn nearest_base(&self, from: NodeId, reference: &str) -> Result<String, SchemaError> {
        let mut current = self.node(from).parent();
        while let Some(id) = current {
            let node = self.node(id);
            let root = self.scope(node.scope()).root();
            if let Some(base) = self.node(root).uri() {
                if uri::is_absolute(base) {
                    return Ok(base.to_string());
                }
            }
            current = node.parent();
        }
        // A document root resolves its own relative `$id` against the URI it
        // was loaded under.
        if let Some(base) = self.node(from).uri() {
            if uri::is_absolute(base) {
                return Ok(base.to_string());
            }
        }
        Err(ReferenceError::no_base_uri(reference).into())
    }

    /// The active vocabulary set declared by a meta-schema. The meta-schema
    /// document itself does not have to be compiled for this; its raw
    /// `$vocabulary` field is enough.
    fn meta_vocabularies(&self, uri: &str) -> Result<VocabularySet, SchemaError> {
        match self.registry.get(uri.trim_end_matches('#')) {
            Some(Entry::Raw(schema)) => VocabularySet::from_meta(schema.get("$vocabulary")),
            Some(Entry::Compiled(id)) => {
                VocabularySet::from_meta(self.node(*id).raw("$vocabulary"))
            }
            None => Err(ReferenceError::unresolvable(uri).into()),
        }
    }

    /// Drain the deferred-reference queue. Resolution may compile further
    /// pool documents, which enqueue their own references; the loop runs
    /// until the whole reachable graph is linked.
    fn link(&mut self) -> Result<(), SchemaError> {
        while let Some(Deferred {
            node,
            keyword,
            reference,
        }) = self.deferred.pop_front()
        {
            if keyword == "$ref" {
                let target = resolver::resolve(self, node, &reference)?;
                self.nodes[node.index()].insert(keyword, Field::Schema(target));
            } else {
                let target = resolver::prepare_dynamic(self, node, &reference)?;
                self.nodes[node.index()].insert(keyword, Field::DynamicRef(target));
            }
        }
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
