use serde_json::Value;

use crate::{
    compiler::Compiler,
    error::SchemaError,
    node::{NodeId, SchemaNode},
    scope::{DynamicScope, LexicalScope, ScopeId},
    vocabulary::Vocabulary,
};

/// Configuration options for building a [`Validator`].
///
/// The main knob is the pool of external documents: every schema reachable
/// through `$ref` must either live inside the root document or be
/// preregistered here under its absolute URI. Nothing is ever fetched.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    resources: Vec<(String, Value)>,
}

impl ValidationOptions {
    /// Register an external schema document under the given URI.
    #[must_use]
    pub fn with_resource(mut self, uri: impl Into<String>, schema: Value) -> ValidationOptions {
        self.resources.push((uri.into(), schema));
        self
    }

    /// Register multiple external schema documents.
    #[must_use]
    pub fn with_resources(
        mut self,
        pairs: impl IntoIterator<Item = (String, Value)>,
    ) -> ValidationOptions {
        self.resources.extend(pairs);
        self
    }

    /// Build a validator for the given schema using these options.
    ///
    /// Compilation eagerly links every reachable `$ref`, so the returned
    /// validator is immutable and safe to share across threads.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is malformed or a reference cannot be
    /// resolved.
    pub fn build(&self, schema: &Value) -> Result<Validator, SchemaError> {
        let mut compiler = Compiler::new();
        for (uri, resource) in &self.resources {
            compiler.preload(uri.trim_end_matches('#'), resource.clone());
        }
        compiler.compile(schema)
    }
}

/// A compiled JSON Schema.
///
/// The schema graph is read-only after compilation; any number of instances
/// may be validated concurrently, each validation carrying its own dynamic
/// scope on the call stack.
#[derive(Debug)]
pub struct Validator {
    nodes: Vec<SchemaNode>,
    scopes: Vec<LexicalScope>,
    root: NodeId,
}

impl Validator {
    /// Get [`ValidationOptions`] for configuring a new validator.
    #[must_use]
    pub fn options() -> ValidationOptions {
        ValidationOptions::default()
    }

    pub(crate) fn new(
        nodes: Vec<SchemaNode>,
        scopes: Vec<LexicalScope>,
        root: NodeId,
    ) -> Validator {
        Validator {
            nodes,
            scopes,
            root,
        }
    }

    /// Whether the instance conforms to the schema.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.evaluate(self.root, instance, None)
    }

    pub(crate) fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &LexicalScope {
        &self.scopes[id.index()]
    }

    /// Validate an instance in place.
    ///
    /// A fresh frame is pushed onto the dynamic scope; on success its
    /// evaluated sets merge into the caller's frame, so adjacent
    /// `unevaluated*` keywords observe what this subschema covered.
    pub(crate) fn evaluate(
        &self,
        node: NodeId,
        instance: &Value,
        previous: Option<&DynamicScope<'_>>,
    ) -> bool {
        let scope = DynamicScope::new(self.node(node).scope(), previous);
        if !self.run_vocabularies(node, instance, &scope) {
            return false;
        }
        if let Some(previous) = previous {
            previous.absorb(&scope);
        }
        true
    }

    /// Validate a child instance (a property value, an array element or a
    /// property name). The frame chain still grows for dynamic-anchor
    /// search, but the child's evaluated sets describe a different instance
    /// and are dropped.
    pub(crate) fn evaluate_detached(
        &self,
        node: NodeId,
        instance: &Value,
        previous: &DynamicScope<'_>,
    ) -> bool {
        let scope = DynamicScope::new(self.node(node).scope(), Some(previous));
        self.run_vocabularies(node, instance, &scope)
    }

    fn run_vocabularies(&self, node: NodeId, instance: &Value, scope: &DynamicScope<'_>) -> bool {
        let vocabularies = self.node(node).vocabularies();
        Vocabulary::ORDER
            .into_iter()
            .filter(|vocabulary| vocabularies.contains(*vocabulary))
            .all(|vocabulary| vocabulary.evaluate(self, node, instance, scope))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Validator;

    #[test]
    fn validators_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }

    #[test]
    fn repeated_validation_is_deterministic() {
        let validator = Validator::options()
            .build(&json!({"type": "object", "required": ["a"]}))
            .expect("Valid schema");
        let instance = json!({"a": 1});
        for _ in 0..3 {
            assert!(validator.is_valid(&instance));
            assert!(!validator.is_valid(&json!({})));
        }
    }
}
