//! The core vocabulary: `$id`, `$schema`, `$anchor`, `$dynamicAnchor`,
//! `$vocabulary` and `$comment` are fully handled at compile time; `$defs`
//! compiles its subschemas so they are addressable, and only `$ref` /
//! `$dynamicRef` have runtime behavior.

use serde_json::Value;

use crate::{
    compiler::Compiler,
    error::SchemaError,
    node::{DynamicRef, Field, NodeId},
    resolver,
    scope::DynamicScope,
    validator::Validator,
};

pub(crate) fn compile(compiler: &mut Compiler, node: NodeId) -> Result<(), SchemaError> {
    if let Some(value) = compiler.take_raw(node, "$defs") {
        let Value::Object(entries) = &value else {
            return Err(SchemaError::invalid_keyword("$defs", "an object of schemas"));
        };
        let mut children = Vec::with_capacity(entries.len());
        for (name, subschema) in entries {
            children.push((name.clone(), compiler.compile_subschema(subschema, node)?));
        }
        compiler
            .node_mut(node)
            .insert("$defs", Field::SchemaMap(children));
    }
    for keyword in ["$ref", "$dynamicRef"] {
        let reference = match compiler.node(node).raw(keyword) {
            Some(Value::String(reference)) => Some(reference.clone()),
            Some(_) => return Err(SchemaError::invalid_keyword(keyword, "a string")),
            None => None,
        };
        if let Some(reference) = reference {
            compiler.defer(node, keyword, reference);
        }
    }
    Ok(())
}

pub(crate) fn evaluate(
    validator: &Validator,
    node: NodeId,
    instance: &Value,
    scope: &DynamicScope<'_>,
) -> bool {
    // `$ref` does not suppress sibling keywords; the target validates the
    // same instance and its evaluated sets flow back into this frame.
    if let Some(Field::Schema(target)) = validator.node(node).field("$ref") {
        if !validator.evaluate(*target, instance, Some(scope)) {
            return false;
        }
    }
    if let Some(Field::DynamicRef(reference)) = validator.node(node).field("$dynamicRef") {
        let target = match reference {
            DynamicRef::Static(target) => Some(*target),
            DynamicRef::Anchor { base, name } => {
                resolver::resolve_dynamic_anchor(validator, *base, name, scope)
            }
        };
        match target {
            Some(target) if validator.evaluate(target, instance, Some(scope)) => {}
            _ => return false,
        }
    }
    true
}
