//! `unevaluatedItems` / `unevaluatedProperties`.
//!
//! These run after the core and applicator vocabularies, so the frame
//! already holds everything that `$ref`, `allOf`, `if`/`then`/`else`,
//! `properties` and friends evaluated for this instance.

use serde_json::Value;

use crate::{
    compiler::Compiler,
    error::SchemaError,
    node::{Field, NodeId},
    scope::DynamicScope,
    validator::Validator,
};

pub(crate) fn compile(compiler: &mut Compiler, node: NodeId) -> Result<(), SchemaError> {
    for keyword in ["unevaluatedItems", "unevaluatedProperties"] {
        if let Some(value) = compiler.take_raw(node, keyword) {
            let child = compiler.compile_subschema(&value, node)?;
            compiler.node_mut(node).insert(keyword, Field::Schema(child));
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
    if let Value::Array(items) = instance {
        if let Some(Field::Schema(subschema)) = validator.node(node).field("unevaluatedItems") {
            for (index, item) in items.iter().enumerate() {
                if !scope.is_item_evaluated(index) {
                    if !validator.evaluate_detached(*subschema, item, scope) {
                        return false;
                    }
                    scope.mark_item(index);
                }
            }
        }
    }
    if let Value::Object(object) = instance {
        if let Some(Field::Schema(subschema)) = validator.node(node).field("unevaluatedProperties")
        {
            for (name, value) in object {
                if !scope.is_property_evaluated(name) {
                    if !validator.evaluate_detached(*subschema, value, scope) {
                        return false;
                    }
                    scope.mark_property(name.clone());
                }
            }
        }
    }
    true
}
