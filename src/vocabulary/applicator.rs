//! The applicator vocabulary.
//!
//! In-place applicators (`allOf`, `anyOf`, `oneOf`, `if`/`then`/`else`,
//! `dependentSchemas`) validate the same instance and contribute their
//! evaluated sets to the current frame. Child-instance applicators
//! (`properties`, `items`, `contains`, ...) validate property values or
//! array elements; only the matched key or index itself is recorded.

use ahash::AHashSet;
use fancy_regex::Regex;
use serde_json::Value;

use super::helpers;
use crate::{
    compiler::Compiler,
    error::SchemaError,
    node::{Field, NodeId},
    scope::DynamicScope,
    validator::Validator,
};

const SINGLE: [&str; 8] = [
    "items",
    "contains",
    "additionalProperties",
    "propertyNames",
    "if",
    "then",
    "else",
    "not",
];
const LIST: [&str; 4] = ["prefixItems", "allOf", "anyOf", "oneOf"];
const MAP: [&str; 2] = ["properties", "dependentSchemas"];

pub(crate) fn compile(compiler: &mut Compiler, node: NodeId) -> Result<(), SchemaError> {
    for keyword in SINGLE {
        if let Some(value) = compiler.take_raw(node, keyword) {
            let child = compiler.compile_subschema(&value, node)?;
            compiler.node_mut(node).insert(keyword, Field::Schema(child));
        }
    }
    for keyword in LIST {
        if let Some(value) = compiler.take_raw(node, keyword) {
            let Value::Array(items) = &value else {
                return Err(SchemaError::invalid_keyword(keyword, "an array of schemas"));
            };
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                children.push(compiler.compile_subschema(item, node)?);
            }
            compiler
                .node_mut(node)
                .insert(keyword, Field::SchemaList(children));
        }
    }
    for keyword in MAP {
        if let Some(value) = compiler.take_raw(node, keyword) {
            let Value::Object(entries) = &value else {
                return Err(SchemaError::invalid_keyword(keyword, "an object of schemas"));
            };
            let mut children = Vec::with_capacity(entries.len());
            for (name, subschema) in entries {
                children.push((name.clone(), compiler.compile_subschema(subschema, node)?));
            }
            compiler
                .node_mut(node)
                .insert(keyword, Field::SchemaMap(children));
        }
    }
    if let Some(value) = compiler.take_raw(node, "patternProperties") {
        let Value::Object(entries) = &value else {
            return Err(SchemaError::invalid_keyword(
                "patternProperties",
                "an object of schemas",
            ));
        };
        let mut patterns = Vec::with_capacity(entries.len());
        for (pattern, subschema) in entries {
            let regex = Regex::new(pattern)
                .map_err(|error| SchemaError::invalid_regex(pattern.clone(), error))?;
            patterns.push((regex, compiler.compile_subschema(subschema, node)?));
        }
        compiler
            .node_mut(node)
            .insert("patternProperties", Field::Patterns(patterns));
    }
    Ok(())
}

pub(crate) fn evaluate(
    validator: &Validator,
    id: NodeId,
    instance: &Value,
    scope: &DynamicScope<'_>,
) -> bool {
    let node = validator.node(id);

    if let Some(Field::Schema(subschema)) = node.field("not") {
        if validator.evaluate_detached(*subschema, instance, scope) {
            return false;
        }
    }
    if let Some(Field::SchemaList(subschemas)) = node.field("oneOf") {
        let mut matched = 0;
        for &subschema in subschemas {
            if validator.evaluate(subschema, instance, Some(scope)) {
                matched += 1;
            }
        }
        if matched != 1 {
            return false;
        }
    }
    if let Some(Field::SchemaList(subschemas)) = node.field("anyOf") {
        // Every branch runs so that all successful ones contribute their
        // evaluated sets.
        let mut matched = false;
        for &subschema in subschemas {
            if validator.evaluate(subschema, instance, Some(scope)) {
                matched = true;
            }
        }
        if !matched {
            return false;
        }
    }
    if let Some(Field::SchemaList(subschemas)) = node.field("allOf") {
        for &subschema in subschemas {
            if !validator.evaluate(subschema, instance, Some(scope)) {
                return false;
            }
        }
    }
    if let Some(Field::Schema(condition)) = node.field("if") {
        if validator.evaluate(*condition, instance, Some(scope)) {
            if let Some(Field::Schema(then)) = node.field("then") {
                if !validator.evaluate(*then, instance, Some(scope)) {
                    return false;
                }
            }
        } else if let Some(Field::Schema(otherwise)) = node.field("else") {
            if !validator.evaluate(*otherwise, instance, Some(scope)) {
                return false;
            }
        }
    }

    if let Value::Array(items) = instance {
        let mut evaluated: AHashSet<usize> = AHashSet::new();
        let mut prefix_len = 0;
        if let Some(Field::SchemaList(prefix)) = node.field("prefixItems") {
            prefix_len = prefix.len();
            for (index, &subschema) in prefix.iter().enumerate() {
                if index >= items.len() {
                    break;
                }
                if !validator.evaluate_detached(subschema, &items[index], scope) {
                    return false;
                }
                evaluated.insert(index);
            }
        }
        if let Some(Field::Schema(subschema)) = node.field("items") {
            for (index, item) in items.iter().enumerate().skip(prefix_len) {
                if !validator.evaluate_detached(*subschema, item, scope) {
                    return false;
                }
                evaluated.insert(index);
            }
        }
        if let Some(Field::Schema(subschema)) = node.field("contains") {
            let min = node
                .raw("minContains")
                .and_then(helpers::as_count)
                .unwrap_or(1);
            let max = node
                .raw("maxContains")
                .and_then(helpers::as_count)
                .unwrap_or(u64::MAX);
            let mut matched = 0;
            for (index, item) in items.iter().enumerate() {
                if validator.evaluate_detached(*subschema, item, scope) {
                    matched += 1;
                    evaluated.insert(index);
                }
            }
            if matched < min || matched > max {
                return false;
            }
        }
        scope.extend_items(evaluated);
    }

    if let Value::Object(object) = instance {
        if let Some(Field::Schema(subschema)) = node.field("propertyNames") {
            for name in object.keys() {
                if !validator.evaluate_detached(*subschema, &Value::String(name.clone()), scope) {
                    return false;
                }
            }
        }
        if let Some(Field::SchemaMap(entries)) = node.field("dependentSchemas") {
            for (name, subschema) in entries {
                if object.contains_key(name)
                    && !validator.evaluate(*subschema, instance, Some(scope))
                {
                    return false;
                }
            }
        }

        let mut evaluated: AHashSet<String> = AHashSet::new();
        if let Some(Field::Patterns(patterns)) = node.field("patternProperties") {
            for (name, value) in object {
                for (pattern, subschema) in patterns {
                    if pattern.is_match(name).unwrap_or(false) {
                        if !validator.evaluate_detached(*subschema, value, scope) {
                            return false;
                        }
                        evaluated.insert(name.clone());
                    }
                }
            }
        }
        if let Some(Field::SchemaMap(entries)) = node.field("properties") {
            for (name, subschema) in entries {
                if let Some(value) = object.get(name) {
                    if !validator.evaluate_detached(*subschema, value, scope) {
                        return false;
                    }
                    evaluated.insert(name.clone());
                }
            }
        }
        if let Some(Field::Schema(subschema)) = node.field("additionalProperties") {
            for (name, value) in object {
                if !evaluated.contains(name) {
                    if !validator.evaluate_detached(*subschema, value, scope) {
                        return false;
                    }
                    evaluated.insert(name.clone());
                }
            }
        }
        scope.extend_properties(evaluated);
    }

    true
}
