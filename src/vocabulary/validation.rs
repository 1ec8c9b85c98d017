//! The validation vocabulary: plain assertions with no subschemas except
//! the `pattern` regex compiled up front.

use std::cmp::Ordering;

use fancy_regex::Regex;
use serde_json::Value;

use super::helpers;
use crate::{
    compiler::Compiler,
    error::SchemaError,
    node::{Field, NodeId},
    validator::Validator,
};

const NUMERIC: [&str; 5] = [
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];
const COUNTS: [&str; 8] = [
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
    "minContains",
    "maxContains",
    "minProperties",
    "maxProperties",
];

pub(crate) fn compile(compiler: &mut Compiler, node: NodeId) -> Result<(), SchemaError> {
    if let Some(value) = compiler.take_raw(node, "pattern") {
        let Value::String(pattern) = &value else {
            return Err(SchemaError::invalid_keyword("pattern", "a string"));
        };
        let regex =
            Regex::new(pattern).map_err(|error| SchemaError::invalid_regex(pattern.clone(), error))?;
        compiler.node_mut(node).insert("pattern", Field::Regex(regex));
    }

    let node = compiler.node(node);
    if let Some(value) = node.raw("type") {
        let valid = match value {
            Value::String(_) => true,
            Value::Array(names) => names.iter().all(Value::is_string),
            _ => false,
        };
        if !valid {
            return Err(SchemaError::invalid_keyword(
                "type",
                "a string or an array of strings",
            ));
        }
    }
    if let Some(value) = node.raw("enum") {
        if !value.is_array() {
            return Err(SchemaError::invalid_keyword("enum", "an array"));
        }
    }
    if let Some(value) = node.raw("required") {
        if !is_string_array(value) {
            return Err(SchemaError::invalid_keyword(
                "required",
                "an array of strings",
            ));
        }
    }
    if let Some(value) = node.raw("dependentRequired") {
        let valid = match value {
            Value::Object(entries) => entries.values().all(is_string_array),
            _ => false,
        };
        if !valid {
            return Err(SchemaError::invalid_keyword(
                "dependentRequired",
                "an object of string arrays",
            ));
        }
    }
    if let Some(value) = node.raw("uniqueItems") {
        if !value.is_boolean() {
            return Err(SchemaError::invalid_keyword("uniqueItems", "a boolean"));
        }
    }
    for keyword in NUMERIC {
        if let Some(value) = node.raw(keyword) {
            if !value.is_number() {
                return Err(SchemaError::invalid_keyword(keyword, "a number"));
            }
        }
    }
    for keyword in COUNTS {
        if let Some(value) = node.raw(keyword) {
            if helpers::as_count(value).is_none() {
                return Err(SchemaError::invalid_keyword(
                    keyword,
                    "a non-negative integer",
                ));
            }
        }
    }
    Ok(())
}

pub(crate) fn evaluate(validator: &Validator, id: NodeId, instance: &Value) -> bool {
    let node = validator.node(id);

    if let Some(value) = node.raw("type") {
        let matched = match value {
            Value::String(name) => check_type(name, instance),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .any(|name| check_type(name, instance)),
            _ => true,
        };
        if !matched {
            return false;
        }
    }
    if let Some(value) = node.raw("const") {
        if !helpers::equal(instance, value) {
            return false;
        }
    }
    if let Some(Value::Array(choices)) = node.raw("enum") {
        if !choices.iter().any(|choice| helpers::equal(instance, choice)) {
            return false;
        }
    }

    match instance {
        Value::Number(number) => {
            if let Some(Value::Number(limit)) = node.raw("minimum") {
                if helpers::compare(number, limit) == Some(Ordering::Less) {
                    return false;
                }
            }
            if let Some(Value::Number(limit)) = node.raw("maximum") {
                if helpers::compare(number, limit) == Some(Ordering::Greater) {
                    return false;
                }
            }
            if let Some(Value::Number(limit)) = node.raw("exclusiveMinimum") {
                if matches!(
                    helpers::compare(number, limit),
                    Some(Ordering::Less | Ordering::Equal)
                ) {
                    return false;
                }
            }
            if let Some(Value::Number(limit)) = node.raw("exclusiveMaximum") {
                if matches!(
                    helpers::compare(number, limit),
                    Some(Ordering::Greater | Ordering::Equal)
                ) {
                    return false;
                }
            }
            if let Some(Value::Number(base)) = node.raw("multipleOf") {
                let value = number.as_f64().expect("Always valid");
                let base = base.as_f64().expect("Always valid");
                let remainder = value.rem_euclid(base);
                // Tolerant modulo: floating-point residue within 1e-5 of a
                // full period still counts as a multiple.
                if remainder != 0.0 && base - remainder >= 1e-5 {
                    return false;
                }
            }
        }
        Value::String(string) => {
            let length = || bytecount::num_chars(string.as_bytes()) as u64;
            if let Some(limit) = node.raw("minLength").and_then(helpers::as_count) {
                if length() < limit {
                    return false;
                }
            }
            if let Some(limit) = node.raw("maxLength").and_then(helpers::as_count) {
                if length() > limit {
                    return false;
                }
            }
            if let Some(Field::Regex(pattern)) = node.field("pattern") {
                if !pattern.is_match(string).unwrap_or(false) {
                    return false;
                }
            }
        }
        Value::Array(items) => {
            if let Some(limit) = node.raw("minItems").and_then(helpers::as_count) {
                if (items.len() as u64) < limit {
                    return false;
                }
            }
            if let Some(limit) = node.raw("maxItems").and_then(helpers::as_count) {
                if (items.len() as u64) > limit {
                    return false;
                }
            }
            if node.raw("uniqueItems").and_then(Value::as_bool).unwrap_or(false) {
                for (index, left) in items.iter().enumerate() {
                    for right in &items[index + 1..] {
                        if helpers::equal(left, right) {
                            return false;
                        }
                    }
                }
            }
        }
        Value::Object(object) => {
            if let Some(limit) = node.raw("minProperties").and_then(helpers::as_count) {
                if (object.len() as u64) < limit {
                    return false;
                }
            }
            if let Some(limit) = node.raw("maxProperties").and_then(helpers::as_count) {
                if (object.len() as u64) > limit {
                    return false;
                }
            }
            if let Some(Value::Array(required)) = node.raw("required") {
                for name in required.iter().filter_map(Value::as_str) {
                    if !object.contains_key(name) {
                        return false;
                    }
                }
            }
            if let Some(Value::Object(dependencies)) = node.raw("dependentRequired") {
                for (name, required) in dependencies {
                    if !object.contains_key(name) {
                        continue;
                    }
                    if let Value::Array(required) = required {
                        for dependency in required.iter().filter_map(Value::as_str) {
                            if !object.contains_key(dependency) {
                                return false;
                            }
                        }
                    }
                }
            }
        }
        _ => {}
    }

    true
}

fn is_string_array(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(Value::is_string),
        _ => false,
    }
}

/// `integer` matches whole floats; booleans never match numeric types.
fn check_type(name: &str, instance: &Value) -> bool {
    match name {
        "null" => instance.is_null(),
        "boolean" => instance.is_boolean(),
        "string" => instance.is_string(),
        "array" => instance.is_array(),
        "object" => instance.is_object(),
        "integer" => match instance {
            Value::Number(number) => {
                number.is_u64()
                    || number.is_i64()
                    || number.as_f64().map_or(false, |value| value.fract() == 0.0)
            }
            _ => false,
        },
        "number" => instance.is_number(),
        _ => false,
    }
}
