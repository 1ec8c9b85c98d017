use jsonschema2020::validator_for;
use serde_json::{json, Value};

fn is_valid(schema: &Value, instance: &Value) -> bool {
    validator_for(schema)
        .expect("Invalid schema")
        .is_valid(instance)
}

#[test]
fn unevaluated_properties_cover_adjacent_properties() {
    let schema = json!({
        "properties": {"a": {"type": "string"}},
        "unevaluatedProperties": false
    });
    assert!(is_valid(&schema, &json!({"a": "x"})));
    assert!(!is_valid(&schema, &json!({"a": "x", "b": 1})));
    assert!(is_valid(&schema, &json!({})));
}

#[test]
fn nested_property_evaluations_do_not_leak_upward() {
    // The inner `properties` covers `b` of the *child* object only; a `b`
    // at the top level stays unevaluated.
    let schema = json!({
        "properties": {
            "a": {"properties": {"b": {"type": "integer"}}}
        },
        "unevaluatedProperties": false
    });
    assert!(is_valid(&schema, &json!({"a": {"b": 1}})));
    assert!(!is_valid(&schema, &json!({"a": {"b": 1}, "b": 2})));
}

#[test]
fn nested_item_evaluations_do_not_leak_upward() {
    let schema = json!({
        "prefixItems": [{"prefixItems": [true, true]}],
        "unevaluatedItems": false
    });
    assert!(is_valid(&schema, &json!([[1, 2]])));
    assert!(!is_valid(&schema, &json!([[1, 2], 3])));
}

#[test]
fn all_of_contributions_are_visible() {
    let schema = json!({
        "allOf": [{"properties": {"a": true}}],
        "properties": {"b": true},
        "unevaluatedProperties": false
    });
    assert!(is_valid(&schema, &json!({"a": 1, "b": 2})));
    assert!(!is_valid(&schema, &json!({"a": 1, "c": 3})));
}

#[test]
fn ref_contributions_are_visible() {
    let schema = json!({
        "$ref": "#/$defs/base",
        "unevaluatedProperties": false,
        "$defs": {"base": {"properties": {"a": true}}}
    });
    assert!(is_valid(&schema, &json!({"a": 1})));
    assert!(!is_valid(&schema, &json!({"a": 1, "b": 2})));
}

#[test]
fn conditional_contributions_follow_the_taken_branch() {
    let schema = json!({
        "if": {"properties": {"a": {"const": 1}}, "required": ["a"]},
        "then": {"properties": {"b": true}},
        "unevaluatedProperties": false
    });
    // `if` succeeded: both its `properties` and `then`'s count as evaluated.
    assert!(is_valid(&schema, &json!({"a": 1, "b": 2})));
    // `if` failed: nothing from the untaken branch is evaluated.
    assert!(!is_valid(&schema, &json!({"a": 2})));
    assert!(!is_valid(&schema, &json!({"a": 1, "c": 3})));
}

#[test]
fn every_successful_any_of_branch_contributes() {
    let schema = json!({
        "anyOf": [
            {"properties": {"a": true}, "required": ["a"]},
            {"properties": {"b": true}, "required": ["b"]}
        ],
        "unevaluatedProperties": false
    });
    assert!(is_valid(&schema, &json!({"a": 1})));
    assert!(is_valid(&schema, &json!({"a": 1, "b": 2})));
    assert!(!is_valid(&schema, &json!({"a": 1, "c": 3})));
}

#[test]
fn cousin_unevaluated_properties_cannot_see_each_other() {
    let schema = json!({
        "allOf": [{"unevaluatedProperties": false}],
        "properties": {"a": true}
    });
    // The nested `unevaluatedProperties` runs in its own frame and cannot
    // see the sibling `properties` of the outer schema.
    assert!(!is_valid(&schema, &json!({"a": 1})));
    assert!(is_valid(&schema, &json!({})));
}

#[test]
fn unevaluated_properties_validate_with_a_subschema() {
    let schema = json!({
        "properties": {"known": true},
        "unevaluatedProperties": {"type": "string"}
    });
    assert!(is_valid(&schema, &json!({"known": 1, "extra": "s"})));
    assert!(!is_valid(&schema, &json!({"known": 1, "extra": 2})));
}

#[test]
fn unevaluated_items_cover_prefix_items() {
    let schema = json!({
        "prefixItems": [{"type": "string"}],
        "unevaluatedItems": false
    });
    assert!(is_valid(&schema, &json!(["a"])));
    assert!(!is_valid(&schema, &json!(["a", 1])));
    assert!(is_valid(&schema, &json!([])));
}

#[test]
fn contains_marks_matching_items_as_evaluated() {
    let schema = json!({
        "contains": {"type": "string"},
        "unevaluatedItems": {"type": "integer"}
    });
    assert!(is_valid(&schema, &json!(["x", 5])));
    assert!(!is_valid(&schema, &json!(["x", 5.5])));
}

#[test]
fn unevaluated_items_validate_remaining_items() {
    let schema = json!({
        "prefixItems": [true],
        "unevaluatedItems": {"type": "boolean"}
    });
    assert!(is_valid(&schema, &json!(["anything", true, false])));
    assert!(!is_valid(&schema, &json!(["anything", "not a boolean"])));
}

#[test]
fn dynamic_ref_targets_contribute_to_the_caller() {
    // The referenced subschema evaluates `a` in place, so the adjacent
    // unevaluatedProperties sees it.
    let schema = json!({
        "$id": "http://example.com/root",
        "$dynamicRef": "#props",
        "unevaluatedProperties": false,
        "$defs": {
            "props": {"$dynamicAnchor": "props", "properties": {"a": true}}
        }
    });
    assert!(is_valid(&schema, &json!({"a": 1})));
    assert!(!is_valid(&schema, &json!({"a": 1, "b": 2})));
}
