use jsonschema2020::{validator_for, SchemaError};
use serde_json::{json, Value};
use test_case::test_case;

fn is_valid(schema: &Value, instance: &Value) -> bool {
    validator_for(schema)
        .expect("Invalid schema")
        .is_valid(instance)
}

#[test_case(&json!(3), true; "integer")]
#[test_case(&json!(3.0), true; "whole float")]
#[test_case(&json!(3.5), false; "fractional float")]
#[test_case(&json!(true), false; "boolean is not an integer")]
#[test_case(&json!("3"), false; "string")]
fn type_integer(instance: &Value, expected: bool) {
    assert_eq!(is_valid(&json!({"type": "integer"}), instance), expected);
}

#[test]
fn type_lists_match_any_member() {
    let schema = json!({"type": ["integer", "string"]});
    assert!(is_valid(&schema, &json!(1)));
    assert!(is_valid(&schema, &json!("x")));
    assert!(!is_valid(&schema, &json!(1.5)));
    assert!(!is_valid(&schema, &json!(null)));
}

#[test]
fn integer_is_a_subset_of_number() {
    let names = ["null", "boolean", "integer", "number", "string", "array", "object"];
    let instances = [
        (json!(null), vec!["null"]),
        (json!(true), vec!["boolean"]),
        (json!(3), vec!["integer", "number"]),
        (json!(3.5), vec!["number"]),
        (json!("s"), vec!["string"]),
        (json!([1]), vec!["array"]),
        (json!({"a": 1}), vec!["object"]),
    ];
    for (instance, expected) in instances {
        let matched: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| is_valid(&json!({ "type": name }), &instance))
            .collect();
        assert_eq!(matched, expected, "instance {instance}");
    }
}

#[test]
fn boolean_schemas_are_normalized() {
    for instance in [json!(null), json!(42), json!({"a": [1]})] {
        assert!(is_valid(&json!(true), &instance));
        assert!(!is_valid(&json!(false), &instance));
    }
}

#[test]
fn not_negates_its_subschema() {
    let subschema = json!({"type": "string", "minLength": 2});
    for instance in [json!("ab"), json!("a"), json!(5)] {
        assert_eq!(
            is_valid(&json!({ "not": subschema }), &instance),
            !is_valid(&subschema, &instance),
        );
    }
}

#[test]
fn all_of_single_branch_is_identity() {
    let subschema = json!({"minimum": 0});
    for instance in [json!(-1), json!(0), json!("x")] {
        assert_eq!(
            is_valid(&json!({ "allOf": [subschema] }), &instance),
            is_valid(&subschema, &instance),
        );
    }
}

#[test]
fn any_of_is_monotone() {
    let passing = json!({"type": "integer"});
    let instance = json!(4);
    assert!(is_valid(&passing, &instance));
    assert!(is_valid(
        &json!({"anyOf": [passing, {"type": "string"}, false]}),
        &instance
    ));
}

#[test]
fn one_of_requires_exactly_one_match() {
    let schema = json!({"oneOf": [{"type": "integer"}, {"minimum": 2}]});
    assert!(is_valid(&schema, &json!(1)));
    assert!(is_valid(&schema, &json!(2.5)));
    assert!(!is_valid(&schema, &json!(3)));
    assert!(!is_valid(&schema, &json!(1.5)));
}

#[test]
fn if_then_else_branches() {
    let schema = json!({
        "if": {"type": "integer"},
        "then": {"minimum": 0},
        "else": {"type": "string"}
    });
    assert!(is_valid(&schema, &json!(1)));
    assert!(!is_valid(&schema, &json!(-1)));
    assert!(is_valid(&schema, &json!("negative one")));
    assert!(!is_valid(&schema, &json!(1.5)));
}

#[test]
fn prefix_items_then_items() {
    let schema = json!({
        "prefixItems": [{"type": "string"}],
        "items": {"type": "integer"}
    });
    assert!(is_valid(&schema, &json!(["x", 1, 2])));
    assert!(!is_valid(&schema, &json!(["x", 1, "y"])));
    assert!(!is_valid(&schema, &json!([1])));
    assert!(is_valid(&schema, &json!([])));
}

#[test]
fn contains_with_bounds() {
    let schema = json!({"contains": {"const": 5}, "minContains": 2});
    assert!(is_valid(&schema, &json!([5, 1, 5])));
    assert!(!is_valid(&schema, &json!([5, 1])));

    let schema = json!({"contains": {"const": 1}, "maxContains": 1});
    assert!(is_valid(&schema, &json!([1, 2])));
    assert!(!is_valid(&schema, &json!([1, 1])));

    // An explicit zero lower bound accepts arrays with no matches at all.
    let schema = json!({"contains": {"const": 1}, "minContains": 0});
    assert!(is_valid(&schema, &json!([])));
    assert!(is_valid(&schema, &json!([2, 3])));

    // Without `contains` the bounds are inert.
    assert!(is_valid(&json!({"minContains": 2}), &json!([])));
}

#[test]
fn properties_applicators() {
    let schema = json!({
        "properties": {"a": {"type": "integer"}},
        "patternProperties": {"^x": {"type": "string"}},
        "additionalProperties": {"type": "boolean"}
    });
    assert!(is_valid(&schema, &json!({"a": 1, "xray": "s", "other": true})));
    assert!(!is_valid(&schema, &json!({"a": "not an integer"})));
    assert!(!is_valid(&schema, &json!({"xray": 1})));
    assert!(!is_valid(&schema, &json!({"other": "not a boolean"})));
}

#[test]
fn property_names_validate_keys() {
    let schema = json!({"propertyNames": {"maxLength": 3}});
    assert!(is_valid(&schema, &json!({"abc": 1, "d": 2})));
    assert!(!is_valid(&schema, &json!({"toolong": 1})));
}

#[test]
fn dependent_schemas_apply_to_the_whole_instance() {
    let schema = json!({
        "dependentSchemas": {"credit": {"required": ["billing"]}}
    });
    assert!(is_valid(&schema, &json!({"cash": 1})));
    assert!(is_valid(&schema, &json!({"credit": 1, "billing": {}})));
    assert!(!is_valid(&schema, &json!({"credit": 1})));
}

#[test_case(&json!({"minimum": 2}), &json!(2), true)]
#[test_case(&json!({"minimum": 2}), &json!(1.9), false)]
#[test_case(&json!({"maximum": 2}), &json!(2), true)]
#[test_case(&json!({"maximum": 2}), &json!(2.1), false)]
#[test_case(&json!({"exclusiveMinimum": 2}), &json!(2), false)]
#[test_case(&json!({"exclusiveMinimum": 2}), &json!(2.1), true)]
#[test_case(&json!({"exclusiveMaximum": 2}), &json!(2), false)]
#[test_case(&json!({"exclusiveMaximum": 2}), &json!(1.9), true)]
#[test_case(&json!({"minimum": 2}), &json!("1"), true; "non numeric instances are ignored")]
fn numeric_bounds(schema: &Value, instance: &Value, expected: bool) {
    assert_eq!(is_valid(schema, instance), expected);
}

#[test_case(&json!(9), &json!(3), true)]
#[test_case(&json!(7), &json!(3), false)]
#[test_case(&json!(4.5), &json!(1.5), true)]
#[test_case(&json!(-9), &json!(3), true; "negative multiple")]
#[test_case(&json!(0.0075), &json!(0.0001), true; "float residue within tolerance")]
fn multiple_of(instance: &Value, base: &Value, expected: bool) {
    assert_eq!(is_valid(&json!({ "multipleOf": base }), instance), expected);
}

#[test]
fn string_bounds_count_code_points() {
    let schema = json!({"minLength": 2, "maxLength": 3});
    assert!(is_valid(&schema, &json!("ab")));
    assert!(is_valid(&schema, &json!("hél")));
    assert!(!is_valid(&schema, &json!("a")));
    assert!(!is_valid(&schema, &json!("abcd")));
    // Two code points, six UTF-8 bytes
    assert!(is_valid(&schema, &json!("愛愛")));
}

#[test]
fn pattern_uses_search_semantics() {
    assert!(is_valid(&json!({"pattern": "a+"}), &json!("xaay")));
    assert!(!is_valid(&json!({"pattern": "^a+$"}), &json!("xa")));
    assert!(is_valid(&json!({"pattern": "b"}), &json!(42)));
}

#[test]
fn unique_items_use_deep_equality() {
    let schema = json!({"uniqueItems": true});
    assert!(is_valid(&schema, &json!([1, 2, 3])));
    assert!(!is_valid(&schema, &json!([1, 1.0])));
    assert!(is_valid(&schema, &json!([true, 1])));
    assert!(is_valid(&schema, &json!([false, 0])));
    assert!(!is_valid(&schema, &json!([[1], [1.0]])));
    assert!(!is_valid(&schema, &json!([{"a": 1}, {"a": 1.0}])));
    assert!(is_valid(&schema, &json!([{"a": 1}, {"a": 2}])));
}

#[test]
fn const_round_trips_any_value() {
    for value in [
        json!(null),
        json!(true),
        json!(3),
        json!("s"),
        json!([1, {"a": null}]),
        json!({"nested": {"deep": [1.5]}}),
    ] {
        assert!(is_valid(&json!({ "const": value }), &value));
    }
    assert!(is_valid(&json!({"const": 1}), &json!(1.0)));
    assert!(!is_valid(&json!({"const": 1}), &json!(true)));
    assert!(!is_valid(&json!({"const": {"a": 1}}), &json!({"a": 1, "b": 2})));
}

#[test]
fn enum_membership_ignores_key_order() {
    let schema = json!({"enum": [{"a": 1, "b": 2}, "other"]});
    assert!(is_valid(&schema, &json!({"b": 2, "a": 1})));
    assert!(is_valid(&schema, &json!("other")));
    assert!(!is_valid(&schema, &json!({"a": 1})));
}

#[test]
fn object_bounds_and_required() {
    let schema = json!({
        "minProperties": 1,
        "maxProperties": 2,
        "required": ["a"]
    });
    assert!(is_valid(&schema, &json!({"a": 1})));
    assert!(is_valid(&schema, &json!({"a": 1, "b": 2})));
    assert!(!is_valid(&schema, &json!({})));
    assert!(!is_valid(&schema, &json!({"b": 1})));
    assert!(!is_valid(&schema, &json!({"a": 1, "b": 2, "c": 3})));
}

#[test]
fn dependent_required() {
    let schema = json!({"dependentRequired": {"credit": ["billing", "address"]}});
    assert!(is_valid(&schema, &json!({"cash": 1})));
    assert!(is_valid(&schema, &json!({"credit": 1, "billing": 2, "address": 3})));
    assert!(!is_valid(&schema, &json!({"credit": 1, "billing": 2})));
}

#[test]
fn array_bounds() {
    let schema = json!({"minItems": 1, "maxItems": 2});
    assert!(is_valid(&schema, &json!([1])));
    assert!(!is_valid(&schema, &json!([])));
    assert!(!is_valid(&schema, &json!([1, 2, 3])));
}

#[test]
fn unknown_keywords_are_ignored() {
    let schema = json!({"customAnnotation": {"whatever": 1}, "type": "integer"});
    assert!(is_valid(&schema, &json!(3)));
    assert!(!is_valid(&schema, &json!("3")));
}

#[test_case(&json!({"properties": 5}); "properties must be an object")]
#[test_case(&json!({"allOf": {}}); "allOf must be an array")]
#[test_case(&json!({"type": 3}); "type must be a string or strings")]
#[test_case(&json!({"required": [1]}); "required must hold strings")]
#[test_case(&json!({"minLength": -1}); "counts must be non-negative")]
#[test_case(&json!({"minimum": "3"}); "bounds must be numbers")]
#[test_case(&json!({"items": 5}); "subschemas must be objects or booleans")]
fn malformed_schemas_fail_compilation(schema: &Value) {
    assert!(matches!(
        validator_for(schema),
        Err(SchemaError::InvalidKeyword { .. } | SchemaError::InvalidSchema { .. })
    ));
}

#[test]
fn broken_regexes_fail_compilation() {
    assert!(matches!(
        validator_for(&json!({"pattern": "("})),
        Err(SchemaError::InvalidRegex { .. })
    ));
    assert!(matches!(
        validator_for(&json!({"patternProperties": {"(": true}})),
        Err(SchemaError::InvalidRegex { .. })
    ));
}

#[test]
fn non_object_schemas_are_rejected() {
    let error = validator_for(&json!(3)).expect_err("Should fail");
    assert_eq!(
        error.to_string(),
        "Invalid schema: expected an object or a boolean, found a number"
    );
}
