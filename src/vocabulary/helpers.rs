use std::cmp::Ordering;

use num_cmp::NumCmp;
use serde_json::{Map, Number, Value};

macro_rules! num_cmp {
    ($left:expr, $right:expr) => {
        if let Some(b) = $right.as_u64() {
            NumCmp::num_cmp($left, b)
        } else if let Some(b) = $right.as_i64() {
            NumCmp::num_cmp($left, b)
        } else {
            NumCmp::num_cmp($left, $right.as_f64().expect("Always valid"))
        }
    };
}

/// Compare two JSON numbers across their underlying representations, so that
/// `1`, `1.0` and large unsigned values order consistently.
pub(crate) fn compare(left: &Number, right: &Number) -> Option<Ordering> {
    if let Some(a) = left.as_u64() {
        num_cmp!(a, right)
    } else if let Some(a) = left.as_i64() {
        num_cmp!(a, right)
    } else {
        let a = left.as_f64().expect("Always valid");
        num_cmp!(a, right)
    }
}

/// Deep equality as used by `const`, `enum` and `uniqueItems`.
///
/// Types must match exactly: booleans are never equal to numbers. Numbers
/// compare by value regardless of representation, objects by key set.
#[inline]
pub(crate) fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Null, Value::Null) => true,
        (Value::Number(left), Value::Number(right)) => {
            compare(left, right) == Some(Ordering::Equal)
        }
        (Value::Array(left), Value::Array(right)) => equal_arrays(left, right),
        (Value::Object(left), Value::Object(right)) => equal_objects(left, right),
        (_, _) => false,
    }
}

#[inline]
pub(crate) fn equal_arrays(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| equal(a, b))
}

#[inline]
pub(crate) fn equal_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).map_or(false, |other| equal(value, other)))
}

/// Read a count-valued keyword (`maxItems`, `minLength`, ...). Integral
/// floats such as `2.0` count as integers.
pub(crate) fn as_count(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    if let Some(float) = value.as_f64() {
        if float >= 0.0 && float.trunc() == float {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return Some(float as u64);
        }
    }
    None
}
