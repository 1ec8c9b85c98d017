//! Reference resolution.
//!
//! The static half runs during the linking phase: it turns `$ref` targets
//! into node ids and may compile pool documents on demand. The dynamic half
//! runs during evaluation: a `$dynamicRef` bare-name fragment is re-resolved
//! against the dynamic scope chain on every activation.

use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::{
    compiler::Compiler,
    error::{ReferenceError, SchemaError},
    node::{DynamicRef, Field, NodeId},
    scope::DynamicScope,
    uri,
    validator::Validator,
};

/// Resolve a reference to the node it addresses.
pub(crate) fn resolve(
    compiler: &mut Compiler,
    node: NodeId,
    reference: &str,
) -> Result<NodeId, SchemaError> {
    let (uri_part, fragment) = uri::split_fragment(reference);
    let base = resolve_base(compiler, node, uri_part)?;
    match fragment {
        None => Ok(base),
        Some(fragment) => resolve_fragment(compiler, base, fragment),
    }
}

/// Prepare a `$dynamicRef` for evaluation.
///
/// Only a bare-name fragment stays dynamic. Without a fragment, or with a
/// JSON Pointer one, the reference degrades to its statically resolved
/// target and behaves exactly like `$ref`.
pub(crate) fn prepare_dynamic(
    compiler: &mut Compiler,
    node: NodeId,
    reference: &str,
) -> Result<DynamicRef, SchemaError> {
    let (uri_part, fragment) = uri::split_fragment(reference);
    match fragment {
        Some(name) if !name.is_empty() && !name.starts_with('/') => {
            let base = resolve_base(compiler, node, uri_part)?;
            Ok(DynamicRef::Anchor {
                base,
                name: name.to_string(),
            })
        }
        _ => Ok(DynamicRef::Static(resolve(compiler, node, reference)?)),
    }
}

/// Resolve the URI part of a reference to a scope-bearing node.
///
/// An empty URI part addresses the current scope's root; a relative one is
/// resolved against the scope root's absolute URI first.
fn resolve_base(
    compiler: &mut Compiler,
    node: NodeId,
    uri_part: &str,
) -> Result<NodeId, SchemaError> {
    if uri::is_absolute(uri_part) {
        compiler.document(uri_part)
    } else if !uri_part.is_empty() {
        let scope_root = compiler.scope(compiler.node(node).scope()).root();
        let base = match compiler.node(scope_root).uri() {
            Some(base) if uri::is_absolute(base) => base.to_string(),
            _ => return Err(ReferenceError::no_base_uri(uri_part).into()),
        };
        let resolved = uri::resolve_against(&base, uri_part);
        compiler.document(&resolved)
    } else {
        Ok(compiler.scope(compiler.node(node).scope()).root())
    }
}

fn resolve_fragment(
    compiler: &mut Compiler,
    base: NodeId,
    fragment: &str,
) -> Result<NodeId, SchemaError> {
    if fragment.is_empty() {
        return Ok(base);
    }
    if !fragment.starts_with('/') {
        let scope = compiler.scope(compiler.node(base).scope());
        if let Some(target) = scope
            .anchor(fragment)
            .or_else(|| scope.dynamic_anchor(fragment))
        {
            return Ok(target);
        }
        return Err(ReferenceError::no_such_anchor(fragment).into());
    }
    resolve_pointer(compiler, base, fragment).map_err(SchemaError::from)
}

/// Resolve an evaluation-time `$dynamicRef` fragment.
///
/// The outermost frame in the dynamic scope whose lexical scope declares a
/// matching `$dynamicAnchor` wins. If the statically resolved target scope
/// declares no dynamic anchor of that name at all, a plain `$anchor` of the
/// same name satisfies the reference instead.
pub(crate) fn resolve_dynamic_anchor(
    validator: &Validator,
    base: NodeId,
    name: &str,
    scope: &DynamicScope<'_>,
) -> Option<NodeId> {
    let base_scope = validator.scope(validator.node(base).scope());
    let mut found = base_scope.dynamic_anchor(name);
    if found.is_none() {
        if let Some(anchor) = base_scope.anchor(name) {
            return Some(anchor);
        }
    }
    let mut frame = Some(scope);
    while let Some(current) = frame {
        if let Some(anchor) = validator.scope(current.lexical()).dynamic_anchor(name) {
            found = Some(anchor);
        }
        frame = current.previous();
    }
    found
}

enum Pointee<'a> {
    Node(NodeId),
    Value(&'a Value),
    List(&'a [NodeId]),
    Map(&'a [(String, NodeId)]),
    Patterns(&'a [(fancy_regex::Regex, NodeId)]),
}

/// Walk a JSON Pointer fragment through compiled nodes and raw values. The
/// final location must be a schema node.
fn resolve_pointer(
    compiler: &Compiler,
    base: NodeId,
    pointer: &str,
) -> Result<NodeId, ReferenceError> {
    let mut target = Pointee::Node(base);
    for segment in pointer.split('/').skip(1) {
        let segment = decode_segment(pointer, segment)?;
        target = descend(compiler, target, &segment)
            .ok_or_else(|| ReferenceError::pointer_to_nowhere(pointer))?;
    }
    match target {
        Pointee::Node(id) => Ok(id),
        _ => Err(ReferenceError::not_a_schema(pointer)),
    }
}

fn descend<'a>(compiler: &'a Compiler, target: Pointee<'a>, segment: &str) -> Option<Pointee<'a>> {
    match target {
        Pointee::Node(id) => match compiler.node(id).field(segment)? {
            Field::Raw(value) => Some(Pointee::Value(value)),
            Field::Schema(node) => Some(Pointee::Node(*node)),
            Field::SchemaList(nodes) => Some(Pointee::List(nodes)),
            Field::SchemaMap(entries) => Some(Pointee::Map(entries)),
            Field::Patterns(patterns) => Some(Pointee::Patterns(patterns)),
            Field::Regex(_) | Field::DynamicRef(_) => None,
        },
        Pointee::List(nodes) => {
            array_index(segment, nodes.len()).map(|index| Pointee::Node(nodes[index]))
        }
        Pointee::Map(entries) => entries
            .iter()
            .find(|(name, _)| name == segment)
            .map(|(_, node)| Pointee::Node(*node)),
        Pointee::Patterns(patterns) => patterns
            .iter()
            .find(|(pattern, _)| pattern.as_str() == segment)
            .map(|(_, node)| Pointee::Node(*node)),
        Pointee::Value(value) => match value {
            Value::Object(object) => object.get(segment).map(Pointee::Value),
            Value::Array(items) => {
                array_index(segment, items.len()).map(|index| Pointee::Value(&items[index]))
            }
            _ => None,
        },
    }
}

/// Digit-string segments index into arrays; everything else is a key.
fn array_index(segment: &str, len: usize) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let index = segment.parse::<usize>().ok()?;
    (index < len).then_some(index)
}

/// Undo JSON Pointer escapes: percent-decoding first, then `~1` -> `/` and
/// `~0` -> `~`.
fn decode_segment(pointer: &str, segment: &str) -> Result<String, ReferenceError> {
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|error| ReferenceError::invalid_percent_encoding(pointer, error))?;
    Ok(decoded.replace("~1", "/").replace("~0", "~"))
}

#[cfg(test)]
mod tests {
    use super::{array_index, decode_segment};
    use test_case::test_case;

    #[test_case("plain", "plain")]
    #[test_case("til~0de", "til~de")]
    #[test_case("sla~1sh", "sla/sh")]
    #[test_case("per%25cent", "per%cent")]
    #[test_case("sp%20ace", "sp ace")]
    #[test_case("~01", "~1")]
    fn segment_decoding(segment: &str, expected: &str) {
        assert_eq!(
            decode_segment("/unused", segment).expect("Valid segment"),
            expected
        );
    }

    #[test]
    fn invalid_percent_encoding_is_reported() {
        let error = decode_segment("/a%FF", "a%FF").expect_err("Should fail");
        assert_eq!(
            error.to_string(),
            "Invalid percent encoding in pointer '/a%FF': the decoded bytes do not represent valid UTF-8"
        );
    }

    #[test_case("0", 3, Some(0))]
    #[test_case("2", 3, Some(2))]
    #[test_case("3", 3, None)]
    #[test_case("01", 3, Some(1))]
    #[test_case("-1", 3, None)]
    #[test_case("x", 3, None)]
    fn array_indices(segment: &str, len: usize, expected: Option<usize>) {
        assert_eq!(array_index(segment, len), expected);
    }
}
