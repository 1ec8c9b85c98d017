//! Segment-based URI handling for schema identifiers and references.
//!
//! Base resolution splits on `/` for `http(s)`/`file` URIs and on `:` for
//! `urn:` URIs. A reference starting with the delimiter replaces everything
//! after the authority prefix (the first three segments); any other relative
//! reference replaces the last segment of the base.

const ABSOLUTE_PREFIXES: [&str; 4] = ["http://", "https://", "file://", "urn:"];

/// Whether a reference carries one of the recognized absolute schemes.
pub(crate) fn is_absolute(uri: &str) -> bool {
    ABSOLUTE_PREFIXES
        .iter()
        .any(|prefix| uri.starts_with(prefix))
}

/// Split a reference at the first `#` into its URI part and fragment.
///
/// The fragment, if present, is returned without the leading `#`.
pub(crate) fn split_fragment(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((uri, fragment)) => (uri, Some(fragment)),
        None => (reference, None),
    }
}

/// Resolve a relative reference against an absolute base URI.
///
/// `urn:` URIs use the same segment arithmetic as hierarchical ones, only
/// with `:` as the delimiter. URNs with embedded slashes are therefore
/// resolved by colon segments, which mirrors how identifiers are registered.
pub(crate) fn resolve_against(base: &str, reference: &str) -> String {
    let delimiter = if base.starts_with("urn:") { ':' } else { '/' };
    let segments: Vec<&str> = base.split(delimiter).collect();
    if reference.starts_with(delimiter) {
        let authority = segments.len().min(3);
        let mut resolved = segments[..authority].join(&delimiter.to_string());
        resolved.push_str(reference);
        resolved
    } else {
        let mut resolved = segments[..segments.len() - 1].join(&delimiter.to_string());
        resolved.push(delimiter);
        resolved.push_str(reference);
        resolved
    }
}
