use core::fmt;
use std::str::Utf8Error;

/// Errors detected while compiling a schema into its node graph.
///
/// Validation itself never fails: once a [`crate::Validator`] is built, every
/// instance produces a plain boolean verdict.
#[derive(Debug)]
pub enum SchemaError {
    /// A schema position holds a value that is neither an object nor a boolean.
    InvalidSchema { found: &'static str },
    /// A keyword holds a value of the wrong shape.
    InvalidKeyword {
        keyword: String,
        expected: &'static str,
    },
    /// A regular expression in `pattern` or `patternProperties` failed to compile.
    InvalidRegex {
        pattern: String,
        source: Box<fancy_regex::Error>,
    },
    /// Reference resolution failed while linking the schema graph.
    Reference(ReferenceError),
}

impl SchemaError {
    pub(crate) fn invalid_schema(found: &'static str) -> SchemaError {
        SchemaError::InvalidSchema { found }
    }
    pub(crate) fn invalid_keyword(
        keyword: impl Into<String>,
        expected: &'static str,
    ) -> SchemaError {
        SchemaError::InvalidKeyword {
            keyword: keyword.into(),
            expected,
        }
    }
    pub(crate) fn invalid_regex(
        pattern: impl Into<String>,
        source: fancy_regex::Error,
    ) -> SchemaError {
        SchemaError::InvalidRegex {
            pattern: pattern.into(),
            source: Box::new(source),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidSchema { found } => f.write_fmt(format_args!(
                "Invalid schema: expected an object or a boolean, found {found}"
            )),
            SchemaError::InvalidKeyword { keyword, expected } => {
                f.write_fmt(format_args!("Invalid `{keyword}`: expected {expected}"))
            }
            SchemaError::InvalidRegex { pattern, source } => f.write_fmt(format_args!(
                "Invalid regular expression '{pattern}': {source}"
            )),
            SchemaError::Reference(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::InvalidRegex { source, .. } => Some(&**source),
            SchemaError::Reference(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ReferenceError> for SchemaError {
    fn from(error: ReferenceError) -> SchemaError {
        SchemaError::Reference(error)
    }
}

/// Errors that can occur while resolving `$ref` and `$dynamicRef` targets.
#[derive(Debug)]
pub enum ReferenceError {
    /// A URI is not present in the registry.
    Unresolvable { uri: String },
    /// A JSON Pointer leads to a part of a schema that does not exist.
    PointerToNowhere { pointer: String },
    /// A JSON Pointer leads to a value that is not a schema.
    NotASchema { pointer: String },
    /// An anchor does not exist within the target lexical scope.
    NoSuchAnchor { anchor: String },
    /// A JSON Pointer contains invalid percent-encoded data.
    InvalidPercentEncoding { pointer: String, source: Utf8Error },
    /// A relative reference was used while no absolute base URI is in scope.
    NoBaseUri { reference: String },
}

impl ReferenceError {
    pub(crate) fn unresolvable(uri: impl Into<String>) -> ReferenceError {
        ReferenceError::Unresolvable { uri: uri.into() }
    }
    pub(crate) fn pointer_to_nowhere(pointer: impl Into<String>) -> ReferenceError {
        ReferenceError::PointerToNowhere {
            pointer: pointer.into(),
        }
    }
    pub(crate) fn not_a_schema(pointer: impl Into<String>) -> ReferenceError {
        ReferenceError::NotASchema {
            pointer: pointer.into(),
        }
    }
    pub(crate) fn no_such_anchor(anchor: impl Into<String>) -> ReferenceError {
        ReferenceError::NoSuchAnchor {
            anchor: anchor.into(),
        }
    }
    pub(crate) fn invalid_percent_encoding(
        pointer: impl Into<String>,
        source: Utf8Error,
    ) -> ReferenceError {
        ReferenceError::InvalidPercentEncoding {
            pointer: pointer.into(),
            source,
        }
    }
    pub(crate) fn no_base_uri(reference: impl Into<String>) -> ReferenceError {
        ReferenceError::NoBaseUri {
            reference: reference.into(),
        }
    }
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::Unresolvable { uri } => f.write_fmt(format_args!(
                "Resource '{uri}' is not present in the registry"
            )),
            ReferenceError::PointerToNowhere { pointer } => {
                f.write_fmt(format_args!("Pointer '{pointer}' does not exist"))
            }
            ReferenceError::NotASchema { pointer } => {
                f.write_fmt(format_args!("Pointer '{pointer}' does not point to a schema"))
            }
            ReferenceError::NoSuchAnchor { anchor } => {
                f.write_fmt(format_args!("Anchor '{anchor}' does not exist"))
            }
            ReferenceError::InvalidPercentEncoding { pointer, .. } => f.write_fmt(format_args!(
                "Invalid percent encoding in pointer '{pointer}': the decoded bytes do not represent valid UTF-8"
            )),
            ReferenceError::NoBaseUri { reference } => f.write_fmt(format_args!(
                "Cannot resolve relative reference '{reference}' without an absolute base URI"
            )),
        }
    }
}

impl std::error::Error for ReferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReferenceError::InvalidPercentEncoding { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReferenceError, SchemaError};

    #[test]
    fn display() {
        assert_eq!(
            SchemaError::invalid_keyword("properties", "an object of schemas").to_string(),
            "Invalid `properties`: expected an object of schemas"
        );
        assert_eq!(
            ReferenceError::unresolvable("http://example.com/missing").to_string(),
            "Resource 'http://example.com/missing' is not present in the registry"
        );
        assert_eq!(
            SchemaError::from(ReferenceError::no_such_anchor("node")).to_string(),
            "Anchor 'node' does not exist"
        );
    }
}
