//! A JSON Schema Draft 2020-12 validator.
//!
//! Schemas are compiled into an interlinked graph of nodes with lexical
//! scopes and anchor tables, then evaluated against instances under a
//! dynamic scope that tracks evaluated properties and items for
//! `unevaluatedProperties` / `unevaluatedItems` and resolves `$ref` and
//! `$dynamicRef` across nested `$id` boundaries.
//!
//! # Validation
//!
//! For a one-off check, use [`is_valid`]:
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({"type": "string"});
//! let instance = json!("Hello, world!");
//!
//! assert!(jsonschema2020::is_valid(&schema, &instance));
//! ```
//!
//! When validating multiple instances against the same schema, build a
//! validator once and reuse it:
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({"type": "integer", "minimum": 0});
//! let validator = jsonschema2020::validator_for(&schema)
//!     .expect("Invalid schema");
//!
//! assert!(validator.is_valid(&json!(42)));
//! assert!(!validator.is_valid(&json!(-1)));
//! assert!(!validator.is_valid(&json!(true)));
//! ```
//!
//! # External documents
//!
//! Nothing is fetched from the network or the file system. Schemas
//! referenced by absolute URI must be preregistered through
//! [`ValidationOptions::with_resource`]; the bundled Draft 2020-12
//! meta-schemas are always available:
//!
//! ```rust
//! use serde_json::json;
//!
//! let validator = jsonschema2020::options()
//!     .with_resource(
//!         "https://example.com/person.json",
//!         json!({
//!             "type": "object",
//!             "required": ["name"],
//!             "properties": {"name": {"type": "string"}}
//!         }),
//!     )
//!     .build(&json!({"$ref": "https://example.com/person.json"}))
//!     .expect("Invalid schema");
//!
//! assert!(validator.is_valid(&json!({"name": "Alice"})));
//! assert!(!validator.is_valid(&json!({"age": 30})));
//! ```
mod compiler;
mod error;
mod meta;
mod node;
mod registry;
mod resolver;
mod scope;
mod uri;
mod validator;
mod vocabulary;

pub use error::{ReferenceError, SchemaError};
pub use validator::{ValidationOptions, Validator};

use serde_json::Value;

/// Build a validator for a schema with default options.
///
/// # Errors
///
/// Returns an error if the schema is malformed or a reference cannot be
/// resolved.
pub fn validator_for(schema: &Value) -> Result<Validator, SchemaError> {
    ValidationOptions::default().build(schema)
}

/// Get [`ValidationOptions`] for configuring a new validator.
#[must_use]
pub fn options() -> ValidationOptions {
    ValidationOptions::default()
}

/// Validate an instance against a schema in one call.
///
/// # Panics
///
/// Panics if the schema is invalid. Build a validator explicitly via
/// [`validator_for`] to handle schema errors.
#[must_use]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    validator_for(schema)
        .expect("Invalid schema")
        .is_valid(instance)
}
