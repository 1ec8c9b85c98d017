//! The closed set of Draft 2020-12 vocabularies.
//!
//! Each vocabulary bundles a compile step, which replaces raw keyword values
//! with compiled subschemas, and an evaluate step, which asserts over an
//! instance. The active set for a schema is declared by its meta-schema's
//! `$vocabulary`; schemas without `$schema` inherit their parent's set.

pub(crate) mod applicator;
pub(crate) mod core;
pub(crate) mod helpers;
pub(crate) mod unevaluated;
pub(crate) mod validation;

use serde_json::Value;

use crate::{compiler::Compiler, error::SchemaError, node::NodeId, scope::DynamicScope, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Vocabulary {
    Core,
    Applicator,
    Unevaluated,
    Validation,
    MetaData,
    FormatAnnotation,
    Content,
}

impl Vocabulary {
    /// Evaluation order: `unevaluatedItems` / `unevaluatedProperties` must
    /// observe the evaluated sets contributed by core references and
    /// applicators, so the unevaluated vocabulary runs after both.
    pub(crate) const ORDER: [Vocabulary; 4] = [
        Vocabulary::Core,
        Vocabulary::Applicator,
        Vocabulary::Unevaluated,
        Vocabulary::Validation,
    ];

    pub(crate) fn from_uri(uri: &str) -> Option<Vocabulary> {
        match uri {
            "https://json-schema.org/draft/2020-12/vocab/core" => Some(Vocabulary::Core),
            "https://json-schema.org/draft/2020-12/vocab/applicator" => {
                Some(Vocabulary::Applicator)
            }
            "https://json-schema.org/draft/2020-12/vocab/unevaluated" => {
                Some(Vocabulary::Unevaluated)
            }
            "https://json-schema.org/draft/2020-12/vocab/validation" => {
                Some(Vocabulary::Validation)
            }
            "https://json-schema.org/draft/2020-12/vocab/meta-data" => Some(Vocabulary::MetaData),
            "https://json-schema.org/draft/2020-12/vocab/format-annotation" => {
                Some(Vocabulary::FormatAnnotation)
            }
            "https://json-schema.org/draft/2020-12/vocab/content" => Some(Vocabulary::Content),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Vocabulary::Core => 1,
            Vocabulary::Applicator => 1 << 1,
            Vocabulary::Unevaluated => 1 << 2,
            Vocabulary::Validation => 1 << 3,
            Vocabulary::MetaData => 1 << 4,
            Vocabulary::FormatAnnotation => 1 << 5,
            Vocabulary::Content => 1 << 6,
        }
    }

    /// Walk the node's recognized keywords and replace raw subschemas with
    /// compiled children. The meta-data, format-annotation and content
    /// vocabularies are annotation-only and compile to nothing.
    pub(crate) fn compile(self, compiler: &mut Compiler, node: NodeId) -> Result<(), SchemaError> {
        match self {
            Vocabulary::Core => core::compile(compiler, node),
            Vocabulary::Applicator => applicator::compile(compiler, node),
            Vocabulary::Unevaluated => unevaluated::compile(compiler, node),
            Vocabulary::Validation => validation::compile(compiler, node),
            _ => Ok(()),
        }
    }

    pub(crate) fn evaluate(
        self,
        validator: &Validator,
        node: NodeId,
        instance: &Value,
        scope: &DynamicScope<'_>,
    ) -> bool {
        match self {
            Vocabulary::Core => core::evaluate(validator, node, instance, scope),
            Vocabulary::Applicator => applicator::evaluate(validator, node, instance, scope),
            Vocabulary::Unevaluated => unevaluated::evaluate(validator, node, instance, scope),
            Vocabulary::Validation => validation::evaluate(validator, node, instance),
            _ => true,
        }
    }
}

/// The set of vocabularies active for one schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VocabularySet(u8);

impl VocabularySet {
    /// The full Draft 2020-12 set, used when no meta-schema says otherwise.
    pub(crate) const DEFAULT: VocabularySet = VocabularySet(0x7F);

    pub(crate) fn contains(self, vocabulary: Vocabulary) -> bool {
        self.0 & vocabulary.bit() != 0
    }

    /// Build the active set from a meta-schema's `$vocabulary` object.
    /// Vocabulary URIs outside the known seven are ignored; a missing
    /// `$vocabulary` enables everything.
    pub(crate) fn from_meta(vocabulary: Option<&Value>) -> Result<VocabularySet, SchemaError> {
        let Some(value) = vocabulary else {
            return Ok(VocabularySet::DEFAULT);
        };
        let Value::Object(entries) = value else {
            return Err(SchemaError::invalid_keyword(
                "$vocabulary",
                "an object mapping vocabulary URIs to booleans",
            ));
        };
        let mut set = VocabularySet(0);
        for (uri, enabled) in entries {
            if enabled.as_bool().unwrap_or(false) {
                if let Some(vocabulary) = Vocabulary::from_uri(uri) {
                    set.0 |= vocabulary.bit();
                }
            }
        }
        Ok(set)
    }
}
