//! Lexical scopes opened by `$id` and the dynamic scope threaded through
//! evaluation.

use std::cell::RefCell;

use ahash::{AHashMap, AHashSet};

use crate::node::NodeId;

/// Index of a [`LexicalScope`] in the arena owned by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScopeId(u32);

impl ScopeId {
    pub(crate) fn new(index: usize) -> ScopeId {
        ScopeId(u32::try_from(index).expect("Schema graph exceeds u32::MAX scopes"))
    }
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The compile-time region of a schema bounded by `$id`.
///
/// Anchors are indexed by the scope that declared them; there is no global
/// anchor table.
#[derive(Debug)]
pub(crate) struct LexicalScope {
    root: NodeId,
    anchors: AHashMap<String, NodeId>,
    dynamic_anchors: AHashMap<String, NodeId>,
}

impl LexicalScope {
    pub(crate) fn new(root: NodeId) -> LexicalScope {
        LexicalScope {
            root,
            anchors: AHashMap::new(),
            dynamic_anchors: AHashMap::new(),
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn add_anchor(&mut self, name: impl Into<String>, node: NodeId) {
        self.anchors.insert(name.into(), node);
    }

    pub(crate) fn add_dynamic_anchor(&mut self, name: impl Into<String>, node: NodeId) {
        self.dynamic_anchors.insert(name.into(), node);
    }

    pub(crate) fn anchor(&self, name: &str) -> Option<NodeId> {
        self.anchors.get(name).copied()
    }

    pub(crate) fn dynamic_anchor(&self, name: &str) -> Option<NodeId> {
        self.dynamic_anchors.get(name).copied()
    }
}

/// One evaluation-time stack frame.
///
/// A frame lives for a single `validate` activation. It records which
/// properties and items of the current instance were evaluated by
/// applicators at this level, and links back to the caller's frame for
/// dynamic-anchor search. On a successful in-place application the callee's
/// sets are absorbed into the caller's frame.
pub(crate) struct DynamicScope<'a> {
    lexical: ScopeId,
    previous: Option<&'a DynamicScope<'a>>,
    evaluated_properties: RefCell<AHashSet<String>>,
    evaluated_items: RefCell<AHashSet<usize>>,
}

impl<'a> DynamicScope<'a> {
    pub(crate) fn new(lexical: ScopeId, previous: Option<&'a DynamicScope<'a>>) -> DynamicScope<'a> {
        DynamicScope {
            lexical,
            previous,
            evaluated_properties: RefCell::new(AHashSet::new()),
            evaluated_items: RefCell::new(AHashSet::new()),
        }
    }

    pub(crate) fn lexical(&self) -> ScopeId {
        self.lexical
    }

    pub(crate) fn previous(&self) -> Option<&DynamicScope<'a>> {
        self.previous
    }

    /// Merge another frame's evaluated sets into this one.
    pub(crate) fn absorb(&self, other: &DynamicScope<'_>) {
        self.evaluated_properties
            .borrow_mut()
            .extend(other.evaluated_properties.borrow().iter().cloned());
        self.evaluated_items
            .borrow_mut()
            .extend(other.evaluated_items.borrow().iter().copied());
    }

    pub(crate) fn is_property_evaluated(&self, name: &str) -> bool {
        self.evaluated_properties.borrow().contains(name)
    }

    pub(crate) fn mark_property(&self, name: impl Into<String>) {
        self.evaluated_properties.borrow_mut().insert(name.into());
    }

    pub(crate) fn extend_properties(&self, names: AHashSet<String>) {
        self.evaluated_properties.borrow_mut().extend(names);
    }

    pub(crate) fn is_item_evaluated(&self, index: usize) -> bool {
        self.evaluated_items.borrow().contains(&index)
    }

    pub(crate) fn mark_item(&self, index: usize) {
        self.evaluated_items.borrow_mut().insert(index);
    }

    pub(crate) fn extend_items(&self, indices: AHashSet<usize>) {
        self.evaluated_items.borrow_mut().extend(indices);
    }
}
