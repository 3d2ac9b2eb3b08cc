//! Per-request resolution state.
//!
//! A context lives for exactly one top-level call. Bindings found while
//! walking are staged here and only reach the target registry when the
//! whole request succeeds; failed branches roll the staging area back to a
//! checkpoint.

use crate::descriptors::Binding;
use crate::error::DiError;
use crate::key::TypeRef;
use crate::registration::BindingRegistry;

/// A failure annotated with the depth it happened at.
///
/// When every candidate fails, the deepest failure is the most
/// informative one to report.
#[derive(Debug)]
pub(crate) struct Failure {
    pub(crate) error: DiError,
    pub(crate) depth: usize,
}

impl Failure {
    pub(crate) fn new(error: DiError, depth: usize) -> Self {
        Self { error, depth }
    }

    /// Keeps the deeper of two failures, the earlier one on ties.
    pub(crate) fn deeper(previous: Option<Failure>, next: Failure) -> Failure {
        match previous {
            Some(previous) if previous.depth >= next.depth => previous,
            _ => next,
        }
    }
}

pub(crate) type Step<T> = Result<T, Failure>;

pub(crate) struct ResolutionContext<'r> {
    registry: &'r dyn BindingRegistry,
    staged: Vec<Binding>,
}

impl<'r> ResolutionContext<'r> {
    pub(crate) fn new(registry: &'r dyn BindingRegistry) -> Self {
        Self {
            registry,
            staged: Vec::new(),
        }
    }

    /// Single-winner binding for `service`, staged or already committed.
    pub(crate) fn binding_for(&self, service: &TypeRef) -> Option<Binding> {
        self.staged
            .iter()
            .find(|b| !b.is_multi && &b.service == service)
            .cloned()
            .or_else(|| self.registry.binding_for(service))
    }

    pub(crate) fn has_multi(&self, service: &TypeRef, implementation: &TypeRef) -> bool {
        self.staged
            .iter()
            .any(|b| b.is_multi && &b.service == service && &b.implementation == implementation)
            || self.registry.has_multi(service, implementation)
    }

    pub(crate) fn stage(&mut self, binding: Binding) {
        debug_assert!(!self.staged.iter().any(|b| b.same_slot(&binding)));
        self.staged.push(binding);
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.staged.len()
    }

    pub(crate) fn rollback(&mut self, checkpoint: usize) {
        self.staged.truncate(checkpoint);
    }

    pub(crate) fn into_staged(self) -> Vec<Binding> {
        self.staged
    }
}
