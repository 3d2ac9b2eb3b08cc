//! Persistent resolution trail.
//!
//! Each recursion step pushes onto its own copy of the trail, so sibling
//! constructor attempts can never observe each other's entries and
//! backtracking needs no truncation.

use std::rc::Rc;

use crate::key::TypeRef;

struct Step {
    service: TypeRef,
    implementation: TypeRef,
    parent: Option<Rc<Step>>,
}

/// Ordered `(service, implementation)` pairs from the top-level request down.
#[derive(Clone, Default)]
pub(crate) struct Trail {
    head: Option<Rc<Step>>,
}

impl Trail {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A new trail extended by one step; `self` is unchanged.
    pub(crate) fn push(&self, service: TypeRef, implementation: TypeRef) -> Trail {
        Trail {
            head: Some(Rc::new(Step {
                service,
                implementation,
                parent: self.head.clone(),
            })),
        }
    }

    /// Whether `service` is already being resolved further up.
    pub(crate) fn contains_service(&self, service: &TypeRef) -> bool {
        self.iter_rev().any(|(s, _)| s == service)
    }

    /// Whether `implementation` is already being constructed further up.
    pub(crate) fn contains_implementation(&self, implementation: &TypeRef) -> bool {
        self.iter_rev().any(|(_, i)| i == implementation)
    }

    fn iter_rev(&self) -> impl Iterator<Item = (&TypeRef, &TypeRef)> {
        std::iter::successors(self.head.as_deref(), |step| step.parent.as_deref())
            .map(|step| (&step.service, &step.implementation))
    }

    /// Steps from the root request downwards.
    pub(crate) fn steps(&self) -> Vec<(&TypeRef, &TypeRef)> {
        let mut steps: Vec<_> = self.iter_rev().collect();
        steps.reverse();
        steps
    }
}

impl std::fmt::Debug for Trail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps().into_iter().map(|(s, i)| format!("{}={}", s, i)))
            .finish()
    }
}
