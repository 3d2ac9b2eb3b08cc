//! Observation hooks for resolution events.
//!
//! Observers see every step the engine takes: which services it starts
//! resolving, which candidates it throws away and why, which bindings get
//! committed and which requests fail. The default [`TracingObserver`]
//! forwards these to `tracing`; hosts can add their own for metrics or
//! audit logs.
//!
//! Observer calls are made synchronously during resolution. Keep
//! implementations lightweight.

use std::sync::Arc;

use crate::descriptors::Binding;
use crate::error::DiError;
use crate::key::TypeRef;

/// Observer trait for resolution events.
///
/// All methods default to no-ops so implementations only override what they
/// care about.
///
/// # Examples
///
/// ```
/// use ferrous_autowire::{Binding, ResolutionObserver};
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct BindingCounter {
///     count: Mutex<usize>,
/// }
///
/// impl ResolutionObserver for BindingCounter {
///     fn bound(&self, _binding: &Binding) {
///         *self.count.lock().unwrap() += 1;
///     }
/// }
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// A service is about to be resolved at `depth`.
    fn resolving(&self, _service: &TypeRef, _depth: usize) {}

    /// A candidate was tried and rejected; the search goes on.
    fn candidate_rejected(&self, _service: &TypeRef, _implementation: &TypeRef, _error: &DiError) {}

    /// A binding was committed to the target registry.
    fn bound(&self, _binding: &Binding) {}

    /// A top-level request failed.
    fn failed(&self, _service: &TypeRef, _error: &DiError) {}
}

/// Emits resolution events as `tracing` events.
///
/// Walk steps are logged at `debug`, committed bindings at `info`, rejected
/// candidates and failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn resolving(&self, service: &TypeRef, depth: usize) {
        tracing::debug!(service = %service, depth, "resolving service");
    }

    fn candidate_rejected(&self, service: &TypeRef, implementation: &TypeRef, error: &DiError) {
        tracing::warn!(
            service = %service,
            implementation = %implementation,
            error = %error,
            "candidate rejected"
        );
    }

    fn bound(&self, binding: &Binding) {
        tracing::info!(
            service = %binding.service,
            implementation = %binding.implementation,
            lifetime = %binding.lifetime,
            multi = binding.is_multi,
            "binding registered"
        );
    }

    fn failed(&self, service: &TypeRef, error: &DiError) {
        tracing::warn!(service = %service, error = %error, "resolution failed");
    }
}

/// Observer collection attached to an engine.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn resolving(&self, service: &TypeRef, depth: usize) {
        for observer in &self.observers {
            observer.resolving(service, depth);
        }
    }

    pub(crate) fn candidate_rejected(&self, service: &TypeRef, implementation: &TypeRef, error: &DiError) {
        for observer in &self.observers {
            observer.candidate_rejected(service, implementation, error);
        }
    }

    pub(crate) fn bound(&self, binding: &Binding) {
        for observer in &self.observers {
            observer.bound(binding);
        }
    }

    pub(crate) fn failed(&self, service: &TypeRef, error: &DiError) {
        for observer in &self.observers {
            observer.failed(service, error);
        }
    }
}
