//! Bindings produced by the engine.

use std::fmt;

use crate::key::TypeRef;
use crate::lifetime::Lifetime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The output unit of auto-wiring: one service bound to one implementation.
///
/// Bindings are handed to a [`BindingRegistry`](crate::BindingRegistry)
/// once a whole top-level request has resolved. A non-multi binding exists
/// at most once per service; multi bindings may share a service but never
/// repeat the same implementation.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Binding, Lifetime, TypeRef};
///
/// let binding = Binding::new("ILogger".into(), "ConsoleLogger".into(), Lifetime::Singleton)
///     .with_constructor(0);
///
/// assert!(!binding.is_multi);
/// assert_eq!(binding.constructor, Some(0));
/// assert_eq!(binding.to_string(), "ILogger => ConsoleLogger (Singleton)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binding {
    /// The requested service (element type for multi bindings)
    pub service: TypeRef,
    /// The implementation chosen for it
    pub implementation: TypeRef,
    /// Effective lifetime after compatibility checks
    pub lifetime: Lifetime,
    /// Whether this is one member of an "all implementations" registration
    pub is_multi: bool,
    /// Index of the public constructor the walker satisfied, if one was walked
    pub constructor: Option<usize>,
}

impl Binding {
    pub fn new(service: TypeRef, implementation: TypeRef, lifetime: Lifetime) -> Self {
        Self {
            service,
            implementation,
            lifetime,
            is_multi: false,
            constructor: None,
        }
    }

    pub fn multi(service: TypeRef, implementation: TypeRef, lifetime: Lifetime) -> Self {
        Self {
            is_multi: true,
            ..Self::new(service, implementation, lifetime)
        }
    }

    pub fn with_constructor(mut self, index: usize) -> Self {
        self.constructor = Some(index);
        self
    }

    /// Binding between two open generic definitions.
    pub fn is_open(&self) -> bool {
        self.service.is_open()
    }

    /// Whether `other` occupies the same registry slot.
    pub(crate) fn same_slot(&self, other: &Binding) -> bool {
        self.service == other.service
            && self.is_multi == other.is_multi
            && (!self.is_multi || self.implementation == other.implementation)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_multi {
            write!(f, "[{}] += {} ({})", self.service, self.implementation, self.lifetime)
        } else {
            write!(f, "{} => {} ({})", self.service, self.implementation, self.lifetime)
        }
    }
}
