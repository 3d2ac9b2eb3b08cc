//! Error types for the auto-wiring engine.

use thiserror::Error;

use crate::lifetime::Lifetime;

/// Auto-wiring errors
///
/// Every variant already carries the rendered dependency chain, so the
/// `Display` output is meant to be logged as-is for operators.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::DiError;
///
/// let err = DiError::UnresolvableDependency {
///     service: "C".to_string(),
///     max_depth: 8,
///     chain: "C => D.".to_string(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "Unable to resolve service `C` (max depth 8): C => D."
/// );
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// No candidate, or no constructor-resolvable candidate, exists
    #[error("Unable to resolve service `{service}` (max depth {max_depth}): {chain}")]
    UnresolvableDependency {
        /// The type that could not be wired. For a nested failure this is
        /// the deepest type reached; `chain` starts at the top-level request.
        service: String,
        max_depth: usize,
        chain: String,
    },
    /// Several unrelated candidates and the conflict policy picked none
    #[error("Ambiguous implementations for `{service}`: [{}] at {chain}", .candidates.join(", "))]
    AmbiguousImplementation {
        service: String,
        candidates: Vec<String>,
        chain: String,
    },
    /// Declared lifetimes are incompatible with each other or with the consumer
    #[error(
        "Lifetime violation: service `{service}` ({}) cannot be provided by `{implementation}` ({}) for a {} consumer: {chain}",
        declared(.service_lifetime),
        declared(.implementation_lifetime),
        declared(.required)
    )]
    LifetimeViolation {
        service: String,
        service_lifetime: Option<Lifetime>,
        implementation: String,
        implementation_lifetime: Option<Lifetime>,
        required: Option<Lifetime>,
        chain: String,
    },
    /// The request has a shape the engine cannot reason about
    #[error("Unsupported service shape `{service}`: {reason}")]
    UnsupportedShape {
        service: String,
        reason: &'static str,
    },
}

fn declared(lifetime: &Option<Lifetime>) -> &'static str {
    lifetime.map_or("undeclared", Lifetime::as_str)
}

impl DiError {
    /// Local failures let the walker try the next candidate or constructor.
    ///
    /// `UnsupportedShape` is structural and aborts the whole request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DiError::UnsupportedShape { .. })
    }

    /// The rendered dependency chain, when the error carries one.
    pub fn chain(&self) -> Option<&str> {
        match self {
            DiError::UnresolvableDependency { chain, .. }
            | DiError::AmbiguousImplementation { chain, .. }
            | DiError::LifetimeViolation { chain, .. } => Some(chain),
            DiError::UnsupportedShape { .. } => None,
        }
    }

    /// The type the error is about: the type that could not be wired, the
    /// ambiguous service, the service with incompatible lifetimes, or the
    /// unsupported request.
    pub fn service(&self) -> &str {
        match self {
            DiError::UnresolvableDependency { service, .. }
            | DiError::AmbiguousImplementation { service, .. }
            | DiError::LifetimeViolation { service, .. }
            | DiError::UnsupportedShape { service, .. } => service,
        }
    }
}

/// Result type for auto-wiring operations
pub type DiResult<T> = Result<T, DiError>;
