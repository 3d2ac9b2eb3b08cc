//! Lifetime compatibility rules.
//!
//! Lifetimes are compared by instance survival (`Transient < Scoped <
//! Singleton`). The rules enforced here:
//!
//! - **Nothing declared**: the requested lifetime is used as-is (the default
//!   at depth zero, the consumer's lifetime when nested).
//! - **One side declared**: that declaration wins, but a consumer that
//!   requires a longer lifetime than declared is rejected. A singleton must
//!   never capture a scoped or transient dependency.
//! - **Both declared**: the implementation must live at least as long as the
//!   service says, and its own declaration becomes the effective lifetime
//!   (then checked against the consumer like above).

use crate::lifetime::{Lifetime, LifetimeRequest};

/// The declarations that could not be reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeConflict {
    pub service_lifetime: Option<Lifetime>,
    pub implementation_lifetime: Option<Lifetime>,
    pub required: Option<Lifetime>,
}

/// Computes the effective lifetime of a service bound to an implementation.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{effective_lifetime, Lifetime, LifetimeRequest};
///
/// // Nothing declared: the default applies
/// let l = effective_lifetime(LifetimeRequest::Default(Lifetime::Scoped), None, None);
/// assert_eq!(l, Ok(Lifetime::Scoped));
///
/// // Singleton service, transient implementation: rejected
/// let l = effective_lifetime(
///     LifetimeRequest::Default(Lifetime::Transient),
///     Some(Lifetime::Singleton),
///     Some(Lifetime::Transient),
/// );
/// assert!(l.is_err());
///
/// // Transient service, singleton implementation: the implementation wins
/// let l = effective_lifetime(
///     LifetimeRequest::Default(Lifetime::Transient),
///     Some(Lifetime::Transient),
///     Some(Lifetime::Singleton),
/// );
/// assert_eq!(l, Ok(Lifetime::Singleton));
/// ```
pub fn effective_lifetime(
    request: LifetimeRequest,
    service: Option<Lifetime>,
    implementation: Option<Lifetime>,
) -> Result<Lifetime, LifetimeConflict> {
    let conflict = LifetimeConflict {
        service_lifetime: service,
        implementation_lifetime: implementation,
        required: request.required(),
    };

    let declared = match (service, implementation) {
        (None, None) => return Ok(request.lifetime()),
        (Some(s), None) => s,
        (None, Some(i)) => i,
        (Some(s), Some(i)) => {
            if s.outlives(i) {
                return Err(conflict);
            }
            i
        }
    };

    if satisfies(request, declared) {
        Ok(declared)
    } else {
        Err(conflict)
    }
}

/// Whether a provider living for `provided` may serve this request.
pub fn satisfies(request: LifetimeRequest, provided: Lifetime) -> bool {
    match request.required() {
        Some(required) => !required.outlives(provided),
        None => true,
    }
}
