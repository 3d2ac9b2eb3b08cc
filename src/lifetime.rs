//! Service lifetime definitions.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Service lifetimes controlling how long a resolved instance survives.
///
/// Lifetimes are totally ordered by instance survival:
/// `Transient < Scoped < Singleton`. The ordering is what the compatibility
/// rules in [`crate::validation`] compare: a consumer may only depend on a
/// provider that lives at least as long as itself.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::Lifetime;
///
/// assert!(Lifetime::Transient < Lifetime::Scoped);
/// assert!(Lifetime::Scoped < Lifetime::Singleton);
/// assert!(Lifetime::Singleton.outlives(Lifetime::Transient));
/// assert!(!Lifetime::Scoped.outlives(Lifetime::Scoped));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Lifetime {
    /// New instance per resolution, never cached
    Transient,
    /// Single instance per scope, cached for scope lifetime
    Scoped,
    /// Single instance per root provider, cached forever
    Singleton,
}

impl Lifetime {
    /// Returns `true` when `self` strictly outlives `other`.
    pub fn outlives(self, other: Lifetime) -> bool {
        self > other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifetime::Transient => "Transient",
            Lifetime::Scoped => "Scoped",
            Lifetime::Singleton => "Singleton",
        }
    }
}

impl FromStr for Lifetime {
    type Err = String;

    /// Case-insensitive lifetime name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transient" => Ok(Lifetime::Transient),
            "scoped" => Ok(Lifetime::Scoped),
            "singleton" => Ok(Lifetime::Singleton),
            other => Err(format!("unknown lifetime '{}'", other)),
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lifetime a resolution step is asked to produce.
///
/// At depth zero a plain resolve only carries the configured default, which
/// applies when neither the service nor the implementation declares
/// anything. Nested steps (and explicit top-level requests) carry a
/// requirement: the effective lifetime must not be shorter than it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifetimeRequest {
    /// Fallback used only when nothing is declared
    Default(Lifetime),
    /// Lifetime established by the consumer; providers must live at least this long
    Required(Lifetime),
}

impl LifetimeRequest {
    pub fn lifetime(self) -> Lifetime {
        match self {
            LifetimeRequest::Default(l) | LifetimeRequest::Required(l) => l,
        }
    }

    /// The requirement, if this request carries one.
    pub fn required(self) -> Option<Lifetime> {
        match self {
            LifetimeRequest::Default(_) => None,
            LifetimeRequest::Required(l) => Some(l),
        }
    }
}
