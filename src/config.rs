//! Engine configuration.
//!
//! Options are plain data handed to [`Autowirer::configure`](crate::Autowirer::configure).
//! They can be built in code, overlaid from environment variables, or (with
//! the `config` feature) deserialized from JSON.

use std::collections::BTreeSet;
use std::env;

use thiserror::Error;

use crate::key::TypeRef;
use crate::lifetime::Lifetime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default bound on recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Interfaces that say nothing about what a type is for. They are left out
/// when counting a candidate's unrelated interfaces.
pub const DEFAULT_INFRASTRUCTURE_INTERFACES: &[&str] = &[
    "IDisposable",
    "IAsyncDisposable",
    "ICloneable",
    "IComparable",
    "IEquatable",
    "ISerializable",
    "IDeserializationCallback",
];

/// Errors raised while loading options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[cfg(feature = "config")]
    #[error("malformed options document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options controlling one engine.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{AutowireOptions, Lifetime, TypeRef};
///
/// let options = AutowireOptions::default()
///     .with_max_depth(4)
///     .with_default_lifetime(Lifetime::Scoped)
///     .ignore("ILogger");
///
/// assert_eq!(options.max_depth, 4);
/// assert!(options.is_ignored(&TypeRef::named("ILogger")));
/// assert!(options.is_infrastructure(&TypeRef::generic("IEquatable", ["Order".into()])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AutowireOptions {
    /// Deepest constructor nesting the walker will follow
    pub max_depth: usize,
    /// Lifetime used at depth zero when nothing is declared
    pub default_lifetime: Lifetime,
    /// Definition names never auto-wired; parameters of these types are
    /// assumed to be supplied by the host
    pub ignored_types: BTreeSet<String>,
    /// Definition names ignored by the extraneous-interface tie-break
    pub infrastructure_interfaces: BTreeSet<String>,
}

impl Default for AutowireOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_lifetime: Lifetime::Transient,
            ignored_types: BTreeSet::new(),
            infrastructure_interfaces: DEFAULT_INFRASTRUCTURE_INTERFACES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AutowireOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }

    pub fn ignore(mut self, type_name: &str) -> Self {
        self.ignored_types.insert(type_name.to_string());
        self
    }

    pub fn with_infrastructure_interface(mut self, name: &str) -> Self {
        self.infrastructure_interfaces.insert(name.to_string());
        self
    }

    pub fn without_infrastructure_interfaces(mut self) -> Self {
        self.infrastructure_interfaces.clear();
        self
    }

    /// Whether the definition behind `ty` is in the ignore set.
    pub fn is_ignored(&self, ty: &TypeRef) -> bool {
        ty.element()
            .name()
            .is_some_and(|name| self.ignored_types.contains(name))
    }

    pub fn is_infrastructure(&self, ty: &TypeRef) -> bool {
        ty.name()
            .is_some_and(|name| self.infrastructure_interfaces.contains(name))
    }

    /// Overlays `{PREFIX}_MAX_DEPTH`, `{PREFIX}_DEFAULT_LIFETIME` and the
    /// comma-separated `{PREFIX}_IGNORE` from the environment.
    pub fn apply_env(mut self, prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}_{}", prefix.to_uppercase(), suffix);

        if let Ok(value) = env::var(key("MAX_DEPTH")) {
            self.max_depth = value.trim().parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue {
                    key: key("MAX_DEPTH"),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Ok(value) = env::var(key("DEFAULT_LIFETIME")) {
            self.default_lifetime = value.parse::<Lifetime>().map_err(|reason| ConfigError::InvalidValue {
                key: key("DEFAULT_LIFETIME"),
                value: value.clone(),
                reason,
            })?;
        }
        if let Ok(value) = env::var(key("IGNORE")) {
            self.ignored_types.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        Ok(self)
    }

    /// Parses options from JSON; absent fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
