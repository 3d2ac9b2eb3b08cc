//! # ferrous-autowire
//!
//! Convention-based auto-wiring for dependency injection containers.
//!
//! Given a catalog of discovered types (their hierarchy, public
//! constructors and lifetime or export markers), the engine answers "how
//! do I obtain an instance of this service?" by picking the best
//! implementation, making sure every constructor dependency can itself be
//! wired, and recording `service => implementation (lifetime)` bindings in
//! a registry.
//!
//! ## Features
//!
//! - **Most specific wins**: subclasses beat their bases, and candidates
//!   carrying fewer unrelated interfaces beat busier ones
//! - **Lifetime safety**: a long-lived consumer never gets a shorter-lived
//!   dependency
//! - **Cycle rejection**: constructors that need themselves are abandoned,
//!   never recursed into
//! - **All-or-nothing**: a failed request leaves the registry untouched
//! - **Collections and open generics**: `[IHandler]` binds every handler,
//!   `IRepo<>` binds every closed repository
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_autowire::{
//!     Autowirer, BindingCollection, BindingRegistry, Lifetime, Parameter, TypeCatalog, TypeDef,
//!     TypeRef,
//! };
//!
//! let catalog = TypeCatalog::new()
//!     .with(TypeDef::interface("IUserStore"))
//!     .with(TypeDef::class("SqlUserStore").implements("IUserStore").lifetime(Lifetime::Scoped))
//!     .with(TypeDef::class("UserService").ctor([Parameter::new("store", "IUserStore")]));
//!
//! let engine = Autowirer::new(catalog);
//! let mut registry = BindingCollection::new();
//! engine
//!     .resolve_with(&mut registry, &TypeRef::named("UserService"), Lifetime::Scoped)
//!     .unwrap();
//!
//! let store = registry.binding_for(&TypeRef::named("IUserStore")).unwrap();
//! assert_eq!(store.implementation, TypeRef::named("SqlUserStore"));
//! assert_eq!(store.lifetime, Lifetime::Scoped);
//! ```
//!
//! ## Lifetimes
//!
//! - **Transient**: a fresh instance per resolution
//! - **Scoped**: one instance per scope
//! - **Singleton**: one instance for the whole container
//!
//! A consumer may depend on anything that lives at least as long as it
//! does. A singleton taking a scoped dependency is a
//! [`DiError::LifetimeViolation`].
//!
//! ## Error Handling
//!
//! Every failure carries the dependency chain that led to it, rendered as
//! `A => {IB=B} => C.`:
//!
//! ```rust
//! use ferrous_autowire::{Autowirer, BindingCollection, DiError, Parameter, TypeCatalog, TypeDef};
//!
//! let catalog = TypeCatalog::new().with(TypeDef::class("C").ctor([Parameter::new("d", "D")]));
//! let mut registry = BindingCollection::new();
//!
//! match Autowirer::new(catalog).resolve(&mut registry, &"C".into()) {
//!     Err(DiError::UnresolvableDependency { chain, .. }) => assert_eq!(chain, "C => D."),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! assert!(registry.is_empty());
//! ```
//!
//! ## Optional Features
//!
//! - `config`: load [`AutowireOptions`] and [`TypeCatalog`] from JSON
//! - `graph-export`: serialize committed bindings
//! - `parking-lot`: faster locks in [`SharedRegistry`]
//! - `ahash`: faster hashing in internal maps

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod descriptors;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod metadata;
pub mod observer;
pub mod registration;
pub mod validation;

// Internal modules
mod internal;
mod selector;

// Re-export core types
pub use catalog::{Constructor, Export, Parameter, TypeCatalog, TypeDef, TypeKind};
pub use config::{AutowireOptions, ConfigError};
pub use conflict::{ConflictResolver, FailOnConflict, PreferFirst};
pub use descriptors::Binding;
pub use diagnostics::render_chain;
pub use engine::{Autowirer, ExportOutcome, Resolution, ResolveAllReport};
pub use error::{DiError, DiResult};
pub use key::TypeRef;
pub use lifetime::{Lifetime, LifetimeRequest};
pub use metadata::{DeclaredMetadata, MetadataReader};
pub use observer::{ResolutionObserver, TracingObserver};
pub use registration::{BindingCollection, BindingRegistry, SharedRegistry};
pub use validation::{effective_lifetime, satisfies, LifetimeConflict};
