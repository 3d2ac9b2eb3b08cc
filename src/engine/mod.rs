//! The auto-wiring engine.
//!
//! [`Autowirer`] takes a request for a service type, finds the best
//! implementation in the catalog, recursively makes sure each of its
//! constructor dependencies can be wired and records the resulting
//! bindings in a [`BindingRegistry`].
//!
//! Every top-level call is all-or-nothing: bindings discovered on the way
//! are staged and only committed once the whole request succeeded. A failed
//! request leaves the registry exactly as it found it.

mod context;
mod expand;
mod walker;

use std::fmt;
use std::sync::Arc;

use crate::catalog::{TypeCatalog, TypeDef, TypeKind};
use crate::config::AutowireOptions;
use crate::conflict::{ConflictResolver, FailOnConflict};
use crate::descriptors::Binding;
use crate::error::{DiError, DiResult};
use crate::internal::Trail;
use crate::key::TypeRef;
use crate::lifetime::{Lifetime, LifetimeRequest};
use crate::metadata::{DeclaredMetadata, MetadataReader};
use crate::observer::{Observers, ResolutionObserver, TracingObserver};
use crate::registration::BindingRegistry;
use crate::selector::Selector;

use context::{ResolutionContext, Step};

/// Outcome of a successful top-level request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The type that was requested
    pub service: TypeRef,
    /// Lifetime the request resolved to. `None` for collection requests,
    /// ignored types and other requests without a single winner.
    pub lifetime: Option<Lifetime>,
    /// Bindings this call added to the registry, dependencies first
    pub added: Vec<Binding>,
}

impl Resolution {
    /// True when everything was already bound.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }

    /// The binding this call added for `service`, if any.
    pub fn binding_for(&self, service: &TypeRef) -> Option<&Binding> {
        self.added.iter().find(|b| &b.service == service)
    }
}

/// One `(implementation, service)` pair processed by the convention pass.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub implementation: TypeRef,
    pub service: TypeRef,
    pub result: DiResult<Resolution>,
}

/// Per-type results of [`Autowirer::resolve_all`].
///
/// Each exported pair is resolved on its own; one failure does not stop
/// the rest of the pass.
#[derive(Debug, Clone, Default)]
pub struct ResolveAllReport {
    pub outcomes: Vec<ExportOutcome>,
    /// Types that were passed in but carry no export marker, are not public
    /// top-level classes, are ignored, or are unknown to the catalog
    pub skipped: Vec<TypeRef>,
}

impl ResolveAllReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&TypeRef, &DiError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.implementation, e)))
    }

    /// Total bindings committed by the pass.
    pub fn added(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.added.len())
            .sum()
    }
}

/// Convention-based auto-wiring engine.
///
/// The engine itself holds no per-request state and never mutates after
/// configuration, so a single instance can serve concurrent requests
/// against a shared registry.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{
///     Autowirer, BindingCollection, BindingRegistry, Lifetime, Parameter, TypeCatalog, TypeDef,
///     TypeRef,
/// };
///
/// let catalog = TypeCatalog::new()
///     .with(TypeDef::class("A").ctor([Parameter::new("b", "B")]))
///     .with(TypeDef::class("B"));
///
/// let engine = Autowirer::new(catalog);
/// let mut registry = BindingCollection::new();
///
/// let resolution = engine.resolve(&mut registry, &TypeRef::named("A")).unwrap();
/// assert_eq!(resolution.lifetime, Some(Lifetime::Transient));
/// assert!(registry.is_bound(&TypeRef::named("A")));
/// assert!(registry.is_bound(&TypeRef::named("B")));
///
/// // Asking again changes nothing
/// assert!(engine.resolve(&mut registry, &TypeRef::named("A")).unwrap().is_noop());
/// ```
#[derive(Clone)]
pub struct Autowirer {
    catalog: Arc<TypeCatalog>,
    options: AutowireOptions,
    metadata: Arc<dyn MetadataReader>,
    conflicts: Arc<dyn ConflictResolver>,
    observers: Observers,
    /// Names of the catalog types eligible as implementations
    candidates: Vec<Arc<str>>,
}

impl Autowirer {
    /// An engine over `catalog` with default options, markers read from the
    /// definitions, ambiguity reported as an error and events sent to
    /// `tracing`.
    pub fn new(catalog: impl Into<Arc<TypeCatalog>>) -> Self {
        let mut observers = Observers::new();
        observers.add(Arc::new(TracingObserver));
        let mut engine = Self {
            catalog: catalog.into(),
            options: AutowireOptions::default(),
            metadata: Arc::new(DeclaredMetadata),
            conflicts: Arc::new(FailOnConflict),
            observers,
            candidates: Vec::new(),
        };
        engine.refresh_candidates();
        engine
    }

    /// Replaces the options. Only affects requests made afterwards.
    pub fn configure(&mut self, options: AutowireOptions) -> &mut Self {
        self.options = options;
        self.refresh_candidates();
        self
    }

    pub fn with_options(mut self, options: AutowireOptions) -> Self {
        self.configure(options);
        self
    }

    pub fn with_metadata(mut self, reader: impl MetadataReader + 'static) -> Self {
        self.metadata = Arc::new(reader);
        self.refresh_candidates();
        self
    }

    pub fn with_conflict_resolver(mut self, resolver: impl ConflictResolver + 'static) -> Self {
        self.conflicts = Arc::new(resolver);
        self
    }

    /// Adds an observer next to the ones already attached.
    pub fn with_observer(mut self, observer: impl ResolutionObserver + 'static) -> Self {
        self.add_observer(Arc::new(observer));
        self
    }

    pub fn add_observer(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.add(observer);
    }

    pub fn options(&self) -> &AutowireOptions {
        &self.options
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Resolves `service` at the configured default lifetime and commits
    /// what it found.
    ///
    /// The default lifetime is a preference, not a requirement: declared
    /// lifetimes on the service or its implementation win over it.
    pub fn resolve<R>(&self, registry: &mut R, service: &TypeRef) -> DiResult<Resolution>
    where
        R: BindingRegistry,
    {
        let request = LifetimeRequest::Default(self.options.default_lifetime);
        self.run(registry, service, |engine, ctx| {
            engine.resolve_service(ctx, service, request, &Trail::new(), 0)
        })
    }

    /// Resolves `service` for a consumer that lives for `lifetime`.
    ///
    /// Unlike [`resolve`](Self::resolve) the lifetime is a hard requirement:
    /// anything in the graph that would be dropped before such a consumer
    /// fails the request with [`DiError::LifetimeViolation`].
    pub fn resolve_with<R>(&self, registry: &mut R, service: &TypeRef, lifetime: Lifetime) -> DiResult<Resolution>
    where
        R: BindingRegistry,
    {
        let request = LifetimeRequest::Required(lifetime);
        self.run(registry, service, |engine, ctx| {
            engine.resolve_service(ctx, service, request, &Trail::new(), 0)
        })
    }

    /// Convention pass over `types`: each concrete type carrying an export
    /// marker is bound to its declared services.
    pub fn resolve_all<R, I>(&self, registry: &mut R, types: I) -> ResolveAllReport
    where
        R: BindingRegistry,
        I: IntoIterator<Item = TypeRef>,
    {
        let mut report = ResolveAllReport::default();
        for requested in types {
            let Some(def) = self.catalog.def_of(&requested) else {
                report.skipped.push(requested);
                continue;
            };
            let export = match self.metadata.export_of(def) {
                Some(export) if self.is_exportable(def) && !self.is_ignored(&requested) => export,
                _ => {
                    report.skipped.push(requested);
                    continue;
                }
            };

            // A bare generic definition name means the open definition
            let implementation = if def.is_generic_definition() && !requested.is_generic() {
                def.self_ref()
            } else {
                requested
            };
            let services = if export.services.is_empty() {
                vec![implementation.clone()]
            } else {
                export.services.clone()
            };

            for service in services {
                let result = self.run(registry, &service, |engine, ctx| {
                    engine.bind_export(ctx, &service, &implementation, export.multi)
                });
                report.outcomes.push(ExportOutcome {
                    implementation: implementation.clone(),
                    service,
                    result,
                });
            }
        }
        tracing::info!(
            exported = report.outcomes.len(),
            failed = report.failures().count(),
            skipped = report.skipped.len(),
            "convention pass finished"
        );
        report
    }

    /// [`resolve_all`](Self::resolve_all) over every eligible catalog type.
    pub fn resolve_exported<R>(&self, registry: &mut R) -> ResolveAllReport
    where
        R: BindingRegistry,
    {
        let types: Vec<TypeRef> = self
            .selector()
            .candidate_defs()
            .filter(|def| self.metadata.export_of(def).is_some())
            .map(|def| def.self_ref())
            .collect();
        self.resolve_all(registry, types)
    }

    /// Runs one top-level walk and commits its staged bindings on success.
    fn run<R, F>(&self, registry: &mut R, service: &TypeRef, walk: F) -> DiResult<Resolution>
    where
        R: BindingRegistry,
        F: FnOnce(&Self, &mut ResolutionContext<'_>) -> Step<Option<Lifetime>>,
    {
        let (outcome, staged) = {
            let mut ctx = ResolutionContext::new(&*registry);
            let outcome = walk(self, &mut ctx);
            (outcome, ctx.into_staged())
        };

        match outcome {
            Ok(lifetime) => {
                let mut added = Vec::with_capacity(staged.len());
                for binding in staged {
                    let inserted = if binding.is_multi {
                        registry.try_add_multi(binding.clone())
                    } else {
                        registry.add(binding.clone())
                    };
                    // A concurrent request may have bound the slot first
                    if inserted {
                        self.observers.bound(&binding);
                        added.push(binding);
                    }
                }
                Ok(Resolution {
                    service: service.clone(),
                    lifetime,
                    added,
                })
            }
            Err(failure) => {
                self.observers.failed(service, &failure.error);
                Err(failure.error)
            }
        }
    }

    fn refresh_candidates(&mut self) {
        let options = &self.options;
        let metadata = &self.metadata;
        self.candidates = self
            .catalog
            .candidates(|def| options.is_ignored(&def.self_ref()) || metadata.is_type_ignored(def))
            .into_iter()
            .map(|def| def.name.clone())
            .collect();
        tracing::debug!(
            types = self.catalog.len(),
            eligible = self.candidates.len(),
            "candidate set computed"
        );
    }

    fn selector(&self) -> Selector<'_> {
        Selector {
            catalog: &self.catalog,
            options: &self.options,
            candidates: &self.candidates,
        }
    }

    /// Same shape rules as the candidate index: public, top-level classes.
    fn is_exportable(&self, def: &TypeDef) -> bool {
        def.kind == TypeKind::Class && def.public && !def.nested
    }

    /// Whether `ty` is excluded by the options or by a type marker.
    fn is_ignored(&self, ty: &TypeRef) -> bool {
        self.options.is_ignored(ty)
            || self
                .catalog
                .def_of(ty.element())
                .is_some_and(|def| self.metadata.is_type_ignored(def))
    }
}

impl fmt::Debug for Autowirer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowirer")
            .field("types", &self.catalog.len())
            .field("eligible", &self.candidates.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
