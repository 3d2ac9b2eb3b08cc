//! Recursive dependency walk for single-winner requests.

use crate::catalog::{Constructor, TypeDef, TypeKind};
use crate::catalog::hierarchy::is_assignable;
use crate::descriptors::Binding;
use crate::diagnostics::render_chain;
use crate::error::DiError;
use crate::internal::Trail;
use crate::key::TypeRef;
use crate::lifetime::{Lifetime, LifetimeRequest};
use crate::validation::{effective_lifetime, satisfies, LifetimeConflict};

use super::context::{Failure, ResolutionContext, Step};
use super::Autowirer;

impl Autowirer {
    /// Resolves one requested type, staging whatever it needs.
    ///
    /// Returns the lifetime the service ended up with, or `None` when the
    /// request has no single winner (collections, open definitions bound
    /// only through closed groups, ignored types).
    pub(super) fn resolve_service(
        &self,
        ctx: &mut ResolutionContext<'_>,
        service: &TypeRef,
        request: LifetimeRequest,
        trail: &Trail,
        depth: usize,
    ) -> Step<Option<Lifetime>> {
        self.observers.resolving(service, depth);
        // Ignored types are host-supplied whatever their shape
        if self.is_ignored(service) {
            tracing::debug!(service = %service, "ignored type, nothing to wire");
            return Ok(None);
        }
        self.check_shape(service, trail, depth)?;

        if depth > self.options.max_depth {
            tracing::debug!(service = %service, depth, "maximum depth exceeded");
            return Err(self.unresolvable(service, trail, depth));
        }
        if let TypeRef::All(element) = service {
            return self.resolve_multi(ctx, element, request, trail, depth);
        }
        if let Some(existing) = ctx.binding_for(service) {
            return if satisfies(request, existing.lifetime) {
                Ok(Some(existing.lifetime))
            } else {
                let conflict = LifetimeConflict {
                    service_lifetime: self.declared_lifetime(service),
                    implementation_lifetime: Some(existing.lifetime),
                    required: request.required(),
                };
                Err(self.lifetime_violation(service, &existing.implementation, conflict, trail, depth))
            };
        }
        if service.is_open() {
            return self.resolve_open(ctx, service, request, trail, depth);
        }
        self.resolve_single(ctx, service, request, trail, depth).map(Some)
    }

    /// Tries the candidates of the chosen family until one can be built.
    fn resolve_single(
        &self,
        ctx: &mut ResolutionContext<'_>,
        service: &TypeRef,
        request: LifetimeRequest,
        trail: &Trail,
        depth: usize,
    ) -> Step<Lifetime> {
        let selector = self.selector();
        let ordered = selector.find_implementations(service);
        if ordered.is_empty() {
            tracing::debug!(service = %service, "no implementation candidates");
            return Err(self.unresolvable(service, trail, depth));
        }
        let family = self.pick_family(service, selector.families(ordered), trail, depth)?;

        let mut last: Option<Failure> = None;
        for implementation in &family {
            match self.bind_candidate(ctx, service, implementation, request, trail, depth, false) {
                Ok(lifetime) => return Ok(lifetime),
                Err(failure) if !failure.error.is_recoverable() => return Err(failure),
                Err(failure) => {
                    self.observers.candidate_rejected(service, implementation, &failure.error);
                    last = Some(Failure::deeper(last, failure));
                }
            }
        }
        Err(last.unwrap_or_else(|| self.unresolvable(service, trail, depth)))
    }

    /// Narrows the candidate families down to one.
    ///
    /// A single family needs no decision; otherwise the conflict policy sees
    /// each family's representative.
    pub(super) fn pick_family(
        &self,
        service: &TypeRef,
        mut families: Vec<Vec<TypeRef>>,
        trail: &Trail,
        depth: usize,
    ) -> Step<Vec<TypeRef>> {
        if families.len() <= 1 {
            return Ok(families.pop().unwrap_or_default());
        }
        let representatives: Vec<TypeRef> = families.iter().map(|family| family[0].clone()).collect();
        match self.conflicts.choose(service, &representatives) {
            Some(index) if index < families.len() => {
                tracing::debug!(
                    service = %service,
                    chosen = %representatives[index],
                    "conflict policy picked a candidate"
                );
                Ok(families.swap_remove(index))
            }
            _ => Err(Failure::new(
                DiError::AmbiguousImplementation {
                    service: service.to_string(),
                    candidates: representatives.iter().map(ToString::to_string).collect(),
                    chain: render_chain(trail.steps(), Some(service)),
                },
                depth,
            )),
        }
    }

    /// Attempts to bind `service` to `implementation`.
    ///
    /// Everything staged while trying is rolled back when the candidate
    /// turns out not to be constructible.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn bind_candidate(
        &self,
        ctx: &mut ResolutionContext<'_>,
        service: &TypeRef,
        implementation: &TypeRef,
        request: LifetimeRequest,
        trail: &Trail,
        depth: usize,
        multi: bool,
    ) -> Step<Lifetime> {
        let Some(impl_def) = self.catalog.def_of(implementation) else {
            return Err(self.unresolvable(implementation, trail, depth));
        };
        let lifetime = effective_lifetime(
            request,
            self.declared_lifetime(service),
            self.metadata.lifetime_of(impl_def),
        )
        .map_err(|conflict| self.lifetime_violation(service, implementation, conflict, trail, depth))?;

        let trail = trail.push(service.clone(), implementation.clone());
        let checkpoint = ctx.checkpoint();

        let walked = match self.walk_constructors(ctx, implementation, impl_def, lifetime, &trail, depth) {
            Ok(index) => self
                .resolve_seeks(ctx, service, implementation, impl_def, lifetime, &trail, depth)
                .map(|()| index),
            Err(failure) => Err(failure),
        };

        match walked {
            Ok(index) => {
                let binding = if multi {
                    Binding::multi(service.clone(), implementation.clone(), lifetime)
                } else {
                    Binding::new(service.clone(), implementation.clone(), lifetime)
                };
                ctx.stage(binding.with_constructor(index));
                Ok(lifetime)
            }
            Err(failure) => {
                ctx.rollback(checkpoint);
                Err(failure)
            }
        }
    }

    /// Picks the first public constructor whose parameters all resolve.
    fn walk_constructors(
        &self,
        ctx: &mut ResolutionContext<'_>,
        implementation: &TypeRef,
        impl_def: &TypeDef,
        lifetime: Lifetime,
        trail: &Trail,
        depth: usize,
    ) -> Step<usize> {
        let mut last: Option<Failure> = None;
        for (index, ctor) in impl_def.public_constructors().iter().enumerate() {
            let checkpoint = ctx.checkpoint();
            match self.walk_constructor(ctx, implementation, ctor, lifetime, trail, depth) {
                Ok(()) => {
                    tracing::debug!(
                        implementation = %implementation,
                        constructor = index,
                        "constructor satisfied"
                    );
                    return Ok(index);
                }
                Err(failure) => {
                    ctx.rollback(checkpoint);
                    if !failure.error.is_recoverable() {
                        return Err(failure);
                    }
                    last = Some(Failure::deeper(last, failure));
                }
            }
        }
        Err(last.unwrap_or_else(|| self.unresolvable(implementation, trail, depth)))
    }

    fn walk_constructor(
        &self,
        ctx: &mut ResolutionContext<'_>,
        implementation: &TypeRef,
        ctor: &Constructor,
        lifetime: Lifetime,
        trail: &Trail,
        depth: usize,
    ) -> Step<()> {
        for param in &ctor.params {
            if param.optional || self.metadata.is_parameter_ignored(param) {
                continue;
            }
            let dependency = param.ty.substitute(implementation.args());
            self.resolve_dependency(ctx, implementation, &dependency, lifetime, trail, depth)?;
        }
        Ok(())
    }

    /// Additional dependencies declared on the service and on the
    /// implementation, resolved like constructor parameters.
    #[allow(clippy::too_many_arguments)]
    fn resolve_seeks(
        &self,
        ctx: &mut ResolutionContext<'_>,
        service: &TypeRef,
        implementation: &TypeRef,
        impl_def: &TypeDef,
        lifetime: Lifetime,
        trail: &Trail,
        depth: usize,
    ) -> Step<()> {
        let from_service = self
            .catalog
            .def_of(service)
            .filter(|_| service != implementation)
            .map(|def| self.metadata.seeks_of(def))
            .unwrap_or_default()
            .into_iter()
            .map(|ty| ty.substitute(service.args()));
        let from_impl = self
            .metadata
            .seeks_of(impl_def)
            .into_iter()
            .map(|ty| ty.substitute(implementation.args()));

        for dependency in from_service.chain(from_impl) {
            self.resolve_dependency(ctx, implementation, &dependency, lifetime, trail, depth)?;
        }
        Ok(())
    }

    /// Resolves one dependency of `implementation` one level deeper.
    ///
    /// A dependency the implementation itself could satisfy, or one that is
    /// already being resolved further up, would recurse forever and is
    /// rejected outright.
    fn resolve_dependency(
        &self,
        ctx: &mut ResolutionContext<'_>,
        implementation: &TypeRef,
        dependency: &TypeRef,
        lifetime: Lifetime,
        trail: &Trail,
        depth: usize,
    ) -> Step<()> {
        if self.is_ignored(dependency) {
            return Ok(());
        }
        if is_assignable(&self.catalog, dependency, implementation) || trail.contains_service(dependency) {
            tracing::debug!(
                implementation = %implementation,
                dependency = %dependency,
                "dependency cycle, abandoning candidate"
            );
            return Err(self.unresolvable(dependency, trail, depth + 1));
        }
        self.resolve_service(ctx, dependency, LifetimeRequest::Required(lifetime), trail, depth + 1)?;
        Ok(())
    }

    /// Rejects requests the engine cannot reason about.
    ///
    /// Value types are only structural at the top level; as a constructor
    /// parameter they just make that constructor unusable.
    pub(super) fn check_shape(&self, service: &TypeRef, trail: &Trail, depth: usize) -> Step<()> {
        let reason = match service {
            TypeRef::Param(_) => "unbound generic parameter",
            TypeRef::All(element) if element.is_multi() => "collection of collections",
            TypeRef::All(element) if element.is_open() => "collection of an open generic definition",
            TypeRef::All(element) => return self.check_shape(element, trail, depth),
            TypeRef::Named { .. } => match self.catalog.def_of(service) {
                Some(def) if def.kind == TypeKind::Value => {
                    if depth > 0 {
                        return Err(self.unresolvable(service, trail, depth));
                    }
                    "value types cannot be services"
                }
                Some(def) if def.arity != service.args().len() => {
                    "generic argument count does not match the definition"
                }
                _ if service.is_open() && *service != service.definition() => "partially open generic",
                _ => return Ok(()),
            },
        };
        tracing::warn!(service = %service, reason, "unsupported service shape");
        Err(Failure::new(
            DiError::UnsupportedShape {
                service: service.to_string(),
                reason,
            },
            depth,
        ))
    }

    pub(super) fn declared_lifetime(&self, service: &TypeRef) -> Option<Lifetime> {
        self.catalog
            .def_of(service)
            .and_then(|def| self.metadata.lifetime_of(def))
    }

    pub(super) fn unresolvable(&self, service: &TypeRef, trail: &Trail, depth: usize) -> Failure {
        Failure::new(
            DiError::UnresolvableDependency {
                service: service.to_string(),
                max_depth: self.options.max_depth,
                chain: render_chain(trail.steps(), Some(service)),
            },
            depth,
        )
    }

    pub(super) fn lifetime_violation(
        &self,
        service: &TypeRef,
        implementation: &TypeRef,
        conflict: LifetimeConflict,
        trail: &Trail,
        depth: usize,
    ) -> Failure {
        let steps = trail.steps().into_iter().chain(std::iter::once((service, implementation)));
        Failure::new(
            DiError::LifetimeViolation {
                service: service.to_string(),
                service_lifetime: conflict.service_lifetime,
                implementation: implementation.to_string(),
                implementation_lifetime: conflict.implementation_lifetime,
                required: conflict.required,
                chain: render_chain(steps, None),
            },
            depth,
        )
    }
}
