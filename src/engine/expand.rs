//! Requests that fan out: collections, open generic definitions and the
//! convention pass.

use crate::catalog::hierarchy::{is_assignable, open_closing};
use crate::descriptors::Binding;
use crate::error::DiError;
use crate::internal::Trail;
use crate::key::TypeRef;
use crate::lifetime::{Lifetime, LifetimeRequest};
use crate::validation::effective_lifetime;

use super::context::{Failure, ResolutionContext, Step};
use super::Autowirer;

impl Autowirer {
    /// Binds every implementation of `element` as a multi-binding.
    ///
    /// No family collapsing and no conflict policy here: a base and its
    /// subclass are both kept. A candidate that cannot be wired fails the
    /// whole request; finding no candidate at all is not an error.
    pub(super) fn resolve_multi(
        &self,
        ctx: &mut ResolutionContext<'_>,
        element: &TypeRef,
        request: LifetimeRequest,
        trail: &Trail,
        depth: usize,
    ) -> Step<Option<Lifetime>> {
        let implementations = self.selector().find_implementations(element);
        tracing::debug!(
            service = %element,
            count = implementations.len(),
            "resolving every implementation"
        );

        for implementation in &implementations {
            // The consumer asking for the collection cannot be part of it
            if trail.contains_implementation(implementation) {
                tracing::debug!(implementation = %implementation, "skipping collection consumer");
                continue;
            }
            if ctx.has_multi(element, implementation) {
                continue;
            }
            self.bind_candidate(ctx, element, implementation, request, trail, depth, true)?;
        }
        Ok(None)
    }

    /// Resolves an open generic definition such as `IRepo<>`.
    ///
    /// Candidates are grouped by the arguments they close the definition
    /// with. Each closed group is resolved like a request for that closed
    /// type. Generic definitions that pass their parameters straight
    /// through form the open group, which gets a definition-to-definition
    /// binding without a constructor walk.
    pub(super) fn resolve_open(
        &self,
        ctx: &mut ResolutionContext<'_>,
        open: &TypeRef,
        request: LifetimeRequest,
        trail: &Trail,
        depth: usize,
    ) -> Step<Option<Lifetime>> {
        let selector = self.selector();
        let mut closed_groups: Vec<Vec<TypeRef>> = Vec::new();
        let mut open_group: Vec<TypeRef> = Vec::new();

        for def in selector.candidate_defs() {
            let candidate = def.self_ref();
            // A candidate may close the definition more than once
            for args in open_closing(&self.catalog, &candidate, open) {
                if !args.iter().any(TypeRef::is_open) {
                    if !closed_groups.contains(&args) {
                        closed_groups.push(args);
                    }
                    continue;
                }
                if args.as_slice() == candidate.args() {
                    if !open_group.contains(&candidate) {
                        open_group.push(candidate.clone());
                    }
                    continue;
                }
                tracing::warn!(
                    service = %open,
                    implementation = %candidate,
                    "generic parameters are not passed through in order"
                );
                return Err(Failure::new(
                    DiError::UnsupportedShape {
                        service: candidate.to_string(),
                        reason: "open generic implemented with reordered or partially closed parameters",
                    },
                    depth,
                ));
            }
        }

        if closed_groups.is_empty() && open_group.is_empty() {
            return Err(self.unresolvable(open, trail, depth));
        }
        tracing::debug!(
            service = %open,
            closed = closed_groups.len(),
            open = open_group.len(),
            "open generic candidates grouped"
        );

        for args in &closed_groups {
            let closed = open.substitute(args);
            self.resolve_service(ctx, &closed, request, trail, depth)?;
        }
        if open_group.is_empty() {
            return Ok(None);
        }

        let ordered = selector.order(open, open_group);
        let family = self.pick_family(open, selector.families(ordered), trail, depth)?;
        let mut last: Option<Failure> = None;
        for implementation in &family {
            match self.definition_lifetime(open, implementation, request, trail, depth) {
                Ok(lifetime) => {
                    ctx.stage(Binding::new(open.clone(), implementation.clone(), lifetime));
                    return Ok(Some(lifetime));
                }
                Err(failure) => {
                    self.observers.candidate_rejected(open, implementation, &failure.error);
                    last = Some(Failure::deeper(last, failure));
                }
            }
        }
        Err(last.unwrap_or_else(|| self.unresolvable(open, trail, depth)))
    }

    /// Lifetime of a binding between two generic definitions.
    ///
    /// Constructors of an open definition cannot be walked; whatever they
    /// need is resolved once a closed instance is requested.
    fn definition_lifetime(
        &self,
        open: &TypeRef,
        implementation: &TypeRef,
        request: LifetimeRequest,
        trail: &Trail,
        depth: usize,
    ) -> Step<Lifetime> {
        let impl_lifetime = self
            .catalog
            .def_of(implementation)
            .and_then(|def| self.metadata.lifetime_of(def));
        effective_lifetime(request, self.declared_lifetime(open), impl_lifetime)
            .map_err(|conflict| self.lifetime_violation(open, implementation, conflict, trail, depth))
    }

    /// Binds one exported `(service, implementation)` pair.
    ///
    /// Unlike a plain request the implementation is fixed by the export
    /// marker, so there is no candidate search.
    pub(super) fn bind_export(
        &self,
        ctx: &mut ResolutionContext<'_>,
        service: &TypeRef,
        implementation: &TypeRef,
        multi: bool,
    ) -> Step<Option<Lifetime>> {
        let trail = Trail::new();
        self.check_shape(service, &trail, 0)?;

        let compatible = if implementation.is_open() {
            service.is_open()
                && open_closing(&self.catalog, implementation, service)
                    .iter()
                    .any(|args| args.as_slice() == service.args())
        } else {
            is_assignable(&self.catalog, service, implementation)
        };
        if !compatible {
            tracing::warn!(
                service = %service,
                implementation = %implementation,
                "exported type does not implement its declared service"
            );
            return Err(Failure::new(
                DiError::UnsupportedShape {
                    service: service.to_string(),
                    reason: "exported type does not implement the declared service",
                },
                0,
            ));
        }

        let request = LifetimeRequest::Default(self.options.default_lifetime);
        if multi {
            if ctx.has_multi(service, implementation) {
                return Ok(None);
            }
            if implementation.is_open() {
                let lifetime = self.definition_lifetime(service, implementation, request, &trail, 0)?;
                ctx.stage(Binding::multi(service.clone(), implementation.clone(), lifetime));
                return Ok(None);
            }
            self.bind_candidate(ctx, service, implementation, request, &trail, 0, true)?;
            return Ok(None);
        }

        if let Some(existing) = ctx.binding_for(service) {
            tracing::debug!(service = %service, bound = %existing.implementation, "already bound");
            return Ok(Some(existing.lifetime));
        }
        if implementation.is_open() {
            let lifetime = self.definition_lifetime(service, implementation, request, &trail, 0)?;
            ctx.stage(Binding::new(service.clone(), implementation.clone(), lifetime));
            return Ok(Some(lifetime));
        }
        self.bind_candidate(ctx, service, implementation, request, &trail, 0, false)
            .map(Some)
    }
}
