//! Candidate selection and ordering.
//!
//! Ordering is most specific first:
//!
//! 1. A candidate always precedes every candidate it derives from.
//! 2. Unrelated candidates are ranked by a heuristic: for interface services
//!    the number of interfaces they implement that have nothing to do with
//!    the service (infrastructure interfaces excluded), for class services
//!    the base-chain distance to the service. Lower is better.
//! 3. Catalog order breaks remaining ties.
//!
//! Rule 1 is applied as a stable topological pass over the heuristic
//! order, so the sort itself only ever sees a total key.

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::hierarchy::{
    ancestors, base_chain, closing_args, distance, is_assignable, is_proper_subtype,
};
use crate::catalog::{TypeCatalog, TypeKind};
use crate::config::AutowireOptions;
use crate::key::TypeRef;

pub(crate) struct Selector<'a> {
    pub(crate) catalog: &'a TypeCatalog,
    pub(crate) options: &'a AutowireOptions,
    /// Names of the types eligible as implementations
    pub(crate) candidates: &'a [Arc<str>],
}

impl<'a> Selector<'a> {
    /// All implementations of `service`, most specific first.
    ///
    /// A concrete service is its own only candidate. Otherwise non-generic
    /// catalog types assignable to the service are taken; when there are
    /// none and the service is a closed generic, generic definitions that
    /// can be closed to match it are tried instead.
    pub(crate) fn find_implementations(&self, service: &TypeRef) -> Vec<TypeRef> {
        let Some(def) = self.catalog.def_of(service) else {
            return Vec::new();
        };
        if def.kind == TypeKind::Class {
            return vec![service.clone()];
        }
        if !def.is_abstract() {
            return Vec::new();
        }

        let mut found: Vec<TypeRef> = self
            .candidate_defs()
            .filter(|c| !c.is_generic_definition())
            .map(|c| c.self_ref())
            .filter(|c| is_assignable(self.catalog, service, c))
            .collect();

        if found.is_empty() && service.is_generic() && !service.is_open() {
            found = self
                .candidate_defs()
                .filter(|c| c.is_generic_definition())
                .filter_map(|c| {
                    closing_args(self.catalog, &c.name, service)
                        .map(|args| TypeRef::Named { name: c.name.clone(), args })
                })
                .collect();
        }

        self.order(service, found)
    }

    /// Eligible generic definitions and plain types, in catalog order.
    pub(crate) fn candidate_defs(&self) -> impl Iterator<Item = &'a crate::catalog::TypeDef> + '_ {
        self.candidates.iter().filter_map(move |name| self.catalog.get(name))
    }

    /// Sorts `found` most specific first. See the module docs.
    pub(crate) fn order(&self, service: &TypeRef, found: Vec<TypeRef>) -> Vec<TypeRef> {
        let interface_service = self
            .catalog
            .def_of(service)
            .is_some_and(|d| d.kind == TypeKind::Interface);

        let mut keyed: Vec<((usize, usize), TypeRef)> = found
            .into_iter()
            .map(|candidate| {
                let heuristic = if interface_service {
                    self.extraneous_interfaces(service, &candidate)
                } else {
                    distance(self.catalog, &candidate, service).unwrap_or(usize::MAX)
                };
                let position = candidate
                    .name()
                    .and_then(|n| self.catalog.position(n))
                    .unwrap_or(usize::MAX);
                ((heuristic, position), candidate)
            })
            .collect();
        keyed.sort_by_key(|(key, _)| *key);

        let mut remaining: Vec<TypeRef> = keyed.into_iter().map(|(_, c)| c).collect();
        let mut ordered = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let next = (0..remaining.len())
                .find(|&i| {
                    !remaining
                        .iter()
                        .any(|other| is_proper_subtype(self.catalog, other, &remaining[i]))
                })
                .unwrap_or(0);
            ordered.push(remaining.remove(next));
        }
        ordered
    }

    /// Groups an ordered candidate list into families.
    ///
    /// A candidate joins the first family holding one of its subtypes; the
    /// family's first member is its representative.
    pub(crate) fn families(&self, ordered: Vec<TypeRef>) -> Vec<Vec<TypeRef>> {
        let mut families: Vec<Vec<TypeRef>> = Vec::new();
        for candidate in ordered {
            let home = families.iter_mut().find(|family| {
                family
                    .iter()
                    .any(|member| is_proper_subtype(self.catalog, member, &candidate))
            });
            match home {
                Some(family) => family.push(candidate),
                None => families.push(vec![candidate]),
            }
        }
        families
    }

    /// Interfaces `candidate` implements beyond what `service` brings along.
    pub(crate) fn extraneous_interfaces(&self, service: &TypeRef, candidate: &TypeRef) -> usize {
        let bases: HashSet<TypeRef> = base_chain(self.catalog, candidate).into_iter().collect();
        let related: HashSet<TypeRef> = std::iter::once(service.clone())
            .chain(ancestors(self.catalog, service))
            .collect();

        ancestors(self.catalog, candidate)
            .into_iter()
            .filter(|t| !bases.contains(t))
            .filter(|t| !related.contains(t))
            .filter(|t| !self.options.is_infrastructure(t))
            .count()
    }
}
