//! Hierarchy queries over the modelled type system.
//!
//! Pure functions: nothing here mutates the catalog. References that name a
//! type the catalog does not know (framework interfaces, for instance) are
//! leaves: they have no supertypes of their own.

use std::collections::HashSet;

use super::TypeCatalog;
use crate::key::TypeRef;

/// Direct base class and interfaces of `ty`, closed over `ty`'s arguments.
pub fn supertypes(catalog: &TypeCatalog, ty: &TypeRef) -> Vec<TypeRef> {
    let Some(def) = catalog.def_of(ty) else {
        return Vec::new();
    };
    let args = ty.args();
    def.base
        .iter()
        .chain(def.interfaces.iter())
        .map(|s| s.substitute(args))
        .collect()
}

/// Base class of `ty`, closed over `ty`'s arguments.
pub fn base_of(catalog: &TypeCatalog, ty: &TypeRef) -> Option<TypeRef> {
    catalog
        .def_of(ty)
        .and_then(|def| def.base.as_ref())
        .map(|base| base.substitute(ty.args()))
}

/// Every transitive supertype of `ty`, breadth-first, without `ty` itself.
///
/// A well-formed hierarchy is never deeper than the catalog is large, which
/// also bounds expansive generic metadata such as `A<T> : A<List<T>>`.
pub fn ancestors(catalog: &TypeCatalog, ty: &TypeRef) -> Vec<TypeRef> {
    let mut seen: HashSet<TypeRef> = HashSet::new();
    let mut out = Vec::new();
    let mut queue = vec![ty.clone()];
    seen.insert(ty.clone());

    for _ in 0..=catalog.len() {
        if queue.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for current in &queue {
            for sup in supertypes(catalog, current) {
                if seen.insert(sup.clone()) {
                    out.push(sup.clone());
                    next.push(sup);
                }
            }
        }
        queue = next;
    }
    out
}

/// Base classes from the direct base upwards.
pub fn base_chain(catalog: &TypeCatalog, ty: &TypeRef) -> Vec<TypeRef> {
    let mut chain: Vec<TypeRef> = Vec::new();
    let mut current = base_of(catalog, ty);
    while let Some(base) = current {
        // Malformed metadata may loop; stop at the first repeat.
        if &base == ty || chain.contains(&base) || chain.len() > catalog.len() {
            break;
        }
        current = base_of(catalog, &base);
        chain.push(base);
    }
    chain
}

/// Whether a value of `source` can be used where `target` is expected.
pub fn is_assignable(catalog: &TypeCatalog, target: &TypeRef, source: &TypeRef) -> bool {
    match (target, source) {
        (TypeRef::All(t), TypeRef::All(s)) => is_assignable(catalog, t, s),
        (TypeRef::All(_), _) | (_, TypeRef::All(_)) => false,
        _ => target == source || ancestors(catalog, source).contains(target),
    }
}

/// Proper subtype: assignable and distinct.
pub fn is_proper_subtype(catalog: &TypeCatalog, sub: &TypeRef, sup: &TypeRef) -> bool {
    sub != sup && is_assignable(catalog, sup, sub)
}

/// Number of base-class steps from `from` up to `to`.
pub fn distance(catalog: &TypeCatalog, from: &TypeRef, to: &TypeRef) -> Option<usize> {
    if from == to {
        return Some(0);
    }
    base_chain(catalog, from)
        .iter()
        .position(|base| base == to)
        .map(|i| i + 1)
}

/// Binds `pattern`'s parameters so that it equals `concrete`.
///
/// `bindings[i]` receives the type bound to `Param(i)`. A parameter already
/// bound must match again for unification to succeed.
pub fn unify(pattern: &TypeRef, concrete: &TypeRef, bindings: &mut [Option<TypeRef>]) -> bool {
    match (pattern, concrete) {
        (TypeRef::Param(i), _) => match bindings.get_mut(*i) {
            Some(slot) => {
                if slot.is_none() {
                    *slot = Some(concrete.clone());
                }
                slot.as_ref() == Some(concrete)
            }
            None => false,
        },
        (TypeRef::All(p), TypeRef::All(c)) => unify(p, c, bindings),
        (
            TypeRef::Named { name: pn, args: pa },
            TypeRef::Named { name: cn, args: ca },
        ) => {
            pn == cn
                && pa.len() == ca.len()
                && pa.iter().zip(ca).all(|(p, c)| unify(p, c, bindings))
        }
        _ => false,
    }
}

/// Arguments that close the generic definition `def_name` so that it is
/// assignable to the closed `target`.
///
/// This is the open-generic pattern match: walk the definition's own
/// hierarchy (written over its parameters) and unify each member with the
/// target. Succeeds only when every parameter gets bound.
pub fn closing_args(catalog: &TypeCatalog, def_name: &str, target: &TypeRef) -> Option<Vec<TypeRef>> {
    let def = catalog.get(def_name)?;
    let own = def.self_ref();
    std::iter::once(own.clone())
        .chain(ancestors(catalog, &own))
        .find_map(|candidate| {
            let mut bindings = vec![None; def.arity];
            if unify(&candidate, target, &mut bindings) {
                bindings.into_iter().collect::<Option<Vec<_>>>()
            } else {
                None
            }
        })
}

/// Every argument list with which `candidate` instantiates the open
/// definition `open`, in hierarchy order.
///
/// A type implementing `IRepo<Int32>` and `IRepo<String>` yields both. An
/// entry may itself be open when `candidate` is a generic definition passing
/// its own parameters through.
pub fn open_closing(catalog: &TypeCatalog, candidate: &TypeRef, open: &TypeRef) -> Vec<Vec<TypeRef>> {
    let Some(name) = open.name() else {
        return Vec::new();
    };
    let arity = open.args().len();
    std::iter::once(candidate.clone())
        .chain(ancestors(catalog, candidate))
        .filter(|t| t.name() == Some(name) && t.args().len() == arity)
        .map(|t| t.args().to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeDef;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeDef::interface("IRepo").arity(1))
            .with(TypeDef::interface("IReadRepo").arity(1))
            .with(
                TypeDef::interface("IRepoOf")
                    .arity(1)
                    .implements(TypeRef::generic("IRepo", [TypeRef::param(0)])),
            )
            .with(TypeDef::abstract_class("RepoBase").arity(1).implements(TypeRef::generic(
                "IRepoOf",
                [TypeRef::param(0)],
            )))
            .with(TypeDef::class("Repo").arity(1).extends(TypeRef::generic(
                "RepoBase",
                [TypeRef::param(0)],
            )))
            .with(TypeDef::class("Pair").arity(2).implements(TypeRef::generic(
                "IReadRepo",
                [TypeRef::generic("KeyValue", [TypeRef::param(1), TypeRef::param(0)])],
            )))
            .with(TypeDef::class("IntRepo").implements(TypeRef::generic("IRepo", ["Int32".into()])))
    }

    #[test]
    fn test_ancestors_substitute_arguments() {
        let catalog = catalog();
        let repo_of_int = TypeRef::generic("Repo", ["Int32".into()]);
        let ancestors = ancestors(&catalog, &repo_of_int);

        assert_eq!(
            ancestors,
            vec![
                TypeRef::generic("RepoBase", ["Int32".into()]),
                TypeRef::generic("IRepoOf", ["Int32".into()]),
                TypeRef::generic("IRepo", ["Int32".into()]),
            ]
        );
    }

    #[test]
    fn test_is_assignable_through_generic_chain() {
        let catalog = catalog();
        let target = TypeRef::generic("IRepo", ["Int32".into()]);
        assert!(is_assignable(&catalog, &target, &TypeRef::generic("Repo", ["Int32".into()])));
        assert!(!is_assignable(&catalog, &target, &TypeRef::generic("Repo", ["String".into()])));
        assert!(is_assignable(&catalog, &target, &TypeRef::named("IntRepo")));
    }

    #[test]
    fn test_closing_args_unifies_nested_arguments() {
        let catalog = catalog();
        let target = TypeRef::generic(
            "IReadRepo",
            [TypeRef::generic("KeyValue", ["String".into(), "Int32".into()])],
        );
        assert_eq!(
            closing_args(&catalog, "Pair", &target),
            Some(vec!["Int32".into(), "String".into()])
        );
        assert_eq!(
            closing_args(&catalog, "Repo", &TypeRef::generic("IRepo", ["Guid".into()])),
            Some(vec!["Guid".into()])
        );
        assert_eq!(closing_args(&catalog, "Repo", &target), None);
    }

    #[test]
    fn test_unify_rejects_inconsistent_binding() {
        let pattern = TypeRef::generic("Map", [TypeRef::param(0), TypeRef::param(0)]);
        let mut bindings = vec![None];
        assert!(!unify(&pattern, &TypeRef::generic("Map", ["A".into(), "B".into()]), &mut bindings));

        let mut bindings = vec![None];
        assert!(unify(&pattern, &TypeRef::generic("Map", ["A".into(), "A".into()]), &mut bindings));
        assert_eq!(bindings, vec![Some(TypeRef::named("A"))]);
    }

    #[test]
    fn test_open_closing_reports_passthrough_parameters() {
        let catalog = catalog();
        let open = TypeRef::open("IRepo", 1);
        assert_eq!(open_closing(&catalog, &TypeRef::named("IntRepo"), &open), vec![vec!["Int32".into()]]);
        assert_eq!(
            open_closing(&catalog, &TypeRef::open("Repo", 1), &open),
            vec![vec![TypeRef::param(0)]]
        );
        assert!(open_closing(&catalog, &TypeRef::named("IntRepo"), &TypeRef::open("IReadRepo", 1)).is_empty());
    }

    #[test]
    fn test_open_closing_reports_every_instantiation() {
        let catalog = TypeCatalog::new()
            .with(TypeDef::interface("IRepo").arity(1))
            .with(
                TypeDef::class("Both")
                    .implements(TypeRef::generic("IRepo", ["Int32".into()]))
                    .implements(TypeRef::generic("IRepo", ["String".into()])),
            );
        assert_eq!(
            open_closing(&catalog, &TypeRef::named("Both"), &TypeRef::open("IRepo", 1)),
            vec![vec![TypeRef::named("Int32")], vec![TypeRef::named("String")]]
        );
    }

    #[test]
    fn test_distance_walks_base_chain() {
        let catalog = TypeCatalog::new()
            .with(TypeDef::abstract_class("Animal"))
            .with(TypeDef::class("Dog").extends("Animal"))
            .with(TypeDef::class("Puppy").extends("Dog"));

        assert_eq!(distance(&catalog, &"Puppy".into(), &"Animal".into()), Some(2));
        assert_eq!(distance(&catalog, &"Dog".into(), &"Dog".into()), Some(0));
        assert_eq!(distance(&catalog, &"Animal".into(), &"Dog".into()), None);
    }
}
