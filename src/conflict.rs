//! Conflict resolution policies.
//!
//! The selector hands a policy the representatives of every unrelated
//! candidate family it could not rank away, most specific first. The
//! policy either picks one by index or declines, in which case the request
//! fails with [`DiError::AmbiguousImplementation`](crate::DiError).

use crate::key::TypeRef;

/// Pluggable tie-break for unrelated candidates.
///
/// Closures `Fn(&TypeRef, &[TypeRef]) -> Option<usize>` implement the trait.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{ConflictResolver, TypeRef};
///
/// let prefer_sql = |_: &TypeRef, candidates: &[TypeRef]| {
///     candidates.iter().position(|c| c.name().is_some_and(|n| n.starts_with("Sql")))
/// };
/// let candidates = [TypeRef::named("MemoryStore"), TypeRef::named("SqlStore")];
/// assert_eq!(prefer_sql.choose(&TypeRef::named("IStore"), &candidates), Some(1));
/// ```
pub trait ConflictResolver: Send + Sync {
    /// Index of the winner in `candidates`, or `None` to report ambiguity.
    fn choose(&self, service: &TypeRef, candidates: &[TypeRef]) -> Option<usize>;
}

/// Default policy: never guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailOnConflict;

impl ConflictResolver for FailOnConflict {
    fn choose(&self, _service: &TypeRef, _candidates: &[TypeRef]) -> Option<usize> {
        None
    }
}

/// Takes the candidate the comparator ranked first.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferFirst;

impl ConflictResolver for PreferFirst {
    fn choose(&self, _service: &TypeRef, candidates: &[TypeRef]) -> Option<usize> {
        if candidates.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

impl<F> ConflictResolver for F
where
    F: Fn(&TypeRef, &[TypeRef]) -> Option<usize> + Send + Sync,
{
    fn choose(&self, service: &TypeRef, candidates: &[TypeRef]) -> Option<usize> {
        self(service, candidates)
    }
}
