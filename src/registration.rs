//! Target registries receiving committed bindings.

use std::fmt;

use crate::descriptors::Binding;
use crate::internal::Map;
use crate::key::TypeRef;

/// Sink for the bindings the engine decides on.
///
/// This is the seam to the host container. Implementations must keep the
/// invariant that a non-multi service is bound at most once and a multi
/// implementation is added under its service at most once.
pub trait BindingRegistry {
    /// Adds a single-winner binding. Returns `false` if the service was
    /// already bound, in which case nothing changes.
    fn add(&mut self, binding: Binding) -> bool;

    /// Adds one member of a multi registration unless that exact
    /// `(service, implementation)` pair is already present.
    fn try_add_multi(&mut self, binding: Binding) -> bool;

    /// The single-winner binding for `service`, if any.
    fn binding_for(&self, service: &TypeRef) -> Option<Binding>;

    /// Whether `implementation` is registered among the multi bindings of `service`.
    fn has_multi(&self, service: &TypeRef, implementation: &TypeRef) -> bool;

    fn is_bound(&self, service: &TypeRef) -> bool {
        self.binding_for(service).is_some()
    }

    /// Every binding in registration order.
    fn bindings(&self) -> Vec<Binding>;
}

/// In-memory registry, the default target.
///
/// Single-winner bindings live in a small `Vec` searched linearly while the
/// collection is small and spill into a hash map beyond that; multi
/// bindings are kept per service in registration order.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Binding, BindingCollection, BindingRegistry, Lifetime, TypeRef};
///
/// let mut registry = BindingCollection::new();
/// assert!(registry.add(Binding::new("IClock".into(), "SystemClock".into(), Lifetime::Singleton)));
/// assert!(!registry.add(Binding::new("IClock".into(), "FakeClock".into(), Lifetime::Singleton)));
///
/// let bound = registry.binding_for(&TypeRef::named("IClock")).unwrap();
/// assert_eq!(bound.implementation, TypeRef::named("SystemClock"));
/// ```
#[derive(Debug, Clone)]
pub struct BindingCollection {
    /// Fast Vec lookup for first N registrations (cache-friendly)
    one_small: Vec<Binding>,
    /// HashMap fallback for remaining registrations
    one_large: Map<TypeRef, Binding>,
    /// Multi-binding registrations (append-only)
    many: Map<TypeRef, Vec<Binding>>,
    /// Registration order across all storages
    order: Vec<(TypeRef, Option<TypeRef>)>,
    small_threshold: usize,
}

impl Default for BindingCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingCollection {
    pub fn new() -> Self {
        Self {
            one_small: Vec::new(),
            one_large: Map::default(),
            many: Map::default(),
            order: Vec::new(),
            small_threshold: 16,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members of the multi registration for `service`, in order.
    pub fn multi_for(&self, service: &TypeRef) -> &[Binding] {
        self.many.get(service).map(Vec::as_slice).unwrap_or(&[])
    }

    fn get_one(&self, service: &TypeRef) -> Option<&Binding> {
        self.one_small
            .iter()
            .find(|b| &b.service == service)
            .or_else(|| self.one_large.get(service))
    }

    /// Serializes the committed bindings as a JSON array.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.bindings())
    }
}

impl BindingRegistry for BindingCollection {
    fn add(&mut self, binding: Binding) -> bool {
        if self.get_one(&binding.service).is_some() {
            return false;
        }
        self.order.push((binding.service.clone(), None));
        if self.one_small.len() < self.small_threshold {
            self.one_small.push(binding);
        } else {
            self.one_large.insert(binding.service.clone(), binding);
        }
        true
    }

    fn try_add_multi(&mut self, binding: Binding) -> bool {
        if self.has_multi(&binding.service, &binding.implementation) {
            return false;
        }
        self.order
            .push((binding.service.clone(), Some(binding.implementation.clone())));
        self.many
            .entry(binding.service.clone())
            .or_default()
            .push(binding);
        true
    }

    fn binding_for(&self, service: &TypeRef) -> Option<Binding> {
        self.get_one(service).cloned()
    }

    fn has_multi(&self, service: &TypeRef, implementation: &TypeRef) -> bool {
        self.multi_for(service)
            .iter()
            .any(|b| &b.implementation == implementation)
    }

    fn bindings(&self) -> Vec<Binding> {
        self.order
            .iter()
            .filter_map(|(service, implementation)| match implementation {
                None => self.get_one(service).cloned(),
                Some(implementation) => self
                    .multi_for(service)
                    .iter()
                    .find(|b| &b.implementation == implementation)
                    .cloned(),
            })
            .collect()
    }
}

impl fmt::Display for BindingCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for binding in self.bindings() {
            writeln!(f, "{}", binding)?;
        }
        Ok(())
    }
}

#[cfg(feature = "parking-lot")]
type Lock<T> = parking_lot::RwLock<T>;
#[cfg(not(feature = "parking-lot"))]
type Lock<T> = std::sync::RwLock<T>;

/// Thread-safe registry for concurrent top-level callers.
///
/// Every operation takes the lock once, so `add` is an atomic
/// insert-or-check-existence. The registry is used through a shared
/// reference: `&SharedRegistry` implements [`BindingRegistry`].
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Binding, BindingRegistry, Lifetime, SharedRegistry};
///
/// let shared = SharedRegistry::new();
/// let mut handle = &shared;
/// assert!(handle.add(Binding::new("IClock".into(), "SystemClock".into(), Lifetime::Singleton)));
/// assert_eq!(shared.snapshot().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SharedRegistry {
    inner: Lock<BindingCollection>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> impl std::ops::Deref<Target = BindingCollection> + '_ {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.read()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    fn write(&self) -> impl std::ops::DerefMut<Target = BindingCollection> + '_ {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.write()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    /// A copy of the current contents.
    pub fn snapshot(&self) -> BindingCollection {
        self.read().clone()
    }
}

impl BindingRegistry for &SharedRegistry {
    fn add(&mut self, binding: Binding) -> bool {
        self.write().add(binding)
    }

    fn try_add_multi(&mut self, binding: Binding) -> bool {
        self.write().try_add_multi(binding)
    }

    fn binding_for(&self, service: &TypeRef) -> Option<Binding> {
        self.read().binding_for(service)
    }

    fn has_multi(&self, service: &TypeRef, implementation: &TypeRef) -> bool {
        self.read().has_multi(service, implementation)
    }

    fn bindings(&self) -> Vec<Binding> {
        self.read().bindings()
    }
}
