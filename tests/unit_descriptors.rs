/// Unit tests for Binding and the registry implementations

use ferrous_autowire::{Binding, BindingCollection, BindingRegistry, Lifetime, SharedRegistry, TypeRef};

#[test]
fn test_binding_display() {
    let single = Binding::new("IClock".into(), "SystemClock".into(), Lifetime::Singleton);
    assert_eq!(single.to_string(), "IClock => SystemClock (Singleton)");

    let multi = Binding::multi("IHandler".into(), "MailHandler".into(), Lifetime::Scoped);
    assert_eq!(multi.to_string(), "[IHandler] += MailHandler (Scoped)");
}

#[test]
fn test_binding_constructor_and_openness() {
    let binding = Binding::new("A".into(), "A".into(), Lifetime::Transient).with_constructor(2);
    assert_eq!(binding.constructor, Some(2));
    assert!(!binding.is_open());

    let open = Binding::new(TypeRef::open("IRepo", 1), TypeRef::open("Repo", 1), Lifetime::Scoped);
    assert!(open.is_open());
    assert_eq!(open.constructor, None);
}

#[test]
fn test_collection_keeps_first_binding() {
    let mut registry = BindingCollection::new();
    assert!(registry.add(Binding::new("IClock".into(), "SystemClock".into(), Lifetime::Singleton)));
    assert!(!registry.add(Binding::new("IClock".into(), "FakeClock".into(), Lifetime::Transient)));

    let bound = registry.binding_for(&"IClock".into()).unwrap();
    assert_eq!(bound.implementation, TypeRef::named("SystemClock"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_single_and_multi_slots_are_separate() {
    let mut registry = BindingCollection::new();
    registry.add(Binding::new("IHandler".into(), "MailHandler".into(), Lifetime::Transient));
    assert!(registry.try_add_multi(Binding::multi("IHandler".into(), "MailHandler".into(), Lifetime::Transient)));

    assert!(registry.is_bound(&"IHandler".into()));
    assert!(registry.has_multi(&"IHandler".into(), &"MailHandler".into()));
    assert_eq!(registry.bindings().len(), 2);
}

#[test]
fn test_shared_registry_snapshot() {
    let shared = SharedRegistry::new();
    let mut handle = &shared;
    handle.add(Binding::new("A".into(), "A".into(), Lifetime::Transient));

    let snapshot = shared.snapshot();
    assert!(snapshot.is_bound(&"A".into()));
    assert_eq!(snapshot.len(), 1);
}
