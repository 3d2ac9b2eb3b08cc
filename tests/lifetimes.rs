use ferrous_autowire::{
    Autowirer, BindingCollection, BindingRegistry, DiError, Lifetime, Parameter, TypeCatalog,
    TypeDef,
};

fn lifetime_of(registry: &BindingCollection, service: &str) -> Lifetime {
    registry.binding_for(&service.into()).unwrap().lifetime
}

#[test]
fn test_singleton_service_rejects_transient_implementation() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("ICache").lifetime(Lifetime::Singleton))
        .with(TypeDef::class("LocalCache").implements("ICache").lifetime(Lifetime::Transient));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"ICache".into()).unwrap_err();
    match err {
        DiError::LifetimeViolation {
            service,
            service_lifetime,
            implementation,
            implementation_lifetime,
            ..
        } => {
            assert_eq!(service, "ICache");
            assert_eq!(service_lifetime, Some(Lifetime::Singleton));
            assert_eq!(implementation, "LocalCache");
            assert_eq!(implementation_lifetime, Some(Lifetime::Transient));
        }
        other => panic!("expected LifetimeViolation, got {:?}", other),
    }
}

#[test]
fn test_transient_service_accepts_singleton_implementation() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("ICache").lifetime(Lifetime::Transient))
        .with(TypeDef::class("SharedCache").implements("ICache").lifetime(Lifetime::Singleton));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let resolution = engine.resolve(&mut registry, &"ICache".into()).unwrap();
    assert_eq!(resolution.lifetime, Some(Lifetime::Singleton));
    assert_eq!(lifetime_of(&registry, "ICache"), Lifetime::Singleton);
}

#[test]
fn test_declaration_on_one_side_wins() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("IBus").lifetime(Lifetime::Scoped))
        .with(TypeDef::class("Bus").implements("IBus"))
        .with(TypeDef::interface("IClock"))
        .with(TypeDef::class("SystemClock").implements("IClock").lifetime(Lifetime::Singleton));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    engine.resolve(&mut registry, &"IBus".into()).unwrap();
    engine.resolve(&mut registry, &"IClock".into()).unwrap();

    assert_eq!(lifetime_of(&registry, "IBus"), Lifetime::Scoped);
    assert_eq!(lifetime_of(&registry, "IClock"), Lifetime::Singleton);
}

#[test]
fn test_singleton_consumer_rejects_scoped_dependency() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("DbContext").lifetime(Lifetime::Scoped))
        .with(TypeDef::class("Cache").lifetime(Lifetime::Singleton).ctor([Parameter::new("db", "DbContext")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"Cache".into()).unwrap_err();
    match err {
        DiError::LifetimeViolation { service, required, chain, .. } => {
            assert_eq!(service, "DbContext");
            assert_eq!(required, Some(Lifetime::Singleton));
            assert_eq!(chain, "Cache => DbContext.");
        }
        other => panic!("expected LifetimeViolation, got {:?}", other),
    }
    assert!(registry.is_empty());
}

#[test]
fn test_undeclared_dependency_inherits_consumer_lifetime() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("Options"))
        .with(TypeDef::class("Host").lifetime(Lifetime::Singleton).ctor([Parameter::new("o", "Options")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    engine.resolve(&mut registry, &"Host".into()).unwrap();
    assert_eq!(lifetime_of(&registry, "Options"), Lifetime::Singleton);
}

#[test]
fn test_explicit_lifetime_is_a_requirement() {
    let catalog = TypeCatalog::new().with(TypeDef::class("Session").lifetime(Lifetime::Scoped));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine
        .resolve_with(&mut registry, &"Session".into(), Lifetime::Singleton)
        .unwrap_err();
    assert!(matches!(err, DiError::LifetimeViolation { .. }));

    let ok = engine
        .resolve_with(&mut registry, &"Session".into(), Lifetime::Transient)
        .unwrap();
    assert_eq!(ok.lifetime, Some(Lifetime::Scoped));
}

#[test]
fn test_default_lifetime_is_only_a_preference() {
    let catalog = TypeCatalog::new().with(TypeDef::class("Session").lifetime(Lifetime::Scoped));
    let options = ferrous_autowire::AutowireOptions::default().with_default_lifetime(Lifetime::Singleton);
    let engine = Autowirer::new(catalog).with_options(options);
    let mut registry = BindingCollection::new();

    let resolution = engine.resolve(&mut registry, &"Session".into()).unwrap();
    assert_eq!(resolution.lifetime, Some(Lifetime::Scoped));
}

#[test]
fn test_violation_falls_through_to_next_candidate() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("IClock"))
        .with(TypeDef::class("SystemClock").implements("IClock").lifetime(Lifetime::Transient))
        .with(TypeDef::class("CachedClock").extends("SystemClock").lifetime(Lifetime::Transient))
        .with(TypeDef::class("Ticker").lifetime(Lifetime::Singleton).ctor([Parameter::new("c", "IClock")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    // Both candidates are too short-lived, the deepest failure is reported
    let err = engine.resolve(&mut registry, &"Ticker".into()).unwrap_err();
    match err {
        DiError::LifetimeViolation { implementation, chain, .. } => {
            assert_eq!(implementation, "CachedClock");
            assert_eq!(chain, "Ticker => {IClock=CachedClock}.");
        }
        other => panic!("expected LifetimeViolation, got {:?}", other),
    }
}
