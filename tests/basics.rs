use ferrous_autowire::{
    Autowirer, AutowireOptions, BindingCollection, BindingRegistry, DiError, Lifetime, Parameter,
    TypeCatalog, TypeDef, TypeRef,
};

#[test]
fn test_dependency_resolved_with_default_lifetime() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("A"))
        .with(TypeDef::class("B").ctor([Parameter::new("a", "A")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let resolution = engine.resolve(&mut registry, &"B".into()).unwrap();

    assert_eq!(resolution.lifetime, Some(Lifetime::Transient));
    assert_eq!(resolution.added.len(), 2);
    // Dependencies are committed before their consumers
    assert_eq!(resolution.added[0].service, TypeRef::named("A"));
    assert_eq!(resolution.added[1].service, TypeRef::named("B"));
    assert_eq!(registry.binding_for(&"B".into()).unwrap().constructor, Some(0));
}

#[test]
fn test_missing_dependency_reports_chain() {
    let catalog = TypeCatalog::new().with(TypeDef::class("C").ctor([Parameter::new("d", "D")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"C".into()).unwrap_err();

    match &err {
        DiError::UnresolvableDependency { service, max_depth, chain } => {
            assert_eq!(service, "D");
            assert_eq!(*max_depth, 8);
            assert_eq!(chain, "C => D.");
        }
        other => panic!("expected UnresolvableDependency, got {:?}", other),
    }
    assert!(err.to_string().contains("C => D."));
    assert!(registry.is_empty());
}

#[test]
fn test_resolving_bound_service_is_noop() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("Config"))
        .with(TypeDef::class("Server").ctor([Parameter::new("config", "Config")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    engine.resolve(&mut registry, &"Server".into()).unwrap();
    let before = registry.len();

    let again = engine.resolve(&mut registry, &"Server".into()).unwrap();
    assert!(again.is_noop());
    assert_eq!(again.lifetime, Some(Lifetime::Transient));
    assert_eq!(registry.len(), before);

    // Already bound as a dependency
    assert!(engine.resolve(&mut registry, &"Config".into()).unwrap().is_noop());
}

#[test]
fn test_failure_leaves_registry_untouched() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("Logger"))
        .with(TypeDef::class("Metrics"))
        .with(TypeDef::class("App").ctor([
            Parameter::new("logger", "Logger"),
            Parameter::new("metrics", "Metrics"),
            Parameter::new("missing", "Tracer"),
        ]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    assert!(engine.resolve(&mut registry, &"App".into()).is_err());
    assert!(registry.is_empty());
    assert!(!registry.is_bound(&"Logger".into()));
}

#[test]
fn test_default_lifetime_from_options() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("Clock"))
        .with(TypeDef::class("Scheduler").ctor([Parameter::new("clock", "Clock")]));
    let options = AutowireOptions::default().with_default_lifetime(Lifetime::Scoped);
    let engine = Autowirer::new(catalog).with_options(options);
    let mut registry = BindingCollection::new();

    engine.resolve(&mut registry, &"Scheduler".into()).unwrap();

    // Undeclared dependencies take the consumer's lifetime
    assert_eq!(registry.binding_for(&"Clock".into()).unwrap().lifetime, Lifetime::Scoped);
    assert_eq!(registry.binding_for(&"Scheduler".into()).unwrap().lifetime, Lifetime::Scoped);
}

#[test]
fn test_ignored_types_are_skipped() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("HttpContext").ignored())
        .with(TypeDef::class("Handler").ctor([
            Parameter::new("context", "HttpContext"),
            Parameter::new("token", "CancellationToken"),
        ]));
    let options = AutowireOptions::default().ignore("CancellationToken");
    let engine = Autowirer::new(catalog).with_options(options);
    let mut registry = BindingCollection::new();

    let resolution = engine.resolve(&mut registry, &"Handler".into()).unwrap();
    assert_eq!(resolution.added.len(), 1);

    let ignored = engine.resolve(&mut registry, &"HttpContext".into()).unwrap();
    assert!(ignored.is_noop());
    assert_eq!(ignored.lifetime, None);
}

#[test]
fn test_unknown_top_level_type() {
    let engine = Autowirer::new(TypeCatalog::new());
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"Ghost".into()).unwrap_err();
    assert_eq!(err.chain(), Some("Ghost."));
    assert_eq!(err.service(), "Ghost");
}

#[test]
fn test_interface_without_implementations() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("IMailer"))
        .with(TypeDef::class("InternalMailer").implements("IMailer").internal())
        .with(TypeDef::class("NestedMailer").implements("IMailer").nested());
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"IMailer".into()).unwrap_err();
    assert!(matches!(err, DiError::UnresolvableDependency { .. }));
}

#[test]
fn test_shared_dependency_bound_once() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("Db"))
        .with(TypeDef::class("Users").ctor([Parameter::new("db", "Db")]))
        .with(TypeDef::class("Orders").ctor([Parameter::new("db", "Db")]))
        .with(TypeDef::class("Shop").ctor([
            Parameter::new("users", "Users"),
            Parameter::new("orders", "Orders"),
        ]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let resolution = engine.resolve(&mut registry, &"Shop".into()).unwrap();
    let db_bindings = resolution
        .added
        .iter()
        .filter(|b| b.service == TypeRef::named("Db"))
        .count();
    assert_eq!(db_bindings, 1);
    assert_eq!(registry.len(), 4);
}
