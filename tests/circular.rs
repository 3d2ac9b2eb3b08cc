use ferrous_autowire::{
    Autowirer, AutowireOptions, BindingCollection, BindingRegistry, Constructor, DiError, Parameter,
    TypeCatalog, TypeDef,
};

#[test]
fn test_self_dependency_rejected() {
    let catalog = TypeCatalog::new().with(TypeDef::class("X").ctor([Parameter::new("inner", "X")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"X".into()).unwrap_err();
    assert!(matches!(err, DiError::UnresolvableDependency { .. }));
    assert_eq!(err.chain(), Some("X => X."));
}

#[test]
fn test_self_dependency_rejected_regardless_of_depth_limit() {
    let catalog = TypeCatalog::new().with(TypeDef::class("X").ctor([Parameter::new("inner", "X")]));
    let options = AutowireOptions::default().with_max_depth(usize::MAX);
    let engine = Autowirer::new(catalog).with_options(options);
    let mut registry = BindingCollection::new();

    assert!(engine.resolve(&mut registry, &"X".into()).is_err());
}

#[test]
fn test_decorator_needing_its_own_interface_rejected() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("IStore"))
        .with(
            TypeDef::class("LoggingStore")
                .implements("IStore")
                .ctor([Parameter::new("inner", "IStore")]),
        );
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"IStore".into()).unwrap_err();
    assert_eq!(err.chain(), Some("{IStore=LoggingStore} => IStore."));
}

#[test]
fn test_mutual_dependency_rejected() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("A").ctor([Parameter::new("b", "B")]))
        .with(TypeDef::class("B").ctor([Parameter::new("a", "A")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"A".into()).unwrap_err();
    assert!(matches!(err, DiError::UnresolvableDependency { .. }));
    assert_eq!(err.chain(), Some("A => B => A."));
    assert!(registry.is_empty());
}

#[test]
fn test_three_way_cycle_rejected() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("IA"))
        .with(TypeDef::class("A").implements("IA").ctor([Parameter::new("b", "B")]))
        .with(TypeDef::class("B").ctor([Parameter::new("c", "C")]))
        .with(TypeDef::class("C").ctor([Parameter::new("a", "IA")]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let err = engine.resolve(&mut registry, &"IA".into()).unwrap_err();
    assert_eq!(err.chain(), Some("{IA=A} => B => C => IA."));
}

#[test]
fn test_cycle_broken_by_alternative_constructor() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("Node").ctor([Parameter::new("parent", "Node")]).constructor(Constructor::default()));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    engine.resolve(&mut registry, &"Node".into()).unwrap();
    assert_eq!(registry.binding_for(&"Node".into()).unwrap().constructor, Some(1));
}

#[test]
fn test_cycle_through_optional_parameter_is_fine() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::class("A").ctor([Parameter::new("b", "B")]))
        .with(TypeDef::class("B").ctor([Parameter::new("a", "A").optional()]));
    let engine = Autowirer::new(catalog);
    let mut registry = BindingCollection::new();

    let resolution = engine.resolve(&mut registry, &"A".into()).unwrap();
    assert_eq!(resolution.added.len(), 2);
}
