/// Concurrent access integration tests
///
/// Several threads resolve against one shared registry. Whatever the
/// interleaving, each non-multi service must end up bound exactly once and
/// every thread must see a successful resolution.

use ferrous_autowire::{
    Autowirer, BindingRegistry, Lifetime, Parameter, SharedRegistry, TypeCatalog, TypeDef, TypeRef,
};
use std::sync::Barrier;
use std::thread;

fn layered_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(TypeDef::class("Config").lifetime(Lifetime::Singleton))
        .with(TypeDef::interface("IDb"))
        .with(TypeDef::class("PgDb").implements("IDb").lifetime(Lifetime::Singleton).ctor([Parameter::new("c", "Config")]))
        .with(TypeDef::class("Users").ctor([Parameter::new("db", "IDb")]))
        .with(TypeDef::class("Orders").ctor([Parameter::new("db", "IDb"), Parameter::new("users", "Users")]))
        .with(TypeDef::class("Api").ctor([Parameter::new("users", "Users"), Parameter::new("orders", "Orders")]))
}

#[test]
fn test_concurrent_resolution_binds_each_service_once() {
    let engine = Autowirer::new(layered_catalog());
    let registry = SharedRegistry::new();
    let barrier = Barrier::new(8);
    let requests = ["Api", "Orders", "Users", "IDb"];

    thread::scope(|s| {
        for i in 0..8 {
            let engine = &engine;
            let registry = &registry;
            let barrier = &barrier;
            let service = TypeRef::named(requests[i % requests.len()]);
            s.spawn(move || {
                barrier.wait();
                let mut handle = registry;
                engine.resolve(&mut handle, &service).unwrap();
            });
        }
    });

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 5);
    for service in ["Config", "IDb", "Users", "Orders", "Api"] {
        assert!(snapshot.is_bound(&service.into()), "{} not bound", service);
    }
    let db_bindings = snapshot
        .bindings()
        .into_iter()
        .filter(|b| b.service == TypeRef::named("IDb"))
        .count();
    assert_eq!(db_bindings, 1);
}

#[test]
fn test_concurrent_collection_requests() {
    let catalog = TypeCatalog::new()
        .with(TypeDef::interface("IJob"))
        .with(TypeDef::class("Backup").implements("IJob"))
        .with(TypeDef::class("Cleanup").implements("IJob"))
        .with(TypeDef::class("Report").implements("IJob"));
    let engine = Autowirer::new(catalog);
    let registry = SharedRegistry::new();
    let all = TypeRef::all("IJob".into());

    thread::scope(|s| {
        for _ in 0..4 {
            let (engine, registry, all) = (&engine, &registry, &all);
            s.spawn(move || {
                let mut handle = registry;
                engine.resolve(&mut handle, all).unwrap();
            });
        }
    });

    assert_eq!(registry.snapshot().multi_for(&"IJob".into()).len(), 3);
}

#[test]
fn test_engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Autowirer>();
    assert_send_sync::<SharedRegistry>();
}
