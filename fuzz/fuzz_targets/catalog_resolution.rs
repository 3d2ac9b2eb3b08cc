#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_autowire::{
    Autowirer, BindingCollection, BindingRegistry, Lifetime, Parameter, TypeCatalog, TypeDef, TypeRef,
};

// Byte layout per type: [flags, lifetime, dep_count, deps...]
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let count = (data[0] % 12) as usize + 1;
    let mut bytes = data[1..].iter().copied();
    let mut catalog = TypeCatalog::new()
        .with(TypeDef::interface("IService"))
        .with(TypeDef::interface("IRepo").arity(1));

    for i in 0..count {
        let flags = bytes.next().unwrap_or(0);
        let mut def = TypeDef::class(&format!("T{}", i));
        def = match bytes.next().unwrap_or(0) % 4 {
            0 => def,
            1 => def.lifetime(Lifetime::Transient),
            2 => def.lifetime(Lifetime::Scoped),
            _ => def.lifetime(Lifetime::Singleton),
        };
        if flags & 1 != 0 {
            def = def.implements("IService");
        }
        if flags & 2 != 0 && i > 0 {
            def = def.extends(format!("T{}", (flags as usize >> 4) % i).as_str());
        }
        if flags & 4 != 0 {
            def = def.implements(TypeRef::generic("IRepo", [TypeRef::named(&format!("T{}", i))]));
        }
        let deps = (bytes.next().unwrap_or(0) % 4) as usize;
        let params: Vec<Parameter> = (0..deps)
            .map(|d| {
                let target = bytes.next().unwrap_or(0) as usize % (count + 1);
                let ty = if target == count {
                    TypeRef::all("IService".into())
                } else {
                    TypeRef::named(&format!("T{}", target))
                };
                let param = Parameter::new(&format!("p{}", d), ty);
                if flags & 8 != 0 { param.optional() } else { param }
            })
            .collect();
        catalog.add(def.ctor(params));
    }

    let engine = Autowirer::new(catalog.clone());
    let mut registry = BindingCollection::new();
    let mut requests: Vec<TypeRef> = catalog.iter().map(|d| d.self_ref()).collect();
    requests.push(TypeRef::all("IService".into()));
    requests.push(TypeRef::open("IRepo", 1));

    for request in &requests {
        let before = registry.len();
        match engine.resolve(&mut registry, request) {
            Ok(_) => assert!(engine.resolve(&mut registry, request).unwrap().is_noop()),
            Err(_) => assert_eq!(registry.len(), before),
        }
    }

    let mut seen = std::collections::HashSet::new();
    for binding in registry.bindings().into_iter().filter(|b| !b.is_multi) {
        assert!(seen.insert(binding.service));
    }
});
