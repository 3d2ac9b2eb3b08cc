#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_autowire::{Autowirer, BindingCollection, TypeCatalog};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(catalog) = TypeCatalog::from_json(text) else {
        return;
    };

    // Arbitrary metadata, including malformed hierarchies, must not panic
    let engine = Autowirer::new(catalog.clone());
    let mut registry = BindingCollection::new();
    for def in catalog.iter() {
        let _ = engine.resolve(&mut registry, &def.self_ref());
    }
    let _ = engine.resolve_exported(&mut registry);
});
