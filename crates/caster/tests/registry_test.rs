//! Global caster registry lifecycle.
//!
//! Kept as a single test: the registry is global to the test binary.

use nebula_caster::prelude::*;
use nebula_caster::registry;

#[test]
fn registry_lifecycle() {
    assert!(!registry::is_initialized());
    assert!(matches!(
        registry::register("age", integer),
        Err(SchemaError::RegistryNotInitialized)
    ));

    registry::init();
    registry::register("age", integer).unwrap();
    registry::register("adult", || {
        registry::lookup("age").map_or_else(|_| integer(), |age| age & check(|v| v.as_i64() >= Some(18)))
    })
    .unwrap();

    assert!(matches!(
        registry::register("age", integer),
        Err(SchemaError::DuplicateCaster { .. })
    ));

    let adult = registry::lookup("adult").unwrap();
    assert!(adult.call(20).unwrap().is_valid());
    assert!(adult.call(12).unwrap().is_invalid());
    assert!(matches!(
        registry::lookup("child"),
        Err(SchemaError::UnknownCaster { .. })
    ));

    registry::init();
    assert!(registry::lookup("age").is_ok());

    registry::teardown();
    assert!(matches!(
        registry::lookup("age"),
        Err(SchemaError::RegistryNotInitialized)
    ));
}
