//! Process-wide localizer configuration.
//!
//! Kept as a single test: the configuration is global to the test binary.

use nebula_caster::config::{self, Config};
use nebula_caster::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn installed_localizer_is_used_until_reset() {
    let failed = integer().call("x").unwrap();
    assert_eq!(
        failed.errors().unwrap().unwrap().to_json(),
        json!(["is not an integer"])
    );

    let german = Catalog::from_json(r#"{"datacaster": {"errors": {"integer": "ist keine Ganzzahl"}}}"#)
        .unwrap();
    config::install(Config::new(german));
    assert_eq!(
        failed.errors().unwrap().unwrap().to_json(),
        json!(["ist keine Ganzzahl"])
    );
    assert!(config::current().localizer.exists("datacaster.errors.integer"));

    config::reset();
    assert_eq!(
        failed.errors().unwrap().unwrap().to_json(),
        json!(["is not an integer"])
    );
    assert!(integer().call(1).unwrap().errors().unwrap().is_none());
}
