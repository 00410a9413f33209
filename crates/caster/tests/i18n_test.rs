//! Localized error messages end to end.

use indexmap::IndexMap;
use nebula_caster::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn resolved(schema: &Schema, input: Value, catalog: &Catalog) -> serde_json::Value {
    schema
        .call(input)
        .unwrap()
        .errors_with(catalog)
        .unwrap()
        .unwrap()
        .to_json()
}

#[rstest]
#[case(integer(), Value::from("x"), "is not an integer")]
#[case(string(), Value::Int(1), "is not a string")]
#[case(compare("yes"), Value::from("no"), "does not equal yes")]
#[case(must_be(Kind::Hash), Value::Int(1), "is not hash")]
#[case(to_integer(), Value::from("x"), "does not look like an integer")]
fn builtin_messages(#[case] schema: Schema, #[case] input: Value, #[case] message: &str) {
    assert_eq!(resolved(&schema, input, &Catalog::builtin()), json!([message]));
}

#[test]
fn scope_prefers_most_specific_message() {
    let catalog = Catalog::builtin()
        .merged(Catalog::from_json(r#"{"user": {"name": {"string": "name must be text"}}}"#).unwrap());
    let user = hash_schema([("name", string()), ("age", integer())]).i18n_scope("user", Args::new());

    let errors = resolved(&user, value(json!({"name": 1, "age": "x"})), &catalog);
    assert_eq!(
        errors,
        json!({"name": ["name must be text"], "age": ["is not an integer"]})
    );
}

#[test]
fn key_with_interpolated_arguments() {
    let catalog = Catalog::new().with_message("errors.too_long", "%{value} is longer than %{max}");
    let mut args = Args::new();
    args.insert("max".to_owned(), Value::Int(3));

    let short = check(|v| v.as_str().is_some_and(|s| s.len() <= 3)).i18n_key(["errors.too_long"], args);
    assert_eq!(
        resolved(&short, Value::from("abcd"), &catalog),
        json!(["abcd is longer than 3"])
    );
}

#[test]
fn missing_translation_renders_fallback() {
    let schema = integer().i18n_key(["errors.nope"], Args::new());
    assert_eq!(
        resolved(&schema, Value::from("x"), &Catalog::new()),
        json!(["translation missing: errors.nope"])
    );
}

#[test]
fn relative_only_keys_are_unresolvable() {
    let schema = integer().i18n_key([".only_relative"], Args::new());
    let result = schema.call("x").unwrap();
    assert!(matches!(
        result.errors_with(&Catalog::builtin()),
        Err(SchemaError::Unresolvable { .. })
    ));
}

#[test]
fn outer_key_overrides_inner_scope() {
    let catalog = Catalog::new().with_message("errors.bad_user", "user is invalid");
    let schema = integer()
        .i18n_scope("user", Args::new())
        .i18n_key(["errors.bad_user"], Args::new());
    assert_eq!(
        resolved(&schema, Value::from("x"), &catalog),
        json!(["user is invalid"])
    );
}

#[test]
fn literal_messages_are_never_rewritten() {
    let schema = check(|_| false)
        .map_errors(|_| ErrorTree::from("custom"))
        .i18n_key(["errors.ignored"], Args::new());
    assert_eq!(
        resolved(&schema, Value::Null, &Catalog::new()),
        json!(["custom"])
    );
}

#[test]
fn map_keys_then_scope() {
    let mut mapping = IndexMap::new();
    mapping.insert("datacaster.errors.integer".to_owned(), ".number".to_owned());
    let catalog = Catalog::new().with_message("form.number", "enter a number");

    let schema = integer()
        .i18n_map_keys(mapping)
        .i18n_scope("form", Args::new());
    assert_eq!(
        resolved(&schema, Value::from("x"), &catalog),
        json!(["enter a number"])
    );
}
