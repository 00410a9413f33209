//! Context chain: user variables, object binding and runtime arguments.

use std::sync::Arc;

use indexmap::IndexMap;
use nebula_caster::prelude::*;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;

fn vars(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

#[test]
fn context_reaches_through_structures() {
    let limited = check_with(|value, rt| {
        let max = rt.context_var("max")?;
        Ok(value.as_i64() <= max.as_i64())
    });
    let schema = hash_schema([("items", array_schema(limited))])
        .with_context(vars(&[("max", Value::Int(10))]));

    assert!(schema.call(Value::from(json!({"items": [1, 10]}))).unwrap().is_valid());

    let result = schema.call(Value::from(json!({"items": [1, 11]}))).unwrap();
    let items = result.raw_errors().unwrap().get("items").unwrap();
    assert!(items.get(1usize).is_some());
}

#[test]
fn missing_context_is_a_schema_error() {
    let schema = context_value("tenant");
    let err = schema.call(Value::Null).unwrap_err();
    assert!(err.is_capability_error());
}

#[test]
fn object_fields_collect_state_across_casters() {
    let mut fields = Hash::new();
    fields.insert("seen".to_owned(), Value::Array(Vec::new()));
    let object = Arc::new(Mutex::new(fields));

    let remember = run(|value, rt| {
        let mut seen = match rt.object_field("seen")? {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        seen.push(value.clone());
        rt.set_object_field("seen", Value::Array(seen))
    });
    let schema = array_schema(remember).with_object_context(object.clone());

    schema.call(Value::from(json!(["a", "b"]))).unwrap();
    assert_eq!(
        object.lock().get("seen"),
        Some(&Value::from(json!(["a", "b"])))
    );
}

#[test]
fn i18n_var_outside_i18n_node_is_a_schema_error() {
    let schema = check_with(|_, rt| {
        rt.i18n_var("limit", 3)?;
        Ok(true)
    });
    assert!(matches!(
        schema.call(1),
        Err(SchemaError::CapabilityMissing { capability: "i18n_var" })
    ));
}

#[test]
fn errors_inside_context_nodes_keep_their_paths() {
    let schema = hash_schema([("a", integer())])
        .with_context(vars(&[]))
        .i18n_vars(Args::new());
    let result = schema.call(Value::from(json!({"a": "x"}))).unwrap();
    assert!(result.raw_errors().unwrap().get("a").is_some());
}
