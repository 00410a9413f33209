//! Realistic schemas built from the prelude only.

use nebula_caster::prelude::*;
use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::json;

fn signup() -> Schema {
    schema(hash_schema([
        ("name", non_empty_string()),
        ("email", matches(Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap())),
        ("age", optional_param(to_integer() & check(|v| v.as_i64() >= Some(18)))),
        ("role", included_in(["admin", "user"]) | transform_to_value("user")),
        ("newsletter", default(false) & to_boolean()),
    ]))
}

#[test]
fn signup_normalizes_input() {
    let result = signup()
        .call(Value::from(json!({
            "name": "ann",
            "email": "ann@example.com",
            "age": "21",
            "role": "guest"
        })))
        .unwrap();
    assert_eq!(
        result.into_value().unwrap(),
        Value::from(json!({
            "name": "ann",
            "email": "ann@example.com",
            "age": 21,
            "role": "user",
            "newsletter": false
        }))
    );
}

#[test]
fn signup_reports_every_field() {
    let result = signup()
        .call(Value::from(json!({
            "name": "",
            "email": "nope",
            "age": "12",
            "admin": true
        })))
        .unwrap();
    assert_eq!(
        result.errors().unwrap().unwrap().to_json(),
        json!({
            "name": ["should be non-empty string"],
            "email": ["does not match ^[^@\\s]+@[^@\\s]+$"],
            "age": ["is invalid"]
        })
    );
}

#[test]
fn blank_optional_param_is_dropped() {
    let result = signup()
        .call(Value::from(json!({"name": "ann", "email": "a@b", "age": ""})))
        .unwrap();
    let value = result.into_value().unwrap();
    assert!(value.get("age").is_none());
    assert_eq!(value.get("role"), Some(&Value::from("user")));
}

#[test]
fn conditional_casting() {
    let id = Schema::from(
        string()
            .then(to_integer())
            .otherwise(integer())
            .unwrap(),
    );
    assert_eq!(id.call("7").unwrap().value(), Some(&Value::Int(7)));
    assert_eq!(id.call(8).unwrap().value(), Some(&Value::Int(8)));
    assert!(id.call(true).unwrap().is_invalid());
}

#[test]
fn trier_with_typed_catch() {
    let port = Schema::from(
        try_transform(|v| Ok(Value::Int(i64::from(v.to_string().parse::<u16>()?))))
            .catching::<std::num::ParseIntError>(),
    );
    assert_eq!(port.call("8080").unwrap().value(), Some(&Value::Int(8080)));
    assert_eq!(
        port.call("99999").unwrap().errors().unwrap().unwrap().to_json(),
        json!(["is invalid"])
    );
}

#[test]
fn recursive_schema_through_lazy() {
    fn category() -> Schema {
        hash_schema([
            ("name", string()),
            ("children", optional(array_schema(lazy(category)))),
        ])
    }
    let result = category()
        .call(Value::from(json!({
            "name": "root",
            "children": [{"name": "a"}, {"name": 1}]
        })))
        .unwrap();
    let errors = result.raw_errors().unwrap();
    let second = errors.get("children").unwrap().get(1usize).unwrap();
    assert!(second.get("name").is_some());
}
