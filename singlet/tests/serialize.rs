//! A JSON-like serializer whose container implementations dispatch again on
//! their elements.

use singlet::{DispatchRegistry, SingletError};
use std::sync::LazyLock;

mod common;
use common::{Value, key, script_hierarchy};

type Serialize = DispatchRegistry<Value, (), Result<String, SingletError>>;

fn fail(message: String) -> SingletError {
    SingletError::Custom(message.into())
}

static SERIALIZE: LazyLock<Serialize> = LazyLock::new(|| {
    let registry: Serialize = DispatchRegistry::with_hierarchy(
        |v, ()| Err(fail(format!("cannot serialize {v}"))),
        script_hierarchy(),
    );

    registry.register(key("NoneType"), |_, ()| Ok("null".to_string()));
    registry.register(key("int"), |v, ()| match v {
        Value::Int(i) => Ok(i.to_string()),
        Value::Bool(b) => Ok(i64::from(*b).to_string()),
        other => Err(fail(format!("not an int: {other}"))),
    });
    registry.register(key("float"), |v, ()| match v {
        Value::Float(x) if x.is_finite() => Ok(format!("{x:?}")),
        other => Err(fail(format!("cannot serialize {other}"))),
    });
    registry.register(key("str"), |v, ()| Ok(v.to_string()));
    registry.register(key("list"), |v, ()| match v {
        Value::List(items) => {
            let parts = items
                .iter()
                .map(|item| SERIALIZE.dispatch(item, ()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", parts.join(",")))
        }
        other => Err(fail(format!("not a list: {other}"))),
    });
    registry.register(key("dict"), |v, ()| match v {
        Value::Dict(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for (k, item) in items {
                parts.push(format!("{k:?}:{}", SERIALIZE.dispatch(item, ())?));
            }
            Ok(format!("{{{}}}", parts.join(",")))
        }
        other => Err(fail(format!("not a dict: {other}"))),
    });
    registry
});

fn serialize(value: &Value) -> Result<String, SingletError> {
    SERIALIZE.dispatch(value, ())
}

#[test]
fn test_scalars() {
    assert_eq!(serialize(&Value::None).unwrap(), "null");
    assert_eq!(serialize(&Value::Int(-3)).unwrap(), "-3");
    assert_eq!(serialize(&Value::Float(0.5)).unwrap(), "0.5");
    assert_eq!(serialize(&Value::Str("hi".into())).unwrap(), "\"hi\"");
}

#[test]
fn test_bool_uses_int_implementation() {
    assert_eq!(serialize(&Value::Bool(true)).unwrap(), "1");

    SERIALIZE.register(key("bool"), |v, ()| match v {
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(fail(format!("not a bool: {other}"))),
    });
    assert_eq!(serialize(&Value::Bool(false)).unwrap(), "false");
}

#[test]
fn test_nested_containers() {
    let value = Value::Dict(vec![
        ("xs".into(), Value::List(vec![Value::Int(1), Value::Int(2)])),
        ("name".into(), Value::Str("n".into())),
        ("empty".into(), Value::List(vec![])),
        ("nothing".into(), Value::None),
    ]);
    assert_eq!(
        serialize(&value).unwrap(),
        r#"{"xs":[1,2],"name":"n","empty":[],"nothing":null}"#
    );
}

#[test]
fn test_nested_error_surfaces_from_inner_dispatch() {
    let value = Value::List(vec![
        Value::Int(1),
        Value::List(vec![Value::object("Dog")]),
    ]);
    let err = serialize(&value).unwrap_err();
    assert!(matches!(err, SingletError::Custom(_)));
    assert_eq!(err.to_string(), "cannot serialize <Dog object>");

    let err = serialize(&Value::Float(f64::NAN)).unwrap_err();
    assert_eq!(err.to_string(), "cannot serialize NaN");
}
