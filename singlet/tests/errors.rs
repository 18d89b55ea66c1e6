//! Errors and panics raised by implementations, and registration errors.

use singlet::{
    BoxError, DispatchRegistry, Dispatchable, HierarchyBuilder, HierarchyError, RegisterError,
    SingletError, TypeKey, presets,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use thiserror::Error;

mod common;
use common::{Value, key, script_hierarchy};

#[derive(Debug, Error, PartialEq)]
#[error("not a number: {0}")]
struct NotANumber(String);

type Parse = DispatchRegistry<Value, (), Result<f64, NotANumber>>;

fn parse_registry() -> Parse {
    let registry: Parse = DispatchRegistry::with_hierarchy(
        |v: &Value, ()| Err(NotANumber(v.to_string())),
        script_hierarchy(),
    );
    registry.register(key("int"), |v, ()| match v {
        Value::Int(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        other => Err(NotANumber(other.to_string())),
    });
    registry.register(key("float"), |v, ()| match v {
        Value::Float(x) => Ok(*x),
        other => Err(NotANumber(other.to_string())),
    });
    registry.register(key("str"), |v, ()| match v {
        Value::Str(s) => s.parse().map_err(|_| NotANumber(s.clone())),
        other => Err(NotANumber(other.to_string())),
    });
    registry
}

#[test]
fn test_implementation_errors_reach_caller_unchanged() {
    let registry = parse_registry();

    assert_eq!(registry.dispatch(&Value::Int(2), ()), Ok(2.0));
    assert_eq!(registry.dispatch(&Value::Bool(true), ()), Ok(1.0));
    assert_eq!(registry.dispatch(&Value::Str("1.5".into()), ()), Ok(1.5));
    assert_eq!(
        registry.dispatch(&Value::Str("abc".into()), ()),
        Err(NotANumber("abc".into()))
    );
    assert_eq!(
        registry.dispatch(&Value::None, ()),
        Err(NotANumber("None".into()))
    );
}

fn total(registry: &Parse, values: &[Value]) -> Result<f64, NotANumber> {
    let mut sum = 0.0;
    for value in values {
        sum += registry.dispatch(value, ())?;
    }
    Ok(sum)
}

#[test]
fn test_errors_propagate_with_question_mark() {
    let registry = parse_registry();
    let good = [Value::Int(1), Value::Float(0.5), Value::Str("2".into())];
    assert_eq!(total(&registry, &good), Ok(3.5));

    let bad = [Value::Int(1), Value::object("Dog"), Value::Int(2)];
    assert_eq!(
        total(&registry, &bad),
        Err(NotANumber("<Dog object>".into()))
    );
}

#[test]
fn test_boxed_errors_convert_into_singlet_error() {
    let registry: DispatchRegistry<dyn Dispatchable, (), Result<u32, BoxError>> =
        DispatchRegistry::with_hierarchy(
            |v: &dyn Dispatchable, ()| Err(format!("no conversion for {}", v.type_key()).into()),
            presets::builtin_hierarchy(),
        );
    registry.register_for::<presets::Integer, _>(|v, ()| {
        let n = v
            .downcast_ref::<u8>()
            .map(|n| u32::from(*n))
            .ok_or("only u8 is supported")?;
        Ok(n)
    });

    type Convert = DispatchRegistry<dyn Dispatchable, (), Result<u32, BoxError>>;

    fn run(registry: &Convert) -> Result<u32, SingletError> {
        let a = registry.dispatch(&7u8, ())?;
        let b = registry.dispatch(&"seven", ())?;
        Ok(a + b)
    }

    assert_eq!(registry.dispatch(&7u8, ()).unwrap(), 7);
    assert_eq!(
        registry.dispatch(&7u16, ()).unwrap_err().to_string(),
        "only u8 is supported"
    );

    let err = run(&registry).unwrap_err();
    assert!(matches!(err, SingletError::Custom(_)));
    assert!(err.to_string().contains("no conversion for &str"));
}

#[test]
fn test_panicking_implementation_leaves_registry_usable() {
    let registry: DispatchRegistry<Value, (), &'static str> =
        DispatchRegistry::with_hierarchy(|_, ()| "OTHER", script_hierarchy());
    registry.register(key("Dog"), |_, ()| panic!("dog implementation failed"));
    registry.register(key("Animal"), |_, ()| "ANIMAL");

    let result = catch_unwind(AssertUnwindSafe(|| {
        registry.dispatch(&Value::object("Puppy"), ())
    }));
    assert!(result.is_err());

    assert_eq!(registry.dispatch(&Value::object("Cat"), ()), "ANIMAL");
    registry.register(key("Dog"), |_, ()| "DOG");
    assert_eq!(registry.dispatch(&Value::object("Puppy"), ()), "DOG");
}

#[test]
fn test_invalid_declarations_are_rejected() {
    let registry: DispatchRegistry<Value, (), &'static str> =
        DispatchRegistry::with_hierarchy(|_, ()| "OTHER", script_hierarchy());
    registry.register(key("Animal"), |_, ()| "ANIMAL");

    let err = registry.declare(key("Animal"), [key("Puppy")]).unwrap_err();
    assert!(matches!(err, RegisterError::Hierarchy(HierarchyError::Cycle { .. })));

    let err = registry
        .declare(key("Mutt"), [key("Dog"), key("Dog")])
        .unwrap_err();
    assert_eq!(
        err,
        RegisterError::Hierarchy(HierarchyError::DuplicateParent {
            ty: key("Mutt"),
            parent: key("Dog"),
        })
    );

    let err = registry.declare(TypeKey::root(), [key("Animal")]).unwrap_err();
    assert_eq!(err, RegisterError::Hierarchy(HierarchyError::RootDeclared));

    // Animal before Dog contradicts Dog's own order.
    let err = registry
        .declare(key("Chimera"), [key("Animal"), key("Dog")])
        .unwrap_err();
    assert!(matches!(
        err,
        RegisterError::Hierarchy(HierarchyError::Inconsistent { .. })
    ));

    assert_eq!(registry.dispatch(&Value::object("Puppy"), ()), "ANIMAL");
    assert_eq!(registry.dispatch(&Value::object("Mutt"), ()), "OTHER");
}

#[test]
fn test_hierarchy_errors_convert_into_singlet_error() {
    fn build() -> Result<usize, SingletError> {
        let hierarchy = HierarchyBuilder::new()
            .declare(key("A"), [key("B")])
            .declare(key("B"), [key("A")])
            .build()?;
        Ok(hierarchy.len())
    }

    let err = build().unwrap_err();
    assert!(matches!(err, SingletError::Hierarchy(HierarchyError::Cycle { .. })));
    assert!(err.to_string().starts_with("hierarchy error: "));

    fn register() -> Result<(), SingletError> {
        let registry: DispatchRegistry<Value, (), ()> = DispatchRegistry::new(|_, ()| ());
        registry.register_erased(key("A"), Box::new(0u8))?;
        Ok(())
    }

    let err = register().unwrap_err();
    assert!(matches!(
        err,
        SingletError::Register(RegisterError::MalformedHandler { .. })
    ));
}
