#![allow(dead_code)]

use singlet::{Dispatchable, HierarchyBuilder, TypeHierarchy, TypeKey};

// ============================================================================
// Dynamic Value Model
// ============================================================================

/// A small dynamically typed value, the way a script interpreter holds one.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Dict(Vec<(String, Value)>),
    Object { class: TypeKey },
}

impl Value {
    pub fn object(class: &str) -> Self {
        Value::Object {
            class: TypeKey::named(class),
        }
    }
}

impl Dispatchable for Value {
    fn type_key(&self) -> TypeKey {
        match self {
            Value::None => TypeKey::named("NoneType"),
            Value::Bool(_) => TypeKey::named("bool"),
            Value::Int(_) => TypeKey::named("int"),
            Value::Float(_) => TypeKey::named("float"),
            Value::Str(_) => TypeKey::named("str"),
            Value::List(_) => TypeKey::named("list"),
            Value::Dict(_) => TypeKey::named("dict"),
            Value::Object { class } => class.clone(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Dict(items) => {
                f.write_str("{")?;
                for (i, (k, v)) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Object { class } => write!(f, "<{class} object>"),
        }
    }
}

/// The script-level hierarchy: `bool` is an `int`, and a small zoo.
pub fn script_hierarchy() -> TypeHierarchy {
    HierarchyBuilder::new()
        .declare(TypeKey::named("bool"), [TypeKey::named("int")])
        .declare(TypeKey::named("Dog"), [TypeKey::named("Animal")])
        .declare(TypeKey::named("Cat"), [TypeKey::named("Animal")])
        .declare(TypeKey::named("Puppy"), [TypeKey::named("Dog")])
        .build()
        .unwrap()
}

pub fn key(name: &str) -> TypeKey {
    TypeKey::named(name)
}

/// Route registry logs to the test writer. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("singlet_std=debug")
        .with_test_writer()
        .try_init();
}
