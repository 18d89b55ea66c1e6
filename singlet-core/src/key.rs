//! Runtime type identity.
//!
//! A [`TypeKey`] names a type at runtime. Native keys wrap a Rust [`TypeId`];
//! named keys wrap a string and let types that only exist at runtime (script
//! classes, plugin-defined kinds) take part in dispatch.

use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// The universal base every linearization ends with.
enum Root {}

#[derive(Clone)]
enum Repr {
    Native { id: TypeId, name: &'static str },
    Named(Arc<str>),
}

/// Identity of a type, used as the key for registrations and cache entries.
///
/// # Example
///
/// ```rust,ignore
/// let int = TypeKey::of::<i64>();
/// let dog = TypeKey::named("Dog");
/// assert_ne!(int, dog);
/// ```
#[derive(Clone)]
pub struct TypeKey(Repr);

impl TypeKey {
    /// Key of the Rust type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Repr::Native {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        })
    }

    /// Key of a runtime-only type identified by `name`.
    ///
    /// Two named keys are equal when their names are equal. A named key is
    /// never equal to a native key.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self(Repr::Named(name.into()))
    }

    /// The universal root type.
    pub fn root() -> Self {
        Self(Repr::Native {
            id: TypeId::of::<Root>(),
            name: "root",
        })
    }

    /// Whether this is the universal root.
    pub fn is_root(&self) -> bool {
        matches!(self.0, Repr::Native { id, .. } if id == TypeId::of::<Root>())
    }

    /// Human readable name of the type.
    pub fn name(&self) -> &str {
        match &self.0 {
            Repr::Native { name, .. } => name,
            Repr::Named(name) => name,
        }
    }

    /// The underlying [`TypeId`] for native keys.
    pub fn type_id(&self) -> Option<TypeId> {
        match self.0 {
            Repr::Native { id, .. } => Some(id),
            Repr::Named(_) => None,
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Native { id: a, .. }, Repr::Native { id: b, .. }) => a == b,
            (Repr::Named(a), Repr::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Repr::Native { id, .. } => {
                state.write_u8(0);
                id.hash(state);
            }
            Repr::Named(name) => {
                state.write_u8(1);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name())
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}
