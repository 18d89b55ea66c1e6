//! Dispatchable trait for values that carry a runtime type.

use crate::key::TypeKey;
use std::any::Any;

/// A value whose runtime type selects an implementation.
///
/// The default [`type_key`](Dispatchable::type_key) reports the Rust type of
/// the value. Values of a dynamic object model (an interpreter `Value` enum,
/// a plugin object) override it to report the key of their runtime class.
///
/// # Example
///
/// ```rust,ignore
/// struct Dog;
/// impl Dispatchable for Dog {}
///
/// enum Value { Int(i64), Object { class: TypeKey } }
/// impl Dispatchable for Value {
///     fn type_key(&self) -> TypeKey {
///         match self {
///             Value::Int(_) => TypeKey::named("int"),
///             Value::Object { class } => class.clone(),
///         }
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be dispatched on",
    label = "missing `Dispatchable` implementation",
    note = "Implement `Dispatchable` (or derive it) to report the value's runtime type."
)]
pub trait Dispatchable: Any + Send + Sync {
    /// The runtime type of this value.
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }
}

impl dyn Dispatchable {
    /// Returns `true` if the concrete Rust type of the value is `T`.
    pub fn is<T: Dispatchable>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Downcast to the concrete Rust type `T`.
    pub fn downcast_ref<T: Dispatchable>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}

macro_rules! impl_dispatchable {
    ($($ty:ty),* $(,)?) => {
        $(impl Dispatchable for $ty {})*
    };
}

impl_dispatchable!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

impl<T: Send + Sync + 'static> Dispatchable for Vec<T> {}
impl<T: Send + Sync + 'static> Dispatchable for Option<T> {}
