//! Pre-configured hierarchies for common use cases.
//!
//! Rust grants no subtype relationships between primitives, so the numeric
//! tower is spelled out here:
//!
//! ```text
//! bool  -> i64 -> Integer -> Real -> Number -> root
//! i8 .. i128, isize, u8 .. u128, usize -> Integer
//! f32, f64 -> Real
//! &'static str -> String
//! ```
//!
//! `bool` sits below `i64` so that an implementation registered for `i64`
//! also handles booleans unless `bool` has its own.

use singlet_core::{HierarchyBuilder, TypeHierarchy, TypeKey};
use std::sync::LazyLock;

/// Abstract marker for every number.
pub enum Number {}

/// Abstract marker for real numbers (integers and floats).
pub enum Real {}

/// Abstract marker for integers of any width.
pub enum Integer {}

/// A builder pre-loaded with the primitive hierarchy, for extension.
pub fn builtin() -> HierarchyBuilder {
    let integer = TypeKey::of::<Integer>;
    HierarchyBuilder::new()
        .declare(TypeKey::of::<Real>(), [TypeKey::of::<Number>()])
        .declare(integer(), [TypeKey::of::<Real>()])
        .declare(TypeKey::of::<bool>(), [TypeKey::of::<i64>()])
        .declare(TypeKey::of::<i8>(), [integer()])
        .declare(TypeKey::of::<i16>(), [integer()])
        .declare(TypeKey::of::<i32>(), [integer()])
        .declare(TypeKey::of::<i64>(), [integer()])
        .declare(TypeKey::of::<i128>(), [integer()])
        .declare(TypeKey::of::<isize>(), [integer()])
        .declare(TypeKey::of::<u8>(), [integer()])
        .declare(TypeKey::of::<u16>(), [integer()])
        .declare(TypeKey::of::<u32>(), [integer()])
        .declare(TypeKey::of::<u64>(), [integer()])
        .declare(TypeKey::of::<u128>(), [integer()])
        .declare(TypeKey::of::<usize>(), [integer()])
        .declare(TypeKey::of::<f32>(), [TypeKey::of::<Real>()])
        .declare(TypeKey::of::<f64>(), [TypeKey::of::<Real>()])
        .declare(TypeKey::of::<&'static str>(), [TypeKey::of::<String>()])
}

static BUILTIN: LazyLock<TypeHierarchy> = LazyLock::new(|| {
    builtin()
        .build()
        .expect("builtin hierarchy is acyclic and consistent")
});

/// The primitive hierarchy, built once per process.
pub fn builtin_hierarchy() -> TypeHierarchy {
    BUILTIN.clone()
}
