//! # singlet - Single Dispatch for Rust
//!
//! `singlet` selects one of several type-specific implementations of an
//! operation from the runtime type of its first argument. Ancestry is
//! explicit data, linearized with C3, so subtypes (including types that only
//! exist at runtime) fall back to the most specific registered ancestor, and
//! to a mandatory default when there is none.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use singlet::prelude::*;
//!
//! let registry: DispatchRegistry<dyn Dispatchable, (), String> =
//!     DispatchRegistry::with_hierarchy(|_, ()| "OTHER".into(), presets::builtin_hierarchy());
//!
//! registry.register_for::<i64, _>(|_, ()| "INT".into());
//! registry.register_for::<String, _>(|_, ()| "STR".into());
//!
//! assert_eq!(registry.dispatch(&5i64, ()), "INT");
//! assert_eq!(registry.dispatch(&true, ()), "INT"); // bool <: i64
//! assert_eq!(registry.dispatch(&2.5f64, ()), "OTHER");
//! ```
//!
//! ## Features
//!
//! - `tracing`: log registrations, declarations and resolutions
//! - `inventory`: link-time collection of declarations and implementations
//! - `macros`: `#[derive(Dispatchable)]` and `#[implementation]`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use singlet_core::{
    // Error types
    BoxError,
    // Identity
    Dispatchable,
    // Implementations
    Handler,
    HierarchyBuilder,
    HierarchyError,
    // Hierarchy
    Linearization,
    RegisterError,
    SingletError,
    TypeHierarchy,
    TypeKey,
};

// Registry
pub use singlet_std::{DispatchRegistry, RegistryBuilder, ResolutionCache, create_registry};

/// Pre-configured hierarchies.
pub mod presets {
    pub use singlet_std::presets::{Integer, Number, Real, builtin, builtin_hierarchy};
}

/// Testing utilities.
pub mod testing {
    pub use singlet_std::testing::{CountingHandler, RecordingHandler, constant};
}

/// Link-time collection of declarations and implementations.
#[cfg(feature = "inventory")]
pub mod plugin {
    pub use singlet_std::plugin::{
        CollectDeclarations, HandlerSubmission, TypeDeclaration, submission_count,
    };
}

/// Prelude module - common imports for Singlet.
///
/// # Usage
///
/// ```rust,ignore
/// use singlet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DispatchRegistry, Dispatchable, Handler, HierarchyBuilder, RegisterError, TypeHierarchy,
        TypeKey, create_registry, presets,
    };

    #[cfg(feature = "inventory")]
    pub use crate::plugin::CollectDeclarations;
}

#[cfg(feature = "macros")]
pub use singlet_macros::{Dispatchable, implementation};

#[cfg(feature = "inventory")]
pub use inventory;
