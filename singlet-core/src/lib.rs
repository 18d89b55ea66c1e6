//! # singlet-core
//!
//! Core types for the Singlet single-dispatch registry.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! plugins that declare types or provide implementations without pulling in
//! the registry itself.
//!
//! # Pieces
//!
//! ## Identity ([`TypeKey`], [`Dispatchable`])
//!
//! Every dispatched value reports a [`TypeKey`]. Rust types get one for free
//! through the default [`Dispatchable::type_key`]; runtime-only types (script
//! classes, plugin kinds) use [`TypeKey::named`].
//!
//! ## Ancestry ([`HierarchyBuilder`], [`TypeHierarchy`])
//!
//! Parent lists are supplied as data and linearized with the C3 merge, giving
//! each type a deterministic most-specific-first order of ancestors.
//!
//! ## Implementations ([`Handler`])
//!
//! Shared closures taking the dispatched value and the remaining arguments.
//!
//! # Error Types
//!
//! - [`SingletError`] - Top-level error type
//! - [`RegisterError`] - Registration errors
//! - [`HierarchyError`] - Hierarchy validation errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatchable;
mod error;
mod handler;
mod hierarchy;
mod key;

// Re-exports
pub use dispatchable::Dispatchable;
pub use error::{BoxError, HierarchyError, RegisterError, SingletError};
pub use handler::Handler;
pub use hierarchy::{HierarchyBuilder, Linearization, TypeHierarchy};
pub use key::TypeKey;
