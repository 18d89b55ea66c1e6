//! Error types for Singlet.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SingletError`] - Top-level error type
//! - [`RegisterError`] - Errors while registering implementations
//! - [`HierarchyError`] - Errors while building a type hierarchy
//!
//! Errors raised by an implementation during dispatch are not represented
//! here: they are part of the implementation's own return type and reach the
//! caller untouched.

use crate::key::TypeKey;
use thiserror::Error;

/// A boxed error type for implementations that return dynamic errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Singlet operations.
#[derive(Error, Debug)]
pub enum SingletError {
    /// An implementation could not be registered.
    #[error("register error: {0}")]
    Register(#[from] RegisterError),

    /// A type hierarchy could not be built.
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur while registering into a dispatch registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The implementation cannot be invoked with the registry's calling
    /// convention.
    #[error("malformed handler for `{declared}`: expected `{expected}`")]
    MalformedHandler {
        /// The type the implementation was offered for.
        declared: TypeKey,
        /// The handler type the registry accepts.
        expected: &'static str,
    },

    /// A runtime type declaration was rejected.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// Errors that can occur while linearizing a type hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// The type is, directly or transitively, its own ancestor.
    #[error("type `{ty}` is its own ancestor")]
    Cycle {
        /// A type on the cycle.
        ty: TypeKey,
    },

    /// No ancestor order satisfies every local precedence constraint.
    #[error("cannot create a consistent linearization for `{ty}`")]
    Inconsistent {
        /// The type whose ancestors cannot be merged.
        ty: TypeKey,
    },

    /// A parent appears twice in one parent list.
    #[error("type `{ty}` lists parent `{parent}` more than once")]
    DuplicateParent {
        /// The declared type.
        ty: TypeKey,
        /// The repeated parent.
        parent: TypeKey,
    },

    /// The universal root was given parents.
    #[error("the root type cannot be declared")]
    RootDeclared,
}

impl From<BoxError> for SingletError {
    fn from(err: BoxError) -> Self {
        SingletError::Custom(err)
    }
}
