//! # singlet-std
//!
//! Standard implementations for the Singlet single-dispatch framework.
//!
//! This crate provides:
//! - **Registry**: [`DispatchRegistry`], [`RegistryBuilder`], [`create_registry`]
//! - **Caching**: [`ResolutionCache`]
//! - **Presets**: the primitive numeric hierarchy
//! - **Plugins**: `inventory`-based collection of declarations and implementations
//! - **Testing**: recording and counting handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use singlet_core;

// Modules
pub mod cache;
#[cfg(feature = "inventory")]
pub mod plugin;
pub mod presets;
pub mod registry;
pub mod testing;

pub use cache::ResolutionCache;
pub use registry::{DispatchRegistry, RegistryBuilder, create_registry};

#[cfg(feature = "inventory")]
pub use inventory;
