//! # Link-time Collection using Inventory
//!
//! Plugins declare types and provide implementations without access to the
//! registry that will use them. Both are submitted to `inventory` and pulled
//! into an explicit hierarchy or registry by the host.
//!
//! # Example
//!
//! ```rust,ignore
//! inventory::submit! {
//!     TypeDeclaration {
//!         ty: || TypeKey::named("Dog"),
//!         parents: || vec![TypeKey::named("Animal")],
//!     }
//! }
//!
//! let hierarchy = HierarchyBuilder::new().with_collected().build()?;
//! let registry = DispatchRegistry::with_hierarchy(default, hierarchy);
//! registry.register_collected("describe")?;
//! ```
//!
//! The `#[derive(Dispatchable)]` and `#[implementation]` macros generate
//! these submissions.

use crate::registry::DispatchRegistry;
use singlet_core::{HierarchyBuilder, RegisterError, TypeKey};
use std::any::Any;

/// A type declaration submitted by a plugin.
pub struct TypeDeclaration {
    /// The declared type.
    pub ty: fn() -> TypeKey,
    /// Its parents, most important first.
    pub parents: fn() -> Vec<TypeKey>,
}

inventory::collect!(TypeDeclaration);

/// An implementation submitted by a plugin for a named registry.
pub struct HandlerSubmission {
    /// Name of the registry the implementation belongs to.
    pub registry: &'static str,
    /// The type the implementation is declared for.
    pub declared: fn() -> TypeKey,
    /// Produces the boxed `Handler<V, A, R>`.
    pub handler: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(HandlerSubmission);

/// Adds every submitted [`TypeDeclaration`] to a hierarchy builder.
pub trait CollectDeclarations {
    /// Declare every collected type.
    fn with_collected(self) -> Self;
}

impl CollectDeclarations for HierarchyBuilder {
    fn with_collected(mut self) -> Self {
        for decl in inventory::iter::<TypeDeclaration>() {
            self.insert((decl.ty)(), (decl.parents)());
        }
        self
    }
}

/// Number of implementations submitted for `registry`.
pub fn submission_count(registry: &str) -> usize {
    inventory::iter::<HandlerSubmission>()
        .filter(|sub| sub.registry == registry)
        .count()
}

impl<V, A, R> DispatchRegistry<V, A, R>
where
    V: ?Sized + 'static,
    A: 'static,
    R: 'static,
{
    /// Register every implementation submitted for `name`.
    ///
    /// Returns how many were installed. Stops at the first submission whose
    /// handler does not match this registry's calling convention.
    pub fn register_collected(&self, name: &str) -> Result<usize, RegisterError> {
        let mut installed = 0;
        for sub in inventory::iter::<HandlerSubmission>().filter(|sub| sub.registry == name) {
            self.register_erased((sub.declared)(), (sub.handler)())?;
            installed += 1;
        }
        Ok(installed)
    }
}
