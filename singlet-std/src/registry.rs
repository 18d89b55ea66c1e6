//! # Dispatch Registry
//!
//! A [`DispatchRegistry`] owns the implementations of one operation, keyed by
//! the type they were declared for, plus a mandatory default. Dispatching a
//! value walks the linearization of the value's runtime type and invokes the
//! first registered implementation it meets, or the default.
//!
//! # Consistency
//!
//! All state (entries, hierarchy, default, resolution cache) lives in one
//! immutable snapshot behind an [`ArcSwap`]. Dispatch loads a snapshot once
//! and never takes a lock. Writers serialize on a mutex, build the next
//! snapshot with an empty cache, and publish it with a single store, so a
//! concurrent dispatch sees either the old mapping with its cache or the new
//! mapping with a fresh one, never a mix.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry: DispatchRegistry<dyn Dispatchable, (), String> =
//!     create_registry(|_, ()| "OTHER".to_string());
//! registry.register_for::<i64, _>(|_, ()| "INT".to_string());
//!
//! assert_eq!(registry.dispatch(&5i64, ()), "INT");
//! assert_eq!(registry.dispatch(&2.5f64, ()), "OTHER");
//! ```

use crate::cache::ResolutionCache;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use singlet_core::{Dispatchable, Handler, RegisterError, TypeHierarchy, TypeKey};
use std::{
    any::{Any, type_name},
    fmt,
    sync::Arc,
};

struct Snapshot<V: ?Sized, A, R> {
    entries: FxHashMap<TypeKey, Handler<V, A, R>>,
    default: Handler<V, A, R>,
    hierarchy: Arc<TypeHierarchy>,
    cache: ResolutionCache<Handler<V, A, R>>,
}

impl<V: ?Sized, A, R> Snapshot<V, A, R> {
    /// Scan the linearization of `ty` for the first registered type.
    fn lookup(&self, ty: &TypeKey) -> Handler<V, A, R> {
        for candidate in &self.hierarchy.linearize(ty) {
            if let Some(handler) = self.entries.get(candidate) {
                #[cfg(feature = "tracing")]
                tracing::trace!(ty = %ty, declared = %candidate, "resolved implementation");
                return handler.clone();
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(ty = %ty, "resolved to default implementation");
        self.default.clone()
    }

    /// The next snapshot, with an empty cache.
    fn next(
        &self,
        entries: FxHashMap<TypeKey, Handler<V, A, R>>,
        hierarchy: Arc<TypeHierarchy>,
    ) -> Self {
        Self {
            entries,
            default: self.default.clone(),
            hierarchy,
            cache: ResolutionCache::new(),
        }
    }
}

/// A single-dispatch registry.
///
/// - `V`: the view of the dispatched value (`dyn Dispatchable` or a concrete
///   [`Dispatchable`] type).
/// - `A`: the remaining arguments.
/// - `R`: the result of every implementation.
///
/// The registry is `Send + Sync`; share it by reference or with an `Arc`.
pub struct DispatchRegistry<V: ?Sized, A, R> {
    state: ArcSwap<Snapshot<V, A, R>>,
    write: Mutex<()>,
}

/// Create a registry with the given default implementation and no declared
/// type hierarchy.
pub fn create_registry<V, A, R, F>(default: F) -> DispatchRegistry<V, A, R>
where
    V: ?Sized,
    F: Fn(&V, A) -> R + Send + Sync + 'static,
{
    DispatchRegistry::new(default)
}

impl<V: ?Sized, A, R> DispatchRegistry<V, A, R> {
    /// Create a registry with the given default implementation.
    pub fn new<F>(default: F) -> Self
    where
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        Self::from_parts(Handler::new(default), TypeHierarchy::default(), FxHashMap::default())
    }

    /// Create a registry over an explicit type hierarchy.
    pub fn with_hierarchy<F>(default: F, hierarchy: TypeHierarchy) -> Self
    where
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        Self::from_parts(Handler::new(default), hierarchy, FxHashMap::default())
    }

    /// Start a [`RegistryBuilder`].
    pub fn builder<F>(default: F) -> RegistryBuilder<V, A, R>
    where
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        RegistryBuilder::new(default)
    }

    fn from_parts(
        default: Handler<V, A, R>,
        hierarchy: TypeHierarchy,
        entries: FxHashMap<TypeKey, Handler<V, A, R>>,
    ) -> Self {
        Self {
            state: ArcSwap::from_pointee(Snapshot {
                entries,
                default,
                hierarchy: Arc::new(hierarchy),
                cache: ResolutionCache::new(),
            }),
            write: Mutex::new(()),
        }
    }

    /// Register `implementation` for `declared`, replacing any previous one.
    ///
    /// Returns the replaced implementation. Always clears the resolution
    /// cache.
    pub fn register<F>(&self, declared: TypeKey, implementation: F) -> Option<Handler<V, A, R>>
    where
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        self.register_handler(declared, Handler::new(implementation))
    }

    /// Register `implementation` for the Rust type `T`.
    pub fn register_for<T, F>(&self, implementation: F) -> Option<Handler<V, A, R>>
    where
        T: ?Sized + 'static,
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        self.register(TypeKey::of::<T>(), implementation)
    }

    /// Register an existing handler, keeping its identity.
    pub fn register_handler(
        &self,
        declared: TypeKey,
        handler: Handler<V, A, R>,
    ) -> Option<Handler<V, A, R>> {
        let _guard = self.write.lock();
        let current = self.state.load_full();

        let mut entries = current.entries.clone();
        let replaced = entries.insert(declared.clone(), handler);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            declared = %declared,
            replaced = replaced.is_some(),
            "registered implementation"
        );

        self.state
            .store(Arc::new(current.next(entries, Arc::clone(&current.hierarchy))));
        replaced
    }

    /// Register a type-erased implementation.
    ///
    /// The box must hold a `Handler<V, A, R>` with exactly this registry's
    /// calling convention; anything else cannot be invoked and is rejected
    /// with [`RegisterError::MalformedHandler`], leaving the registry
    /// untouched.
    pub fn register_erased(
        &self,
        declared: TypeKey,
        implementation: Box<dyn Any + Send + Sync>,
    ) -> Result<Option<Handler<V, A, R>>, RegisterError>
    where
        V: 'static,
        A: 'static,
        R: 'static,
    {
        match implementation.downcast::<Handler<V, A, R>>() {
            Ok(handler) => Ok(self.register_handler(declared, *handler)),
            Err(_) => {
                let expected = type_name::<Handler<V, A, R>>();
                #[cfg(feature = "tracing")]
                tracing::warn!(declared = %declared, expected, "rejected malformed handler");
                Err(RegisterError::MalformedHandler { declared, expected })
            }
        }
    }

    /// Declare `ty` with the given parents in this registry's hierarchy.
    ///
    /// Replaces an earlier declaration of `ty`. Only `ty` and its descendants
    /// are linearized again; on error nothing changes. On success the
    /// resolution cache is cleared together with the hierarchy swap.
    pub fn declare(
        &self,
        ty: TypeKey,
        parents: impl IntoIterator<Item = TypeKey>,
    ) -> Result<(), RegisterError> {
        let _guard = self.write.lock();
        let current = self.state.load_full();

        let hierarchy = current.hierarchy.with_declaration(ty.clone(), parents)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            ty = %ty,
            parents = ?hierarchy.parents(&ty),
            "declared type"
        );

        self.state
            .store(Arc::new(current.next(current.entries.clone(), Arc::new(hierarchy))));
        Ok(())
    }

    /// Invoke the implementation chosen for the runtime type of `value`.
    ///
    /// Whatever the implementation returns, including errors, is returned
    /// as is.
    pub fn dispatch(&self, value: &V, args: A) -> R
    where
        V: Dispatchable,
    {
        self.resolve(&value.type_key()).call(value, args)
    }

    /// The implementation dispatch would choose for values of type `ty`.
    pub fn resolve(&self, ty: &TypeKey) -> Handler<V, A, R> {
        let snapshot = self.state.load();
        if let Some(handler) = snapshot.cache.get(ty) {
            return handler;
        }
        let handler = snapshot.lookup(ty);
        snapshot.cache.put(ty.clone(), handler.clone());
        handler
    }

    /// The declared types that currently have an implementation, sorted by
    /// name.
    pub fn implementations(&self) -> Vec<TypeKey> {
        let snapshot = self.state.load();
        let mut types: Vec<TypeKey> = snapshot.entries.keys().cloned().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types
    }

    /// Whether an implementation is registered for exactly `ty`.
    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.state.load().entries.contains_key(ty)
    }

    /// The implementation registered for exactly `ty`.
    pub fn get(&self, ty: &TypeKey) -> Option<Handler<V, A, R>> {
        self.state.load().entries.get(ty).cloned()
    }

    /// The default implementation.
    pub fn default_handler(&self) -> Handler<V, A, R> {
        self.state.load().default.clone()
    }

    /// The type hierarchy currently in use.
    pub fn hierarchy(&self) -> Arc<TypeHierarchy> {
        Arc::clone(&self.state.load().hierarchy)
    }

    /// Drop all cached resolutions without touching registrations.
    pub fn clear_cache(&self) {
        self.state.load().cache.clear();
    }

    /// Number of types with a cached resolution.
    pub fn cache_len(&self) -> usize {
        self.state.load().cache.len()
    }
}

impl<V: ?Sized, A, R> fmt::Debug for DispatchRegistry<V, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRegistry")
            .field("implementations", &self.implementations())
            .field("cached", &self.cache_len())
            .finish()
    }
}

/// Builder for constructing a [`DispatchRegistry`].
pub struct RegistryBuilder<V: ?Sized, A, R> {
    default: Handler<V, A, R>,
    hierarchy: TypeHierarchy,
    entries: FxHashMap<TypeKey, Handler<V, A, R>>,
}

impl<V: ?Sized, A, R> RegistryBuilder<V, A, R> {
    /// Create a builder with the given default implementation.
    pub fn new<F>(default: F) -> Self
    where
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        Self {
            default: Handler::new(default),
            hierarchy: TypeHierarchy::default(),
            entries: FxHashMap::default(),
        }
    }

    /// Use `hierarchy` for resolution.
    pub fn hierarchy(mut self, hierarchy: TypeHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Register an implementation.
    pub fn register<F>(self, declared: TypeKey, implementation: F) -> Self
    where
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        self.register_handler(declared, Handler::new(implementation))
    }

    /// Register an implementation for the Rust type `T`.
    pub fn register_for<T, F>(self, implementation: F) -> Self
    where
        T: ?Sized + 'static,
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        self.register(TypeKey::of::<T>(), implementation)
    }

    /// Register an existing handler.
    pub fn register_handler(mut self, declared: TypeKey, handler: Handler<V, A, R>) -> Self {
        self.entries.insert(declared, handler);
        self
    }

    /// Build the registry.
    pub fn build(self) -> DispatchRegistry<V, A, R> {
        DispatchRegistry::from_parts(self.default, self.hierarchy, self.entries)
    }
}
