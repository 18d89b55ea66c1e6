//! # Implementations
//!
//! A [`Handler`] is one type-specific implementation of a dispatched
//! operation: a shared closure taking the dispatched value and the remaining
//! arguments.
//!
//! - `V` is the view of the dispatched value (`dyn Dispatchable`, or a
//!   concrete value type such as an interpreter `Value`).
//! - `A` is everything else the operation takes; use a tuple for several
//!   arguments and `()` for none.
//! - `R` is the result. Fallible operations use a `Result` here; the
//!   registry hands it back untouched.
//!
//! Handlers are reference counted. Cloning one is cheap and keeps its
//! identity, which [`Handler::ptr_eq`] observes.

use std::{fmt, sync::Arc};

/// A shared, type-erased implementation.
pub struct Handler<V: ?Sized, A, R> {
    func: Arc<dyn Fn(&V, A) -> R + Send + Sync>,
}

impl<V: ?Sized, A, R> Handler<V, A, R> {
    /// Wrap a closure or function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&V, A) -> R + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Invoke the implementation.
    #[inline]
    pub fn call(&self, value: &V, args: A) -> R {
        (self.func)(value, args)
    }

    /// Whether both handlers are the same implementation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.func, &b.func)
    }
}

impl<V: ?Sized, A, R> Clone for Handler<V, A, R> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<V: ?Sized, A, R> fmt::Debug for Handler<V, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("func", &Arc::as_ptr(&self.func))
            .finish()
    }
}
