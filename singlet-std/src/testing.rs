//! Testing utilities for Singlet.
//!
//! - [`RecordingHandler`]: records the runtime type of every value it sees
//! - [`CountingHandler`]: counts invocations
//! - [`constant`]: a handler that always returns the same result

use parking_lot::Mutex;
use singlet_core::{Dispatchable, Handler, TypeKey};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// Records the [`TypeKey`] of every value dispatched to its handlers.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new();
/// registry.register_handler(TypeKey::named("Animal"), recorder.handler("GENERIC"));
///
/// registry.dispatch(&dog, ());
/// assert_eq!(recorder.seen(), vec![TypeKey::named("Dog")]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingHandler {
    seen: Arc<Mutex<Vec<TypeKey>>>,
}

impl RecordingHandler {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that records the value's type and returns `result`.
    pub fn handler<V, A, R>(&self, result: R) -> Handler<V, A, R>
    where
        V: ?Sized + Dispatchable,
        R: Clone + Send + Sync + 'static,
    {
        let seen = Arc::clone(&self.seen);
        Handler::new(move |value: &V, _args: A| {
            seen.lock().push(value.type_key());
            result.clone()
        })
    }

    /// Types seen so far, in call order.
    pub fn seen(&self) -> Vec<TypeKey> {
        self.seen.lock().clone()
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// Counts invocations of its handlers.
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that bumps the counter and returns `result`.
    pub fn handler<V, A, R>(&self, result: R) -> Handler<V, A, R>
    where
        V: ?Sized,
        R: Clone + Send + Sync + 'static,
    {
        let count = Arc::clone(&self.count);
        Handler::new(move |_: &V, _args: A| {
            count.fetch_add(1, Ordering::SeqCst);
            result.clone()
        })
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

// ============================================================================
// Constant Handler
// ============================================================================

/// A handler that ignores its input and returns `result`.
pub fn constant<V, A, R>(result: R) -> Handler<V, A, R>
where
    V: ?Sized,
    R: Clone + Send + Sync + 'static,
{
    Handler::new(move |_: &V, _args: A| result.clone())
}
