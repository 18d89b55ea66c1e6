//! Resolution cache.
//!
//! Memoizes, per concrete type, which implementation dispatch chose.
//!
//! Entries live in two tiers. The published map sits behind an [`ArcSwap`],
//! and a hit there is a wait-free pointer load. New resolutions go into a
//! small pending map under a mutex. Once the pending map holds as many
//! entries as the published one, both are merged into a fresh published map.
//! The published map at least doubles on every merge, so filling the cache
//! with `n` types copies O(n) entries in total.
//!
//! A resolution is stable for the lifetime of a cache: putting a type that is
//! already cached keeps the first entry. Two threads missing on the same type
//! both resolve it and store the same answer.

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use singlet_core::TypeKey;
use std::sync::Arc;

/// Pending entries are merged no earlier than this.
const MIN_BATCH: usize = 32;

/// A concurrent map from concrete type to resolved implementation.
pub struct ResolutionCache<H> {
    published: ArcSwap<FxHashMap<TypeKey, H>>,
    pending: Mutex<FxHashMap<TypeKey, H>>,
}

impl<H: Clone> ResolutionCache<H> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            published: ArcSwap::from_pointee(FxHashMap::default()),
            pending: Mutex::new(FxHashMap::default()),
        }
    }

    /// The cached resolution for `ty`, if any.
    pub fn get(&self, ty: &TypeKey) -> Option<H> {
        if let Some(resolved) = self.published.load().get(ty) {
            return Some(resolved.clone());
        }
        self.pending.lock().get(ty).cloned()
    }

    /// Record the resolution for `ty`.
    pub fn put(&self, ty: TypeKey, resolved: H) {
        let mut pending = self.pending.lock();
        let published = self.published.load();
        if published.contains_key(&ty) {
            return;
        }
        pending.entry(ty).or_insert(resolved);

        if pending.len() >= published.len().max(MIN_BATCH) {
            let mut merged = FxHashMap::default();
            merged.reserve(published.len() + pending.len());
            merged.extend(published.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged.extend(pending.drain());
            self.published.store(Arc::new(merged));
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut pending = self.pending.lock();
        pending.clear();
        self.published.store(Arc::new(FxHashMap::default()));
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        let pending = self.pending.lock();
        self.published.load().len() + pending.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: Clone> Default for ResolutionCache<H> {
    fn default() -> Self {
        Self::new()
    }
}
