//! # Type Hierarchy Resolver
//!
//! Rust has no class graph, so the ancestry used for dispatch is supplied as
//! data: every type lists its parents explicitly, most important first. The
//! resolver turns that data into a *linearization* per type, the total order
//! (most specific first) in which registered implementations are considered.
//!
//! # Ordering
//!
//! Linearizations are computed with the C3 merge:
//!
//! - a type always precedes its parents;
//! - parents keep the order they were declared in;
//! - every parent's own linearization is preserved as a subsequence.
//!
//! Diamonds therefore resolve the same way every time, and hierarchies for
//! which no such order exists are rejected when the hierarchy is built.
//!
//! A type that was never declared has the implicit parent list `[root]`, so
//! its linearization is `[ty, root]`. Relationships that some languages grant
//! implicitly (a boolean being an integer) have to be declared.
//!
//! # Example
//!
//! ```rust,ignore
//! let animal = TypeKey::named("Animal");
//! let dog = TypeKey::named("Dog");
//!
//! let hierarchy = HierarchyBuilder::new()
//!     .declare(dog.clone(), [animal.clone()])
//!     .build()?;
//!
//! assert_eq!(hierarchy.linearize(&dog).to_vec(), vec![dog, animal, TypeKey::root()]);
//! ```

use crate::{error::HierarchyError, key::TypeKey};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::{ops::Deref, sync::Arc};

/// The ordered ancestry of one type, most specific first.
///
/// Always starts with the type itself and ends with [`TypeKey::root`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Linearization(Arc<[TypeKey]>);

impl Linearization {
    fn implicit(ty: &TypeKey) -> Self {
        if ty.is_root() {
            Self(Arc::from([TypeKey::root()]))
        } else {
            Self(Arc::from([ty.clone(), TypeKey::root()]))
        }
    }
}

impl Deref for Linearization {
    type Target = [TypeKey];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Linearization {
    type Item = &'a TypeKey;
    type IntoIter = std::slice::Iter<'a, TypeKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builder for a [`TypeHierarchy`].
///
/// Declarations may arrive in any order and may mention parents that are
/// declared later. Declaring a type again replaces its parent list.
#[derive(Clone, Debug, Default)]
pub struct HierarchyBuilder {
    parents: IndexMap<TypeKey, Vec<TypeKey>>,
}

impl HierarchyBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `ty` with the given parents, most important first.
    pub fn declare(mut self, ty: TypeKey, parents: impl IntoIterator<Item = TypeKey>) -> Self {
        self.insert(ty, parents);
        self
    }

    /// Non-consuming form of [`declare`](Self::declare).
    pub fn insert(&mut self, ty: TypeKey, parents: impl IntoIterator<Item = TypeKey>) {
        self.parents.insert(ty, parents.into_iter().collect());
    }

    /// Whether `ty` has been declared.
    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.parents.contains_key(ty)
    }

    /// Validate every declaration and compute all linearizations.
    pub fn build(self) -> Result<TypeHierarchy, HierarchyError> {
        let mut parents = IndexMap::with_capacity(self.parents.len());
        for (ty, list) in self.parents {
            let list = validate(&ty, list)?;
            parents.insert(ty, list);
        }

        let mut resolver = Resolver::new(&parents, FxHashMap::default());
        for ty in parents.keys() {
            resolver.resolve(ty)?;
        }
        let linearizations = resolver.done;

        let mut children: FxHashMap<TypeKey, Vec<TypeKey>> = FxHashMap::default();
        for (ty, list) in &parents {
            for parent in list.iter() {
                children.entry(parent.clone()).or_default().push(ty.clone());
            }
        }

        Ok(TypeHierarchy {
            parents,
            linearizations,
            children,
        })
    }
}

/// Checks one declaration and normalizes an empty parent list to `[root]`.
fn validate(ty: &TypeKey, list: Vec<TypeKey>) -> Result<Arc<[TypeKey]>, HierarchyError> {
    if ty.is_root() {
        return Err(HierarchyError::RootDeclared);
    }
    for (i, parent) in list.iter().enumerate() {
        if parent == ty {
            return Err(HierarchyError::Cycle { ty: ty.clone() });
        }
        if list[..i].contains(parent) {
            return Err(HierarchyError::DuplicateParent {
                ty: ty.clone(),
                parent: parent.clone(),
            });
        }
    }
    Ok(if list.is_empty() {
        Arc::from([TypeKey::root()])
    } else {
        list.into()
    })
}

/// A validated type hierarchy with precomputed linearizations.
///
/// Immutable once built; cheap to share behind an `Arc` and safe to query
/// from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct TypeHierarchy {
    parents: IndexMap<TypeKey, Arc<[TypeKey]>>,
    linearizations: FxHashMap<TypeKey, Linearization>,
    children: FxHashMap<TypeKey, Vec<TypeKey>>,
}

/// Two hierarchies are equal when they declare the same parents and hence
/// the same linearizations.
impl PartialEq for TypeHierarchy {
    fn eq(&self, other: &Self) -> bool {
        self.parents == other.parents && self.linearizations == other.linearizations
    }
}

impl Eq for TypeHierarchy {}

impl TypeHierarchy {
    /// The linearization of `ty`, most specific first.
    pub fn linearize(&self, ty: &TypeKey) -> Linearization {
        self.linearizations
            .get(ty)
            .cloned()
            .unwrap_or_else(|| Linearization::implicit(ty))
    }

    /// The declared parents of `ty`, if it was declared.
    pub fn parents(&self, ty: &TypeKey) -> Option<&[TypeKey]> {
        self.parents.get(ty).map(|p| &**p)
    }

    /// Whether `sub` is `sup` or one of its descendants.
    pub fn is_subtype(&self, sub: &TypeKey, sup: &TypeKey) -> bool {
        sub == sup || sup.is_root() || self.linearize(sub).contains(sup)
    }

    /// Declared types in declaration order.
    pub fn declared_types(&self) -> impl Iterator<Item = &TypeKey> {
        self.parents.keys()
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether no type has been declared.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// A builder holding this hierarchy's declarations, for extension.
    pub fn to_builder(&self) -> HierarchyBuilder {
        HierarchyBuilder {
            parents: self
                .parents
                .iter()
                .map(|(ty, parents)| (ty.clone(), parents.to_vec()))
                .collect(),
        }
    }

    /// A copy of this hierarchy with `ty` declared with the given parents.
    ///
    /// Replaces an earlier declaration of `ty`. Only `ty` and the types below
    /// it are linearized again; every other linearization is shared with
    /// `self`. Fails with the same errors as [`HierarchyBuilder::build`].
    pub fn with_declaration(
        &self,
        ty: TypeKey,
        parents: impl IntoIterator<Item = TypeKey>,
    ) -> Result<TypeHierarchy, HierarchyError> {
        let list = validate(&ty, parents.into_iter().collect())?;
        let affected = self.descendants(&ty);

        let mut declared = self.parents.clone();
        let previous = declared.insert(ty.clone(), Arc::clone(&list));

        let mut done = self.linearizations.clone();
        for stale in &affected {
            done.remove(stale);
        }
        let mut resolver = Resolver::new(&declared, done);
        for target in &affected {
            resolver.resolve(target)?;
        }
        let linearizations = resolver.done;

        let mut children = self.children.clone();
        for parent in previous.iter().flat_map(|p| p.iter()) {
            if let Some(siblings) = children.get_mut(parent) {
                siblings.retain(|child| *child != ty);
            }
        }
        for parent in list.iter() {
            children.entry(parent.clone()).or_default().push(ty.clone());
        }

        Ok(TypeHierarchy {
            parents: declared,
            linearizations,
            children,
        })
    }

    /// `ty` followed by every declared type below it, parents before
    /// children along each discovery path.
    fn descendants(&self, ty: &TypeKey) -> Vec<TypeKey> {
        let mut seen = FxHashSet::default();
        seen.insert(ty.clone());
        let mut out = vec![ty.clone()];
        let mut next = 0;
        while next < out.len() {
            let current = out[next].clone();
            next += 1;
            for child in self.children.get(&current).into_iter().flatten() {
                if seen.insert(child.clone()) {
                    out.push(child.clone());
                }
            }
        }
        out
    }
}

/// Depth-first linearization over an explicit stack, so deep chains do not
/// exhaust the thread stack.
struct Resolver<'a> {
    parents: &'a IndexMap<TypeKey, Arc<[TypeKey]>>,
    done: FxHashMap<TypeKey, Linearization>,
    visiting: FxHashSet<TypeKey>,
}

impl<'a> Resolver<'a> {
    fn new(
        parents: &'a IndexMap<TypeKey, Arc<[TypeKey]>>,
        done: FxHashMap<TypeKey, Linearization>,
    ) -> Self {
        Self {
            parents,
            done,
            visiting: FxHashSet::default(),
        }
    }

    fn pending(&self, ty: &TypeKey) -> bool {
        !self.done.contains_key(ty) && self.parents.contains_key(ty)
    }

    fn resolve(&mut self, ty: &TypeKey) -> Result<(), HierarchyError> {
        if !self.pending(ty) {
            return Ok(());
        }
        let declared = self.parents;
        self.visiting.insert(ty.clone());
        let mut stack: Vec<(&TypeKey, usize)> = vec![(ty, 0)];

        while let Some(top) = stack.last_mut() {
            let (current, next) = (top.0, top.1);
            let list = &declared[current];
            match list.get(next) {
                Some(parent) => {
                    top.1 += 1;
                    if !self.pending(parent) {
                        continue;
                    }
                    if !self.visiting.insert(parent.clone()) {
                        return Err(HierarchyError::Cycle { ty: parent.clone() });
                    }
                    stack.push((parent, 0));
                }
                None => {
                    stack.pop();
                    self.visiting.remove(current);
                    let lin = self.linearize(current, list)?;
                    self.done.insert(current.clone(), lin);
                }
            }
        }
        Ok(())
    }

    /// Merge the finished linearizations of `ty`'s parents.
    fn linearize(
        &self,
        ty: &TypeKey,
        parents: &[TypeKey],
    ) -> Result<Linearization, HierarchyError> {
        let lins: Vec<Linearization> = parents
            .iter()
            .map(|p| {
                self.done
                    .get(p)
                    .cloned()
                    .unwrap_or_else(|| Linearization::implicit(p))
            })
            .collect();
        let mut seqs: Vec<&[TypeKey]> = lins.iter().map(|lin| &lin[..]).collect();
        seqs.push(parents);
        Ok(Linearization(merge(ty, seqs)?.into()))
    }
}

/// C3 merge of the parents' linearizations and the local parent order.
///
/// `tails` counts how often each type occurs past the head of a sequence, so
/// picking the next head costs one pass over the sequences.
fn merge(ty: &TypeKey, mut seqs: Vec<&[TypeKey]>) -> Result<Vec<TypeKey>, HierarchyError> {
    let mut tails: FxHashMap<&TypeKey, usize> = FxHashMap::default();
    for seq in &seqs {
        for t in seq.iter().skip(1) {
            *tails.entry(t).or_default() += 1;
        }
    }

    let mut out = vec![ty.clone()];
    loop {
        seqs.retain(|seq| !seq.is_empty());
        if seqs.is_empty() {
            return Ok(out);
        }

        // First head that does not appear in the tail of any sequence.
        let head = seqs
            .iter()
            .map(|seq| &seq[0])
            .find(|candidate| tails.get(*candidate).is_none_or(|&n| n == 0))
            .cloned()
            .ok_or_else(|| HierarchyError::Inconsistent { ty: ty.clone() })?;

        for seq in &mut seqs {
            if seq[0] == head {
                let rest = *seq;
                *seq = &rest[1..];
                if let Some(n) = seq.first().and_then(|next| tails.get_mut(next)) {
                    *n -= 1;
                }
            }
        }
        out.push(head);
    }
}
