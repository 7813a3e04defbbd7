use std::collections::BTreeMap;

use rand::Rng;

use crate::{
    expression::{BoxedExpr, ExprKind, Expression},
    types::TopoHash,
};

/// Deduplicating set of live expressions keyed by topological hash.
///
/// Keys are ordered, so sampling with a seeded generator is reproducible.
#[derive(Debug, Default)]
pub struct Frontier {
    members: BTreeMap<TopoHash, BoxedExpr>,
}

impl Frontier {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn len(&self) -> usize { self.members.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    #[must_use]
    pub fn contains(&self, key: &TopoHash) -> bool { self.members.contains_key(key) }

    /// Store `expr` unless a structurally identical member is already live.
    /// A rejected candidate is dropped.
    pub fn try_insert(&mut self, expr: BoxedExpr) -> bool {
        let key = expr.topological_hash();
        if self.members.contains_key(&key) {
            return false;
        }
        self.members.insert(key, expr);
        true
    }

    /// Uniformly chosen key, `None` when empty.
    pub fn sample_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TopoHash> {
        if self.members.is_empty() {
            return None;
        }
        let n = rng.gen_range(0..self.members.len());
        self.members.keys().nth(n).copied()
    }

    /// Uniformly chosen member, `None` when empty.
    pub fn sample_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&dyn Expression> {
        let key = self.sample_key(rng)?;
        self.get(&key)
    }

    #[must_use]
    pub fn get(&self, key: &TopoHash) -> Option<&dyn Expression> {
        self.members.get(key).map(|e| &**e)
    }

    pub fn get_mut(&mut self, key: &TopoHash) -> Option<&mut BoxedExpr> {
        self.members.get_mut(key)
    }

    /// Detach the member stored under `key`.
    pub fn take(&mut self, key: &TopoHash) -> Option<BoxedExpr> {
        self.members.remove(key)
    }

    /// Drop the member whose key is `expr`'s current topological hash.
    pub fn remove(&mut self, expr: &dyn Expression) -> bool {
        self.members.remove(&expr.topological_hash()).is_some()
    }

    /// Drop every member whose outermost node is of `kind`; returns how many went.
    pub fn remove_kind(&mut self, kind: ExprKind) -> usize {
        let before = self.members.len();
        self.members.retain(|_, e| e.kind() != kind);
        before - self.members.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TopoHash, &dyn Expression)> {
        self.members.iter().map(|(k, e)| (k, &**e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BoxedExpr> {
        self.members.values_mut()
    }
}
