//! Unordered collections of distinct literals.

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, Hash, Hasher};

use hashbrown::DefaultHashBuilder;
use hashbrown::hash_table::{Entry, HashTable};

use crate::Literal;

/// Hashes a literal by its canonical bytes alone.
struct Canonical<'a>(&'a Literal);

impl Hash for Canonical<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_canonical(state)
    }
}

#[inline]
fn canonical_hash<S: BuildHasher>(hasher: &S, literal: &Literal) -> u64 {
    hasher.hash_one(Canonical(literal))
}

/// A set of distinct [`Literal`]s.
///
/// Members are bucketed by a hash of their canonical bytes, which ignores the literal kind, and
/// membership is always confirmed with [`Literal`] equality. Literals of different kinds that
/// happen to share a canonical encoding therefore land in the same bucket but remain distinct
/// members.
///
/// Iteration order is unspecified.
#[derive(Clone)]
pub struct LiteralSet<S = DefaultHashBuilder> {
    table: HashTable<Literal>,
    hasher: S,
}

impl LiteralSet {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl Default for LiteralSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> LiteralSet<S> {
    /// Create an empty set that hashes canonical bytes with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: HashTable::new(),
            hasher,
        }
    }

    /// Insert every literal of `literals`, skipping those already present.
    pub fn add(&mut self, literals: impl IntoIterator<Item = Literal>) {
        for literal in literals {
            self.add_one(literal);
        }
    }

    /// Insert `literal`, returning whether it was not already a member.
    pub fn add_one(&mut self, literal: Literal) -> bool {
        let hash = canonical_hash(&self.hasher, &literal);
        let hasher = &self.hasher;
        match self
            .table
            .entry(hash, |m| m == &literal, |m| canonical_hash(hasher, m))
        {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(literal);
                true
            }
        }
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.table
            .find(canonical_hash(&self.hasher, literal), |m| m == literal)
            .is_some()
    }

    /// A snapshot of the members, in unspecified order.
    pub fn members(&self) -> Vec<Literal> {
        self.table.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether `predicate` holds for every member, stopping at the first that fails.
    ///
    /// An empty set satisfies any predicate.
    pub fn all<F: FnMut(&Literal) -> bool>(&self, predicate: F) -> bool {
        self.table.iter().all(predicate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.table.iter()
    }
}

impl<S: BuildHasher> PartialEq for LiteralSet<S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.all(|m| other.contains(m))
    }
}

impl<S: BuildHasher> Eq for LiteralSet<S> {}

impl<S> Debug for LiteralSet<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}

impl<S: BuildHasher + Default> FromIterator<Literal> for LiteralSet<S> {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.add(iter);
        set
    }
}

impl<S: BuildHasher> Extend<Literal> for LiteralSet<S> {
    fn extend<T: IntoIterator<Item = Literal>>(&mut self, iter: T) {
        self.add(iter);
    }
}

impl<'a, S> IntoIterator for &'a LiteralSet<S> {
    type Item = &'a Literal;
    type IntoIter = hashbrown::hash_table::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}
