//! Join-semilattice trait for values that converge by merging
//!
//! Joins must be commutative, associative and idempotent, so siblings of
//! one object can be folded in any order, any number of times, and still
//! land on the same value.

/// State-based CRDT trait.
pub trait Lattice: Clone + PartialEq {
    /// Identity for join.
    fn bottom() -> Self;

    /// Least upper bound of two replicas.
    fn join(&self, other: &Self) -> Self;

    /// Fold any number of replicas into one value, starting from bottom.
    fn join_all<'a, I>(replicas: I) -> Self
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        replicas.into_iter().fold(Self::bottom(), |acc, r| acc.join(r))
    }
}
