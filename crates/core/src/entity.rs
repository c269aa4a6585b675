//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Menu items and order lines are entities: two values with the same fields but
/// different identifiers are different things.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
