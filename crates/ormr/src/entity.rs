//! # Entity — Packed Generational Handles
//!
//! An [`Entity`] names a conceptual object but carries no data of its own; the
//! [`Registry`](crate::registry::Registry) maps entities to their components.
//!
//! ## Design: One Packed Word
//!
//! The handle is a single `u32` split into two fields:
//!
//! ```text
//! 31                    12 11          0
//! ┌───────────────────────┬────────────┐
//! │  index (20 bits)      │ generation │
//! └───────────────────────┴────────────┘
//! ```
//!
//! The *index* is a slot in the registry's entity table. The *generation*
//! counts how many times that slot has been recycled, so a handle kept past
//! its entity's destruction is detected instead of silently naming whatever
//! lives in the slot now:
//!
//! ```text
//! Entity(5v0)  ← handed out by create_entity
//! Entity(5v1)  ← the slot's next occupant after a destroy
//! ```
//!
//! A lookup with the stale `5v0` handle fails safely — the stored generation
//! no longer matches.
//!
//! Twelve generation bits bound how often one slot can be recycled before the
//! counter wraps: after 4096 destroys of the same index a sufficiently old
//! handle can alias a live entity again. That limit is accepted and not
//! handled specially.
//!
//! ## Comparison
//!
//! - **EnTT (C++)**: the same packed-integer scheme; this layout matches its
//!   20/12 split.
//! - **hecs / bevy_ecs**: same generational idea with wider (u32 + u32)
//!   fields.

use std::fmt;

const GENERATION_BITS: u32 = 12;
const GENERATION_MASK: u32 = (1 << GENERATION_BITS) - 1;
const INDEX_MASK: u32 = (1 << 20) - 1;

/// A lightweight handle to an entity in a [`Registry`](crate::registry::Registry).
///
/// Handles are minted by [`Registry::create_entity`](crate::registry::Registry::create_entity)
/// and cannot be constructed by callers — they can only be copied, compared,
/// hashed, and handed back. A handle is valid for the registry that produced
/// it, and only while its generation matches the registry's entity table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity(u32);

impl Entity {
    /// The null sentinel. Never equal to any handle a registry hands out, and
    /// never valid.
    pub const NULL: Entity = Entity(u32::MAX);

    /// Largest slot index a registry may occupy; the index space above it is
    /// reserved for [`Entity::NULL`].
    pub(crate) const MAX_INDEX: u32 = INDEX_MASK;

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self((index << GENERATION_BITS) | (generation & GENERATION_MASK))
    }

    /// The slot index in the registry's entity table.
    pub fn index(self) -> u32 {
        self.0 >> GENERATION_BITS
    }

    /// The recycle count of that slot at the time this handle was minted.
    pub fn generation(self) -> u32 {
        self.0 & GENERATION_MASK
    }

    /// Whether this is the [`Entity::NULL`] sentinel.
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// Same index, next generation. Wraps within the 12-bit field.
    pub(crate) fn bump_generation(self) -> Self {
        Self::new(self.index(), (self.generation() + 1) & GENERATION_MASK)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack() {
        let e = Entity::new(5, 3);
        assert_eq!(e.index(), 5);
        assert_eq!(e.generation(), 3);

        let max = Entity::new(INDEX_MASK - 1, GENERATION_MASK);
        assert_eq!(max.index(), INDEX_MASK - 1);
        assert_eq!(max.generation(), GENERATION_MASK);
    }

    #[test]
    fn same_index_different_generation_are_distinct() {
        let a = Entity::new(7, 0);
        let b = Entity::new(7, 1);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }

    #[test]
    fn bump_wraps_within_field() {
        let e = Entity::new(2, GENERATION_MASK);
        let bumped = e.bump_generation();
        assert_eq!(bumped.index(), 2); // index untouched by the wrap
        assert_eq!(bumped.generation(), 0);
    }

    #[test]
    fn null_is_all_ones() {
        assert_eq!(Entity::NULL.index(), INDEX_MASK);
        assert_eq!(Entity::NULL.generation(), GENERATION_MASK);
        assert!(Entity::NULL.is_null());
        assert!(!Entity::new(0, 0).is_null());
    }

    #[test]
    fn display_format() {
        assert_eq!(Entity::new(5, 0).to_string(), "5v0");
        assert_eq!(format!("{:?}", Entity::new(5, 2)), "Entity(5v2)");
        assert_eq!(Entity::NULL.to_string(), "null");
    }
}
