//! # Component Storage — Sparse Sets Behind One Erased Surface
//!
//! Components are plain data — a `Position`, a `Velocity`, a `Health`. Each
//! component type gets its own [`SparseSet`], and the
//! [`Registry`](crate::registry::Registry) holds all of them behind the
//! non-generic [`ErasedStore`] trait so containers of unrelated types can live
//! in one collection.
//!
//! ## Why a Sparse Set?
//!
//! The container has two jobs that pull in opposite directions: O(1)
//! per-entity operations (add, remove, membership, lookup) and tight packed
//! iteration for queries. A sparse set does both with three lockstep arrays:
//!
//! ```text
//! sparse:     [Some(1), None, Some(0)]   ← indexed by entity *index*
//! dense:      [e2v0,  e0v0]              ← full handles, packed
//! components: [c2,    c0  ]              ← values, parallel to dense
//! ```
//!
//! Invariant: `sparse[dense[i].index()] == Some(i)` for every dense slot `i`.
//! Removal swaps the target slot with the last occupied slot in `dense` and
//! `components`, fixes up the moved entity's sparse entry, and truncates —
//! the dense arrays never contain holes. The price is that removal relocates
//! the last element, so references taken before any structural mutation must
//! not be kept across it (the borrow checker enforces this).
//!
//! `dense` stores *full* handles, not bare indices. That is what makes
//! destroyed-entity leftovers harmless: a stale generation occupying a slot
//! compares unequal everywhere, reads as absent, and is overwritten in place
//! by the next [`SparseSet::add`] for that index.
//!
//! ## Comparison
//!
//! - **EnTT (C++)**: the canonical sparse-set ECS storage; same three-array
//!   shape.
//! - **hecs / bevy_ecs**: archetype tables instead — faster multi-component
//!   iteration, slower add/remove.

use std::any::{Any, type_name};

use crate::entity::Entity;
use crate::error::EcsError;

/// Marker bound for component types, satisfied by any `Send + Sync + 'static`
/// value type. Implemented for everything automatically; the name exists so
/// signatures say what they mean.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// The non-generic surface shared by every component container.
///
/// This is what lets the registry keep `SparseSet<Position>`,
/// `SparseSet<Velocity>`, … in a single `Vec`. Typed access goes through
/// [`ErasedStore::as_any`] with a checked downcast; a mismatch there is a
/// registry bug, not a caller error.
pub trait ErasedStore: Send + Sync {
    /// Remove the entity's component. `NotFound` if absent.
    fn remove(&mut self, entity: Entity) -> Result<(), EcsError>;

    /// Whether the entity currently has a component in this container.
    fn contains(&self, entity: Entity) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Packed storage for all components of a single type `T`.
///
/// All per-entity operations are O(1); iteration walks the dense arrays in
/// packed order (not entity order). The container owns its values outright
/// and may relocate them on removal.
pub struct SparseSet<T> {
    /// Entity index → dense slot. Grown on demand; `None` marks absence.
    sparse: Vec<Option<usize>>,
    /// Full handles of the stored entities, packed. The generation carried
    /// here is how stale handles are told apart from live ones.
    dense: Vec<Entity>,
    /// Component values, parallel to `dense`.
    components: Vec<T>,
}

impl<T: Component> SparseSet<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Store `component` for `entity`, returning a mutable reference to the
    /// stored value.
    ///
    /// If the entity already has a component here it is replaced. If the slot
    /// holds a leftover from a destroyed entity with the same index (an
    /// orphan), the leftover is overwritten — stale data is reclaimed lazily
    /// on the next add rather than swept eagerly.
    ///
    /// The returned reference is valid until the next structural mutation of
    /// this container.
    pub fn add(&mut self, entity: Entity, component: T) -> &mut T {
        debug_assert!(!entity.is_null(), "cannot store a component for the null entity");

        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }

        match self.sparse[index] {
            // Occupied: same entity (replace) or a stale generation (reclaim).
            Some(slot) => {
                self.dense[slot] = entity;
                self.components[slot] = component;
                &mut self.components[slot]
            }
            None => {
                let slot = self.dense.len();
                self.dense.push(entity);
                self.components.push(component);
                self.sparse[index] = Some(slot);
                &mut self.components[slot]
            }
        }
    }

    /// Remove the entity's component. Fails with `NotFound` if absent, for
    /// symmetry with [`SparseSet::get`]; the container is unchanged on failure.
    pub fn remove(&mut self, entity: Entity) -> Result<(), EcsError> {
        let slot = self.slot_of(entity).ok_or(EcsError::NotFound {
            entity,
            component: type_name::<T>(),
        })?;

        // Swap the last dense element into the vacated slot, then point the
        // moved entity's sparse entry at its new home.
        self.dense.swap_remove(slot);
        self.components.swap_remove(slot);
        self.sparse[entity.index() as usize] = None;
        if slot < self.dense.len() {
            let moved = self.dense[slot];
            self.sparse[moved.index() as usize] = Some(slot);
        }

        Ok(())
    }

    /// O(1) membership test. A stale generation for a present index reads as
    /// absent. Never fails.
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot_of(entity).is_some()
    }

    /// Shared reference to the entity's component, or `NotFound`.
    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        match self.slot_of(entity) {
            Some(slot) => Ok(&self.components[slot]),
            None => Err(EcsError::NotFound {
                entity,
                component: type_name::<T>(),
            }),
        }
    }

    /// Mutable reference to the entity's component, or `NotFound`.
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        match self.slot_of(entity) {
            Some(slot) => Ok(&mut self.components[slot]),
            None => Err(EcsError::NotFound {
                entity,
                component: type_name::<T>(),
            }),
        }
    }

    /// Apply `function` to the stored value in place, or `NotFound`.
    ///
    /// Exists so callers can mutate without a get-then-store round trip and
    /// without the component being copyable.
    pub fn patch<F: FnOnce(&mut T)>(&mut self, entity: Entity, function: F) -> Result<(), EcsError> {
        function(self.get_mut(entity)?);
        Ok(())
    }

    /// Number of stored components.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Iterate `(entity, component)` pairs in packed order. The order is an
    /// implementation detail and changes across removals.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        debug_assert_eq!(self.dense.len(), self.components.len());
        self.dense.iter().copied().zip(self.components.iter())
    }

    /// Dense slot of `entity`, if it is the slot's current occupant. The full
    /// handle compare is the generation check.
    fn slot_of(&self, entity: Entity) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index() as usize)?)?;
        (self.dense[slot] == entity).then_some(slot)
    }
}

impl<T: Component> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedStore for SparseSet<T> {
    fn remove(&mut self, entity: Entity) -> Result<(), EcsError> {
        SparseSet::remove(self, entity)
    }

    fn contains(&self, entity: Entity) -> bool {
        SparseSet::contains(self, entity)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
