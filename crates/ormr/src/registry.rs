//! # Registry — The Central Container
//!
//! The [`Registry`] owns every entity and every component container. It is the
//! only way to mint entity handles and the facade for all typed component
//! operations.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ Registry                                               │
//! │                                                        │
//! │  entities: Vec<Entity>       table of current handles, │
//! │                              indexed by entity index   │
//! │  free: Vec<u32>              indices awaiting reuse    │
//! │                                                        │
//! │  component_ids: TypeId → id  per-registry, first use   │
//! │  stores: Vec<Box<dyn ErasedStore>>  indexed by id      │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entity Lifecycle
//!
//! `create_entity` pops the free stack if it can, otherwise appends a fresh
//! index at generation zero. `destroy_entity` advances the stored generation
//! *before* parking the index — every outstanding copy of the handle goes
//! stale at that moment, and the slot's table entry never equals a handle
//! that was handed out while the slot sits on the free stack. That ordering
//! is why [`Registry::is_valid_entity`] needs no separate free-list check.
//!
//! Destruction does **not** sweep component containers. Leftover values are
//! orphans: unreachable through any valid handle (validity is checked before
//! every container lookup, and the containers themselves compare full
//! handles), and overwritten in place the next time the recycled index gains
//! that component. See [`SparseSet::add`](crate::component::SparseSet::add).
//!
//! ## Component-Type Resolution
//!
//! Each component type is assigned a small numeric id on first use *in this
//! registry* and its container is created lazily. The id map is a per-instance
//! field, never a global: two registries in one process each run their own id
//! space and their own containers. Shared and exclusive access to the same `T`
//! resolve through the same `TypeId`, so there is exactly one container per
//! type.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::component::{Component, ErasedStore, SparseSet};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::view::{View, ViewSet};

/// Owns the entity table and all component containers; routes typed
/// operations to the right container.
///
/// Single-threaded by contract: no operation blocks or suspends, and
/// concurrent use requires an external lock around the whole registry.
/// References returned by `add`/`get`/`patch` and views borrow the registry,
/// so the compiler rejects keeping them across a structural mutation.
pub struct Registry {
    /// Current handle for each slot ever allocated. A live handle equals its
    /// table entry; a destroyed one differs in generation.
    entities: Vec<Entity>,
    /// Slot indices available for reuse, most recently freed on top.
    free: Vec<u32>,
    /// One container per component type seen so far, indexed by component id.
    stores: Vec<Box<dyn ErasedStore>>,
    /// Component type → index into `stores`. Scoped to this instance.
    component_ids: HashMap<TypeId, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            free: Vec::new(),
            stores: Vec::new(),
            component_ids: HashMap::new(),
        }
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Mint a fresh entity, recycling a destroyed slot when one is available.
    ///
    /// Never fails. Exhausting the 20-bit index space is fatal and panics —
    /// there is no index left to represent the new entity.
    pub fn create_entity(&mut self) -> Entity {
        if let Some(index) = self.free.pop() {
            // Generation was already advanced when the slot was freed.
            let entity = self.entities[index as usize];
            log::trace!("recycled entity {entity}");
            return entity;
        }

        let index = self.entities.len() as u32;
        assert!(index < Entity::MAX_INDEX, "entity index space exhausted");
        let entity = Entity::new(index, 0);
        self.entities.push(entity);
        log::trace!("created entity {entity}");
        entity
    }

    /// Invalidate `entity` and park its index for reuse.
    ///
    /// Components are deliberately left in their containers; they become
    /// unreachable orphans and are reclaimed lazily (module docs).
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.is_valid_entity(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }

        let index = entity.index();
        self.entities[index as usize] = entity.bump_generation();
        self.free.push(index);
        log::trace!("destroyed entity {entity}");
        Ok(())
    }

    /// Whether `entity` is a handle this registry minted and has not yet
    /// destroyed. Never fails.
    pub fn is_valid_entity(&self, entity: Entity) -> bool {
        !entity.is_null()
            && self
                .entities
                .get(entity.index() as usize)
                .is_some_and(|&stored| stored == entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len() - self.free.len()
    }

    // ── Components ───────────────────────────────────────────────────

    /// Store `component` for `entity`, replacing any existing value of that
    /// type. Returns a mutable reference to the stored value, valid until the
    /// next structural mutation.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<&mut T, EcsError> {
        if !self.is_valid_entity(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        Ok(self.store_mut::<T>().add(entity, component))
    }

    /// Remove the entity's `T` component. `InvalidEntity` for a stale handle,
    /// `NotFound` if the component is absent.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        if !self.is_valid_entity(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.store_mut::<T>().remove(entity)
    }

    /// Whether the entity has a `T` component. `InvalidEntity` for a stale
    /// handle.
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool, EcsError> {
        if !self.is_valid_entity(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        Ok(self.store::<T>().is_some_and(|store| store.contains(entity)))
    }

    /// Shared reference to the entity's `T` component.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        if !self.is_valid_entity(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.store::<T>()
            .ok_or(EcsError::NotFound {
                entity,
                component: type_name::<T>(),
            })?
            .get(entity)
    }

    /// Mutable reference to the entity's `T` component.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        if !self.is_valid_entity(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.store_mut::<T>().get_mut(entity)
    }

    /// Apply `function` to the entity's `T` component in place.
    pub fn patch_component<T: Component>(
        &mut self,
        entity: Entity,
        function: impl FnOnce(&mut T),
    ) -> Result<(), EcsError> {
        if !self.is_valid_entity(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.store_mut::<T>().patch(entity, function)
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Materialize a snapshot of every entity that has *all* of the tuple's
    /// component types, paired with shared references to those components.
    ///
    /// Results follow the registry's entity enumeration order, not any
    /// container's packed order. The snapshot never re-queries; it is cheap to
    /// build and cheap to discard. Never fails — `create_view::<()>()` is the
    /// empty view.
    pub fn create_view<V: ViewSet>(&self) -> View<'_, V> {
        let entries = self
            .entities
            .iter()
            .filter_map(|&entity| V::fetch(self, entity).map(|refs| (entity, refs)))
            .collect();
        View::new(entries)
    }

    // ── Container resolution ─────────────────────────────────────────

    /// The container for `T`, if any `&mut self` operation has created it.
    pub(crate) fn store<T: Component>(&self) -> Option<&SparseSet<T>> {
        let id = *self.component_ids.get(&TypeId::of::<T>())?;
        let store = self.stores[id]
            .as_any()
            .downcast_ref::<SparseSet<T>>()
            .unwrap_or_else(|| {
                panic!("component id {id} does not map to a `{}` store", type_name::<T>())
            });
        Some(store)
    }

    /// The container for `T`, created on first use.
    fn store_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        let id = self.store_id::<T>();
        self.stores[id]
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .unwrap_or_else(|| {
                panic!("component id {id} does not map to a `{}` store", type_name::<T>())
            })
    }

    /// This registry's id for `T`, assigned on first use.
    fn store_id<T: Component>(&mut self) -> usize {
        match self.component_ids.entry(TypeId::of::<T>()) {
            Entry::Occupied(occupied) => *occupied.get(),
            Entry::Vacant(vacant) => {
                let id = self.stores.len();
                self.stores.push(Box::new(SparseSet::<T>::new()));
                vacant.insert(id);
                log::debug!("registered component store `{}` (id {id})", type_name::<T>());
                id
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(i32);

    #[test]
    fn created_handles_validate_until_destroyed() {
        let mut registry = Registry::new();
        let e1 = registry.create_entity();
        let e2 = registry.create_entity();
        assert!(registry.is_valid_entity(e1));
        assert!(registry.is_valid_entity(e2));
        assert_eq!(registry.entity_count(), 2);

        registry.destroy_entity(e1).unwrap();
        assert!(!registry.is_valid_entity(e1));
        assert!(registry.is_valid_entity(e2));
        assert_eq!(registry.entity_count(), 1);
    }

    #[test]
    fn null_never_validates() {
        let registry = Registry::new();
        assert!(!registry.is_valid_entity(Entity::NULL));
    }

    #[test]
    fn destroy_is_not_idempotent() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.destroy_entity(e).unwrap();
        assert_eq!(
            registry.destroy_entity(e),
            Err(EcsError::InvalidEntity { entity: e })
        );
    }

    #[test]
    fn recycled_index_carries_greater_generation() {
        let mut registry = Registry::new();
        let old = registry.create_entity();
        registry.destroy_entity(old).unwrap();

        let new = registry.create_entity();
        assert_eq!(new.index(), old.index()); // slot reused
        assert!(new.generation() > old.generation());
        assert!(!registry.is_valid_entity(old));
        assert!(registry.is_valid_entity(new));
    }

    #[test]
    fn fresh_index_when_free_stack_empty() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();
        assert_eq!(e0.index(), 0);
        assert_eq!(e1.index(), 1);
        assert_eq!(e0.generation(), 0);
        assert_eq!(e1.generation(), 0);
    }

    #[test]
    fn add_then_get_roundtrip() {
        let mut registry = Registry::new();
        let e = registry.create_entity();

        let stored = registry.add_component(e, Position { x: 1.0, y: 2.0 }).unwrap();
        stored.x = 3.0; // the returned reference writes through

        assert_eq!(
            registry.get_component::<Position>(e),
            Ok(&Position { x: 3.0, y: 2.0 })
        );
    }

    #[test]
    fn component_ops_reject_stale_handles() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Health(10)).unwrap();
        registry.destroy_entity(e).unwrap();

        // InvalidEntity, not NotFound: validity is checked before any
        // container lookup.
        assert_eq!(
            registry.get_component::<Health>(e),
            Err(EcsError::InvalidEntity { entity: e })
        );
        assert_eq!(
            registry.has_component::<Health>(e),
            Err(EcsError::InvalidEntity { entity: e })
        );
        assert_eq!(
            registry.remove_component::<Health>(e),
            Err(EcsError::InvalidEntity { entity: e })
        );
        assert_eq!(
            registry.patch_component(e, |h: &mut Health| h.0 = 0),
            Err(EcsError::InvalidEntity { entity: e })
        );
        assert_eq!(
            registry.add_component(e, Health(1)).err(),
            Some(EcsError::InvalidEntity { entity: e })
        );
    }

    #[test]
    fn remove_then_readd() {
        let mut registry = Registry::new();
        let e = registry.create_entity();

        registry.add_component(e, Position { x: 0.0, y: 0.0 }).unwrap();
        assert_eq!(registry.has_component::<Position>(e), Ok(true));

        registry.remove_component::<Position>(e).unwrap();
        assert_eq!(registry.has_component::<Position>(e), Ok(false));

        registry.add_component(e, Position { x: 1.0, y: 1.0 }).unwrap();
        assert_eq!(
            registry.get_component::<Position>(e),
            Ok(&Position { x: 1.0, y: 1.0 })
        );
    }

    #[test]
    fn missing_component_is_not_found() {
        let mut registry = Registry::new();
        let e = registry.create_entity();

        assert_eq!(
            registry.get_component::<Health>(e),
            Err(EcsError::NotFound {
                entity: e,
                component: std::any::type_name::<Health>(),
            })
        );
        assert_eq!(
            registry.remove_component::<Health>(e),
            Err(EcsError::NotFound {
                entity: e,
                component: std::any::type_name::<Health>(),
            })
        );
        assert_eq!(registry.has_component::<Health>(e), Ok(false));
    }

    #[test]
    fn patch_is_visible_to_get() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Health(10)).unwrap();

        registry.patch_component(e, |h: &mut Health| h.0 += 32).unwrap();
        assert_eq!(registry.get_component::<Health>(e), Ok(&Health(42)));
    }

    #[test]
    fn orphans_are_invisible_after_index_reuse() {
        let mut registry = Registry::new();
        let old = registry.create_entity();
        registry.add_component(old, Health(10)).unwrap();

        // Destroy without removing the component: the value stays in the
        // container as an orphan.
        registry.destroy_entity(old).unwrap();

        let new = registry.create_entity();
        assert_eq!(new.index(), old.index());

        // The recycled incarnation must not see the leftover...
        assert_eq!(registry.has_component::<Health>(new), Ok(false));
        assert!(registry.get_component::<Health>(new).is_err());

        // ...and a fresh add reclaims the slot.
        registry.add_component(new, Health(99)).unwrap();
        assert_eq!(registry.get_component::<Health>(new), Ok(&Health(99)));
    }

    #[test]
    fn registries_scope_component_ids_independently() {
        // First use order differs between the two registries; each must still
        // route every type to its own container.
        let mut a = Registry::new();
        let mut b = Registry::new();

        let ea = a.create_entity();
        let eb = b.create_entity();

        a.add_component(ea, Position { x: 1.0, y: 0.0 }).unwrap();
        a.add_component(ea, Health(5)).unwrap();

        b.add_component(eb, Health(7)).unwrap();
        b.add_component(eb, Position { x: 2.0, y: 0.0 }).unwrap();

        assert_eq!(a.get_component::<Health>(ea), Ok(&Health(5)));
        assert_eq!(b.get_component::<Health>(eb), Ok(&Health(7)));
        assert_eq!(
            a.get_component::<Position>(ea),
            Ok(&Position { x: 1.0, y: 0.0 })
        );
        assert_eq!(
            b.get_component::<Position>(eb),
            Ok(&Position { x: 2.0, y: 0.0 })
        );
    }

    #[test]
    fn shared_and_mutable_access_hit_the_same_store() {
        let mut registry = Registry::new();
        let e = registry.create_entity();
        registry.add_component(e, Velocity { dx: 1.0, dy: 0.0 }).unwrap();

        registry.get_component_mut::<Velocity>(e).unwrap().dy = 4.0;
        assert_eq!(
            registry.get_component::<Velocity>(e),
            Ok(&Velocity { dx: 1.0, dy: 4.0 })
        );
    }
}
