//! # View — Point-in-Time Multi-Component Snapshots
//!
//! A [`View`] answers one question: which entities currently have *all* of
//! these component types? It is materialized once by
//! [`Registry::create_view`](crate::registry::Registry::create_view) as a
//! list of `(entity, references…)` tuples and never re-queries — cheap to
//! build, cheap to discard, not a live cursor.
//!
//! ```text
//! registry.create_view::<(Transform, Rigidbody)>()
//!
//! 1. Walk the entity table in order.
//! 2. For each entry, try to fetch a &Transform and a &Rigidbody.
//! 3. Both present → push (entity, (&t, &r)) into the snapshot.
//! ```
//!
//! ## Borrowing
//!
//! The snapshot holds shared references into the live containers, so it
//! borrows the [`Registry`](crate::registry::Registry) for its whole
//! lifetime. Structural mutation while a view exists — the classic
//! dangling-reference hazard of this design — is therefore rejected at
//! compile time; drop the view first, then mutate (e.g. via
//! [`patch_component`](crate::registry::Registry::patch_component)).
//!
//! ## The `ViewSet` Trait
//!
//! Rather than a fixed arity, any tuple of component types up to eight wide
//! is a [`ViewSet`]; the unit tuple is the empty view with no iteration
//! semantics.

use crate::component::Component;
use crate::entity::Entity;
use crate::registry::Registry;

/// A tuple of component types that can be captured by a view.
///
/// Implemented for `()` and for tuples `(A,)` through `(A, …, H)` of
/// [`Component`] types.
pub trait ViewSet {
    /// The per-entity tuple of shared references.
    type Refs<'a>;

    /// Fetch references for one entity, or `None` if any requested component
    /// is absent.
    fn fetch<'a>(registry: &'a Registry, entity: Entity) -> Option<Self::Refs<'a>>;
}

/// An immutable snapshot of `(entity, component references…)` tuples.
///
/// Supports forward iteration, counting, and an emptiness check; no
/// structural mutation goes through a view.
pub struct View<'a, V: ViewSet> {
    entries: Vec<(Entity, V::Refs<'a>)>,
}

impl<'a, V: ViewSet> View<'a, V> {
    /// Only the registry builds views.
    pub(crate) fn new(entries: Vec<(Entity, V::Refs<'a>)>) -> Self {
        Self { entries }
    }

    /// Iterate the captured tuples in registry enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Entity, V::Refs<'a>)> {
        self.entries.iter()
    }

    /// Number of captured tuples.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'s, 'a, V: ViewSet> IntoIterator for &'s View<'a, V> {
    type Item = &'s (Entity, V::Refs<'a>);
    type IntoIter = std::slice::Iter<'s, (Entity, V::Refs<'a>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The zero-component view: always empty, nothing to iterate.
impl ViewSet for () {
    type Refs<'a> = ();

    fn fetch<'a>(_registry: &'a Registry, _entity: Entity) -> Option<()> {
        None
    }
}

macro_rules! impl_view_set {
    ($($C:ident),+) => {
        impl<$($C: Component),+> ViewSet for ($($C,)+) {
            type Refs<'a> = ($(&'a $C,)+);

            fn fetch<'a>(registry: &'a Registry, entity: Entity) -> Option<Self::Refs<'a>> {
                Some(($(registry.store::<$C>()?.get(entity).ok()?,)+))
            }
        }
    };
}

impl_view_set!(A);
impl_view_set!(A, B);
impl_view_set!(A, B, C);
impl_view_set!(A, B, C, D);
impl_view_set!(A, B, C, D, E);
impl_view_set!(A, B, C, D, E, F);
impl_view_set!(A, B, C, D, E, F, G);
impl_view_set!(A, B, C, D, E, F, G, H);
