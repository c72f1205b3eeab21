//! # Ormr — Sparse-Set Entity-Component Registry
//!
//! A small entity-component storage and query engine: generational entity
//! handles, per-type sparse-set component containers held behind one
//! type-erased surface, and materialized multi-component views.
//!
//! ```
//! use ormr::Registry;
//!
//! #[derive(Debug, PartialEq)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut registry = Registry::new();
//! let entity = registry.create_entity();
//! registry.add_component(entity, Position { x: 0.0, y: 40.0 })?;
//!
//! for (entity, (position,)) in &registry.create_view::<(Position,)>() {
//!     println!("{entity}: {position:?}");
//! }
//! # Ok::<(), ormr::EcsError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`entity`] — packed generational entity handles
//! - [`component`] — sparse-set containers and the erased store surface
//! - [`registry`] — entity table, free list, typed operation routing
//! - [`view`] — point-in-time multi-component snapshots
//! - [`error`] — the two recoverable error conditions

pub mod component;
pub mod entity;
pub mod error;
pub mod registry;
pub mod view;

pub use component::{Component, ErasedStore, SparseSet};
pub use entity::Entity;
pub use error::EcsError;
pub use registry::Registry;
pub use view::{View, ViewSet};
