//! Error conditions reported by registry and container operations.

use crate::entity::Entity;
use thiserror::Error;

/// Errors returned by fallible [`Registry`](crate::registry::Registry) and
/// [`SparseSet`](crate::component::SparseSet) operations.
///
/// Both variants are local, recoverable conditions for the immediate caller.
/// Every failing operation leaves the registry and its containers unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EcsError {
    /// The handle fails the validity check: stale generation, out-of-range
    /// index, or the null sentinel.
    #[error("entity {entity} is not valid")]
    InvalidEntity { entity: Entity },

    /// The entity is valid but has no component of the requested type.
    #[error("entity {entity} has no `{component}` component")]
    NotFound {
        entity: Entity,
        component: &'static str,
    },
}
