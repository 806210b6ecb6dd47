use crate::ecs::EntityId;
use thiserror::Error;

/// Errors returned by [`Registry`](crate::ecs::Registry) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("entity {0} is already registered")]
    DuplicateEntity(EntityId),

    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error("the root entity cannot be erased")]
    RootEntity,

    #[error("the null entity id cannot be registered")]
    NullEntity,

    #[error("entity {entity} still has {components} components and {children} children")]
    EntityInUse {
        entity: EntityId,
        components: usize,
        children: usize,
    },

    #[error("entity {entity} has no '{name}' component")]
    MissingComponent { entity: EntityId, name: &'static str },

    #[error("no live '{name}' component at slot {slot}")]
    InvalidComponentSlot { name: &'static str, slot: usize },
}
