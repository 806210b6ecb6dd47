//! Entity/component storage.
//!
//! A [`Registry`] owns every entity and component of a scene. Entities are
//! addressed by [`EntityId`] and live in stable slots of an
//! [`EntityStorage`]; components live packed by type in one
//! [`ComponentStorage`] per component id and are updated once per frame,
//! builtin types first.

mod command;
mod component;
mod entity;
mod entity_id;
mod entity_storage;
pub mod input;
mod query;
mod registry;
mod registry_error;
pub mod storage;

pub use command::CommandBuffer;
pub use component::{Component, ComponentId, ComponentType, UpdateContext, MAX_COMPONENT_TYPES};
pub use entity::{ComponentRef, Entity};
pub use entity_id::{EntityId, IdNamespace};
pub use entity_storage::EntityStorage;
pub use input::{InputComponent, InputEvent, InputState, Modifiers, MouseButton};
pub use query::{Query, QueryIter, QueryIterMut};
pub use registry::Registry;
pub use registry_error::RegistryError;
pub use storage::{ComponentOwner, ComponentStorage, ComponentView, ComponentViewMut, DynView, DynViewMut};
