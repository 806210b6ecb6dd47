//! Entity records
//!
//! An entity owns a pose, links to its parent and children, and an ordered
//! list of references to its components. References are `(type id, slot)`
//! pairs into the registry's component storages rather than addresses, so
//! growing a storage never invalidates them; a swap-remove rewrites the one
//! reference whose component moved.

use super::{ComponentId, EntityId};
use crate::math::Pose;

/// Location of one attached component.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    pub type_id: ComponentId,
    pub slot: usize,
}

#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    components: Vec<ComponentRef>,
    pub pose: Pose,
}

impl Entity {
    pub(crate) fn new(id: EntityId, parent: Option<EntityId>, pose: Pose) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            components: Vec::new(),
            pose,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// `None` only for the root entity.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Attached components in attachment order.
    pub fn components(&self) -> &[ComponentRef] {
        &self.components
    }

    /// Slot of the first attached component of type `type_id`.
    pub fn component_slot(&self, type_id: ComponentId) -> Option<usize> {
        self.components
            .iter()
            .find(|r| r.type_id == type_id)
            .map(|r| r.slot)
    }

    pub fn has_component(&self, type_id: ComponentId) -> bool {
        self.component_slot(type_id).is_some()
    }

    pub(crate) fn push_component(&mut self, component: ComponentRef) -> u16 {
        let index = self.components.len();
        assert!(
            index < u16::MAX as usize,
            "entity {} cannot hold more than {} components",
            self.id,
            u16::MAX
        );
        self.components.push(component);
        index as u16
    }

    /// The component at `index_in_entity` now lives at `slot`.
    pub(crate) fn relocate_component(&mut self, index_in_entity: u16, slot: usize) {
        self.components[index_in_entity as usize].slot = slot;
    }

    /// Drop the reference at `index_in_entity`; later references shift down.
    pub(crate) fn detach_component(&mut self, index_in_entity: u16) -> ComponentRef {
        self.components.remove(index_in_entity as usize)
    }

    pub(crate) fn add_child(&mut self, child: EntityId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: EntityId) {
        self.children.retain(|c| *c != child);
    }
}
