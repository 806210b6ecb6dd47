// registry.rs - Entities, their components, and the per-frame update pass
//
// The registry owns one EntityStorage for entity records and one
// ComponentStorage per possible component id. Component ids index the
// storage array directly. Entities refer to their components by
// (type id, slot), and every stored component knows its owner, so the two
// sides stay in sync through swap-removes.

use super::command::CommandBuffer;
use super::input::{self, InputComponent, InputEvent};
use super::query::{Query, QueryIter, QueryIterMut};
use super::{
    ComponentId, ComponentOwner, ComponentRef, ComponentStorage, ComponentType,
    ComponentView, ComponentViewMut, Entity, EntityId, EntityStorage, RegistryError,
    UpdateContext, MAX_COMPONENT_TYPES,
};
use crate::config::RegistryConfig;
use crate::math::Pose;
use std::collections::{BTreeSet, HashMap};
use tessera_metrics::UpdateProfiler;

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Half-open range of component ids that have ever held a component.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
struct IdRange {
    start: usize,
    end: usize,
}

impl IdRange {
    fn widen(&mut self, id: usize) {
        if self.start == self.end {
            self.start = id;
            self.end = id + 1;
        } else {
            self.start = self.start.min(id);
            self.end = self.end.max(id + 1);
        }
    }
}

#[inline]
fn storage_index<C: ComponentType>() -> usize {
    let index = C::ID as usize;
    assert!(
        index < MAX_COMPONENT_TYPES,
        "component `{}` has id {} outside 0..{}",
        C::NAME,
        C::ID,
        MAX_COMPONENT_TYPES
    );
    index
}

pub struct Registry {
    entities: EntityStorage<Entity>,
    slots: HashMap<EntityId, usize>,
    root_slot: usize,
    storages: Box<[ComponentStorage]>,
    input_types: BTreeSet<ComponentId>,
    builtin_ids: IdRange,
    user_ids: IdRange,
    commands: CommandBuffer,
    profiler: UpdateProfiler,
    config: RegistryConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let storages = (0..MAX_COMPONENT_TYPES)
            .map(|_| ComponentStorage::with_initial_capacity(config.initial_component_capacity))
            .collect();

        let mut entities = EntityStorage::new();
        let (_, root_slot) = entities.add(Entity::new(EntityId::ROOT, None, Pose::IDENTITY));
        let mut slots = HashMap::new();
        slots.insert(EntityId::ROOT, root_slot);

        Self {
            entities,
            slots,
            root_slot,
            storages,
            input_types: BTreeSet::new(),
            builtin_ids: IdRange::default(),
            user_ids: IdRange::default(),
            commands: CommandBuffer::new(),
            profiler: UpdateProfiler::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    fn slot_of(&self, id: EntityId) -> Result<usize> {
        self.slots
            .get(&id)
            .copied()
            .ok_or(RegistryError::UnknownEntity(id))
    }

    // Every insertion goes through here, so an id can never be mapped twice.
    fn insert_entity(
        &mut self,
        id: EntityId,
        parent: EntityId,
        parent_slot: usize,
        pose: Pose,
    ) -> Result<()> {
        if self.slots.contains_key(&id) {
            return Err(RegistryError::DuplicateEntity(id));
        }
        let (_, slot) = self.entities.add(Entity::new(id, Some(parent), pose));
        self.slots.insert(id, slot);
        if let Some(parent) = self.entities.get_mut(parent_slot) {
            parent.add_child(id);
        }
        tracing::debug!(entity = %id, slot, parent = %parent, "entity added");
        Ok(())
    }

    /// Next generated id not already registered. Ids restored through
    /// `from_bits` or serde may sit anywhere in the generated range.
    fn fresh_id(&self) -> EntityId {
        loop {
            let id = EntityId::generate();
            if !self.slots.contains_key(&id) {
                return id;
            }
            tracing::debug!(entity = %id, "generated id already registered, skipping");
        }
    }

    /// Add an entity under the root.
    pub fn add_entity(&mut self, id: EntityId, pose: Pose) -> Result<EntityId> {
        self.add_child_entity(EntityId::ROOT, id, pose)
    }

    /// Add an entity under `parent`. Fails without side effects if `id` is
    /// taken, which is also how two colliding names surface.
    pub fn add_child_entity(
        &mut self,
        parent: EntityId,
        id: EntityId,
        pose: Pose,
    ) -> Result<EntityId> {
        if id.is_null() {
            return Err(RegistryError::NullEntity);
        }
        if self.slots.contains_key(&id) {
            return Err(RegistryError::DuplicateEntity(id));
        }
        let parent_slot = self.slot_of(parent)?;
        self.insert_entity(id, parent, parent_slot, pose)?;
        Ok(id)
    }

    /// Add an entity under the root with a generated id.
    pub fn spawn(&mut self, pose: Pose) -> EntityId {
        let id = self.fresh_id();
        match self.insert_entity(id, EntityId::ROOT, self.root_slot, pose) {
            Ok(()) => id,
            Err(_) => unreachable!("fresh_id returned a registered id"),
        }
    }

    pub fn spawn_child(&mut self, parent: EntityId, pose: Pose) -> Result<EntityId> {
        let parent_slot = self.slot_of(parent)?;
        let id = self.fresh_id();
        self.insert_entity(id, parent, parent_slot, pose)?;
        Ok(id)
    }

    /// Remove an entity that has no components and no children left.
    pub fn erase_entity(&mut self, id: EntityId) -> Result<()> {
        if id == EntityId::ROOT {
            return Err(RegistryError::RootEntity);
        }
        let slot = self.slot_of(id)?;
        let entity = self
            .entities
            .get(slot)
            .ok_or(RegistryError::UnknownEntity(id))?;
        if !entity.components().is_empty() || !entity.children().is_empty() {
            return Err(RegistryError::EntityInUse {
                entity: id,
                components: entity.components().len(),
                children: entity.children().len(),
            });
        }

        self.slots.remove(&id);
        let parent = self.entities.remove(slot).and_then(|e| e.parent());
        if let Some(parent) = parent.and_then(|p| self.slots.get(&p).copied()) {
            if let Some(parent) = self.entities.get_mut(parent) {
                parent.remove_child(id);
            }
        }
        tracing::debug!(entity = %id, slot, "entity erased");
        Ok(())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(&id).and_then(|&slot| self.entities.get(slot))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.slots.get(&id)?;
        self.entities.get_mut(slot)
    }

    pub fn root(&self) -> &Entity {
        self.entities
            .get(self.root_slot)
            .expect("the root entity lives as long as the registry")
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of live entities, the root included.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().map(|(_, entity)| entity)
    }

    /// Pose of `id` relative to the world, composed down from the root.
    pub fn absolute_pose(&self, id: EntityId) -> Option<Pose> {
        let mut entity = self.entity(id)?;
        let mut pose = entity.pose;
        while let Some(parent) = entity.parent() {
            entity = self.entity(parent)?;
            pose = entity.pose * pose;
        }
        Some(pose)
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Attach `component` to `entity` and activate it.
    pub fn add_component<C: ComponentType>(
        &mut self,
        entity: EntityId,
        component: C,
    ) -> Result<&mut C> {
        let index = storage_index::<C>();
        let entity_slot = self.slot_of(entity)?;
        let record = self
            .entities
            .get_mut(entity_slot)
            .ok_or(RegistryError::UnknownEntity(entity))?;

        let owner = ComponentOwner {
            entity: entity_slot,
            index_in_entity: record.components().len() as u16,
        };
        let (slot, component) = self.storages[index].new_instance(component, owner);
        record.push_component(ComponentRef { type_id: C::ID, slot });

        component.on_activate();
        if component.as_input_mut().is_some() {
            self.input_types.insert(C::ID);
        }
        if C::BUILTIN {
            self.builtin_ids.widen(index);
        } else {
            self.user_ids.widen(index);
        }

        tracing::trace!(entity = %entity, component = C::NAME, slot, "component added");
        Ok(component)
    }

    /// Detach the first `C` attached to `entity`.
    pub fn remove_component<C: ComponentType>(&mut self, entity: EntityId) -> Result<()> {
        let index = storage_index::<C>();
        let slot = self
            .entity(entity)
            .ok_or(RegistryError::UnknownEntity(entity))?
            .component_slot(C::ID)
            .ok_or(RegistryError::MissingComponent {
                entity,
                name: C::NAME,
            })?;
        self.remove_at(index, slot);
        Ok(())
    }

    /// Detach the `C` stored at `slot`, whichever entity owns it.
    pub fn remove_component_at<C: ComponentType>(&mut self, slot: usize) -> Result<()> {
        let index = storage_index::<C>();
        let storage = &self.storages[index];
        if slot >= storage.len() || !storage.holds::<C>() {
            return Err(RegistryError::InvalidComponentSlot {
                name: C::NAME,
                slot,
            });
        }
        self.remove_at(index, slot);
        Ok(())
    }

    fn remove_at(&mut self, index: usize, slot: usize) {
        let storage = &mut self.storages[index];
        if let Some(component) = storage.get_dyn_mut(slot) {
            component.on_deactivate();
        }
        let name = storage.type_name().unwrap_or("?");
        let owner = storage.remove_instance(&mut self.entities, slot);

        // Later components of the owner shift down one place in its list.
        if let Some(entity) = self.entities.get_mut(owner.entity) {
            entity.detach_component(owner.index_in_entity);
            let later = entity
                .components()
                .iter()
                .enumerate()
                .skip(owner.index_in_entity as usize);
            for (position, reference) in later {
                if let Some(back) = self.storages[reference.type_id as usize].owner_mut(reference.slot) {
                    back.index_in_entity = position as u16;
                }
            }
            tracing::trace!(entity = %entity.id(), component = name, slot, "component removed");
        }

        if self.storages[index].is_empty() {
            self.input_types.remove(&(index as ComponentId));
        }
    }

    /// First `C` attached to `entity`.
    pub fn component<C: ComponentType>(&self, entity: EntityId) -> Option<&C> {
        let slot = self.entity(entity)?.component_slot(C::ID)?;
        self.storages[storage_index::<C>()].get::<C>(slot)
    }

    pub fn component_mut<C: ComponentType>(&mut self, entity: EntityId) -> Option<&mut C> {
        let slot = self.entity(entity)?.component_slot(C::ID)?;
        self.storages[storage_index::<C>()].get_mut::<C>(slot)
    }

    /// Every live `C`, in storage order.
    pub fn components<C: ComponentType>(&self) -> ComponentView<'_, C> {
        self.storages[storage_index::<C>()].view::<C>()
    }

    pub fn components_mut<C: ComponentType>(&mut self) -> ComponentViewMut<'_, C> {
        self.storages[storage_index::<C>()].view_mut::<C>()
    }

    /// Every live `C` with the id of its owner.
    pub fn iter<C: ComponentType>(&self) -> impl Iterator<Item = (EntityId, &C)> {
        let entities = &self.entities;
        self.storages[storage_index::<C>()]
            .view::<C>()
            .iter_with_owners()
            .filter_map(move |(component, owner)| {
                Some((entities.get(owner.entity)?.id(), component))
            })
    }

    /// Owner of the `C` stored at `slot`.
    pub fn owner_of<C: ComponentType>(&self, slot: usize) -> Option<EntityId> {
        let storage = &self.storages[storage_index::<C>()];
        if !storage.holds::<C>() {
            return None;
        }
        let owner = storage.owner(slot)?;
        self.entities.get(owner.entity).map(Entity::id)
    }

    /// Raw storage for component id `id`.
    pub fn storage(&self, id: ComponentId) -> Option<&ComponentStorage> {
        self.storages.get(id as usize)
    }

    /// Entities holding every type in `Q`, with those components.
    pub fn query<Q: Query>(&self) -> QueryIter<'_, Q> {
        assert!(
            Q::ids().iter().all(|&id| (id as usize) < MAX_COMPONENT_TYPES),
            "query names a component id outside 0..{MAX_COMPONENT_TYPES}"
        );
        QueryIter::new(&self.storages, &self.entities)
    }

    /// Mutable [`query`](Self::query). Panics if a type repeats.
    pub fn query_mut<Q: Query>(&mut self) -> QueryIterMut<'_, Q> {
        QueryIterMut::new(&mut self.storages, &self.entities)
    }

    // ------------------------------------------------------------------
    // Update pass
    // ------------------------------------------------------------------

    /// Update every component once: builtin types first, then user types,
    /// each in ascending id and then storage order. Commands recorded by the
    /// hooks run afterwards, then per-frame input deltas are cleared.
    ///
    /// Returns the number of `update` calls made.
    pub fn update_components(&mut self, time: f32, dt: f32) -> usize {
        let updates = self.update_ids(self.builtin_ids, true, time, dt)
            + self.update_ids(self.user_ids, false, time, dt);

        let mut commands = std::mem::take(&mut self.commands);
        while !commands.is_empty() {
            commands.apply(self);
            // Commands may have queued more through `exec`.
            std::mem::swap(&mut commands, &mut self.commands);
        }
        self.commands = commands;

        self.reset_input_deltas();
        updates
    }

    fn update_ids(&mut self, ids: IdRange, builtin: bool, time: f32, dt: f32) -> usize {
        let profile = self.config.profile_updates;
        let mut updates = 0;
        for index in ids.start..ids.end {
            let storage = &mut self.storages[index];
            if storage.is_empty() || storage.is_builtin() != builtin {
                continue;
            }
            let name = storage.type_name().unwrap_or("?");
            let entities = &self.entities;
            let commands = &mut self.commands;

            let mut run = || {
                let mut count = 0;
                storage.for_each_dyn_mut(|owner, component| {
                    let entity = entities.get(owner.entity).map_or(EntityId::NULL, Entity::id);
                    let mut ctx = UpdateContext::new(time, dt, entity, &mut *commands);
                    component.update(&mut ctx);
                    count += 1;
                });
                count
            };
            updates += if profile {
                self.profiler.time_type(index as u32, name, run)
            } else {
                run()
            };
        }
        updates
    }

    pub fn profiler(&self) -> &UpdateProfiler {
        &self.profiler
    }

    pub fn profiler_mut(&mut self) -> &mut UpdateProfiler {
        &mut self.profiler
    }

    /// Queue a structural edit for the end of the next update pass.
    pub fn defer(&mut self) -> &mut CommandBuffer {
        &mut self.commands
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Every live component that accepts input.
    pub fn input_components_mut(&mut self) -> impl Iterator<Item = &mut dyn InputComponent> {
        let input_types = &self.input_types;
        self.storages
            .iter_mut()
            .enumerate()
            .filter(move |(id, _)| input_types.contains(&(*id as ComponentId)))
            .flat_map(|(_, storage)| storage.dyn_view_mut())
            .filter_map(|component| component.as_input_mut())
    }

    /// Deliver `event` to every input-capable component.
    pub fn dispatch_input(&mut self, event: &InputEvent) {
        for component in self.input_components_mut() {
            input::deliver(component, event);
        }
    }

    pub fn reset_input_deltas(&mut self) {
        for component in self.input_components_mut() {
            component.input_state_mut().reset_deltas();
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        for storage in self.storages.iter_mut() {
            storage.for_each_dyn_mut(|_, component| component.on_deactivate());
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.entities.len())
            .field("input_types", &self.input_types)
            .field("pending_commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::input::{InputState, Modifiers};
    use crate::ecs::Component;
    use glam::{Vec2, Vec3};

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}
    crate::define_component!(Health, 40, "Health");

    #[derive(Debug, PartialEq)]
    struct Armor(u32);
    impl Component for Armor {}
    crate::define_component!(Armor, 41, "Armor");

    #[derive(Default)]
    struct Controller {
        input: InputState,
    }
    impl Component for Controller {
        fn as_input_mut(&mut self) -> Option<&mut dyn InputComponent> {
            Some(self)
        }
    }
    impl InputComponent for Controller {
        fn input_state(&self) -> &InputState {
            &self.input
        }
        fn input_state_mut(&mut self) -> &mut InputState {
            &mut self.input
        }
    }
    crate::define_component!(Controller, 42, "Controller");

    #[test]
    fn root_exists_from_the_start() {
        let registry = Registry::new();
        assert!(registry.contains(EntityId::ROOT));
        assert_eq!(registry.entity_count(), 1);
        assert_eq!(registry.root().parent(), None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = Registry::new();
        let id = EntityId::from("player");
        registry.add_entity(id, Pose::IDENTITY).unwrap();
        assert_eq!(
            registry.add_entity(id, Pose::from_translation(Vec3::X)),
            Err(RegistryError::DuplicateEntity(id))
        );
        assert_eq!(registry.entity(id).map(|e| e.pose), Some(Pose::IDENTITY));
        assert_eq!(registry.entity_count(), 2);
    }

    #[test]
    fn generated_ids_skip_registered_ones() {
        let mut registry = Registry::new();
        let first = registry.spawn(Pose::IDENTITY);
        // A restored id sitting where the generator goes next.
        let restored = EntityId::from_bits(first.to_bits() + 1);
        let restored_pose = Pose::from_translation(Vec3::X);
        registry.add_entity(restored, restored_pose).unwrap();
        registry.add_entity(EntityId::from_bits(first.to_bits() + 2), Pose::IDENTITY).unwrap();

        let child = registry.spawn_child(EntityId::ROOT, Pose::IDENTITY).unwrap();
        let sibling = registry.spawn(Pose::IDENTITY);

        assert_ne!(child, restored);
        assert_ne!(sibling, restored);
        assert_ne!(child, sibling);
        assert_eq!(registry.entity(restored).map(|e| e.pose), Some(restored_pose));
        assert_eq!(registry.entity_count(), 6);

        // Every stored entity is still reachable through its own id.
        let reachable = registry
            .entities()
            .filter(|e| registry.entity(e.id()).map(Entity::id) == Some(e.id()))
            .count();
        assert_eq!(reachable, registry.entity_count());
        assert_eq!(registry.root().children().len(), 5);
    }

    #[test]
    fn null_and_unknown_ids() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.add_entity(EntityId::NULL, Pose::IDENTITY),
            Err(RegistryError::NullEntity)
        );
        let ghost = EntityId::from("ghost");
        assert_eq!(
            registry.add_child_entity(ghost, EntityId::from("child"), Pose::IDENTITY),
            Err(RegistryError::UnknownEntity(ghost))
        );
        assert_eq!(registry.erase_entity(ghost), Err(RegistryError::UnknownEntity(ghost)));
        assert_eq!(registry.erase_entity(EntityId::ROOT), Err(RegistryError::RootEntity));
    }

    #[test]
    fn erase_requires_empty_entity() {
        let mut registry = Registry::new();
        let parent = registry.spawn(Pose::IDENTITY);
        let child = registry.spawn_child(parent, Pose::IDENTITY).unwrap();
        registry.add_component(child, Health(1)).unwrap();

        assert!(matches!(
            registry.erase_entity(parent),
            Err(RegistryError::EntityInUse { children: 1, .. })
        ));
        assert!(matches!(
            registry.erase_entity(child),
            Err(RegistryError::EntityInUse { components: 1, .. })
        ));

        registry.remove_component::<Health>(child).unwrap();
        registry.erase_entity(child).unwrap();
        assert!(registry.entity(parent).unwrap().children().is_empty());
        registry.erase_entity(parent).unwrap();
        assert_eq!(registry.entity_count(), 1);
    }

    #[test]
    fn erased_slot_is_reused() {
        let mut registry = Registry::new();
        let a = registry.spawn(Pose::IDENTITY);
        registry.erase_entity(a).unwrap();
        let b = registry.add_entity(EntityId::from("b"), Pose::IDENTITY).unwrap();
        assert!(!registry.contains(a));
        assert!(registry.contains(b));
        assert_eq!(registry.entity_count(), 2);
    }

    #[test]
    fn remove_renumbers_later_components() {
        let mut registry = Registry::new();
        let id = registry.spawn(Pose::IDENTITY);
        registry.add_component(id, Health(1)).unwrap();
        registry.add_component(id, Armor(2)).unwrap();
        registry.add_component(id, Health(3)).unwrap();

        registry.remove_component::<Health>(id).unwrap();

        let entity = registry.entity(id).unwrap();
        assert_eq!(entity.components().len(), 2);
        for (position, reference) in entity.components().iter().enumerate() {
            let owner = registry
                .storage(reference.type_id)
                .and_then(|s| s.owner(reference.slot))
                .unwrap();
            assert_eq!(owner.index_in_entity as usize, position);
        }
        assert_eq!(registry.component::<Health>(id), Some(&Health(3)));
        assert_eq!(registry.component::<Armor>(id), Some(&Armor(2)));
    }

    #[test]
    fn missing_component_and_bad_slot() {
        let mut registry = Registry::new();
        let id = registry.spawn(Pose::IDENTITY);
        assert_eq!(
            registry.remove_component::<Health>(id),
            Err(RegistryError::MissingComponent { entity: id, name: "Health" })
        );
        assert_eq!(
            registry.remove_component_at::<Health>(0),
            Err(RegistryError::InvalidComponentSlot { name: "Health", slot: 0 })
        );
    }

    #[test]
    fn owner_and_iteration() {
        let mut registry = Registry::new();
        let a = registry.spawn(Pose::IDENTITY);
        let b = registry.spawn(Pose::IDENTITY);
        registry.add_component(a, Health(10)).unwrap();
        registry.add_component(b, Health(20)).unwrap();

        assert_eq!(registry.owner_of::<Health>(0), Some(a));
        assert_eq!(registry.owner_of::<Health>(1), Some(b));
        assert_eq!(registry.owner_of::<Armor>(0), None);

        registry.remove_component_at::<Health>(0).unwrap();
        assert_eq!(registry.owner_of::<Health>(0), Some(b));
        let pairs: Vec<_> = registry.iter::<Health>().map(|(id, h)| (id, h.0)).collect();
        assert_eq!(pairs, vec![(b, 20)]);
    }

    #[test]
    fn absolute_pose_composes_parents() {
        let mut registry = Registry::new();
        let parent = registry.spawn(Pose::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        let child = registry
            .spawn_child(parent, Pose::from_translation(Vec3::new(0.0, 2.0, 0.0)))
            .unwrap();
        let pose = registry.absolute_pose(child).unwrap();
        assert!(pose.translation.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn input_types_follow_live_components() {
        let mut registry = Registry::new();
        let id = registry.spawn(Pose::IDENTITY);
        registry.add_component(id, Controller::default()).unwrap();
        registry.add_component(id, Health(1)).unwrap();
        assert_eq!(registry.input_components_mut().count(), 1);

        registry.dispatch_input(&InputEvent::KeyPress { key: 5, scancode: 6, mods: Modifiers::NONE });
        registry.dispatch_input(&InputEvent::MouseMove(Vec2::ZERO));
        registry.dispatch_input(&InputEvent::MouseMove(Vec2::ONE));
        let controller = registry.component::<Controller>(id).unwrap();
        assert!(controller.input.is_key_pressed(5));
        assert_eq!(controller.input.mouse_delta(), Vec2::ONE);

        registry.remove_component::<Controller>(id).unwrap();
        assert_eq!(registry.input_components_mut().count(), 0);
    }
}
