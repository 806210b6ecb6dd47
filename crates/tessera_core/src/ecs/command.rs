// command.rs - Deferred structural edits
//
// Component hooks never see the Registry. Anything that would add or remove
// entities or components is recorded here and applied, in FIFO order, once
// the update pass has finished touching the storages.

use super::{ComponentType, EntityId, Registry, RegistryError};
use crate::math::Pose;
use std::collections::VecDeque;
use std::fmt;

type Command = Box<dyn FnOnce(&mut Registry) -> Result<(), RegistryError> + Send>;

struct Entry {
    label: &'static str,
    command: Command,
}

#[derive(Default)]
pub struct CommandBuffer {
    queue: VecDeque<Entry>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands waiting to be applied.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, label: &'static str, command: Command) {
        self.queue.push_back(Entry { label, command });
    }

    /// Queue a new child of the root. The id is reserved now so later
    /// commands in the same buffer can refer to it.
    pub fn spawn(&mut self, pose: Pose) -> EntityId {
        self.spawn_child(EntityId::ROOT, pose)
    }

    pub fn spawn_child(&mut self, parent: EntityId, pose: Pose) -> EntityId {
        let id = EntityId::generate();
        self.add_child_entity(parent, id, pose);
        id
    }

    pub fn add_entity(&mut self, id: EntityId, pose: Pose) {
        self.add_child_entity(EntityId::ROOT, id, pose);
    }

    pub fn add_child_entity(&mut self, parent: EntityId, id: EntityId, pose: Pose) {
        self.push(
            "add_entity",
            Box::new(move |registry| registry.add_child_entity(parent, id, pose).map(|_| ())),
        );
    }

    pub fn erase_entity(&mut self, id: EntityId) {
        self.push("erase_entity", Box::new(move |registry| registry.erase_entity(id)));
    }

    pub fn add_component<C: ComponentType>(&mut self, entity: EntityId, component: C) {
        self.push(
            "add_component",
            Box::new(move |registry| registry.add_component(entity, component).map(|_| ())),
        );
    }

    pub fn remove_component<C: ComponentType>(&mut self, entity: EntityId) {
        self.push(
            "remove_component",
            Box::new(move |registry| registry.remove_component::<C>(entity)),
        );
    }

    /// Run an arbitrary closure against the registry.
    pub fn exec<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Registry) -> Result<(), RegistryError> + Send + 'static,
    {
        self.push("exec", Box::new(f));
    }

    /// Apply every queued command in order. A failing command is logged and
    /// skipped; the rest still run. Returns how many failed.
    pub(crate) fn apply(&mut self, registry: &mut Registry) -> usize {
        let mut failed = 0;
        while let Some(Entry { label, command }) = self.queue.pop_front() {
            if let Err(err) = command(registry) {
                tracing::warn!(command = label, error = %err, "deferred command failed");
                failed += 1;
            }
        }
        failed
    }
}

impl fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("queued", &self.queue.iter().map(|e| e.label).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Component;

    struct Marker(u8);
    impl Component for Marker {}
    crate::define_component!(Marker, 20, "Marker");

    #[test]
    fn applies_in_order() {
        let mut registry = Registry::new();
        let mut commands = CommandBuffer::new();

        let id = commands.spawn(Pose::IDENTITY);
        commands.add_component(id, Marker(7));
        assert_eq!(commands.len(), 2);

        assert_eq!(commands.apply(&mut registry), 0);
        assert!(commands.is_empty());
        assert_eq!(registry.component::<Marker>(id).map(|m| m.0), Some(7));
    }

    #[test]
    fn failures_do_not_stop_the_queue() {
        let mut registry = Registry::new();
        let mut commands = CommandBuffer::new();

        commands.erase_entity(EntityId::from("missing"));
        commands.add_entity(EntityId::from("present"), Pose::IDENTITY);
        commands.exec(|registry| {
            registry.erase_entity(EntityId::ROOT)
        });

        assert_eq!(commands.apply(&mut registry), 2);
        assert!(registry.contains(EntityId::from("present")));
    }

    #[test]
    fn debug_lists_labels() {
        let mut commands = CommandBuffer::new();
        commands.erase_entity(EntityId::from(1u32));
        commands.remove_component::<Marker>(EntityId::from(1u32));
        let printed = format!("{commands:?}");
        assert!(printed.contains("erase_entity"));
        assert!(printed.contains("remove_component"));
    }
}
