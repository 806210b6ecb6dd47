// component.rs - Component behaviour and compile-time type identity
//
// Components are identified by small u32 ids, not Rust TypeIds. The id is a
// direct index into the registry's storage array, so it must be below
// MAX_COMPONENT_TYPES and distinct per concrete type.

use super::command::CommandBuffer;
use super::input::InputComponent;
use super::EntityId;

pub type ComponentId = u32;

/// Number of storage slots a registry reserves, one per possible id.
pub const MAX_COMPONENT_TYPES: usize = 512;

/// Behaviour shared by every component. This is the base type that
/// type-erased views hand out as `&dyn Component`.
pub trait Component: Send + 'static {
    /// Called once per frame by [`Registry::update_components`](super::Registry::update_components).
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Called right after the component is attached to an entity.
    fn on_activate(&mut self) {}

    /// Called right before the component is detached or the registry drops.
    fn on_deactivate(&mut self) {}

    /// Components that receive player input return `Some(self)`.
    fn as_input_mut(&mut self) -> Option<&mut dyn InputComponent> {
        None
    }
}

/// Compile-time identity of a concrete component type.
///
/// Implement through [`define_component!`](crate::define_component).
pub trait ComponentType: Component + Sized {
    /// Globally unique component ID.
    const ID: ComponentId;

    /// Human-readable name for debugging.
    const NAME: &'static str;

    /// Builtin components update before user-defined ones every frame.
    const BUILTIN: bool = false;
}

/// Per-component view of the frame handed to [`Component::update`].
pub struct UpdateContext<'a> {
    time: f32,
    dt: f32,
    entity: EntityId,
    commands: &'a mut CommandBuffer,
}

impl<'a> UpdateContext<'a> {
    pub(crate) fn new(time: f32, dt: f32, entity: EntityId, commands: &'a mut CommandBuffer) -> Self {
        Self {
            time,
            dt,
            entity,
            commands,
        }
    }

    /// Simulation time in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Length of this frame in seconds.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Entity the updating component is attached to.
    #[inline]
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Structural edits recorded here run after the update pass.
    #[inline]
    pub fn commands(&mut self) -> &mut CommandBuffer {
        self.commands
    }
}

/// Helper macro to implement ComponentType.
///
/// # Example
/// ```ignore
/// struct Spinner { speed: f32 }
/// impl Component for Spinner {}
///
/// define_component!(Spinner, 40, "Spinner");
/// define_component!(Collider, 2, "Collider", builtin);
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty, $id:expr, $name:expr) => {
        impl $crate::ecs::ComponentType for $ty {
            const ID: $crate::ecs::ComponentId = $id;
            const NAME: &'static str = $name;
        }
    };
    ($ty:ty, $id:expr, $name:expr, builtin) => {
        impl $crate::ecs::ComponentType for $ty {
            const ID: $crate::ecs::ComponentId = $id;
            const NAME: &'static str = $name;
            const BUILTIN: bool = true;
        }
    };
}
