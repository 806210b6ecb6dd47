//! Demo scene: a spinning hub with orbiting satellites and a fly camera.

use tessera_core::define_component;
use tessera_core::ecs::{
    Component, EntityId, InputComponent, InputState, Registry, RegistryError, UpdateContext,
};
use tessera_core::math::{Pose, Quat, Vec2, Vec3};

pub const HUB: EntityId = EntityId::from_name("hub");
pub const CAMERA: EntityId = EntityId::from_name("camera");

/// Rotates its entity about +Y. Builtin so poses settle before user logic.
#[derive(Debug)]
pub struct Spin {
    pub radians_per_second: f32,
    pub angle: f32,
}

impl Component for Spin {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.angle = (self.angle + self.radians_per_second * ctx.dt()) % std::f32::consts::TAU;
    }
}
define_component!(Spin, 1, "Spin", builtin);

/// Circles the parent at a fixed radius.
#[derive(Debug)]
pub struct Orbit {
    pub radius: f32,
    pub phase: f32,
    pub position: Vec3,
}

impl Component for Orbit {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let angle = self.phase + ctx.time();
        self.position = Vec3::new(angle.cos(), 0.0, angle.sin()) * self.radius;
    }
}
define_component!(Orbit, 64, "Orbit");

/// Expires after a number of frames and asks for its entity to go away.
#[derive(Debug)]
pub struct Lifetime {
    pub frames_left: u32,
}

impl Component for Lifetime {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.frames_left == 0 {
            return;
        }
        self.frames_left -= 1;
        if self.frames_left == 0 {
            let entity = ctx.entity();
            ctx.commands().exec(move |registry| despawn(registry, entity));
        }
    }
}
define_component!(Lifetime, 65, "Lifetime");

/// Accumulates mouse look from input events.
#[derive(Debug, Default)]
pub struct FlyCamera {
    input: InputState,
    pub yaw: f32,
    pub pitch: f32,
}

impl Component for FlyCamera {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        let delta = self.input.mouse_delta() * 0.002;
        self.yaw -= delta.x;
        self.pitch = (self.pitch - delta.y).clamp(-1.5, 1.5);
    }

    fn as_input_mut(&mut self) -> Option<&mut dyn InputComponent> {
        Some(self)
    }
}

impl InputComponent for FlyCamera {
    fn input_state(&self) -> &InputState {
        &self.input
    }

    fn input_state_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn on_mouse_scroll(&mut self, scroll: Vec2) {
        tracing::trace!(?scroll, "camera zoom");
    }
}
define_component!(FlyCamera, 66, "FlyCamera");

impl FlyCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }
}

/// Detach every component this scene uses, then erase the entity.
pub fn despawn(registry: &mut Registry, entity: EntityId) -> Result<(), RegistryError> {
    ignore_missing(registry.remove_component::<Orbit>(entity))?;
    ignore_missing(registry.remove_component::<Lifetime>(entity))?;
    registry.erase_entity(entity)
}

// An absent component is fine here; anything else is a real failure.
fn ignore_missing(result: Result<(), RegistryError>) -> Result<(), RegistryError> {
    match result {
        Err(RegistryError::MissingComponent { .. }) => Ok(()),
        other => other,
    }
}

/// Populate `registry` with the hub, `satellites` orbiting children and the
/// camera.
pub fn build(registry: &mut Registry, satellites: u32) -> Result<(), RegistryError> {
    registry.add_entity(HUB, Pose::IDENTITY)?;
    registry.add_component(
        HUB,
        Spin {
            radians_per_second: 0.5,
            angle: 0.0,
        },
    )?;

    for i in 0..satellites {
        let satellite = registry.spawn_child(HUB, Pose::IDENTITY)?;
        registry.add_component(
            satellite,
            Orbit {
                radius: 2.0 + (i % 8) as f32,
                phase: i as f32 * 0.1,
                position: Vec3::ZERO,
            },
        )?;
        // Every fourth satellite burns out after a while.
        if i % 4 == 0 {
            registry.add_component(satellite, Lifetime { frames_left: 60 + i })?;
        }
    }

    registry.add_entity(CAMERA, Pose::from_translation(Vec3::new(0.0, 2.0, 10.0)))?;
    registry.add_component(CAMERA, FlyCamera::default())?;
    Ok(())
}

/// Copy component state into entity poses.
pub fn sync_poses(registry: &mut Registry) {
    let hub_angle = registry.component::<Spin>(HUB).map(|spin| spin.angle);
    if let (Some(angle), Some(hub)) = (hub_angle, registry.entity_mut(HUB)) {
        hub.pose.rotation = Quat::from_rotation_y(angle);
    }

    let orbits: Vec<(EntityId, Vec3)> = registry
        .iter::<Orbit>()
        .map(|(id, orbit)| (id, orbit.position))
        .collect();
    for (id, position) in orbits {
        if let Some(entity) = registry.entity_mut(id) {
            entity.pose.translation = position;
        }
    }

    let camera = registry.component::<FlyCamera>(CAMERA).map(FlyCamera::rotation);
    if let (Some(rotation), Some(entity)) = (camera, registry.entity_mut(CAMERA)) {
        entity.pose.rotation = rotation;
    }
}
