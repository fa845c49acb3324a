//! Auto-detected air walls for a subtree of the scene.
//!
//! An [`AutoAirWalls`] entity owns an [`AutoWallObserver`]. The observer waits for the
//! subtree to settle, then walks it through [`EcsScene`] and publishes the result as
//! [`GeneratedWalls`].

use std::time::Duration;

use airwalls::{
    AutoWallConfig, AutoWallObserver, DEFAULT_SETTLE_DELAY, LocalBounds, NodeTransform, SceneGraph,
};
use bevy::{camera::primitives::Aabb, ecs::system::SystemParam, prelude::*};
use nalgebra::{Matrix4, Quaternion, UnitQuaternion};

use crate::walls::{GeneratedWalls, to_nalgebra};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            unmount_auto_walls,
            mount_auto_walls,
            sync_auto_config,
            watch_children,
            layout_ready,
            tick_auto_walls,
        )
            .chain(),
    );
}

/// Walls every mesh under this entity after the subtree settles.
#[derive(Component, Clone, Debug)]
pub struct AutoAirWalls {
    pub config: AutoWallConfig,
    pub settle_delay: Duration,
}

impl Default for AutoAirWalls {
    fn default() -> Self {
        Self {
            config: AutoWallConfig::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl AutoAirWalls {
    pub fn new(config: AutoWallConfig) -> Self {
        Self {
            config,
            ..default()
        }
    }
}

/// Insert on an [`AutoAirWalls`] root once its content is in place to skip the rest of
/// the settle delay. Removed again after it is consumed.
#[derive(Component, Debug)]
pub struct LayoutReady;

#[derive(Component)]
struct AutoWallState(AutoWallObserver);

/// Read-only view of the ECS hierarchy for scene walks.
#[derive(SystemParam)]
struct EcsScene<'w, 's> {
    children: Query<'w, 's, &'static Children>,
    transforms: Query<'w, 's, &'static Transform>,
    names: Query<'w, 's, &'static Name>,
    bounds: Query<'w, 's, &'static Aabb, With<Mesh3d>>,
    parents: Query<'w, 's, &'static ChildOf>,
    globals: Query<'w, 's, &'static GlobalTransform>,
}

impl EcsScene<'_, '_> {
    /// World matrix of `root`'s parent, or identity for a top-level root.
    fn parent_world(&self, root: Entity) -> Matrix4<f32> {
        let Ok(child_of) = self.parents.get(root) else {
            return Matrix4::identity();
        };
        let Ok(global) = self.globals.get(child_of.parent()) else {
            return Matrix4::identity();
        };
        let (scale, rotation, translation) = global.to_scale_rotation_translation();
        node_transform(translation, rotation, scale).to_matrix()
    }
}

impl SceneGraph for EcsScene<'_, '_> {
    type Node = Entity;

    fn children(&self, node: Entity) -> Vec<Entity> {
        self.children
            .get(node)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    fn local_transform(&self, node: Entity) -> NodeTransform {
        self.transforms
            .get(node)
            .map(|t| node_transform(t.translation, t.rotation, t.scale))
            .unwrap_or_default()
    }

    fn name(&self, node: Entity) -> Option<&str> {
        self.names.get(node).ok().map(Name::as_str)
    }

    fn local_bounds(&self, node: Entity) -> Option<LocalBounds> {
        let aabb = self.bounds.get(node).ok()?;
        Some(LocalBounds::from_center_half_extents(
            to_nalgebra(aabb.center.into()),
            to_nalgebra(aabb.half_extents.into()),
        ))
    }
}

fn node_transform(translation: Vec3, rotation: Quat, scale: Vec3) -> NodeTransform {
    let q = Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z);
    NodeTransform::from_translation(to_nalgebra(translation))
        .with_rotation(UnitQuaternion::new_normalize(q))
        .with_scale(to_nalgebra(scale))
}

/// Removing `AutoAirWalls` drops the pending run and the published walls with it.
fn unmount_auto_walls(
    mut commands: Commands,
    mut removed: RemovedComponents<AutoAirWalls>,
    states: Query<(), With<AutoWallState>>,
) {
    for entity in removed.read() {
        if states.contains(entity) {
            commands.entity(entity).remove::<(AutoWallState, GeneratedWalls)>();
        }
    }
}

fn mount_auto_walls(
    mut commands: Commands,
    added: Query<(Entity, &AutoAirWalls), Added<AutoAirWalls>>,
) {
    for (entity, auto) in &added {
        let observer = AutoWallObserver::new(auto.config.clone(), auto.settle_delay);
        commands
            .entity(entity)
            .insert((AutoWallState(observer), GeneratedWalls::default()));
    }
}

fn sync_auto_config(
    mut commands: Commands,
    mut changed: Query<(Entity, &AutoAirWalls, &mut AutoWallState), Changed<AutoAirWalls>>,
) {
    for (entity, auto, mut state) in &mut changed {
        if state.0.set_config(auto.config.clone()) {
            commands.entity(entity).insert(publish(&state.0));
        }
    }
}

fn watch_children(
    mut roots: Query<&mut AutoWallState, (With<AutoAirWalls>, Changed<Children>)>,
) {
    for mut state in &mut roots {
        state.0.children_changed();
    }
}

fn layout_ready(
    mut commands: Commands,
    mut roots: Query<(Entity, &mut AutoWallState), (With<AutoAirWalls>, With<LayoutReady>)>,
) {
    for (entity, mut state) in &mut roots {
        state.0.signal_layout_ready();
        commands.entity(entity).remove::<LayoutReady>();
    }
}

fn tick_auto_walls(
    mut commands: Commands,
    time: Res<Time>,
    scene: EcsScene,
    mut roots: Query<(Entity, &mut AutoWallState), With<AutoAirWalls>>,
) {
    for (root, mut state) in &mut roots {
        if !state.0.is_pending() {
            continue;
        }
        let parent_world = scene.parent_world(root);
        if state.0.tick(time.delta(), &scene, root, parent_world) {
            commands.entity(root).insert(publish(&state.0));
        }
    }
}

fn publish(observer: &AutoWallObserver) -> GeneratedWalls {
    GeneratedWalls {
        walls: observer.walls().to_vec(),
        style: observer.config().settings.style,
    }
}
