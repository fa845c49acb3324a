//! Air wall entities.
//!
//! Wall sources (explicit boxes, borders, auto-detected subtrees) publish a
//! [`GeneratedWalls`] component. This module turns each published set into wall
//! entities, keeps one material per source, and rebuilds the static collider world
//! whenever any set changes.

use airwalls::{
    PlatformBox, RapierQueryWorld, WallSegment, WallStyle, WorldStaticDef, static_defs_for_walls,
};
use bevy::{platform::collections::HashMap, prelude::*};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(WallEntityMapping::default());
    app.insert_resource(AirWallVisibility::default());
    app.add_systems(
        PostUpdate,
        (
            sync_wall_entities,
            despawn_orphaned_walls,
            rebuild_static_world,
        )
            .chain(),
    );
    app.add_systems(
        Update,
        apply_wall_visibility.run_if(resource_changed::<AirWallVisibility>),
    );
}

/// Walls published by a source entity, in world space.
#[derive(Component, Clone, Debug, Default)]
pub struct GeneratedWalls {
    pub walls: Vec<WallSegment>,
    pub style: WallStyle,
}

/// A walkable surface that takes part in the static collider world.
#[derive(Component, Clone, Copy, Debug)]
pub struct Platform(pub PlatformBox);

/// Marker on every spawned wall, pointing back to its source.
#[derive(Component, Debug)]
pub struct AirWall {
    pub source: Entity,
    pub segment: WallSegment,
}

/// Global debug switch for wall rendering. Walls collide either way.
#[derive(Resource, Debug, Default)]
pub struct AirWallVisibility(pub bool);

struct WallSet {
    walls: Vec<Entity>,
    material: Handle<StandardMaterial>,
    style: WallStyle,
}

#[derive(Resource, Default)]
pub struct WallEntityMapping(HashMap<Entity, WallSet>);

impl WallEntityMapping {
    fn wall_count(&self) -> usize {
        self.0.values().map(|set| set.walls.len()).sum()
    }
}

/// Static colliders for every platform and published wall.
#[derive(Resource)]
pub struct StaticWorld(pub RapierQueryWorld);

pub fn to_bevy(v: &airwalls::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_nalgebra(v: Vec3) -> airwalls::Vec3 {
    airwalls::Vec3::new(v.x, v.y, v.z)
}

pub fn wall_transform(segment: &WallSegment) -> Transform {
    let q = segment.rotation();
    Transform::from_translation(to_bevy(&segment.center))
        .with_rotation(Quat::from_xyzw(q.i, q.j, q.k, q.w))
}

fn wall_color(style: &WallStyle, visible: bool) -> Color {
    let [r, g, b, a] = WallStyle { visible, ..*style }.rgba();
    Color::linear_rgba(r, g, b, a)
}

fn despawn_set(commands: &mut Commands, set: WallSet) {
    for wall in set.walls {
        commands.entity(wall).despawn();
    }
}

fn sync_wall_entities(
    mut commands: Commands,
    mut mapping: ResMut<WallEntityMapping>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    visibility: Res<AirWallVisibility>,
    sources: Query<(Entity, &GeneratedWalls), Changed<GeneratedWalls>>,
) {
    for (source, generated) in &sources {
        if let Some(old) = mapping.0.remove(&source) {
            despawn_set(&mut commands, old);
        }

        // A style set on the source forces the walls visible regardless of the switch.
        let visible = generated.style.visible || visibility.0;
        let material = materials.add(StandardMaterial {
            base_color: wall_color(&generated.style, visible),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });

        let walls = generated
            .walls
            .iter()
            .map(|segment| {
                let e = segment.extents;
                commands
                    .spawn((
                        Name::new("air_wall"),
                        AirWall {
                            source,
                            segment: *segment,
                        },
                        Mesh3d(meshes.add(Cuboid::new(e.x, e.y, e.z))),
                        MeshMaterial3d(material.clone()),
                        wall_transform(segment),
                    ))
                    .id()
            })
            .collect::<Vec<_>>();

        debug!("air walls: {:?} published {} wall(s)", source, walls.len());
        mapping.0.insert(
            source,
            WallSet {
                walls,
                material,
                style: generated.style,
            },
        );
    }
}

fn despawn_orphaned_walls(
    mut commands: Commands,
    mut mapping: ResMut<WallEntityMapping>,
    mut removed: RemovedComponents<GeneratedWalls>,
) {
    for source in removed.read() {
        if let Some(set) = mapping.0.remove(&source) {
            debug!("air walls: {:?} unmounted, removing {} wall(s)", source, set.walls.len());
            despawn_set(&mut commands, set);
        }
    }
}

fn rebuild_static_world(
    mut commands: Commands,
    changed: Query<(), Changed<GeneratedWalls>>,
    mut removed: RemovedComponents<GeneratedWalls>,
    platforms_changed: Query<(), Changed<Platform>>,
    platforms: Query<&Platform>,
    sources: Query<(Entity, &GeneratedWalls)>,
) {
    let removed = removed.read().count();
    if changed.is_empty() && removed == 0 && platforms_changed.is_empty() {
        return;
    }

    let mut defs: Vec<WorldStaticDef> = platforms
        .iter()
        .zip(0u32..)
        .map(|(platform, id)| platform.0.to_static_def(id))
        .collect();

    // Sort sources so ids are stable across rebuilds.
    let mut sources = sources.iter().collect::<Vec<_>>();
    sources.sort_by_key(|(entity, _)| *entity);
    for (_, generated) in sources {
        let first_id = defs.len() as u32;
        defs.extend(static_defs_for_walls(&generated.walls, first_id));
    }

    let world = RapierQueryWorld::build(defs);
    info!("air walls: static world rebuilt with {} collider(s)", world.len());
    commands.insert_resource(StaticWorld(world));
}

fn apply_wall_visibility(
    visibility: Res<AirWallVisibility>,
    mapping: Res<WallEntityMapping>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for set in mapping.0.values() {
        if let Some(material) = materials.get_mut(&set.material) {
            let visible = set.style.visible || visibility.0;
            material.base_color = wall_color(&set.style, visible);
        }
    }
    info!(
        "air walls: {} ({} wall(s))",
        if visibility.0 { "shown" } else { "hidden" },
        mapping.wall_count()
    );
}
