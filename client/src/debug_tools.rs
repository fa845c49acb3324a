//! Debug/performance tooling for native dev builds.
//!
//! Besides the perf overlay, every wall and platform collider is outlined with gizmos so
//! hidden walls can still be checked against the geometry they guard.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

use crate::walls::{AirWall, Platform, StaticWorld, to_bevy, wall_transform};

const WALL_OUTLINE: Color = Color::srgb(1.0, 0.2, 0.2);
const PLATFORM_OUTLINE: Color = Color::srgb(0.3, 0.9, 0.4);
const PROBE_RANGE: f32 = 200.0;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, outline_colliders);
    app.add_systems(
        Update,
        probe_containment.run_if(resource_exists_and_changed::<StaticWorld>),
    );
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn outline_colliders(mut gizmos: Gizmos, walls: Query<&AirWall>, platforms: Query<&Platform>) {
    for wall in &walls {
        let tf = wall_transform(&wall.segment).with_scale(to_bevy(&wall.segment.extents));
        gizmos.cuboid(tf, WALL_OUTLINE);
    }
    for platform in &platforms {
        let tf = Transform::from_translation(to_bevy(&platform.0.center))
            .with_scale(to_bevy(&platform.0.dimensions));
        gizmos.cuboid(tf, PLATFORM_OUTLINE);
    }
}

/// Cast horizontal rays from just above each platform and log how many escape.
fn probe_containment(world: Res<StaticWorld>, platforms: Query<(&Platform, Option<&Name>)>) {
    let directions = [
        airwalls::Vec3::x(),
        -airwalls::Vec3::x(),
        airwalls::Vec3::z(),
        -airwalls::Vec3::z(),
    ];
    for (platform, name) in &platforms {
        let origin = platform.0.center + airwalls::Vec3::y() * (platform.0.height() * 0.5 + 1.0);
        let open = directions
            .iter()
            .filter(|dir| world.0.cast_ray(origin, **dir, PROBE_RANGE).is_none())
            .count();
        debug!(
            "air walls: {} has {open} open direction(s)",
            name.map_or("platform", Name::as_str)
        );
    }
}
