//! Demo scene: three platform groups, each walled a different way.
//!
//! - Two connected platforms at the origin, walled by one polygonal border.
//! - A slab to the east, walled by auto-detection over its subtree.
//! - A ramp landing to the west, walled as an explicit box with its east side open, and a
//!   walkway from there to the square railed by connected segments.

use airwalls::{
    AutoWallConfig, Border, BorderPoint, ConnectedSegment, NameFilter, PartialSideMask, Planar,
    PlatformBox, PlatformConfig, WallSettings,
};
use bevy::prelude::*;

use crate::auto_walls::AutoAirWalls;
use crate::wall_sources::{BorderAirWalls, BoxAirWalls, ConnectedAirWalls};
use crate::walls::{Platform, to_bevy, to_nalgebra};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(Color::srgb_u8(0x37, 0x34, 0x2E)));
    app.add_systems(
        Startup,
        (
            setup_lights,
            setup_connected_platforms,
            setup_auto_slab,
            setup_ramp,
        ),
    );
}

const SUN_ILLUMINANCE: f32 = 10_000.0;
const CONNECTED_WALL_HEIGHT: f32 = 3.0;
const SLAB_ORIGIN: Vec3 = Vec3::new(40.0, 0.0, 0.0);
const SLAB_FILTER: &str = "^ground";

fn platform_box(center: Vec3, size: Vec3) -> PlatformBox {
    PlatformBox::new(to_nalgebra(center), to_nalgebra(size))
}

/// Mesh + material for a platform box, placed at its own center.
fn platform_bundle(
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    platform: PlatformBox,
    color: Color,
) -> impl Bundle + use<> {
    let size = to_bevy(&platform.dimensions);
    (
        Platform(platform),
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_translation(to_bevy(&platform.center)),
    )
}

fn setup_lights(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 30.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn setup_connected_platforms(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let square = platform_box(Vec3::new(0.0, -5.0, 0.0), Vec3::new(20.0, 10.0, 20.0));
    let extension = platform_box(Vec3::new(0.0, -5.0, 15.0), Vec3::new(10.0, 10.0, 10.0));

    commands.spawn((
        Name::new("square"),
        platform_bundle(&mut meshes, &mut materials, square, Color::srgb_u8(0xCB, 0xC6, 0xAF)),
    ));
    commands.spawn((
        Name::new("extension"),
        platform_bundle(&mut meshes, &mut materials, extension, Color::srgb_u8(0xAD, 0xB5, 0xBD)),
    ));

    // The square's north edge stays open where the extension joins it.
    let border = Border::new(vec![
        BorderPoint::new("square", -10.0, -10.0),
        BorderPoint::new("square", -10.0, 10.0),
        BorderPoint::new("square", -5.0, 10.0),
        BorderPoint::new("extension", -5.0, 10.0),
        BorderPoint::new("extension", -5.0, 20.0),
        BorderPoint::new("extension", 5.0, 20.0),
        BorderPoint::new("extension", 5.0, 10.0),
        BorderPoint::new("square", 10.0, 10.0),
        BorderPoint::new("square", 10.0, 10.0),
        BorderPoint::new("square", 10.0, -10.0),
        BorderPoint::new("square", -10.0, -10.0),
    ]);

    commands.spawn((
        Name::new("connected_platform_walls"),
        BorderAirWalls {
            platforms: vec![
                PlatformConfig::new("square", square.top_y()),
                PlatformConfig::new("extension", extension.top_y()),
            ],
            borders: vec![border],
            settings: WallSettings::default().with_height(CONNECTED_WALL_HEIGHT),
        },
    ));
}

fn setup_auto_slab(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let name_filter = match NameFilter::pattern(SLAB_FILTER) {
        Ok(filter) => Some(filter),
        Err(err) => {
            warn!("air walls: bad slab filter {SLAB_FILTER:?}: {err}");
            None
        }
    };
    let config = AutoWallConfig {
        name_filter,
        margin: 0.5,
        ..default()
    };

    // Platform boxes are world space; the meshes sit under the slab root.
    let ground = platform_box(
        SLAB_ORIGIN + Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(20.0, 1.0, 20.0),
    );
    let ground_material = materials.add(Color::srgb_u8(0x8A, 0x9A, 0x5B));
    let crate_material = materials.add(Color::srgb_u8(124, 144, 255));

    commands
        .spawn((
            Name::new("auto_slab"),
            AutoAirWalls::new(config),
            Transform::from_translation(SLAB_ORIGIN),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("ground"),
                Platform(ground),
                Mesh3d(meshes.add(Cuboid::new(20.0, 1.0, 20.0))),
                MeshMaterial3d(ground_material),
                Transform::from_xyz(0.0, -0.5, 0.0),
            ));
            // Props on the slab are not walled.
            parent.spawn((
                Name::new("crate"),
                Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
                MeshMaterial3d(crate_material),
                Transform::from_xyz(3.0, 0.5, 2.0),
            ));
        });
}

fn setup_ramp(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let landing = platform_box(Vec3::new(-30.0, -0.5, 0.0), Vec3::new(10.0, 1.0, 10.0));
    let sides = PartialSideMask {
        east: Some(false),
        ..default()
    };

    commands.spawn((
        Name::new("ramp_landing"),
        platform_bundle(&mut meshes, &mut materials, landing, Color::srgb_u8(0x9C, 0x8B, 0x7A)),
        BoxAirWalls {
            platform: landing,
            sides: sides.resolve(),
            settings: WallSettings::default().with_height(2.0),
        },
    ));

    // Walkway from the landing's open side to the square, railed on both long edges.
    let walkway = platform_box(Vec3::new(-17.5, -0.5, 0.0), Vec3::new(15.0, 1.0, 3.0));
    let rail = |z: f32| ConnectedSegment::new(Planar::new(-25.0, z), Planar::new(-10.0, z));
    commands.spawn((
        Name::new("walkway"),
        platform_bundle(&mut meshes, &mut materials, walkway, Color::srgb_u8(0x7D, 0x74, 0x6A)),
        ConnectedAirWalls {
            base_y: walkway.top_y(),
            segments: vec![rail(1.5), rail(-1.5)],
            settings: WallSettings::default().with_height(1.0),
        },
    ));
}
