use bevy::{camera::Exposure, prelude::*};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
}

/// Fixed vantage point over the connected platforms.
const CAMERA_POSITION: Vec3 = Vec3::new(15.0, 15.0, -12.5);

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Exposure::SUNLIGHT,
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.22, 0.2, 0.18, 1.0),
            falloff: FogFalloff::from_visibility_colors(
                400.0, // Fog distance
                Color::srgb(0.22, 0.2, 0.18),
                Color::srgb(0.8, 0.8, 0.7),
            ),
            ..default()
        },
    ));
}
