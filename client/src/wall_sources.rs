use airwalls::{
    Border, ConnectedSegment, PlatformBox, PlatformConfig, SideMask, WallSettings, border_walls,
    box_walls, connected_walls,
};
use bevy::prelude::*;

use crate::walls::GeneratedWalls;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            publish_box_walls,
            publish_border_walls,
            publish_connected_walls,
        ),
    );
}

/// Walls around one known platform box.
#[derive(Component, Clone, Debug)]
pub struct BoxAirWalls {
    pub platform: PlatformBox,
    pub sides: SideMask,
    pub settings: WallSettings,
}

/// Walls along hand-placed borders spanning several platforms.
#[derive(Component, Clone, Debug, Default)]
pub struct BorderAirWalls {
    pub platforms: Vec<PlatformConfig>,
    pub borders: Vec<Border>,
    pub settings: WallSettings,
}

/// Walls along free segments at a fixed base height.
#[derive(Component, Clone, Debug, Default)]
pub struct ConnectedAirWalls {
    pub base_y: f32,
    pub segments: Vec<ConnectedSegment>,
    pub settings: WallSettings,
}

fn publish_box_walls(
    mut commands: Commands,
    sources: Query<(Entity, &BoxAirWalls), Changed<BoxAirWalls>>,
) {
    for (entity, source) in &sources {
        let walls = box_walls(&source.platform, source.sides, &source.settings);
        commands.entity(entity).insert(GeneratedWalls {
            walls,
            style: source.settings.style,
        });
    }
}

fn publish_border_walls(
    mut commands: Commands,
    sources: Query<(Entity, &BorderAirWalls), Changed<BorderAirWalls>>,
) {
    for (entity, source) in &sources {
        let out = border_walls(&source.platforms, &source.borders, &source.settings);
        for issue in &out.issues {
            warn!("air walls: {issue}");
        }
        commands.entity(entity).insert(GeneratedWalls {
            walls: out.walls().cloned().collect(),
            style: source.settings.style,
        });
    }
}

fn publish_connected_walls(
    mut commands: Commands,
    sources: Query<(Entity, &ConnectedAirWalls), Changed<ConnectedAirWalls>>,
) {
    for (entity, source) in &sources {
        let walls = connected_walls(
            source.base_y,
            &source.segments,
            source.settings.height,
            source.settings.thickness,
        );
        commands.entity(entity).insert(GeneratedWalls {
            walls,
            style: source.settings.style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airwalls::{BorderPoint, Planar, Side, Vec3};

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(plugin);
        app
    }

    fn published(app: &App, entity: Entity) -> usize {
        app.world()
            .get::<GeneratedWalls>(entity)
            .map(|g| g.walls.len())
            .unwrap_or(0)
    }

    #[test]
    fn box_source_skips_excluded_sides() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn(BoxAirWalls {
                platform: PlatformBox::new(Vec3::zeros(), Vec3::new(10.0, 1.0, 10.0)),
                sides: SideMask::ALL.without(Side::West),
                settings: WallSettings::default(),
            })
            .id();
        app.update();
        assert_eq!(published(&app, entity), 3);
    }

    #[test]
    fn border_source_walls_every_platform() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn(BorderAirWalls {
                platforms: vec![PlatformConfig::new("a", 0.0), PlatformConfig::new("b", 2.0)],
                borders: vec![Border::new(vec![
                    BorderPoint::new("a", 0.0, 0.0),
                    BorderPoint::new("a", 4.0, 0.0),
                    BorderPoint::new("b", 4.0, 4.0),
                ])],
                settings: WallSettings::default(),
            })
            .id();
        app.update();
        // The crossing edge is walled on both platforms.
        assert_eq!(published(&app, entity), 3);
    }

    #[test]
    fn connected_source_republishes_on_change() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn(ConnectedAirWalls {
                base_y: 0.0,
                segments: vec![ConnectedSegment::new(Planar::new(0.0, 0.0), Planar::new(5.0, 0.0))],
                settings: WallSettings::default(),
            })
            .id();
        app.update();
        assert_eq!(published(&app, entity), 1);

        app.world_mut()
            .get_mut::<ConnectedAirWalls>(entity)
            .unwrap()
            .segments
            .push(ConnectedSegment::new(Planar::new(5.0, 0.0), Planar::new(5.0, 5.0)));
        app.update();
        assert_eq!(published(&app, entity), 2);
    }
}
