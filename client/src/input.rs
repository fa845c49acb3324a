use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::walls::AirWallVisibility;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Show or hide the air walls. They keep colliding either way.
    ToggleAirWalls,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::ToggleAirWalls, KeyCode::KeyV);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(Update, toggle_air_walls);
}

fn toggle_air_walls(
    actions: Res<ActionState<InputAction>>,
    mut visibility: ResMut<AirWallVisibility>,
) {
    if actions.just_pressed(&InputAction::ToggleAirWalls) {
        visibility.0 = !visibility.0;
    }
}
