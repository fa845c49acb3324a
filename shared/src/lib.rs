pub mod border;
pub mod box_walls;
pub mod connected;
pub mod constants;
pub mod rapier;
pub mod rapier_world;
pub mod scene;
pub mod settings;
pub mod settle;
pub mod types;

pub use border::{
    Border, BorderIssue, BorderPoint, BorderWalls, PlatformConfig, PlatformWalls, border_walls,
    generate_border_walls,
};
pub use box_walls::{box_walls, generate_box_walls};
pub use connected::{ConnectedSegment, connected_walls, edge_wall};
pub use constants::{
    DEFAULT_MARGIN, DEFAULT_SETTLE_DELAY, DEFAULT_WALL_HEIGHT, DEFAULT_WALL_THICKNESS,
};
pub use rapier::{WorldStaticDef, collider_from_def, static_defs_for_walls};
pub use rapier_world::RapierQueryWorld;
pub use scene::{
    LocalBounds, MeshObservation, NameFilter, NodeId, NodeTransform, SceneGraph, SceneTree,
    observe_meshes, walls_for_observations,
};
pub use settings::{PartialSideMask, Side, SideMask, WallColor, WallSettings, WallStyle};
pub use settle::{AutoWallConfig, AutoWallObserver, SettleScheduler, SettleToken, observe_and_wall};
pub use types::{Planar, PlatformBox, Quat, Vec3, WallSegment};
