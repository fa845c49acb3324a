use std::time::Duration;

/// Default height of an air wall above the surface it guards (meters).
pub const DEFAULT_WALL_HEIGHT: f32 = 5.0;

/// Default thickness of an air wall (meters).
///
/// Box walls are padded by this amount along their length so neighbouring walls
/// overlap at the corners.
pub const DEFAULT_WALL_THICKNESS: f32 = 0.2;

/// Default outward growth applied to auto-detected footprints on X and Z (meters).
pub const DEFAULT_MARGIN: f32 = 0.0;

/// How long auto-detection waits after a scene change before sampling bounds.
///
/// This is a debounce, not a guarantee: geometry that keeps moving after the delay
/// is sampled wherever it happens to be.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Material opacity used when air walls are shown for debugging.
pub const VISIBLE_WALL_OPACITY: f32 = 0.5;

/// Material opacity used when air walls are hidden. They still collide.
pub const HIDDEN_WALL_OPACITY: f32 = 0.0;
