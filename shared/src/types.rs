/*!
Core data types shared by every wall-generation mode.

This module intentionally contains no algorithms. It defines the values exchanged
between the generators (box, border, auto-detection) and the collider boundary.

Axis conventions
- +Y is up. Walls stand on a surface and extend upward.
- North is +Z, south is -Z, east is +X, west is -X.
- Planar points are `Vector2` where `.x` is world X and `.y` is world Z.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Planar = na::Vector2<f32>;

/// An axis-aligned platform footprint: a box given by its center and full dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformBox {
    /// World-space center of the box.
    pub center: Vec3,
    /// Full size as (width along X, height along Y, depth along Z).
    pub dimensions: Vec3,
}

impl PlatformBox {
    #[inline]
    pub fn new(center: Vec3, dimensions: Vec3) -> Self {
        Self { center, dimensions }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.dimensions.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.dimensions.y
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.dimensions.z
    }

    /// Y coordinate of the top face.
    #[inline]
    pub fn top_y(&self) -> f32 {
        self.center.y + self.dimensions.y * 0.5
    }
}

/// One barrier collider to instantiate.
///
/// `extents` are full sizes in the wall's local frame: `x` is the length along the
/// edge, `y` the height, `z` the thickness. The local frame is turned about +Y by
/// `heading` (see [`WallSegment::rotation`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// World-space center of the wall volume.
    pub center: Vec3,
    /// Full local size as (length, height, thickness).
    pub extents: Vec3,
    /// Angle from +X toward +Z in the ground plane (radians).
    pub heading: f32,
}

impl WallSegment {
    #[inline]
    pub fn length(&self) -> f32 {
        self.extents.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.extents.y
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.extents.z
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.extents * 0.5
    }

    /// Rotation about +Y that carries local +X onto `(cos heading, 0, sin heading)`.
    ///
    /// A right-handed rotation by `a` about +Y maps +X to `(cos a, 0, -sin a)`, so the
    /// heading is negated here.
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), -self.heading)
    }

    /// Unit direction of the wall's length axis in the ground plane.
    #[inline]
    pub fn direction(&self) -> Planar {
        Planar::new(self.heading.cos(), self.heading.sin())
    }
}
