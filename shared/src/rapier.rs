use rapier3d::{na::UnitQuaternion, prelude::*};

use crate::types::{PlatformBox, WallSegment};

/// Canonical, engine-agnostic definition of an immutable cuboid collider.
///
/// Walls and platforms are both mapped to this type, then handed to
/// [`RapierQueryWorld::build`](crate::RapierQueryWorld::build) or to the host's own
/// physics world.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Half-extents in the collider's local frame (meters).
    pub half_extents: Vector<f32>,
}

impl WallSegment {
    /// Fixed cuboid matching this wall's volume.
    pub fn to_static_def(&self, id: u32) -> WorldStaticDef {
        WorldStaticDef {
            id,
            translation: self.center,
            rotation: self.rotation(),
            half_extents: self.half_extents(),
        }
    }
}

impl PlatformBox {
    /// Fixed, axis-aligned cuboid matching the platform.
    pub fn to_static_def(&self, id: u32) -> WorldStaticDef {
        WorldStaticDef {
            id,
            translation: self.center,
            rotation: UnitQuaternion::identity(),
            half_extents: self.dimensions * 0.5,
        }
    }
}

/// Static defs for `walls`, numbered from `first_id` in wall order.
pub fn static_defs_for_walls(walls: &[WallSegment], first_id: u32) -> Vec<WorldStaticDef> {
    walls
        .iter()
        .zip(first_id..)
        .map(|(wall, id)| wall.to_static_def(id))
        .collect()
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose is expected on the parent rigid-body, so the collider is created with an
/// identity local transform. Negative half-extents from degenerate walls are clamped to
/// zero. The def id is stored in `user_data`.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let he = def.half_extents.map(|v| v.max(0.0));
    ColliderBuilder::cuboid(he.x, he.y, he.z)
        .user_data(def.id as u128)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        connected::edge_wall,
        types::{Planar, Vec3},
    };

    #[test]
    fn wall_def_carries_pose_and_half_extents() {
        let wall = edge_wall(Planar::new(0.0, 0.0), Planar::new(0.0, 4.0), 1.0, 2.0, 0.2);
        let def = wall.to_static_def(7);

        assert_eq!(def.id, 7);
        assert_eq!(def.translation, Vec3::new(0.0, 2.0, 2.0));
        assert!((def.half_extents - Vec3::new(2.0, 1.0, 0.1)).norm() < 1.0e-6);

        // Local length axis runs along +Z for this edge.
        let axis = def.rotation * Vec3::x();
        assert!((axis - Vec3::z()).norm() < 1.0e-5);
    }

    #[test]
    fn ids_follow_wall_order() {
        let walls = [
            edge_wall(Planar::new(0.0, 0.0), Planar::new(1.0, 0.0), 0.0, 1.0, 0.2),
            edge_wall(Planar::new(1.0, 0.0), Planar::new(1.0, 1.0), 0.0, 1.0, 0.2),
        ];
        let defs = static_defs_for_walls(&walls, 10);
        let ids: Vec<u32> = defs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn degenerate_extents_are_clamped() {
        let def = WorldStaticDef {
            id: 1,
            translation: Vec3::zeros(),
            rotation: UnitQuaternion::identity(),
            half_extents: Vec3::new(-1.0, 2.0, 0.0),
        };
        let collider = collider_from_def(&def);
        let cuboid = collider.shape().as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(collider.user_data, 1);
    }
}
