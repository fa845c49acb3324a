//! Rapier-based query world built from static platform and wall colliders.
//!
//! Both the host and tests can build an in-memory Rapier scene from a set of static
//! collider definitions and ask it where a ray or a character would stop.
//!
//! The world is deterministic (defs are inserted in `id` order) and immutable: walls and
//! platforms never move, so the host rebuilds it whenever a wall set is republished.

// Re-export Rapier so downstream crates can use Rapier types without depending on
// `rapier3d` directly.
pub use rapier3d;

use rapier3d::na::{Point3, Translation3};
use rapier3d::prelude::*;

use crate::rapier::{WorldStaticDef, collider_from_def};

/// In-memory Rapier structures needed for scene queries against a static world.
///
/// For immutable statics, these can be built once and reused until the walls change.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - Any NaN values should be filtered by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // One fixed rigid-body per static, collider attached with identity local pose.
        for def in defs.into_iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_def(&def);
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Collision-detection only (no dynamics): updates the broad-phase BVH and the
        // narrow-phase contact graph so queries can run.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        let hooks = ();
        let events = ();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        log::debug!("air walls: built query world with {} collider(s)", colliders.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Borrowed `QueryPipeline` view for ray, shape and character-controller queries.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Number of colliders in the world.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// First static hit by a ray, as `(def id, distance)`.
    ///
    /// `dir` does not need to be normalized; the distance is then in units of `dir`.
    pub fn cast_ray(
        &self,
        origin: Vector<f32>,
        dir: Vector<f32>,
        max_toi: f32,
    ) -> Option<(u32, f32)> {
        let ray = Ray::new(Point3::from(origin), dir);
        let pipeline = self.query_pipeline(QueryFilter::default());
        let (handle, toi) = pipeline.cast_ray(&ray, max_toi, true)?;
        let id = self.colliders.get(handle)?.user_data as u32;
        Some((id, toi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Border, BorderPoint, PlatformBox, PlatformConfig, SideMask, Vec3, generate_border_walls,
        generate_box_walls, rapier::static_defs_for_walls,
    };
    use std::f32::consts::FRAC_1_SQRT_2;

    const PLATFORM_ID: u32 = 0;

    fn walled_platform() -> RapierQueryWorld {
        let platform = PlatformBox::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 1.0, 20.0));
        let walls = generate_box_walls(&platform, SideMask::ALL, 5.0, 0.2);

        let mut defs = vec![platform.to_static_def(PLATFORM_ID)];
        defs.extend(static_defs_for_walls(&walls, 1));
        RapierQueryWorld::build(defs)
    }

    #[test]
    fn build_inserts_one_collider_per_def() {
        assert_eq!(walled_platform().len(), 5);
        assert!(RapierQueryWorld::build(Vec::new()).is_empty());
    }

    #[test]
    fn ray_across_platform_stops_at_east_wall() {
        let world = walled_platform();
        let (id, toi) = world
            .cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::x(), 100.0)
            .unwrap();
        // Walls are numbered N, S, E, W from 1.
        assert_eq!(id, 3);
        assert!((toi - 9.9).abs() < 1.0e-3);
    }

    #[test]
    fn ray_down_lands_on_platform() {
        let world = walled_platform();
        let (id, toi) = world
            .cast_ray(Vec3::new(2.0, 5.0, -3.0), -Vec3::y(), 100.0)
            .unwrap();
        assert_eq!(id, PLATFORM_ID);
        assert!((toi - 5.0).abs() < 1.0e-3);
    }

    #[test]
    fn ray_above_walls_escapes() {
        let world = walled_platform();
        assert!(world.cast_ray(Vec3::new(0.0, 6.0, 0.0), Vec3::z(), 100.0).is_none());
    }

    #[test]
    fn diagonal_border_walls_face_the_right_way() {
        // A square turned 45 degrees. Every edge is diagonal, so a mirrored rotation
        // would leave the walls lying across the inside of the platform.
        let configs = vec![PlatformConfig::new("diamond", 0.0)];
        let border = Border::new(vec![
            BorderPoint::new("diamond", 0.0, -5.0),
            BorderPoint::new("diamond", 5.0, 0.0),
            BorderPoint::new("diamond", 0.0, 5.0),
            BorderPoint::new("diamond", -5.0, 0.0),
        ]);
        let out = generate_border_walls(&configs, &[border], 3.0, 0.2);
        let walls = &out.get("diamond").unwrap().walls;
        assert_eq!(walls.len(), 4);

        let world = RapierQueryWorld::build(static_defs_for_walls(walls, 0));
        let dir = Vec3::new(FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2);
        let (id, toi) = world.cast_ray(Vec3::new(0.0, 1.0, 0.0), dir, 100.0).unwrap();

        // Edge (5,0)->(0,5) is the second wall; its midpoint is 2.5*sqrt(2) away.
        assert_eq!(id, 1);
        assert!((toi - (2.5 * 2.0_f32.sqrt() - 0.1)).abs() < 1.0e-3);
    }
}
