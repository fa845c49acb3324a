//! Oriented walls along explicit 2D edges.
//!
//! Every edge becomes one wall whose length axis follows the edge, centered on the
//! edge midpoint and standing on `base_y`. This is the emission step shared by the
//! polygonal border partitioner; it is also usable directly when a caller already
//! has its perimeter as a list of edges.

use crate::types::{Planar, Vec3, WallSegment};

/// One wall edge on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectedSegment {
    pub start: Planar,
    pub end: Planar,
    /// Height for this edge only. Falls back to the caller's wall height.
    pub height: Option<f32>,
}

impl ConnectedSegment {
    #[inline]
    pub fn new(start: Planar, end: Planar) -> Self {
        Self {
            start,
            end,
            height: None,
        }
    }

    #[inline]
    pub fn with_height(mut self, height: Option<f32>) -> Self {
        self.height = height;
        self
    }

    /// The same edge traced the other way round.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            height: self.height,
        }
    }
}

/// Build the wall for a single edge.
///
/// - center: XZ midpoint, `y = base_y + height / 2`
/// - length: planar distance between the endpoints
/// - heading: `atan2(dz, dx)`
///
/// A zero-length edge yields a zero-length wall with heading 0.
pub fn edge_wall(
    start: Planar,
    end: Planar,
    base_y: f32,
    height: f32,
    thickness: f32,
) -> WallSegment {
    let mid = (start + end) * 0.5;
    let delta = end - start;

    WallSegment {
        center: Vec3::new(mid.x, base_y + height * 0.5, mid.y),
        extents: Vec3::new(delta.norm(), height, thickness),
        heading: delta.y.atan2(delta.x),
    }
}

/// Build one wall per segment, in input order.
pub fn connected_walls(
    base_y: f32,
    segments: &[ConnectedSegment],
    wall_height: f32,
    wall_thickness: f32,
) -> Vec<WallSegment> {
    segments
        .iter()
        .map(|s| {
            edge_wall(
                s.start,
                s.end,
                base_y,
                s.height.unwrap_or(wall_height),
                wall_thickness,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn edge_along_x_has_zero_heading() {
        let w = edge_wall(Planar::new(0.0, 0.0), Planar::new(5.0, 0.0), 0.0, 3.0, 0.2);
        assert!(w.heading.abs() < 1.0e-6);
        assert!((w.length() - 5.0).abs() < 1.0e-6);
        assert_eq!(w.center, Vec3::new(2.5, 1.5, 0.0));
        assert_eq!(w.thickness(), 0.2);
    }

    #[test]
    fn edge_along_z_has_quarter_turn_heading() {
        let w = edge_wall(Planar::new(0.0, 0.0), Planar::new(0.0, 5.0), 0.0, 3.0, 0.2);
        assert!((w.heading - FRAC_PI_2).abs() < 1.0e-6);
        assert!((w.length() - 5.0).abs() < 1.0e-6);
        assert_eq!(w.center, Vec3::new(0.0, 1.5, 2.5));
    }

    #[test]
    fn reversed_edge_flips_heading_only() {
        let a = Planar::new(-1.0, 2.0);
        let b = Planar::new(3.0, -1.0);
        let fwd = edge_wall(a, b, 1.0, 2.0, 0.2);
        let back = edge_wall(b, a, 1.0, 2.0, 0.2);

        assert_eq!(fwd.center, back.center);
        assert!((fwd.length() - 5.0).abs() < 1.0e-6);
        assert!((fwd.length() - back.length()).abs() < 1.0e-6);
        let diff = (fwd.heading - back.heading).abs();
        assert!((diff - PI).abs() < 1.0e-5);
    }

    #[test]
    fn segment_height_overrides_default() {
        let segments = [
            ConnectedSegment::new(Planar::new(0.0, 0.0), Planar::new(1.0, 0.0)),
            ConnectedSegment::new(Planar::new(1.0, 0.0), Planar::new(1.0, 1.0))
                .with_height(Some(8.0)),
        ];
        let walls = connected_walls(2.0, &segments, 5.0, 0.2);
        assert_eq!(walls.len(), 2);
        assert_eq!(walls[0].height(), 5.0);
        assert_eq!(walls[0].center.y, 4.5);
        assert_eq!(walls[1].height(), 8.0);
        assert_eq!(walls[1].center.y, 6.0);
    }

    #[test]
    fn zero_length_edge_is_degenerate_not_fatal() {
        let p = Planar::new(4.0, 4.0);
        let w = edge_wall(p, p, 0.0, 1.0, 0.2);
        assert_eq!(w.length(), 0.0);
        assert_eq!(w.heading, 0.0);
    }
}
