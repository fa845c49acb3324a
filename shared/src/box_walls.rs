//! Axis-aligned walls around the top perimeter of a box.
//!
//! Each included side gets one wall standing on the box's top face. Walls are
//! centered on the box edge and padded by one thickness along their length, so
//! neighbouring walls overlap at the corners without a separate corner collider.

use crate::{
    settings::{Side, SideMask, WallSettings},
    types::{PlatformBox, Vec3, WallSegment},
};

/// Emit walls for every side of `platform` included in `sides`.
///
/// Order is north (+Z), south (-Z), east (+X), west (-X). Non-positive
/// `wall_height`/`wall_thickness` are not rejected; they produce degenerate walls.
pub fn generate_box_walls(
    platform: &PlatformBox,
    sides: SideMask,
    wall_height: f32,
    wall_thickness: f32,
) -> Vec<WallSegment> {
    let PlatformBox { center, .. } = *platform;
    let wall_y = platform.top_y() + wall_height * 0.5;
    let half_w = platform.width() * 0.5;
    let half_d = platform.depth() * 0.5;

    Side::ALL
        .iter()
        .filter(|&&side| sides.includes(side))
        .map(|&side| {
            let (center, extents) = match side {
                Side::North | Side::South => {
                    let z = if side == Side::North {
                        center.z + half_d
                    } else {
                        center.z - half_d
                    };
                    (
                        Vec3::new(center.x, wall_y, z),
                        Vec3::new(
                            platform.width() + wall_thickness,
                            wall_height,
                            wall_thickness,
                        ),
                    )
                }
                Side::East | Side::West => {
                    let x = if side == Side::East {
                        center.x + half_w
                    } else {
                        center.x - half_w
                    };
                    (
                        Vec3::new(x, wall_y, center.z),
                        Vec3::new(
                            wall_thickness,
                            wall_height,
                            platform.depth() + wall_thickness,
                        ),
                    )
                }
            };

            WallSegment {
                center,
                extents,
                heading: 0.0,
            }
        })
        .collect()
}

/// Convenience: [`generate_box_walls`] with height and thickness taken from `settings`.
#[inline]
pub fn box_walls(
    platform: &PlatformBox,
    sides: SideMask,
    settings: &WallSettings,
) -> Vec<WallSegment> {
    generate_box_walls(platform, sides, settings.height, settings.thickness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> PlatformBox {
        PlatformBox::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(20.0, 1.0, 10.0))
    }

    #[test]
    fn four_walls_stand_on_top_face() {
        let walls = generate_box_walls(&platform(), SideMask::ALL, 5.0, 0.2);
        assert_eq!(walls.len(), 4);

        // top = -1 + 0.5 = -0.5, so centers sit at -0.5 + 2.5.
        for w in &walls {
            assert!((w.center.y - 2.0).abs() < 1.0e-6);
            assert_eq!(w.heading, 0.0);
            assert_eq!(w.height(), 5.0);
        }

        let [north, south, east, west] = [walls[0], walls[1], walls[2], walls[3]];
        assert_eq!(north.center, Vec3::new(1.0, 2.0, 7.0));
        assert_eq!(south.center, Vec3::new(1.0, 2.0, -3.0));
        assert_eq!(east.center, Vec3::new(11.0, 2.0, 2.0));
        assert_eq!(west.center, Vec3::new(-9.0, 2.0, 2.0));
    }

    #[test]
    fn corners_overlap_by_one_thickness() {
        let t = 0.2;
        let p = platform();
        let walls = generate_box_walls(&p, SideMask::ALL, 5.0, t);

        // North/south span the width plus one thickness, east/west the depth plus one.
        for w in &walls[0..2] {
            assert!((w.extents.x - (p.width() + t)).abs() < 1.0e-6);
            assert!((w.extents.z - t).abs() < 1.0e-6);
        }
        for w in &walls[2..4] {
            assert!((w.extents.x - t).abs() < 1.0e-6);
            assert!((w.extents.z - (p.depth() + t)).abs() < 1.0e-6);
        }

        // The north wall's east end reaches exactly the outer face of the east wall.
        let north_east_end = walls[0].center.x + walls[0].extents.x * 0.5;
        let east_outer = walls[2].center.x + walls[2].extents.x * 0.5;
        assert!((north_east_end - east_outer).abs() < 1.0e-5);
    }

    #[test]
    fn wall_count_matches_mask_for_every_combination() {
        for bits in 0u8..16 {
            let mask = SideMask {
                north: bits & 1 != 0,
                south: bits & 2 != 0,
                east: bits & 4 != 0,
                west: bits & 8 != 0,
            };
            let walls = generate_box_walls(&platform(), mask, 5.0, 0.2);
            assert_eq!(walls.len(), bits.count_ones() as usize, "mask {bits:04b}");
        }
    }

    #[test]
    fn excluded_side_is_skipped_and_order_kept() {
        let mask = SideMask::ALL.without(Side::South);
        let walls = generate_box_walls(&platform(), mask, 5.0, 0.2);
        assert_eq!(walls.len(), 3);
        assert_eq!(walls[0].center.z, 7.0);
        assert_eq!(walls[1].center.x, 11.0);
        assert_eq!(walls[2].center.x, -9.0);
    }

    #[test]
    fn same_input_same_output() {
        let a = generate_box_walls(&platform(), SideMask::ALL, 3.0, 0.5);
        let b = generate_box_walls(&platform(), SideMask::ALL, 3.0, 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_sizes_do_not_panic() {
        let walls = generate_box_walls(&platform(), SideMask::ALL, 0.0, -1.0);
        assert_eq!(walls.len(), 4);
        assert_eq!(walls[0].height(), 0.0);
    }

    #[test]
    fn settings_helper_uses_configured_scalars() {
        let settings = WallSettings::default().with_height(3.0).with_thickness(0.5);
        let walls = box_walls(&platform(), SideMask::ALL, &settings);
        assert_eq!(walls[0].height(), 3.0);
        assert_eq!(walls[0].thickness(), 0.5);
    }
}
