//! Polygonal borders spanning one or more named platforms.
//!
//! A [`Border`] is an ordered polyline whose vertices each belong to a platform. It is
//! split into per-platform edge lists and every edge becomes an oriented wall standing
//! on its platform's base elevation.
//!
//! # Partitioning
//! For each consecutive pair `(a, b)`:
//! - same platform: one edge `a -> b` for that platform;
//! - different platforms: `a -> b` for `a`'s platform and `b -> a` for `b`'s platform.
//!   Adjoining platforms never share one collider; each owns a copy traced from its
//!   own side.
//!
//! A border with more than two points whose first and last vertex belong to the same
//! platform is closed with an extra edge `last -> first` for that platform.
//!
//! # Malformed input
//! Nothing here fails. Vertices naming an undeclared platform lose their edges for that
//! platform, short borders produce nothing, and a repeated platform id keeps its first
//! declaration. Each case is reported in [`BorderWalls::issues`] next to the walls.

use std::collections::HashMap;

use thiserror::Error;

use crate::{
    connected::{ConnectedSegment, connected_walls},
    settings::WallSettings,
    types::{Planar, WallSegment},
};

/// A named platform taking part in a border.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformConfig {
    /// Unique within one call.
    pub id: String,
    /// Y of the surface the platform's walls stand on.
    pub base_elevation: f32,
}

impl PlatformConfig {
    pub fn new(id: impl Into<String>, base_elevation: f32) -> Self {
        Self {
            id: id.into(),
            base_elevation,
        }
    }
}

/// One border vertex and the platform it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct BorderPoint {
    pub platform_id: String,
    pub point: Planar,
}

impl BorderPoint {
    pub fn new(platform_id: impl Into<String>, x: f32, z: f32) -> Self {
        Self {
            platform_id: platform_id.into(),
            point: Planar::new(x, z),
        }
    }
}

/// An ordered boundary path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Border {
    pub points: Vec<BorderPoint>,
    /// Wall height for every edge of this border.
    pub height: Option<f32>,
}

impl Border {
    pub fn new(points: Vec<BorderPoint>) -> Self {
        Self {
            points,
            height: None,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }
}

/// Non-fatal problems found while partitioning borders.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BorderIssue {
    #[error("border {border} point {index} references unknown platform `{platform_id}`")]
    UnknownPlatform {
        border: usize,
        index: usize,
        platform_id: String,
    },

    #[error("platform `{0}` is declared more than once; the first declaration is used")]
    DuplicatePlatform(String),

    #[error("border {border} has {points} point(s); at least 2 are needed for a wall")]
    TooFewPoints { border: usize, points: usize },
}

/// Walls owned by a single platform.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformWalls {
    pub platform_id: String,
    pub base_elevation: f32,
    /// Edges in emission order, oriented from this platform's perspective.
    pub segments: Vec<ConnectedSegment>,
    /// One wall per entry of `segments`.
    pub walls: Vec<WallSegment>,
}

/// Result of [`generate_border_walls`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BorderWalls {
    /// Platforms with at least one wall, in declaration order.
    pub platforms: Vec<PlatformWalls>,
    pub issues: Vec<BorderIssue>,
}

impl BorderWalls {
    /// Walls for `platform_id`, if it received any.
    pub fn get(&self, platform_id: &str) -> Option<&PlatformWalls> {
        self.platforms.iter().find(|p| p.platform_id == platform_id)
    }

    /// All walls across platforms, in declaration order.
    pub fn walls(&self) -> impl Iterator<Item = &WallSegment> {
        self.platforms.iter().flat_map(|p| p.walls.iter())
    }

    pub fn wall_count(&self) -> usize {
        self.platforms.iter().map(|p| p.walls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

/// Per-platform edge lists before emission.
struct Partition<'a> {
    platforms: Vec<(&'a PlatformConfig, Vec<ConnectedSegment>)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Partition<'a> {
    fn new(configs: &'a [PlatformConfig], issues: &mut Vec<BorderIssue>) -> Self {
        let mut platforms = Vec::with_capacity(configs.len());
        let mut index = HashMap::with_capacity(configs.len());

        for config in configs {
            if index.contains_key(config.id.as_str()) {
                issues.push(BorderIssue::DuplicatePlatform(config.id.clone()));
                continue;
            }
            index.insert(config.id.as_str(), platforms.len());
            platforms.push((config, Vec::new()));
        }

        Self { platforms, index }
    }

    /// Append to `platform_id`'s list. Unknown ids are dropped.
    fn push(&mut self, platform_id: &str, segment: ConnectedSegment) {
        if let Some(&i) = self.index.get(platform_id) {
            self.platforms[i].1.push(segment);
        }
    }

    fn contains(&self, platform_id: &str) -> bool {
        self.index.contains_key(platform_id)
    }
}

/// Split `borders` into per-platform walls.
///
/// `wall_height` applies to borders without their own height. Platforms that end up
/// with no edges are left out of the result.
pub fn generate_border_walls(
    platforms: &[PlatformConfig],
    borders: &[Border],
    wall_height: f32,
    wall_thickness: f32,
) -> BorderWalls {
    let mut issues = Vec::new();
    let mut partition = Partition::new(platforms, &mut issues);

    for (border_idx, border) in borders.iter().enumerate() {
        let points = &border.points;

        if points.len() < 2 {
            issues.push(BorderIssue::TooFewPoints {
                border: border_idx,
                points: points.len(),
            });
            continue;
        }

        for (index, p) in points.iter().enumerate() {
            if !partition.contains(&p.platform_id) {
                issues.push(BorderIssue::UnknownPlatform {
                    border: border_idx,
                    index,
                    platform_id: p.platform_id.clone(),
                });
            }
        }

        for pair in points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let edge = ConnectedSegment::new(a.point, b.point).with_height(border.height);

            partition.push(&a.platform_id, edge);
            if a.platform_id != b.platform_id {
                partition.push(&b.platform_id, edge.reversed());
            }
        }

        if points.len() > 2 {
            let (first, last) = (&points[0], &points[points.len() - 1]);
            if first.platform_id == last.platform_id {
                let closing =
                    ConnectedSegment::new(last.point, first.point).with_height(border.height);
                partition.push(&first.platform_id, closing);
            }
        }
    }

    for issue in &issues {
        log::debug!("air walls: {issue}");
    }

    let platforms = partition
        .platforms
        .into_iter()
        .filter(|(_, segments)| !segments.is_empty())
        .map(|(config, segments)| PlatformWalls {
            platform_id: config.id.clone(),
            base_elevation: config.base_elevation,
            walls: connected_walls(config.base_elevation, &segments, wall_height, wall_thickness),
            segments,
        })
        .collect();

    BorderWalls { platforms, issues }
}

/// Convenience: [`generate_border_walls`] with height and thickness taken from `settings`.
#[inline]
pub fn border_walls(
    platforms: &[PlatformConfig],
    borders: &[Border],
    settings: &WallSettings,
) -> BorderWalls {
    generate_border_walls(platforms, borders, settings.height, settings.thickness)
}
