/*!
Wall generation settings, side masks and the render policy.

Callers describe what they want with optional, partially filled values; everything is
resolved into fully specified settings once, at the call boundary, before any
geometry is produced.

Notes
- Visibility is a debug aid. Hidden walls are fully transparent but collide exactly
  like visible ones.
- Only an explicit `false` removes a side. A missing entry means "wall this side".
*/

use crate::constants::{
    DEFAULT_WALL_HEIGHT, DEFAULT_WALL_THICKNESS, HIDDEN_WALL_OPACITY, VISIBLE_WALL_OPACITY,
};

/// One of the four compass sides of an axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// +Z
    North,
    /// -Z
    South,
    /// +X
    East,
    /// -X
    West,
}

impl Side {
    /// Emission order used by the box generator.
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];
}

/// Fully specified set of sides that get a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideMask {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Default for SideMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl SideMask {
    pub const ALL: SideMask = SideMask {
        north: true,
        south: true,
        east: true,
        west: true,
    };

    pub const NONE: SideMask = SideMask {
        north: false,
        south: false,
        east: false,
        west: false,
    };

    #[inline]
    pub fn includes(&self, side: Side) -> bool {
        match side {
            Side::North => self.north,
            Side::South => self.south,
            Side::East => self.east,
            Side::West => self.west,
        }
    }

    /// Returns a copy with `side` removed.
    pub fn without(mut self, side: Side) -> Self {
        match side {
            Side::North => self.north = false,
            Side::South => self.south = false,
            Side::East => self.east = false,
            Side::West => self.west = false,
        }
        self
    }

    /// Number of sides that will get a wall.
    pub fn count(&self) -> usize {
        Side::ALL.iter().filter(|&&s| self.includes(s)).count()
    }
}

/// Caller-facing side mask where any entry may be left unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartialSideMask {
    pub north: Option<bool>,
    pub south: Option<bool>,
    pub east: Option<bool>,
    pub west: Option<bool>,
}

impl PartialSideMask {
    /// Resolve into a [`SideMask`]. Only `Some(false)` excludes a side.
    pub fn resolve(&self) -> SideMask {
        let keep = |v: Option<bool>| v != Some(false);
        SideMask {
            north: keep(self.north),
            south: keep(self.south),
            east: keep(self.east),
            west: keep(self.west),
        }
    }
}

impl From<PartialSideMask> for SideMask {
    fn from(partial: PartialSideMask) -> Self {
        partial.resolve()
    }
}

/// Linear RGB color for wall materials.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl WallColor {
    pub const RED: WallColor = WallColor {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for WallColor {
    fn default() -> Self {
        Self::RED
    }
}

/// How generated walls are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WallStyle {
    /// Show the walls (debug). Hidden walls are still collidable.
    pub visible: bool,
    pub color: WallColor,
}

impl WallStyle {
    /// Material opacity for the current visibility.
    #[inline]
    pub fn opacity(&self) -> f32 {
        if self.visible {
            VISIBLE_WALL_OPACITY
        } else {
            HIDDEN_WALL_OPACITY
        }
    }

    /// Color with alpha as `[r, g, b, a]`.
    pub fn rgba(&self) -> [f32; 4] {
        [self.color.r, self.color.g, self.color.b, self.opacity()]
    }
}

/// Scalars shared by every generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSettings {
    /// Wall height above the guarded surface (meters).
    pub height: f32,
    /// Wall thickness (meters).
    pub thickness: f32,
    pub style: WallStyle,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            height: DEFAULT_WALL_HEIGHT,
            thickness: DEFAULT_WALL_THICKNESS,
            style: WallStyle::default(),
        }
    }
}

impl WallSettings {
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.style.visible = visible;
        self
    }

    pub fn with_color(mut self, color: WallColor) -> Self {
        self.style.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_entries_resolve_to_included() {
        assert_eq!(PartialSideMask::default().resolve(), SideMask::ALL);

        let partial = PartialSideMask {
            north: Some(true),
            east: Some(false),
            ..Default::default()
        };
        let mask = partial.resolve();
        assert!(mask.north && mask.south && mask.west);
        assert!(!mask.east);
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn without_removes_only_that_side() {
        let mask = SideMask::ALL.without(Side::West);
        assert!(!mask.includes(Side::West));
        assert_eq!(mask.count(), 3);
        assert_eq!(SideMask::NONE.count(), 0);
    }

    #[test]
    fn opacity_follows_visibility() {
        let hidden = WallStyle::default();
        assert!(!hidden.visible);
        assert_eq!(hidden.opacity(), 0.0);
        assert_eq!(hidden.color, WallColor::RED);

        let shown = WallStyle {
            visible: true,
            ..hidden
        };
        assert_eq!(shown.rgba(), [1.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn default_settings_match_constants() {
        let s = WallSettings::default();
        assert_eq!(s.height, 5.0);
        assert_eq!(s.thickness, 0.2);
        let s = s.with_height(3.0).with_visible(true);
        assert_eq!(s.height, 3.0);
        assert!(s.style.visible);
    }
}
