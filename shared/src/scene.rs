/*!
Scene-graph introspection for auto-detected walls.

The host exposes its node hierarchy through [`SceneGraph`]. The walk is an explicit
stack over typed node handles: no dynamic type checks, no recursion depth limits.

For every drawable node (one that reports [`LocalBounds`]) whose name passes the
optional [`NameFilter`], the local box is sampled into a [`MeshObservation`]:
- center: the local box center pushed through the node's accumulated world matrix;
- size: the local box size multiplied by the node's effective world scale.

The size is not re-projected through rotations. For rotated nodes the result is an
axis-aligned approximation.

[`SceneTree`] is a small owned implementation used by hosts that build their own
hierarchy (and by tests).
*/

use nalgebra as na;
use regex::Regex;

use crate::{
    box_walls::generate_box_walls,
    settings::{SideMask, WallSettings},
    types::{PlatformBox, Quat, Vec3, WallSegment},
};

type Mat4 = na::Matrix4<f32>;

/// Local transform of a node relative to its parent: scale, then rotate, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl NodeTransform {
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::repeat(1.0),
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Homogeneous matrix `T * R * S`.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Axis-aligned bounds of a node's geometry in the node's own space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl LocalBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a box of full `size` centered at the origin.
    pub fn from_size(size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: -half,
            max: half,
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Restricts which nodes are sampled, by name.
#[derive(Clone, Debug)]
pub enum NameFilter {
    /// Name must equal this string.
    Exact(String),
    /// Name must match this pattern somewhere.
    Pattern(Regex),
}

impl NameFilter {
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Compile `pattern` into a [`NameFilter::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// Unnamed nodes never match.
    pub fn matches(&self, name: Option<&str>) -> bool {
        let Some(name) = name else {
            return false;
        };
        match self {
            NameFilter::Exact(expected) => name == expected,
            NameFilter::Pattern(re) => re.is_match(name),
        }
    }
}

impl PartialEq for NameFilter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NameFilter::Exact(a), NameFilter::Exact(b)) => a == b,
            (NameFilter::Pattern(a), NameFilter::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// Read access to a host's node hierarchy.
pub trait SceneGraph {
    /// Cheap handle identifying one node.
    type Node: Copy;

    /// Direct children of `node`, in the host's order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Transform of `node` relative to its parent.
    fn local_transform(&self, node: Self::Node) -> NodeTransform;

    fn name(&self, node: Self::Node) -> Option<&str>;

    /// Geometry bounds in node space. `Some` only for drawable nodes.
    fn local_bounds(&self, node: Self::Node) -> Option<LocalBounds>;
}

/// World-space footprint of one sampled mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshObservation {
    pub center: Vec3,
    pub size: Vec3,
}

impl MeshObservation {
    /// Grow the footprint by `margin` on each side along X and Z.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.size.x += margin * 2.0;
        self.size.z += margin * 2.0;
        self
    }

    pub fn to_platform_box(&self) -> PlatformBox {
        PlatformBox::new(self.center, self.size)
    }
}

/// Per-axis scale carried by the upper 3x3 block of `m`.
fn matrix_scale(m: &Mat4) -> Vec3 {
    Vec3::new(
        m.fixed_view::<3, 1>(0, 0).norm(),
        m.fixed_view::<3, 1>(0, 1).norm(),
        m.fixed_view::<3, 1>(0, 2).norm(),
    )
}

/// Sample every drawable under `root` (inclusive) that passes `filter`.
///
/// `parent_world` is the world matrix of `root`'s parent; use
/// [`Matrix4::identity`](na::Matrix4::identity) when `root` is a scene root. Order is
/// depth-first, children in host order.
pub fn observe_meshes<G: SceneGraph>(
    graph: &G,
    root: G::Node,
    parent_world: Mat4,
    filter: Option<&NameFilter>,
) -> Vec<MeshObservation> {
    let mut out = Vec::new();
    let mut stack = vec![(root, parent_world)];

    while let Some((node, parent)) = stack.pop() {
        let world = parent * graph.local_transform(node).to_matrix();

        if let Some(bounds) = graph.local_bounds(node) {
            let passes = filter.is_none_or(|f| f.matches(graph.name(node)));
            if passes {
                let center = world.transform_point(&na::Point3::from(bounds.center()));
                out.push(MeshObservation {
                    center: center.coords,
                    size: bounds.size().component_mul(&matrix_scale(&world)),
                });
            }
        }

        // Reverse so the first child is popped first.
        for child in graph.children(node).into_iter().rev() {
            stack.push((child, world));
        }
    }

    out
}

/// Box walls around each observation.
pub fn walls_for_observations(
    observations: &[MeshObservation],
    sides: SideMask,
    margin: f32,
    settings: &WallSettings,
) -> Vec<WallSegment> {
    observations
        .iter()
        .flat_map(|obs| {
            let platform = obs.with_margin(margin).to_platform_box();
            generate_box_walls(&platform, sides, settings.height, settings.thickness)
        })
        .collect()
}

/// Index of a node inside a [`SceneTree`].
///
/// Only meaningful for the tree that issued it. An id past the end of another tree reads
/// as an empty, unnamed, identity node there; one in range aliases that tree's node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct TreeNode {
    name: Option<String>,
    transform: NodeTransform,
    bounds: Option<LocalBounds>,
    children: Vec<NodeId>,
}

/// Owned node hierarchy implementing [`SceneGraph`].
#[derive(Clone, Debug)]
pub struct SceneTree {
    nodes: Vec<TreeNode>,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// A tree holding only an unnamed, non-drawable root at the origin.
    pub fn new() -> Self {
        Self {
            nodes: vec![TreeNode {
                name: None,
                transform: NodeTransform::identity(),
                bounds: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a grouping node under `parent`.
    pub fn add_group(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
        transform: NodeTransform,
    ) -> NodeId {
        self.insert(parent, name, transform, None)
    }

    /// Add a drawable node under `parent`.
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
        transform: NodeTransform,
        bounds: LocalBounds,
    ) -> NodeId {
        self.insert(parent, name, transform, Some(bounds))
    }

    /// Detach every child of `node`. The detached nodes stay allocated but unreachable.
    pub fn clear_children(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.children.clear();
        }
    }

    pub fn set_transform(&mut self, node: NodeId, transform: NodeTransform) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.transform = transform;
        }
    }

    fn node(&self, node: NodeId) -> Option<&TreeNode> {
        self.nodes.get(node.0)
    }

    fn insert(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
        transform: NodeTransform,
        bounds: Option<LocalBounds>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            name: name.map(str::to_owned),
            transform,
            bounds,
            children: Vec::new(),
        });
        // An unknown parent leaves the node allocated but unreachable.
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }
}

impl SceneGraph for SceneTree {
    type Node = NodeId;

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn local_transform(&self, node: NodeId) -> NodeTransform {
        self.node(node).map(|n| n.transform).unwrap_or_default()
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.name.as_deref()
    }

    fn local_bounds(&self, node: NodeId) -> Option<LocalBounds> {
        self.node(node)?.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1.0e-4
    }

    #[test]
    fn nested_translation_and_scale_accumulate() {
        let mut tree = SceneTree::new();
        let group = tree.add_group(
            tree.root(),
            Some("group"),
            NodeTransform::from_translation(Vec3::new(10.0, 0.0, 0.0))
                .with_scale(Vec3::new(2.0, 2.0, 2.0)),
        );
        tree.add_mesh(
            group,
            Some("floor"),
            NodeTransform::from_translation(Vec3::new(1.0, -1.0, 0.0))
                .with_scale(Vec3::new(1.0, 0.5, 3.0)),
            LocalBounds::from_size(Vec3::new(4.0, 2.0, 4.0)),
        );

        let obs = observe_meshes(&tree, tree.root(), Mat4::identity(), None);
        assert_eq!(obs.len(), 1);
        // Child offset is scaled by the parent: 10 + 2*1, 2*-1.
        assert!(close(obs[0].center, Vec3::new(12.0, -2.0, 0.0)));
        // Size picks up both scales.
        assert!(close(obs[0].size, Vec3::new(8.0, 2.0, 24.0)));
    }

    #[test]
    fn off_center_bounds_follow_rotation() {
        let mut tree = SceneTree::new();
        let turned = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        tree.add_mesh(
            tree.root(),
            Some("slab"),
            NodeTransform::identity().with_rotation(turned),
            LocalBounds::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(3.0, 1.0, 1.0)),
        );

        let obs = observe_meshes(&tree, tree.root(), Mat4::identity(), None);
        // Local center (2, 0.5, 0) turned a quarter about +Y lands on (0, 0.5, -2).
        assert!(close(obs[0].center, Vec3::new(0.0, 0.5, -2.0)));
        // Size is scaled, not re-projected.
        assert!(close(obs[0].size, Vec3::new(2.0, 1.0, 2.0)));
    }

    #[test]
    fn filter_skips_non_matching_and_unnamed() {
        let mut tree = SceneTree::new();
        let unit = LocalBounds::from_size(Vec3::new(1.0, 1.0, 1.0));
        tree.add_mesh(tree.root(), Some("ground_a"), NodeTransform::identity(), unit);
        tree.add_mesh(tree.root(), Some("tree"), NodeTransform::identity(), unit);
        tree.add_mesh(tree.root(), None, NodeTransform::identity(), unit);
        tree.add_mesh(tree.root(), Some("ground_b"), NodeTransform::identity(), unit);

        let all = observe_meshes(&tree, tree.root(), Mat4::identity(), None);
        assert_eq!(all.len(), 4);

        let exact = NameFilter::exact("tree");
        assert_eq!(observe_meshes(&tree, tree.root(), Mat4::identity(), Some(&exact)).len(), 1);

        let pattern = NameFilter::pattern("^ground_").unwrap();
        assert_eq!(observe_meshes(&tree, tree.root(), Mat4::identity(), Some(&pattern)).len(), 2);
    }

    #[test]
    fn depth_first_in_child_order() {
        let mut tree = SceneTree::new();
        let unit = LocalBounds::from_size(Vec3::new(1.0, 1.0, 1.0));
        let a = tree.add_group(tree.root(), None, NodeTransform::identity());
        tree.add_mesh(a, None, NodeTransform::from_translation(Vec3::new(1.0, 0.0, 0.0)), unit);
        tree.add_mesh(a, None, NodeTransform::from_translation(Vec3::new(2.0, 0.0, 0.0)), unit);
        let root = tree.root();
        tree.add_mesh(root, None, NodeTransform::from_translation(Vec3::new(3.0, 0.0, 0.0)), unit);

        let xs: Vec<f32> = observe_meshes(&tree, tree.root(), Mat4::identity(), None)
            .iter()
            .map(|o| o.center.x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn foreign_node_ids_read_as_empty() {
        let mut big = SceneTree::new();
        let unit = LocalBounds::from_size(Vec3::new(1.0, 1.0, 1.0));
        let root = big.root();
        let g = big.add_group(root, None, NodeTransform::identity());
        let foreign = big.add_mesh(g, Some("far"), NodeTransform::identity(), unit);

        let mut small = SceneTree::new();
        assert!(small.children(foreign).is_empty());
        assert_eq!(small.local_transform(foreign), NodeTransform::identity());
        assert_eq!(small.name(foreign), None);
        assert_eq!(small.local_bounds(foreign), None);
        assert!(observe_meshes(&small, foreign, Mat4::identity(), None).is_empty());

        small.set_transform(foreign, NodeTransform::from_translation(Vec3::x()));
        small.clear_children(foreign);
        let orphan = small.add_mesh(foreign, None, NodeTransform::identity(), unit);
        assert!(small.children(small.root()).is_empty());
        assert_eq!(small.local_bounds(orphan), Some(unit));
    }

    #[test]
    fn no_drawables_means_no_observations() {
        let mut tree = SceneTree::new();
        tree.add_group(tree.root(), Some("empty"), NodeTransform::identity());
        assert!(observe_meshes(&tree, tree.root(), Mat4::identity(), None).is_empty());
    }

    #[test]
    fn margin_grows_footprint_on_x_and_z_only() {
        let obs = MeshObservation {
            center: Vec3::new(0.0, -0.5, 0.0),
            size: Vec3::new(20.0, 1.0, 10.0),
        };
        let walls = walls_for_observations(&[obs], SideMask::ALL, 1.0, &WallSettings::default());
        assert_eq!(walls.len(), 4);
        // North wall sits on z = (10 + 2) / 2 and spans 22 + thickness.
        assert!((walls[0].center.z - 6.0).abs() < 1.0e-6);
        assert!((walls[0].length() - 22.2).abs() < 1.0e-5);
        // Top face is unchanged.
        assert!((walls[0].center.y - 2.5).abs() < 1.0e-6);
    }

    #[test]
    fn name_filter_equality() {
        assert_eq!(NameFilter::exact("a"), NameFilter::exact("a"));
        assert_ne!(NameFilter::exact("a"), NameFilter::pattern("a").unwrap());
        assert_eq!(NameFilter::pattern("^a$").unwrap(), NameFilter::pattern("^a$").unwrap());
        assert!(NameFilter::pattern("(").is_err());
    }
}
