//! QuadNode storage - a dense arena holding the fully subdivided hierarchy.
//!
//! The tree shape never changes after construction, so nodes live in one
//! `Vec` addressed by [`NodeId`]. Children are owned through their ids and
//! nodes hold no reference back to their parent: anything that needs the
//! parent (key derivation, rebasing) receives the parent key as an argument.

use std::ops::Index;

use glam::DVec3;
use smallvec::SmallVec;

use super::{Aabb3, NodeKey, Quadrant};

/// Index of a node inside [`QuadNodes`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
  /// The first node constructed is always the root.
  pub const ROOT: Self = Self(0);

  /// Arena slot of this node.
  #[inline]
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

/// One square region of space at one level.
#[derive(Clone, Debug)]
pub struct QuadNode {
  key: NodeKey,
  quadrant: Quadrant,
  bounds: Aabb3,
  level: u8,
  /// Empty for leaves, exactly 4 entries otherwise (in [`Quadrant::CHILDREN`]
  /// order).
  children: SmallVec<[NodeId; 4]>,
}

impl QuadNode {
  #[inline]
  pub fn key(&self) -> NodeKey {
    self.key
  }

  #[inline]
  pub fn quadrant(&self) -> Quadrant {
    self.quadrant
  }

  /// Bounds relative to the current floating origin.
  #[inline]
  pub fn bounds(&self) -> &Aabb3 {
    &self.bounds
  }

  /// Level of detail (0 = finest, higher = coarser).
  #[inline]
  pub fn level(&self) -> u8 {
    self.level
  }

  #[inline]
  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }
}

/// Arena of quadtree nodes.
#[derive(Clone, Debug, Default)]
pub struct QuadNodes {
  nodes: Vec<QuadNode>,
}

impl QuadNodes {
  /// Create an empty arena.
  pub fn new() -> Self {
    Self { nodes: Vec::new() }
  }

  /// Number of nodes in a fully subdivided tree with `level_count` levels:
  /// `(4^levels - 1) / 3`.
  pub fn node_count_for_levels(level_count: u8) -> usize {
    ((1usize << (2 * level_count as usize)) - 1) / 3
  }

  /// Build the complete hierarchy below a root of the given bounds and
  /// level. The root ends up at [`NodeId::ROOT`].
  pub fn build(root_bounds: Aabb3, root_level: u8) -> Self {
    let mut nodes = Self {
      nodes: Vec::with_capacity(Self::node_count_for_levels(root_level + 1)),
    };
    nodes.construct(None, Quadrant::None, root_bounds, root_level);
    nodes
  }

  /// Push a node, derive its key from `parent` and subdivide it down to
  /// level 0.
  pub fn construct(
    &mut self,
    parent: Option<&NodeKey>,
    quadrant: Quadrant,
    bounds: Aabb3,
    level: u8,
  ) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(QuadNode {
      key: NodeKey::derive(parent, bounds.min, quadrant, level),
      quadrant,
      bounds,
      level,
      children: SmallVec::new(),
    });

    if level > 0 {
      self.split(id);
    }

    id
  }

  /// Create the 4 children of a node.
  ///
  /// Returns false if the node is a leaf (level 0) or already split.
  pub fn split(&mut self, id: NodeId) -> bool {
    let node = &self.nodes[id.index()];
    if !node.children.is_empty() || node.level == 0 {
      return false;
    }

    let parent_key = node.key;
    let next_level = node.level - 1;
    let quadrants = Self::split_bounds(&node.bounds);
    let children: SmallVec<[NodeId; 4]> = quadrants
      .into_iter()
      .map(|(quadrant, bounds)| self.construct(Some(&parent_key), quadrant, bounds, next_level))
      .collect();

    self.nodes[id.index()].children = children;
    true
  }

  /// Partition `bounds` into its 4 quadrants in traversal order.
  ///
  /// X/Y are halved. The Z extent of every child is half the parent's,
  /// centred on zero, so each level draws at a distinguishable height.
  pub fn split_bounds(bounds: &Aabb3) -> [(Quadrant, Aabb3); 4] {
    let min = bounds.min;
    let max = bounds.max;
    let half = bounds.size() * 0.5;
    let quarter_z = half.z * 0.5;
    let mid_x = min.x + half.x;
    let mid_y = min.y + half.y;

    Quadrant::CHILDREN.map(|quadrant| {
      let (x0, x1) = if quadrant.upper_x() { (mid_x, max.x) } else { (min.x, mid_x) };
      let (y0, y1) = if quadrant.upper_y() { (mid_y, max.y) } else { (min.y, mid_y) };
      (
        quadrant,
        Aabb3::new(DVec3::new(x0, y0, -quarter_z), DVec3::new(x1, y1, quarter_z)),
      )
    })
  }

  /// Re-derive keys for a new floating origin.
  ///
  /// Keys are computed from the world-space minimum corner (`bounds + origin`)
  /// while the stored bounds stay relative to the origin. When `recursive`,
  /// every descendant is re-keyed from its own immediate parent.
  ///
  /// Returns the number of nodes re-keyed.
  pub fn on_origin_changed(
    &mut self,
    id: NodeId,
    parent: Option<&NodeKey>,
    new_origin: DVec3,
    recursive: bool,
  ) -> usize {
    let node = &mut self.nodes[id.index()];
    let world_bounds = node.bounds.translated(new_origin);
    node.key = NodeKey::derive(parent, world_bounds.min, node.quadrant, node.level);

    if !recursive {
      return 1;
    }

    let key = node.key;
    let children = node.children.clone();
    1 + children
      .into_iter()
      .map(|child| self.on_origin_changed(child, Some(&key), new_origin, true))
      .sum::<usize>()
  }

  /// Node by id.
  #[inline]
  pub fn get(&self, id: NodeId) -> Option<&QuadNode> {
    self.nodes.get(id.index())
  }

  /// Root node, if the arena has been built.
  #[inline]
  pub fn root(&self) -> Option<&QuadNode> {
    self.nodes.first()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Iterate over all nodes in construction (depth-first) order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &QuadNode)> {
    self
      .nodes
      .iter()
      .enumerate()
      .map(|(index, node)| (NodeId(index as u32), node))
  }
}

impl Index<NodeId> for QuadNodes {
  type Output = QuadNode;

  #[inline]
  fn index(&self, id: NodeId) -> &QuadNode {
    &self.nodes[id.index()]
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
