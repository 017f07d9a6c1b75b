//! Draw hooks for debug visualization.
//!
//! The tree never renders anything itself. Engines implement
//! [`QuadTreeVisualizer`] and pass it to [`super::QuadTree::draw`], which
//! reports the current selection and range ladder in world space.

use super::{Aabb3, NodeKey, RangeSphere};

/// Receiver for debug draw calls.
pub trait QuadTreeVisualizer {
  /// Called once per selected quad.
  fn draw_quad(&mut self, key: NodeKey, world_bounds: &Aabb3, level: u8);

  /// Called once per level with that level's range sphere.
  fn draw_range(&mut self, _level: u8, _world_sphere: &RangeSphere) {}
}

/// Visualizer that calls a closure for each selected quad.
pub struct FnVisualizer<F>
where
  F: FnMut(NodeKey, &Aabb3, u8),
{
  func: F,
}

impl<F> FnVisualizer<F>
where
  F: FnMut(NodeKey, &Aabb3, u8),
{
  pub fn new(func: F) -> Self {
    Self { func }
  }
}

impl<F> QuadTreeVisualizer for FnVisualizer<F>
where
  F: FnMut(NodeKey, &Aabb3, u8),
{
  fn draw_quad(&mut self, key: NodeKey, world_bounds: &Aabb3, level: u8) {
    (self.func)(key, world_bounds, level);
  }
}
