//! QuadTree - root aggregate owning the hierarchy and its single observer.
//!
//! # Update sequence
//!
//! 1. Flatten the viewer onto the plane (Z = 0).
//! 2. With floating origin enabled, snap the viewer to the origin grid; if
//!    the viewer entered another snap cell, rebase every node key and the
//!    observer onto it.
//! 3. Feed location/direction to the observer.
//! 4. Only if either changed, walk the tree from the root and replace the
//!    stored selection, then acknowledge with `post_select`.

use glam::DVec3;
use tracing::{debug, trace};

use super::events::{NodeSelectionEvent, SelectionTracker};
use super::selection::{mark_selected_by_parent, select, select_with_events};
use super::{
  Aabb3, NodeId, Observer, QuadNode, QuadNodes, QuadTreeConfig, QuadTreeVisualizer, RangeSphere,
  Selection, SelectionStats, ViewFrustum,
};
use crate::error::QuadTreeError;

/// Quadtree with LOD selection for one viewer.
#[derive(Debug)]
pub struct QuadTree {
  config: QuadTreeConfig,
  level_count: u8,
  observer: Observer,
  nodes: QuadNodes,
  /// Current floating origin.
  target_origin: DVec3,
  /// Snap cell of the viewer when the origin was last followed.
  viewer_cell: DVec3,
  selection: Selection,
  stats: SelectionStats,
  tracker: SelectionTracker,
  /// Number of selection walks performed.
  passes: u64,
}

impl QuadTree {
  /// Validate `config` and construct the full hierarchy and range ladder.
  #[tracing::instrument(
    level = "debug",
    skip_all,
    fields(min = config.minimum_quad_size, max = config.maximum_quad_size)
  )]
  pub fn build(config: QuadTreeConfig) -> Result<Self, QuadTreeError> {
    config.validate()?;

    let level_count = config.level_count();
    let mut observer = Observer::new();
    observer.set_ranges(&config.range_radii());

    let root_bounds = Aabb3::centered_cube(config.maximum_quad_size as f64);
    let nodes = QuadNodes::build(root_bounds, level_count - 1);

    debug!(levels = level_count, nodes = nodes.len(), "built quadtree");

    Ok(Self {
      config,
      level_count,
      observer,
      nodes,
      target_origin: DVec3::ZERO,
      viewer_cell: DVec3::ZERO,
      selection: Selection::new(),
      stats: SelectionStats::default(),
      tracker: SelectionTracker::new(),
      passes: 0,
    })
  }

  /// Update for the viewer and return the current selection.
  ///
  /// The previous selection is returned untouched when neither location nor
  /// direction changed.
  #[tracing::instrument(level = "trace", skip(self))]
  pub fn update(&mut self, location: DVec3, direction: DVec3) -> &Selection {
    self.prepare(location, direction);

    if self.needs_selection() {
      let mut selection = Selection::with_capacity(self.selection.len());
      let mut stats = SelectionStats::default();

      if !select(&self.nodes, NodeId::ROOT, &self.observer, &mut selection, &mut stats) {
        self.select_root_fallback(&mut selection, &mut stats);
      }

      self.finish_pass(selection, stats);
    }

    &self.selection
  }

  /// [`Self::update`] that also appends the node status transitions since
  /// the previous event pass to `events`.
  #[tracing::instrument(level = "trace", skip(self, events))]
  pub fn update_with_events(
    &mut self,
    location: DVec3,
    direction: DVec3,
    events: &mut Vec<NodeSelectionEvent>,
  ) -> &Selection {
    self.prepare(location, direction);

    if self.needs_selection() {
      let mut selection = Selection::with_capacity(self.selection.len());
      let mut stats = SelectionStats::default();
      let mut pass_events = Vec::new();

      if !select_with_events(
        &self.nodes,
        NodeId::ROOT,
        &self.observer,
        &mut selection,
        &mut pass_events,
        &mut stats,
      ) {
        self.select_root_fallback(&mut selection, &mut stats);
        mark_selected_by_parent(&mut pass_events);
      }

      events.extend(self.tracker.transitions(&pass_events));
      self.finish_pass(selection, stats);
    }

    &self.selection
  }

  /// Move the floating origin explicitly.
  ///
  /// Ignored (returns false) unless floating origin is enabled. The origin
  /// holds until the viewer crosses into another snap cell, at which point
  /// [`Self::update`] snaps it back onto the viewer.
  pub fn on_origin_changed(&mut self, new_origin: DVec3) -> bool {
    if !self.config.floating_origin {
      debug!("floating origin disabled, ignoring origin change");
      return false;
    }

    self.rebase(new_origin);
    true
  }

  /// Report the current selection and range spheres in world space.
  pub fn draw<V: QuadTreeVisualizer>(&self, visualizer: &mut V) {
    let origin = self.observer.origin();

    for (level, range) in self.observer.ranges().iter().enumerate() {
      let world = RangeSphere::new(range.center + origin, range.radius);
      visualizer.draw_range(level as u8, &world);
    }

    for quad in &self.selection {
      visualizer.draw_quad(quad.key, &quad.bounds.translated(origin), quad.level);
    }
  }

  /// Replace the observer's visibility predicate.
  pub fn set_frustum(&mut self, frustum: Box<dyn ViewFrustum>) {
    self.observer.set_frustum(frustum);
  }

  #[inline]
  pub fn config(&self) -> &QuadTreeConfig {
    &self.config
  }

  #[inline]
  pub fn level_count(&self) -> u8 {
    self.level_count
  }

  #[inline]
  pub fn observer(&self) -> &Observer {
    &self.observer
  }

  #[inline]
  pub fn nodes(&self) -> &QuadNodes {
    &self.nodes
  }

  #[inline]
  pub fn root(&self) -> &QuadNode {
    &self.nodes[NodeId::ROOT]
  }

  /// Selection produced by the latest pass.
  #[inline]
  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  /// Counters of the latest pass.
  #[inline]
  pub fn stats(&self) -> SelectionStats {
    self.stats
  }

  #[inline]
  pub fn target_origin(&self) -> DVec3 {
    self.target_origin
  }

  /// Number of selection walks performed since build.
  #[inline]
  pub fn passes(&self) -> u64 {
    self.passes
  }

  fn prepare(&mut self, location: DVec3, direction: DVec3) {
    let location = DVec3::new(location.x, location.y, 0.0);

    if self.config.floating_origin {
      let cell = self.config.snap_origin(location);
      if cell != self.viewer_cell {
        self.viewer_cell = cell;
        if cell != self.target_origin {
          self.rebase(cell);
        }
      }
    }

    self.observer.set_location(location);
    self.observer.set_direction(direction);
  }

  #[tracing::instrument(level = "debug", skip(self))]
  fn rebase(&mut self, new_origin: DVec3) {
    self.target_origin = new_origin;
    let rebased = self.nodes.on_origin_changed(NodeId::ROOT, None, new_origin, true);
    self.observer.set_origin(new_origin);
    debug!(rebased, "rebased quadtree");
  }

  #[inline]
  fn needs_selection(&self) -> bool {
    self.observer.has_location_changed() || self.observer.has_direction_changed()
  }

  /// The root missed its own range: keep the cover non-empty.
  fn select_root_fallback(&self, selection: &mut Selection, stats: &mut SelectionStats) {
    debug!("viewer outside every range, selecting root");
    selection.push(self.root());
    stats.fallback_selections += 1;
  }

  fn finish_pass(&mut self, selection: Selection, mut stats: SelectionStats) {
    stats.selected = selection.len();
    trace!(
      visited = stats.nodes_visited,
      culled = stats.nodes_culled,
      selected = stats.selected,
      "selection pass"
    );

    self.selection = selection;
    self.stats = stats;
    self.passes += 1;
    self.observer.post_select();
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
