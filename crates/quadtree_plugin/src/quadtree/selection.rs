//! Selection - top-down LOD walk producing a gap-free cover of the root.
//!
//! A node is culled when it misses its own level's range sphere. A node that
//! is in range but whose next finer range sphere misses it is selected as is:
//! it is the coarsest cell still accurate enough near the viewer. Otherwise
//! the walk descends, and every child that culls itself is selected in its
//! parent's place so the region stays covered.
//!
//! Range spheres nest (each level's radius contains the finer one), so the
//! output tiles the root with cells that grow with distance to the viewer.

use std::collections::HashSet;

use super::events::{NodeSelectionEvent, SelectionEventType};
use super::{Aabb3, NodeId, NodeKey, Observer, QuadNode, QuadNodes};

/// One selected cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectedQuad {
  pub key: NodeKey,
  /// Bounds relative to the floating origin at selection time.
  pub bounds: Aabb3,
  pub level: u8,
}

impl From<&QuadNode> for SelectedQuad {
  fn from(node: &QuadNode) -> Self {
    Self {
      key: node.key(),
      bounds: *node.bounds(),
      level: node.level(),
    }
  }
}

/// Ordered output of a selection pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
  quads: Vec<SelectedQuad>,
}

impl Selection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      quads: Vec::with_capacity(capacity),
    }
  }

  #[inline]
  pub fn push(&mut self, node: &QuadNode) {
    self.quads.push(SelectedQuad::from(node));
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.quads.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.quads.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, SelectedQuad> {
    self.quads.iter()
  }

  pub fn as_slice(&self) -> &[SelectedQuad] {
    &self.quads
  }

  /// Keys in selection order.
  pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
    self.quads.iter().map(|quad| quad.key)
  }

  pub fn contains(&self, key: NodeKey) -> bool {
    self.quads.iter().any(|quad| quad.key == key)
  }

  /// Sum of the selected footprints.
  pub fn covered_area(&self) -> f64 {
    self.quads.iter().map(|quad| quad.bounds.area_xy()).sum()
  }

  /// Keys to add and remove to turn `previous` into `self`.
  pub fn diff(&self, previous: &Selection) -> SelectionDelta {
    let current: HashSet<NodeKey> = self.keys().collect();
    let before: HashSet<NodeKey> = previous.keys().collect();

    SelectionDelta {
      added: self.keys().filter(|key| !before.contains(key)).collect(),
      removed: previous.keys().filter(|key| !current.contains(key)).collect(),
    }
  }
}

impl<'a> IntoIterator for &'a Selection {
  type Item = &'a SelectedQuad;
  type IntoIter = std::slice::Iter<'a, SelectedQuad>;

  fn into_iter(self) -> Self::IntoIter {
    self.quads.iter()
  }
}

/// Incremental change between two selections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionDelta {
  /// Newly selected keys, in selection order.
  pub added: Vec<NodeKey>,
  /// Keys no longer selected, in previous selection order.
  pub removed: Vec<NodeKey>,
}

impl SelectionDelta {
  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.removed.is_empty()
  }
}

/// Counters from one selection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionStats {
  /// Nodes whose range sphere was tested.
  pub nodes_visited: usize,
  /// Nodes that missed their own range sphere.
  pub nodes_culled: usize,
  /// Culled nodes selected in place of nothing (including a root fallback).
  pub fallback_selections: usize,
  /// Size of the resulting selection.
  pub selected: usize,
}

/// Select the LOD cover below `id`.
///
/// Returns false if the node missed its range sphere and appended nothing;
/// the caller decides whether to select it in its place.
pub fn select(
  nodes: &QuadNodes,
  id: NodeId,
  observer: &Observer,
  out: &mut Selection,
  stats: &mut SelectionStats,
) -> bool {
  let node = &nodes[id];
  let bounds = node.bounds();
  let level = node.level();
  stats.nodes_visited += 1;

  if !bounds.intersects_sphere(observer.range(level)) {
    stats.nodes_culled += 1;
    return false;
  }

  if level == 0 || !bounds.intersects_sphere(observer.range(level - 1)) {
    out.push(node);
    return true;
  }

  for &child in node.children() {
    if !select(nodes, child, observer, out, stats) {
      out.push(&nodes[child]);
      stats.fallback_selections += 1;
    }
  }

  true
}

/// [`select`] that also records a [`NodeSelectionEvent`] per visited node,
/// in visiting order.
///
/// Range flags are recorded when the observer's location changed, frustum
/// flags when its direction changed. The frustum never alters the selection,
/// so both walks produce identical output.
pub fn select_with_events(
  nodes: &QuadNodes,
  id: NodeId,
  observer: &Observer,
  out: &mut Selection,
  events: &mut Vec<NodeSelectionEvent>,
  stats: &mut SelectionStats,
) -> bool {
  let node = &nodes[id];
  let bounds = node.bounds();
  let level = node.level();
  stats.nodes_visited += 1;

  let mut event = NodeSelectionEvent::new(node.key(), level);
  let in_range = bounds.intersects_sphere(observer.range(level));

  if observer.has_location_changed() {
    event.flags |= if in_range {
      SelectionEventType::IN_RANGE
    } else {
      SelectionEventType::OUT_OF_RANGE
    };
  }

  if !in_range {
    stats.nodes_culled += 1;
    events.push(event);
    return false;
  }

  if observer.has_direction_changed() {
    event.flags |= if observer.frustum().intersects(bounds) {
      SelectionEventType::IN_FRUSTUM
    } else {
      SelectionEventType::OUT_OF_FRUSTUM
    };
  }

  if level == 0 || !bounds.intersects_sphere(observer.range(level - 1)) {
    out.push(node);
    event.selected = true;
    events.push(event);
    return true;
  }

  events.push(event);

  for &child in node.children() {
    if !select_with_events(nodes, child, observer, out, events, stats) {
      out.push(&nodes[child]);
      stats.fallback_selections += 1;
      mark_selected_by_parent(events);
    }
  }

  true
}

/// A culled node pushes its own event last, so the fallback target is always
/// the final entry.
pub(crate) fn mark_selected_by_parent(events: &mut [NodeSelectionEvent]) {
  if let Some(event) = events.last_mut() {
    event.selected = true;
    event.flags |= SelectionEventType::DUE_TO_PARENT;
  }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;
