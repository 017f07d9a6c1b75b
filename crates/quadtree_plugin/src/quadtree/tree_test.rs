use std::collections::HashSet;

use glam::DVec3;

use super::*;
use crate::quadtree::{FnVisualizer, NodeKey, SelectionEventType};

fn small_config(floating_origin: bool) -> QuadTreeConfig {
  QuadTreeConfig {
    minimum_quad_size: 100,
    maximum_quad_size: 800,
    viewer_radius_multiplier: 1.0,
    floating_origin,
  }
}

fn small_tree(floating_origin: bool) -> QuadTree {
  QuadTree::build(small_config(floating_origin)).expect("valid config")
}

fn key_set(selection: &Selection) -> HashSet<NodeKey> {
  selection.keys().collect()
}

#[derive(Default)]
struct RecordingVisualizer {
  quads: Vec<(NodeKey, Aabb3, u8)>,
  ranges: Vec<(u8, RangeSphere)>,
}

impl QuadTreeVisualizer for RecordingVisualizer {
  fn draw_quad(&mut self, key: NodeKey, world_bounds: &Aabb3, level: u8) {
    self.quads.push((key, *world_bounds, level));
  }

  fn draw_range(&mut self, level: u8, world_sphere: &RangeSphere) {
    self.ranges.push((level, *world_sphere));
  }
}

// =========================================================================
// Batch 1: Build
// =========================================================================

#[test]
fn test_build_default() {
  let tree = QuadTree::build(QuadTreeConfig::default()).expect("default config is valid");

  assert_eq!(tree.level_count(), 7);
  assert_eq!(tree.nodes().len(), QuadNodes::node_count_for_levels(7));
  assert_eq!(tree.nodes().len(), 5461);
  assert_eq!(*tree.root().bounds(), Aabb3::centered_cube(102400.0));
  assert_eq!(tree.root().level(), 6);
  assert_eq!(tree.observer().level_count(), 7);
  assert!(tree.selection().is_empty(), "No selection before the first update");
  assert_eq!(tree.passes(), 0);
}

#[test]
fn test_build_rejects_invalid_config() {
  let config = QuadTreeConfig {
    minimum_quad_size: 100,
    maximum_quad_size: 300,
    ..Default::default()
  };
  assert!(matches!(
    QuadTree::build(config),
    Err(QuadTreeError::NotPowerOfTwoMultiple { .. })
  ));
}

// =========================================================================
// Batch 2: Update and dirty tracking
// =========================================================================

#[test]
fn test_first_update_selects() {
  let mut tree = small_tree(false);
  let selection = tree.update(DVec3::ZERO, DVec3::X);

  assert_eq!(selection.len(), 28);
  assert_eq!(selection.covered_area(), 800.0 * 800.0);
  assert_eq!(tree.passes(), 1);
  assert_eq!(tree.stats().selected, 28);
  assert!(!tree.observer().has_location_changed());
  assert!(!tree.observer().has_direction_changed());
}

/// Identical input does not walk the tree again.
#[test]
fn test_unchanged_viewer_skips_selection() {
  let mut tree = small_tree(false);
  let first = tree.update(DVec3::new(30.0, 40.0, 0.0), DVec3::X).clone();
  let second = tree.update(DVec3::new(30.0, 40.0, 0.0), DVec3::X).clone();

  assert_eq!(first, second);
  assert_eq!(tree.passes(), 1);
}

/// Height never influences selection.
#[test]
fn test_viewer_height_is_ignored() {
  let mut tree = small_tree(false);
  let high = tree.update(DVec3::new(30.0, 40.0, 900.0), DVec3::X).clone();
  let low = tree.update(DVec3::new(30.0, 40.0, -25.0), DVec3::X).clone();

  assert_eq!(high, low);
  assert_eq!(tree.passes(), 1, "Flattened location did not change");
  assert_eq!(tree.observer().location(false).z, 0.0);
}

#[test]
fn test_direction_change_reselects() {
  let mut tree = small_tree(false);
  tree.update(DVec3::ZERO, DVec3::X);
  tree.update(DVec3::ZERO, DVec3::Y);
  assert_eq!(tree.passes(), 2);
}

/// Moving the viewer refines the region under it.
#[test]
fn test_moving_viewer_changes_selection() {
  let mut tree = small_tree(false);
  let before = tree.update(DVec3::ZERO, DVec3::X).clone();
  let after = tree.update(DVec3::new(-350.0, 350.0, 0.0), DVec3::X).clone();

  let delta = after.diff(&before);
  assert!(!delta.added.is_empty());
  assert!(!delta.removed.is_empty());
  assert_eq!(after.covered_area(), 800.0 * 800.0);

  let under: Vec<_> = after
    .iter()
    .filter(|quad| quad.bounds.contains_point(DVec3::new(-350.0, 350.0, 0.0)))
    .collect();
  assert!(under.iter().all(|quad| quad.level == 0));
}

/// A viewer beyond the root range still gets the root.
#[test]
fn test_root_fallback() {
  let mut tree = small_tree(false);
  let root_key = tree.root().key();
  let selection = tree.update(DVec3::new(10_000.0, 0.0, 0.0), DVec3::X);

  assert_eq!(selection.len(), 1);
  assert_eq!(selection.as_slice()[0].key, root_key);
  assert_eq!(tree.stats().fallback_selections, 1);
  assert_eq!(tree.stats().nodes_culled, 1);
}

// =========================================================================
// Batch 3: Floating origin
// =========================================================================

#[test]
fn test_floating_origin_follows_viewer() {
  let mut tree = small_tree(true);
  tree.update(DVec3::new(1010.0, -20.0, 0.0), DVec3::X);

  assert_eq!(tree.target_origin(), DVec3::new(1000.0, 0.0, 0.0));
  assert_eq!(tree.observer().origin(), tree.target_origin());
  assert_eq!(
    tree.observer().location(true),
    DVec3::new(10.0, -20.0, 0.0),
    "Viewer is local to the origin"
  );
  assert_eq!(
    *tree.root().bounds(),
    Aabb3::centered_cube(800.0),
    "Bounds stay origin-relative"
  );
  assert_eq!(tree.selection().covered_area(), 800.0 * 800.0);
}

/// Moves within one snap cell leave the origin alone.
#[test]
fn test_floating_origin_snaps() {
  let mut tree = small_tree(true);
  tree.update(DVec3::new(1010.0, 0.0, 0.0), DVec3::X);
  let root_key = tree.root().key();

  tree.update(DVec3::new(1080.0, 90.0, 0.0), DVec3::X);
  assert_eq!(tree.target_origin(), DVec3::new(1000.0, 0.0, 0.0));
  assert_eq!(tree.root().key(), root_key, "No rebase inside a snap cell");

  tree.update(DVec3::new(1120.0, 90.0, 0.0), DVec3::X);
  assert_eq!(tree.target_origin(), DVec3::new(1200.0, 0.0, 0.0));
  assert_ne!(tree.root().key(), root_key, "Keys follow the world position");
}

/// Travelling away and back restores the exact keys.
#[test]
fn test_floating_origin_round_trip_keys() {
  let mut tree = small_tree(true);
  let home = key_set(tree.update(DVec3::ZERO, DVec3::X));

  let away = key_set(tree.update(DVec3::new(5000.0, -3000.0, 0.0), DVec3::X));
  assert!(home.is_disjoint(&away));

  let back = key_set(tree.update(DVec3::ZERO, DVec3::X));
  assert_eq!(home, back);
}

/// Draw output is shifted back by the floating origin.
#[test]
fn test_draw_reports_world_space() {
  let location = DVec3::new(1010.0, -20.0, 0.0);
  let mut tree = small_tree(true);
  tree.update(location, DVec3::X);

  let mut recorder = RecordingVisualizer::default();
  tree.draw(&mut recorder);

  assert_eq!(recorder.quads.len(), tree.selection().len());
  assert_eq!(recorder.ranges.len(), tree.level_count() as usize);
  for (level, sphere) in &recorder.ranges {
    assert_eq!(sphere.center, location, "Level {} range off the viewer", level);
  }

  let world_root = Aabb3::centered_cube(800.0).translated(tree.target_origin());
  let area: f64 = recorder
    .quads
    .iter()
    .inspect(|(_, bounds, _)| {
      assert!(bounds.min.x >= world_root.min.x && bounds.max.x <= world_root.max.x);
      assert!(bounds.min.y >= world_root.min.y && bounds.max.y <= world_root.max.y);
    })
    .map(|(_, bounds, _)| bounds.area_xy())
    .sum();
  assert_eq!(area, 800.0 * 800.0);

  assert!(recorder
    .quads
    .iter()
    .any(|(_, bounds, level)| *level == 0 && bounds.contains_point(location)));
}

#[test]
fn test_fn_visualizer_sees_every_quad() {
  let mut tree = small_tree(false);
  tree.update(DVec3::ZERO, DVec3::X);

  let mut levels = Vec::new();
  tree.draw(&mut FnVisualizer::new(|_, _, level| levels.push(level)));
  assert_eq!(levels.len(), 28);
  assert!(levels.iter().all(|level| *level <= 1));
}

#[test]
fn test_origin_change_ignored_without_floating_origin() {
  let mut tree = small_tree(false);
  tree.update(DVec3::ZERO, DVec3::X);
  let root_key = tree.root().key();

  assert!(!tree.on_origin_changed(DVec3::new(400.0, 0.0, 0.0)));
  assert_eq!(tree.target_origin(), DVec3::ZERO);
  assert_eq!(tree.root().key(), root_key);
  assert!(!tree.observer().has_location_changed());
}

#[test]
fn test_origin_change_rebases() {
  let mut tree = small_tree(true);
  tree.update(DVec3::ZERO, DVec3::X);
  let root_key = tree.root().key();

  assert!(tree.on_origin_changed(DVec3::new(400.0, 0.0, 0.0)));
  assert_eq!(tree.target_origin(), DVec3::new(400.0, 0.0, 0.0));
  assert_ne!(tree.root().key(), root_key);
  assert!(
    tree.observer().has_location_changed(),
    "Next update must reselect"
  );
}

/// An explicit origin survives updates until the viewer changes snap cell.
#[test]
fn test_explicit_origin_holds_inside_snap_cell() {
  let mut tree = small_tree(true);
  tree.update(DVec3::ZERO, DVec3::X);

  let explicit = DVec3::new(400.0, 0.0, 0.0);
  assert!(tree.on_origin_changed(explicit));
  let rebased_key = tree.root().key();

  tree.update(DVec3::new(60.0, -40.0, 0.0), DVec3::X);
  assert_eq!(tree.target_origin(), explicit, "Same snap cell keeps the origin");
  assert_eq!(tree.root().key(), rebased_key);
  assert_eq!(tree.observer().location(true), DVec3::new(-340.0, -40.0, 0.0));
  assert_eq!(tree.selection().covered_area(), 800.0 * 800.0);

  tree.update(DVec3::new(250.0, 0.0, 0.0), DVec3::X);
  assert_eq!(
    tree.target_origin(),
    DVec3::new(200.0, 0.0, 0.0),
    "New snap cell follows the viewer again"
  );
}

// =========================================================================
// Batch 4: Events
// =========================================================================

#[test]
fn test_event_update_matches_plain_update() {
  let location = DVec3::new(-120.0, 260.0, 0.0);
  let mut plain = small_tree(false);
  let mut evented = small_tree(false);
  let mut events = Vec::new();

  let a = plain.update(location, DVec3::X).clone();
  let b = evented.update_with_events(location, DVec3::X, &mut events).clone();

  assert_eq!(a, b);
  assert_eq!(events.len(), evented.stats().nodes_visited, "First pass reports all");
}

/// Later passes only report nodes whose status flipped.
#[test]
fn test_event_update_reports_transitions() {
  let mut tree = small_tree(false);
  let mut events = Vec::new();
  tree.update_with_events(DVec3::ZERO, DVec3::X, &mut events);

  events.clear();
  tree.update_with_events(DVec3::ZERO, DVec3::X, &mut events);
  assert!(events.is_empty(), "Nothing changed, nothing reported");

  tree.update_with_events(DVec3::new(10.0, 0.0, 0.0), DVec3::X, &mut events);
  assert!(events.len() < tree.stats().nodes_visited);
}

#[test]
fn test_event_update_root_fallback() {
  let mut tree = small_tree(false);
  let root_key = tree.root().key();
  let mut events = Vec::new();
  tree.update_with_events(DVec3::new(10_000.0, 0.0, 0.0), DVec3::X, &mut events);

  assert_eq!(events.len(), 1);
  let root = events[0];
  assert_eq!(root.key, root_key);
  assert!(root.selected);
  assert!(root
    .flags
    .contains(SelectionEventType::OUT_OF_RANGE | SelectionEventType::DUE_TO_PARENT));
}
