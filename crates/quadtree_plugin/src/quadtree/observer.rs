//! Observer - the single viewer a quadtree selects detail for.
//!
//! Tracks the viewer's location and facing with change flags, and owns one
//! range sphere per level. Range spheres are centred on the viewer location
//! relative to the floating origin, the same space node bounds live in.

use std::fmt::Debug;

use glam::DVec3;

use super::{Aabb3, RangeSphere};

/// Visibility predicate consulted by the event-emitting selection pass.
pub trait ViewFrustum: Debug + Send + Sync {
  /// Whether `bounds` (origin-relative) is at least partially visible.
  fn intersects(&self, bounds: &Aabb3) -> bool;
}

/// Frustum that reports every box as visible.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnboundedFrustum;

impl ViewFrustum for UnboundedFrustum {
  #[inline]
  fn intersects(&self, _bounds: &Aabb3) -> bool {
    true
  }
}

/// Per-viewer state relevant to LOD selection.
#[derive(Debug)]
pub struct Observer {
  origin: DVec3,

  location: DVec3,
  location_dirty: bool,

  direction: DVec3,
  direction_dirty: bool,

  frustum: Box<dyn ViewFrustum>,

  /// One sphere per level, indexed like node levels.
  ranges: Vec<RangeSphere>,
}

impl Observer {
  /// Observer at the origin with no ranges.
  ///
  /// The location starts dirty so the first update always runs a selection.
  pub fn new() -> Self {
    Self {
      origin: DVec3::ZERO,
      location: DVec3::ZERO,
      location_dirty: true,
      direction: DVec3::ZERO,
      direction_dirty: false,
      frustum: Box::new(UnboundedFrustum),
      ranges: Vec::new(),
    }
  }

  /// Replace the visibility predicate. Marks the direction dirty.
  pub fn set_frustum(&mut self, frustum: Box<dyn ViewFrustum>) {
    self.frustum = frustum;
    self.direction_dirty = true;
  }

  #[inline]
  pub fn frustum(&self) -> &dyn ViewFrustum {
    self.frustum.as_ref()
  }

  /// Floating origin currently applied.
  #[inline]
  pub fn origin(&self) -> DVec3 {
    self.origin
  }

  /// Move the floating origin. Always marks the location dirty.
  pub fn set_origin(&mut self, origin: DVec3) {
    self.origin = origin;
    self.location_dirty = true;
    self.recenter_ranges();
  }

  /// Viewer location, either relative to the floating origin or in world
  /// space.
  #[inline]
  pub fn location(&self, relative_to_origin: bool) -> DVec3 {
    if relative_to_origin {
      self.location - self.origin
    } else {
      self.location
    }
  }

  /// Update the world-space location. Exact comparison, no epsilon.
  ///
  /// Returns true if the location changed.
  pub fn set_location(&mut self, location: DVec3) -> bool {
    if self.location == location {
      return false;
    }

    self.location = location;
    self.location_dirty = true;
    self.recenter_ranges();
    true
  }

  #[inline]
  pub fn has_location_changed(&self) -> bool {
    self.location_dirty
  }

  #[inline]
  pub fn direction(&self) -> DVec3 {
    self.direction
  }

  /// Update the facing. Exact comparison, no epsilon.
  ///
  /// Returns true if the direction changed.
  pub fn set_direction(&mut self, direction: DVec3) -> bool {
    if self.direction == direction {
      return false;
    }

    self.direction = direction;
    self.direction_dirty = true;
    true
  }

  #[inline]
  pub fn has_direction_changed(&self) -> bool {
    self.direction_dirty
  }

  /// Number of levels the ranges cover.
  #[inline]
  pub fn level_count(&self) -> usize {
    self.ranges.len()
  }

  /// Range sphere of `level`.
  ///
  /// # Panics
  /// If `level` is outside the range ladder.
  #[inline]
  pub fn range(&self, level: u8) -> &RangeSphere {
    assert!(
      (level as usize) < self.ranges.len(),
      "range level {} out of bounds ({} levels)",
      level,
      self.ranges.len()
    );
    &self.ranges[level as usize]
  }

  #[inline]
  pub fn ranges(&self) -> &[RangeSphere] {
    &self.ranges
  }

  /// Rebuild the range ladder from per-level radii.
  ///
  /// # Panics
  /// If a radius is not positive or the radii are not strictly increasing.
  pub fn set_ranges(&mut self, radii: &[f64]) {
    assert!(
      radii.first().map_or(true, |r| *r > 0.0),
      "range radii must be positive"
    );
    assert!(
      radii.windows(2).all(|w| w[0] < w[1]),
      "range radii must be strictly increasing"
    );

    let center = self.location(true);
    self.ranges = radii.iter().map(|radius| RangeSphere::new(center, *radius)).collect();
  }

  /// Acknowledge a completed selection pass: clears both change flags.
  pub fn post_select(&mut self) {
    self.location_dirty = false;
    self.direction_dirty = false;
  }

  fn recenter_ranges(&mut self) {
    let center = self.location(true);
    for range in &mut self.ranges {
      range.center = center;
    }
  }
}

impl Default for Observer {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
#[path = "observer_test.rs"]
mod observer_test;
