//! Double-precision bounding volumes used by the quadtree.
//!
//! Selection is planar: only X/Y take part in intersection tests. The Z extent
//! of a box exists so each level can be drawn with a distinguishable height.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl Aabb3 {
  /// Create a new AABB from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a new AABB from center and half-extents.
  pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
    Self {
      min: center - half_extents,
      max: center + half_extents,
    }
  }

  /// Cube of edge `size` centred on the origin.
  pub fn centered_cube(size: f64) -> Self {
    Self::from_center_half_extents(DVec3::ZERO, DVec3::splat(size * 0.5))
  }

  /// True if the X/Y footprints share interior area (touching edges do not
  /// count).
  #[inline]
  pub fn overlaps_interior_xy(&self, other: &Aabb3) -> bool {
    self.min.x < other.max.x
      && self.max.x > other.min.x
      && self.min.y < other.max.y
      && self.max.y > other.min.y
  }

  /// Check if this AABB contains a point.
  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  /// Same box shifted by `offset`.
  #[inline]
  pub fn translated(&self, offset: DVec3) -> Self {
    Self {
      min: self.min + offset,
      max: self.max + offset,
    }
  }

  /// Footprint area in the X/Y plane.
  #[inline]
  pub fn area_xy(&self) -> f64 {
    let size = self.size();
    size.x * size.y
  }

  /// Planar sphere-AABB test. Boundary contact counts as intersecting.
  #[inline]
  pub fn intersects_sphere(&self, sphere: &RangeSphere) -> bool {
    let c = sphere.center;
    let dx = (self.min.x - c.x).max(0.0).max(c.x - self.max.x);
    let dy = (self.min.y - c.y).max(0.0).max(c.y - self.max.y);
    dx * dx + dy * dy <= sphere.radius * sphere.radius
  }
}

/// Per-level inclusion volume centred on the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSphere {
  /// Sphere center, relative to the current floating origin.
  pub center: DVec3,
  /// Sphere radius in world units.
  pub radius: f64,
}

impl RangeSphere {
  /// Create a sphere.
  pub fn new(center: DVec3, radius: f64) -> Self {
    Self { center, radius }
  }
}
