//! QuadTreeConfig - level ladder and range radii derived from quad sizes.

use glam::DVec3;

use crate::error::QuadTreeError;

/// Deepest hierarchy [`QuadTreeConfig::validate`] accepts. The tree is built
/// eagerly, so 12 levels already means ~5.6M nodes.
pub const MAX_LEVEL_COUNT: u32 = 12;

/// Configuration for quadtree construction and LOD ranges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuadTreeConfig {
  /// Edge length of the finest (level 0) cell.
  pub minimum_quad_size: u32,

  /// Edge length of the root cell. Must be a power-of-two multiple of
  /// `minimum_quad_size`.
  pub maximum_quad_size: u32,

  /// Scales the level 0 range radius; raise it for fast-moving viewers.
  pub viewer_radius_multiplier: f64,

  /// Re-centre the tree on the viewer as it travels.
  pub floating_origin: bool,
}

impl QuadTreeConfig {
  /// Check the quad sizes describe a valid power-of-two ladder.
  pub fn validate(&self) -> Result<(), QuadTreeError> {
    let minimum = self.minimum_quad_size;
    let maximum = self.maximum_quad_size;

    if minimum == 0 {
      return Err(QuadTreeError::InvalidMinimumSize);
    }
    if maximum <= minimum {
      return Err(QuadTreeError::MaximumNotGreater { minimum, maximum });
    }
    if maximum % minimum != 0 || !(maximum / minimum).is_power_of_two() {
      return Err(QuadTreeError::NotPowerOfTwoMultiple { minimum, maximum });
    }

    let multiplier = self.viewer_radius_multiplier;
    if !multiplier.is_finite() || multiplier <= 0.0 {
      return Err(QuadTreeError::InvalidRadiusMultiplier(multiplier));
    }

    let levels = (maximum / minimum).trailing_zeros() + 1;
    if levels > MAX_LEVEL_COUNT {
      return Err(QuadTreeError::TooManyLevels {
        levels,
        max: MAX_LEVEL_COUNT,
      });
    }

    Ok(())
  }

  /// `log2(maximum / minimum) + 1`. Only meaningful for a valid config.
  #[inline]
  pub fn level_count(&self) -> u8 {
    ((self.maximum_quad_size / self.minimum_quad_size).trailing_zeros() + 1) as u8
  }

  /// Edge length of a cell at `level`.
  #[inline]
  pub fn quad_size(&self, level: u8) -> f64 {
    self.minimum_quad_size as f64 * (1u64 << level) as f64
  }

  /// Range radius per level: `minimum * multiplier`, doubling per level.
  pub fn range_radii(&self) -> Vec<f64> {
    let base = self.minimum_quad_size as f64 * self.viewer_radius_multiplier;
    (0..self.level_count())
      .map(|level| base * (1u64 << level) as f64)
      .collect()
  }

  /// Grid spacing the floating origin snaps to.
  #[inline]
  pub fn origin_snap_size(&self) -> f64 {
    self.maximum_quad_size as f64 * 0.25
  }

  /// Nearest origin grid point to `location` in X/Y. Z is always zero.
  pub fn snap_origin(&self, location: DVec3) -> DVec3 {
    let snap = self.origin_snap_size();
    DVec3::new(
      (location.x / snap).round() * snap,
      (location.y / snap).round() * snap,
      0.0,
    )
  }
}

impl Default for QuadTreeConfig {
  fn default() -> Self {
    Self {
      minimum_quad_size: 1600,
      maximum_quad_size: 102400,
      viewer_radius_multiplier: 1.0,
      floating_origin: false,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
