//! NodeKey - deterministic identity of a quadtree cell.
//!
//! A key is derived from the parent's key, the world-space minimum corner of
//! the cell, its quadrant and its level. It never depends on arena indices or
//! on when a node was built, so it can be used to map cells to resources that
//! live outside the tree.

use glam::DVec3;

/// Position of a node relative to its parent.
///
/// Layout of a split (X/Y halves of the parent bounds):
/// - `TopLeft`: upper X, lower Y
/// - `TopRight`: upper X, upper Y
/// - `BottomLeft`: lower X, lower Y
/// - `BottomRight`: lower X, upper Y
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Quadrant {
  TopLeft = 0,
  TopRight = 1,
  BottomLeft = 2,
  BottomRight = 3,
  /// The root has no parent-relative quadrant.
  None = 4,
}

impl Quadrant {
  /// Child quadrants in traversal order.
  pub const CHILDREN: [Quadrant; 4] = [
    Quadrant::TopLeft,
    Quadrant::TopRight,
    Quadrant::BottomLeft,
    Quadrant::BottomRight,
  ];

  /// Whether this quadrant covers the upper X half of its parent.
  #[inline]
  pub fn upper_x(self) -> bool {
    matches!(self, Quadrant::TopLeft | Quadrant::TopRight)
  }

  /// Whether this quadrant covers the upper Y half of its parent.
  #[inline]
  pub fn upper_y(self) -> bool {
    matches!(self, Quadrant::TopRight | Quadrant::BottomRight)
  }
}

/// 64-bit hash combiner. Order sensitive: `combine(a, b) != combine(b, a)`.
#[inline]
pub fn hash_combine(seed: u64, value: u64) -> u64 {
  seed
    ^ value
      .wrapping_add(0x9e37_79b9_7f4a_7c15)
      .wrapping_add(seed << 6)
      .wrapping_add(seed >> 2)
}

/// Positional hash of a corner. `-0.0` and `0.0` hash identically.
#[inline]
pub fn hash_position(position: DVec3) -> u64 {
  let bits = |v: f64| if v == 0.0 { 0u64 } else { v.to_bits() };
  let seed = hash_combine(0, bits(position.x));
  let seed = hash_combine(seed, bits(position.y));
  hash_combine(seed, bits(position.z))
}

#[inline]
fn pack(quadrant: Quadrant, level: u8) -> u64 {
  ((quadrant as u64) << 8) | level as u64
}

/// Opaque, hashable node identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct NodeKey(u64);

impl NodeKey {
  /// Key that identifies no node.
  pub const INVALID: Self = Self(0);

  /// Key of the root cell.
  pub fn root(min_corner: DVec3, level: u8) -> Self {
    Self(hash_combine(hash_position(min_corner), pack(Quadrant::None, level)))
  }

  /// Key of a child cell, folded with its parent's key.
  pub fn child(parent: &NodeKey, min_corner: DVec3, quadrant: Quadrant, level: u8) -> Self {
    let seed = hash_combine(parent.0, hash_position(min_corner));
    Self(hash_combine(seed, pack(quadrant, level)))
  }

  /// Root key when `parent` is `None`, child key otherwise.
  pub fn derive(
    parent: Option<&NodeKey>,
    min_corner: DVec3,
    quadrant: Quadrant,
    level: u8,
  ) -> Self {
    match parent {
      None => Self::root(min_corner, level),
      Some(parent) => Self::child(parent, min_corner, quadrant, level),
    }
  }

  /// Raw key value.
  #[inline]
  pub fn raw(&self) -> u64 {
    self.0
  }

  #[inline]
  pub fn is_valid(&self) -> bool {
    self.0 != 0
  }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
