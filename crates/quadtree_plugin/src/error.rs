//! Errors raised while validating a quadtree configuration.

use thiserror::Error;

/// Configuration rejected by [`crate::QuadTree::build`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadTreeError {
  #[error("minimum quad size must be greater than zero")]
  InvalidMinimumSize,

  #[error("maximum quad size {maximum} must be greater than minimum quad size {minimum}")]
  MaximumNotGreater { minimum: u32, maximum: u32 },

  #[error(
    "maximum quad size {maximum} must be a power-of-two multiple of minimum quad size {minimum}"
  )]
  NotPowerOfTwoMultiple { minimum: u32, maximum: u32 },

  #[error("viewer radius multiplier must be finite and positive, got {0}")]
  InvalidRadiusMultiplier(f64),

  #[error("{levels} levels requested, at most {max} are supported")]
  TooManyLevels { levels: u32, max: u32 },
}
