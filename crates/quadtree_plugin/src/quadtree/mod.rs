//! Quadtree module for distance-based LOD selection around a single viewer.
//!
//! The hierarchy is subdivided eagerly down to the minimum quad size when the
//! tree is built, so selection is a pure top-down walk with no allocation of
//! nodes. Each walk produces a gap-free cover of the root region.
//!
//! # LOD Convention
//!
//! Level 0 = finest detail (smallest cells), higher level = coarser.
//!
//! ```text
//! Quad Size(level)    = minimum_quad_size * 2^level
//! Range Radius(level) = minimum_quad_size * viewer_radius_multiplier * 2^level
//! Level Count         = log2(maximum_quad_size / minimum_quad_size) + 1
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `Aabb3`, `RangeSphere` - planar intersection primitives
//! - [`key`]: `NodeKey`, `Quadrant` - hashed node identity
//! - [`node`]: `QuadNodes` - dense arena of the subdivided hierarchy
//! - [`observer`]: `Observer` - viewer state with dirty flags and ranges
//! - [`selection`]: recursive LOD selection
//! - [`events`]: per-node selection events and transition tracking
//! - [`config`]: `QuadTreeConfig` - validation and the level ladder
//! - [`tree`]: `QuadTree` - build, update, floating origin
//! - [`visualize`]: debug draw hooks

pub mod bounds;
pub mod config;
pub mod events;
pub mod key;
pub mod node;
pub mod observer;
pub mod selection;
pub mod tree;
pub mod visualize;

// Re-exports
pub use bounds::{Aabb3, RangeSphere};
pub use config::{QuadTreeConfig, MAX_LEVEL_COUNT};
pub use events::{NodeSelectionEvent, SelectionEventType, SelectionTracker};
pub use key::{NodeKey, Quadrant};
pub use node::{NodeId, QuadNode, QuadNodes};
pub use observer::{Observer, UnboundedFrustum, ViewFrustum};
pub use selection::{
  select, select_with_events, SelectedQuad, Selection, SelectionDelta, SelectionStats,
};
pub use tree::QuadTree;
pub use visualize::{FnVisualizer, QuadTreeVisualizer};
