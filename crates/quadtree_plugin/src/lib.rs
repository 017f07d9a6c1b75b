//! quadtree_plugin - Framework/engine independent quadtree LOD selection
//!
//! This crate selects, for a single moving viewer, a set of square cells that
//! tiles a large planar region: small cells near the viewer and progressively
//! larger ones farther away. The host engine renders or streams whatever the
//! selection contains.
//!
//! # Features
//!
//! - **Eager Subdivision**: the full hierarchy is built once from a
//!   power-of-two size ladder
//! - **Range Spheres**: one per level, doubling in radius, centred on the
//!   viewer
//! - **Dirty Tracking**: selection only reruns when the viewer moved or turned
//! - **Floating Origin**: the tree re-centres on the viewer in large worlds
//!   while node bounds stay small
//! - **Selection Events**: optional per-node range/frustum transitions
//!
//! # Example
//!
//! ```ignore
//! use glam::DVec3;
//! use quadtree_plugin::{QuadTree, QuadTreeConfig};
//!
//! let mut tree = QuadTree::build(QuadTreeConfig::default())?;
//! let selection = tree.update(DVec3::new(500.0, -200.0, 0.0), DVec3::X);
//!
//! println!("Selected {} quads covering {} units²",
//!     selection.len(), selection.covered_area());
//! ```

pub mod error;
pub mod quadtree;

// Re-export commonly used items
pub use error::QuadTreeError;
pub use quadtree::{
  Aabb3, FnVisualizer, NodeKey, NodeSelectionEvent, Observer, QuadTree, QuadTreeConfig,
  QuadTreeVisualizer, Quadrant, RangeSphere, SelectedQuad, Selection, SelectionDelta,
  SelectionEventType, SelectionStats, ViewFrustum,
};
