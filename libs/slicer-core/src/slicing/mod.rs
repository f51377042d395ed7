//! # Slicing
//!
//! Cuts a mesh with horizontal planes and collects the resulting line
//! segments per layer.
//!
//! ## Pipeline
//!
//! ```text
//! SlicingSettings ──validate──► Z range ──► layer count
//!                                              │
//! Mesh ──► ZIndex (optional) ──► per-plane candidates ──► intersect ──► Layer
//! ```
//!
//! Segments within a layer are unordered and unlinked; no contour
//! reconstruction happens here.

mod batch;
mod intersect;
mod layer;
mod segment;
mod settings;
mod slicer;
mod z_index;

pub use batch::slice_batch;
pub use intersect::{interpolate_edge, intersect_triangle, VertexPosition};
pub use layer::Layer;
pub use segment::LineSegment;
pub use settings::{SlicingResult, SlicingSettings};
pub use slicer::{slice, slice_at_z, slice_at_z_indexed};
pub use z_index::{ZIndex, ZIndexStats};
