//! # Slicer Core
//!
//! Mesh-to-layers slicing for additive-manufacturing preparation.
//! Cuts a triangle mesh with horizontal planes at a fixed layer height and
//! returns, per layer, the unordered line segments where the planes cross
//! the surface.
//!
//! ## Architecture
//!
//! ```text
//! model-io (Mesh) → mesh tools (validate / repair / analyze)
//!                 → ZIndex (optional) → slice() → SlicingResult
//! ```
//!
//! ## Modules
//!
//! - **geometry**: `Vec3`, `Triangle`, `Aabb`
//! - **mesh**: the triangle-soup `Mesh` plus analysis, validation, repair
//!   and normal processing
//! - **primitives**: box meshes for fixtures and calibration parts
//! - **slicing**: Z-bucket index, plane/triangle intersection, layer assembly
//!
//! ## Usage
//!
//! ```rust
//! use slicer_core::primitives::create_box;
//! use slicer_core::slicing::{slice, SlicingSettings};
//! use slicer_core::Vec3;
//!
//! let mesh = create_box(Vec3::splat(10.0), false).unwrap();
//! let result = slice(&mesh, &SlicingSettings::new(0.5)).unwrap();
//!
//! assert_eq!(result.layers.len(), 20);
//! assert!(result.total_segments > 0);
//! ```

pub mod error;
pub mod geometry;
pub mod mesh;
pub mod primitives;
pub mod slicing;

pub use error::{MeshError, MeshResult, SlicingError};
pub use geometry::{Aabb, Triangle, Vec3};
pub use mesh::Mesh;
pub use slicing::{slice, slice_at_z, slice_batch, Layer, LineSegment, SlicingResult, SlicingSettings};
