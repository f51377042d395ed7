//! # Config Crate
//!
//! Centralized configuration constants for the layer slicing pipeline.
//! Every tolerance, limit and default used by the slicer, the mesh tools and
//! the model readers is defined here so that the crates agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, MIN_LAYER_HEIGHT, MAX_LAYER_HEIGHT};
//!
//! // Vertices closer than EPSILON to a cutting plane count as lying on it
//! let vertex_z: f64 = 1.0 + 1e-7;
//! let plane_z = 1.0;
//! assert!((vertex_z - plane_z).abs() <= EPSILON);
//!
//! // Layer heights are accepted inside a closed range
//! let layer_height = 0.2;
//! assert!((MIN_LAYER_HEIGHT..=MAX_LAYER_HEIGHT).contains(&layer_height));
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Behavioral Contract**: Slicing constants must not change between releases
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
