//! # Primitives
//!
//! Procedural meshes for fixtures, calibration parts and tests.

mod box_mesh;

pub use box_mesh::create_box;
