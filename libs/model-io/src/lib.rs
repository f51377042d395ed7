//! # Model IO
//!
//! Readers turning model files into [`slicer_core::Mesh`] triangle soups.
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | STL    | `.stl`    | Binary and ASCII |
//! | OBJ    | `.obj`    | Polygons fan-triangulated |
//! | 3MF    | `.3mf`    | Mesh objects only; build transforms ignored |
//!
//! ## Usage
//!
//! ```no_run
//! use model_io::load_model;
//!
//! let mesh = load_model("part.stl")?;
//! println!("{} triangles", mesh.triangle_count());
//! # Ok::<(), model_io::ModelError>(())
//! ```

pub mod error;
pub mod obj;
pub mod stl;
pub mod threemf;

use std::path::Path;

use slicer_core::Mesh;
use tracing::info;

pub use error::{ModelError, ModelResult};

/// Supported model formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// STL (Stereolithography)
    Stl,
    /// Wavefront OBJ
    Obj,
    /// 3D Manufacturing Format
    ThreeMf,
}

impl ModelFormat {
    /// Detects the format from a path's extension, case-insensitively.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        match extension_of(path.as_ref()).as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "3mf" => Some(Self::ThreeMf),
            _ => None,
        }
    }

    /// True when this format's reader handles the path.
    pub fn can_read<P: AsRef<Path>>(self, path: P) -> bool {
        Self::from_path(path) == Some(self)
    }

    /// Human-readable name.
    pub fn format_name(self) -> &'static str {
        match self {
            Self::Stl => "STL (Stereolithography)",
            Self::Obj => "OBJ (Wavefront)",
            Self::ThreeMf => "3MF (3D Manufacturing Format)",
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::ThreeMf => "3mf",
        }
    }

    /// Reads a file with this format's reader.
    pub fn read<P: AsRef<Path>>(self, path: P) -> ModelResult<Mesh> {
        match self {
            Self::Stl => stl::read_stl(path),
            Self::Obj => obj::read_obj_file(path),
            Self::ThreeMf => threemf::read_3mf_file(path),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Loads a model, picking the reader from the file extension.
///
/// # Errors
///
/// `UnsupportedFormat` for any extension other than `.stl`, `.obj` or `.3mf`,
/// otherwise whatever the reader reports.
pub fn load_model<P: AsRef<Path>>(path: P) -> ModelResult<Mesh> {
    let path = path.as_ref();
    let format = ModelFormat::from_path(path).ok_or_else(|| ModelError::UnsupportedFormat {
        extension: extension_of(path),
    })?;

    let mesh = format.read(path)?;
    info!(
        path = %path.display(),
        format = format.format_name(),
        triangles = mesh.triangle_count(),
        "Model loaded"
    );
    Ok(mesh)
}
