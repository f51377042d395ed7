//! # Model IO Errors
//!
//! Everything that can go wrong between a path on disk and a `Mesh`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for model reading.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while reading model files.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Requested path
        path: PathBuf,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No reader handles this extension.
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat {
        /// Lower-cased extension, empty when the path has none
        extension: String,
    },

    /// The file could not be parsed.
    #[error("Invalid content at line {line}: {message}")]
    InvalidContent {
        /// 1-based line, 0 when the source has no lines (binary STL, 3MF)
        line: usize,
        /// What was wrong
        message: String,
    },

    /// A binary STL ended before its declared triangle count.
    #[error("Invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount {
        /// Count from the header
        expected: u32,
        /// Triangles actually present
        got: u32,
    },

    /// An OBJ face referenced a vertex that does not exist.
    #[error("Invalid face index {index} at line {line} ({vertex_count} vertices defined)")]
    InvalidFaceIndex {
        /// Index as written in the file
        index: i64,
        /// Vertices defined before the face
        vertex_count: usize,
        /// 1-based line
        line: usize,
    },
}

impl ModelError {
    /// Creates an invalid content error.
    pub fn invalid_content(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            line,
            message: message.into(),
        }
    }

    /// Maps a failed `File::open` to `FileNotFound` or `Io`.
    pub(crate) fn from_open(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Io(err)
        }
    }
}
