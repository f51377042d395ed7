//! STL (Stereolithography) reader.
//!
//! # Format Detection
//!
//! A file is binary when its size is exactly `84 + 50 * count`, where
//! `count` is the little-endian `u32` at byte 80. Anything else starting
//! with `solid` is read as ASCII. Remaining files are read as binary, so
//! a truncated binary file reports how many triangles were missing.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (ignored)
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//! endsolid name
//! ```

use std::fs;
use std::io::{BufRead, Read};
use std::path::Path;

use config::constants::MAX_IMPORT_TRIANGLES;
use slicer_core::{Mesh, Triangle, Vec3};
use tracing::{debug, warn};

use crate::error::{ModelError, ModelResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Triangles reserved up front when the data length is unknown.
const STREAM_PREALLOC_TRIANGLES: usize = 1 << 16;

/// Reads an STL file, detecting ASCII or binary from its size.
///
/// # Errors
///
/// `FileNotFound` or `Io` when the file cannot be read, `InvalidFaceCount`
/// for truncated binary data and `InvalidContent` for malformed ASCII.
pub fn read_stl<P: AsRef<Path>>(path: P) -> ModelResult<Mesh> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ModelError::from_open(path.to_path_buf(), e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Reading STL");
    read_stl_bytes(&bytes)
}

/// Reads STL data held in memory.
pub fn read_stl_bytes(bytes: &[u8]) -> ModelResult<Mesh> {
    if is_binary(bytes) || !starts_with_solid(bytes) {
        let present = bytes.len().saturating_sub(HEADER_SIZE + 4) / TRIANGLE_SIZE;
        read_binary(bytes, present)
    } else {
        read_stl_ascii(bytes)
    }
}

fn declared_count(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

/// Size matches the declared triangle count exactly.
fn is_binary(bytes: &[u8]) -> bool {
    declared_count(bytes).is_some_and(|count| {
        (count as u64) * (TRIANGLE_SIZE as u64) + (HEADER_SIZE as u64 + 4) == bytes.len() as u64
    })
}

fn starts_with_solid(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    String::from_utf8_lossy(head).trim_start().starts_with("solid")
}

/// Reads binary STL from any reader.
///
/// The header's triangle count is not trusted for allocation; storage
/// grows as facets are actually read.
pub fn read_stl_binary<R: Read>(reader: R) -> ModelResult<Mesh> {
    read_binary(reader, STREAM_PREALLOC_TRIANGLES)
}

/// `capacity_limit` caps the up-front reservation.
fn read_binary<R: Read>(mut reader: R, capacity_limit: usize) -> ModelResult<Mesh> {
    let mut header = [0u8; HEADER_SIZE + 4];
    reader.read_exact(&mut header).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            ModelError::invalid_content(0, "file too small to be a binary STL")
        }
        _ => ModelError::Io(e),
    })?;

    let face_count = u32::from_le_bytes([
        header[HEADER_SIZE],
        header[HEADER_SIZE + 1],
        header[HEADER_SIZE + 2],
        header[HEADER_SIZE + 3],
    ]);
    if face_count as usize > MAX_IMPORT_TRIANGLES {
        return Err(ModelError::invalid_content(
            0,
            format!("declared {face_count} triangles, limit is {MAX_IMPORT_TRIANGLES}"),
        ));
    }

    let mut mesh = Mesh::with_capacity((face_count as usize).min(capacity_limit));
    let mut buf = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        if let Err(e) = reader.read_exact(&mut buf) {
            return Err(match e.kind() {
                std::io::ErrorKind::UnexpectedEof => ModelError::InvalidFaceCount {
                    expected: face_count,
                    got: i,
                },
                _ => ModelError::Io(e),
            });
        }
        mesh.push(Triangle::new(
            read_vec3(&buf[12..24]),
            read_vec3(&buf[24..36]),
            read_vec3(&buf[36..48]),
            read_vec3(&buf[0..12]),
        ));
    }

    Ok(mesh)
}

/// Reads a vector from 12 bytes (3 little-endian f32s).
fn read_vec3(buf: &[u8]) -> Vec3 {
    let f = |i: usize| f64::from(f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]));
    Vec3::new(f(0), f(4), f(8))
}

/// Reads ASCII STL from any buffered reader.
///
/// Facets without exactly three vertices are skipped with a warning.
pub fn read_stl_ascii<R: BufRead>(reader: R) -> ModelResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut normal = Vec3::ZERO;
    let mut vertices: Vec<Vec3> = Vec::with_capacity(3);
    let mut in_facet = false;
    let mut skipped = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                vertices.clear();
                // "facet normal nx ny nz"; missing normals read as zero
                normal = match parts.next() {
                    Some(_) => parse_vec3(parts, line_no).unwrap_or(Vec3::ZERO),
                    None => Vec3::ZERO,
                };
            }
            "vertex" if in_facet => {
                vertices.push(parse_vec3(parts, line_no)?);
            }
            "endfacet" => {
                if vertices.len() == 3 {
                    mesh.add_triangle(vertices[0], vertices[1], vertices[2], normal);
                } else {
                    skipped += 1;
                }
                in_facet = false;
            }
            "endsolid" => break,
            _ => {}
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped STL facets without three vertices");
    }
    if mesh.is_empty() {
        warn!("ASCII STL contains no facets");
    }

    Ok(mesh)
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>, line: usize) -> ModelResult<Vec3> {
    let mut coord = || -> ModelResult<f64> {
        let token = parts
            .next()
            .ok_or_else(|| ModelError::invalid_content(line, "expected 3 coordinates"))?;
        token
            .parse()
            .map_err(|_| ModelError::invalid_content(line, format!("invalid number '{token}'")))
    };
    Ok(Vec3::new(coord()?, coord()?, coord()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_stl(triangles: &[[[f32; 3]; 4]]) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            for v in tri {
                for c in v {
                    bytes.extend_from_slice(&c.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&0u16.to_le_bytes());
        }
        bytes
    }

    const TRI: [[f32; 3]; 4] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.5],
    ];

    #[test]
    fn test_binary_round_numbers() {
        let mesh = read_stl_bytes(&binary_stl(&[TRI, TRI])).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        let tri = mesh.triangles()[0];
        assert_eq!(tri.normal, Vec3::Z);
        assert_eq!(tri.v2, Vec3::new(0.0, 1.0, 0.5));
        assert_eq!(mesh.bounds().max.z, 0.5);
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mut bytes = binary_stl(&[TRI]);
        bytes[..5].copy_from_slice(b"solid");
        let mesh = read_stl_bytes(&bytes).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_truncated_binary() {
        let mut bytes = binary_stl(&[TRI, TRI, TRI]);
        bytes.truncate(bytes.len() - 10);
        match read_stl_bytes(&bytes) {
            Err(ModelError::InvalidFaceCount { expected, got }) => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("expected InvalidFaceCount, got {other:?}"),
        }
    }

    /// A header claiming the import limit followed by a single stray byte.
    fn oversized_header() -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&(MAX_IMPORT_TRIANGLES as u32).to_le_bytes());
        bytes.push(0);
        bytes
    }

    #[test]
    fn test_huge_declared_count_without_data() {
        match read_stl_bytes(&oversized_header()) {
            Err(ModelError::InvalidFaceCount { expected, got }) => {
                assert_eq!(expected as usize, MAX_IMPORT_TRIANGLES);
                assert_eq!(got, 0);
            }
            other => panic!("expected InvalidFaceCount, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_declared_count_from_stream() {
        let bytes = oversized_header();
        let err = read_stl_binary(std::io::Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidFaceCount { got: 0, .. }));
    }

    #[test]
    fn test_count_above_import_limit() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = read_stl_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ModelError::InvalidContent { line: 0, .. }));
    }

    #[test]
    fn test_too_small_for_binary() {
        let err = read_stl_bytes(b"abc").unwrap_err();
        assert!(matches!(err, ModelError::InvalidContent { .. }));
    }

    #[test]
    fn test_ascii() {
        let text = "solid test
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 1 1 0
    endloop
  endfacet
  facet normal 0 -1 0
    outer loop
      vertex 0 0 0
      vertex 1 0 2.5
      vertex 0 0 2.5
    endloop
  endfacet
endsolid test
";
        let mesh = read_stl_bytes(text.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles()[0].normal, Vec3::NEG_Z);
        assert_eq!(mesh.bounds().max.z, 2.5);
    }

    #[test]
    fn test_ascii_bad_number() {
        let text = "solid bad\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\n";
        match read_stl_bytes(text.as_bytes()) {
            Err(ModelError::InvalidContent { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected InvalidContent, got {other:?}"),
        }
    }

    #[test]
    fn test_ascii_incomplete_facet_is_skipped() {
        let text = "solid s\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid s\n";
        let mesh = read_stl_bytes(text.as_bytes()).unwrap();
        assert!(mesh.is_empty());
    }
}
