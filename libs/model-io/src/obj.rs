//! Wavefront OBJ reader.
//!
//! Only geometry is read: `v` lines become positions and `f` lines become
//! fan-triangulated faces. Texture and normal references in face tokens
//! (`v/vt`, `v/vt/vn`, `v//vn`) are accepted and ignored; face normals are
//! recomputed from the winding.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use slicer_core::{Mesh, Triangle, Vec3};
use tracing::{debug, warn};

use crate::error::{ModelError, ModelResult};

/// Reads an OBJ file from disk.
pub fn read_obj_file<P: AsRef<Path>>(path: P) -> ModelResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ModelError::from_open(path.to_path_buf(), e))?;
    debug!(path = %path.display(), "Reading OBJ");
    read_obj(BufReader::new(file))
}

/// Reads OBJ text from any buffered reader.
///
/// # Errors
///
/// `InvalidContent` for unparsable numbers or indices, `InvalidFaceIndex`
/// when a face points outside the vertices defined so far.
///
/// # Example
///
/// ```
/// use model_io::obj::read_obj;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
/// let mesh = read_obj(text.as_bytes()).unwrap();
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
pub fn read_obj<R: BufRead>(reader: R) -> ModelResult<Mesh> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut mesh = Mesh::new();
    let mut face: Vec<Vec3> = Vec::with_capacity(4);
    let mut short_faces = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => positions.push(parse_position(parts, line_no)?),
            Some("f") => {
                face.clear();
                for token in parts {
                    let index = parse_index(token, line_no)?;
                    face.push(resolve(index, &positions, line_no)?);
                }
                if face.len() < 3 {
                    short_faces += 1;
                    continue;
                }
                for i in 1..face.len() - 1 {
                    mesh.push(Triangle::from_vertices(face[0], face[i], face[i + 1]));
                }
            }
            // vn, vt, o, g, s, usemtl, mtllib, comments
            _ => {}
        }
    }

    if short_faces > 0 {
        warn!(short_faces, "Skipped OBJ faces with fewer than 3 vertices");
    }
    debug!(
        vertices = positions.len(),
        triangles = mesh.triangle_count(),
        "OBJ parsed"
    );

    Ok(mesh)
}

fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>, line: usize) -> ModelResult<Vec3> {
    let mut coord = || -> ModelResult<f64> {
        let token = parts
            .next()
            .ok_or_else(|| ModelError::invalid_content(line, "vertex needs 3 coordinates"))?;
        token
            .parse()
            .map_err(|_| ModelError::invalid_content(line, format!("invalid number '{token}'")))
    };
    Ok(Vec3::new(coord()?, coord()?, coord()?))
}

/// Position index of a face token; anything after the first `/` is ignored.
fn parse_index(token: &str, line: usize) -> ModelResult<i64> {
    let head = token.split('/').next().unwrap_or(token);
    head.parse()
        .map_err(|_| ModelError::invalid_content(line, format!("invalid face index '{token}'")))
}

/// Resolves a 1-based or negative (relative) index.
fn resolve(index: i64, positions: &[Vec3], line: usize) -> ModelResult<Vec3> {
    let count = positions.len() as i64;
    let zero_based = if index > 0 {
        index - 1
    } else {
        count + index
    };

    if index == 0 || zero_based < 0 || zero_based >= count {
        return Err(ModelError::InvalidFaceIndex {
            index,
            vertex_count: positions.len(),
            line,
        });
    }
    Ok(positions[zero_based as usize])
}
