//! 3MF (3D Manufacturing Format) reader.
//!
//! A 3MF file is a ZIP archive. The geometry lives in an XML model part,
//! normally `3D/3dmodel.model`:
//!
//! ```text
//! <model>
//!   <resources>
//!     <object id="1" type="model">
//!       <mesh>
//!         <vertices>  <vertex x=".." y=".." z=".."/> ... </vertices>
//!         <triangles> <triangle v1="0" v2="1" v3="2"/> ... </triangles>
//!       </mesh>
//!     </object>
//!   </resources>
//!   <build> ... </build>
//! </model>
//! ```
//!
//! Every mesh object is appended to one triangle soup. Triangle indices are
//! local to their object. Build items and their transforms, materials and
//! extensions are ignored. Triangles referencing a missing vertex are
//! skipped with a warning.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use config::constants::MAX_IMPORT_TRIANGLES;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slicer_core::{Mesh, Triangle, Vec3};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{ModelError, ModelResult};

/// Usual locations of the model part.
const MODEL_PATHS: [&str; 3] = ["3D/3dmodel.model", "3d/3dmodel.model", "3D/3DModel.model"];

/// Reads a 3MF file from disk.
pub fn read_3mf_file<P: AsRef<Path>>(path: P) -> ModelResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ModelError::from_open(path.to_path_buf(), e))?;
    debug!(path = %path.display(), "Reading 3MF");
    read_3mf(BufReader::new(file))
}

/// Reads a 3MF archive from any seekable reader.
///
/// # Errors
///
/// `InvalidContent` when the data is not a ZIP archive, holds no model
/// part, or the model XML is malformed.
pub fn read_3mf<R: Read + Seek>(reader: R) -> ModelResult<Mesh> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| ModelError::invalid_content(0, format!("invalid 3MF archive (not a ZIP): {e}")))?;
    let content = read_model_part(&mut archive)?;
    parse_model(&content)
}

fn read_model_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ModelResult<String> {
    for name in MODEL_PATHS {
        if let Ok(mut part) = archive.by_name(name) {
            let mut content = String::new();
            part.read_to_string(&mut content)?;
            return Ok(content);
        }
    }

    // Fall back to the first `.model` entry anywhere in the archive.
    let name = archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(".model"))
        .map(str::to_owned)
        .ok_or_else(|| ModelError::invalid_content(0, ".model file not found in 3MF"))?;
    let mut part = archive
        .by_name(&name)
        .map_err(|e| ModelError::invalid_content(0, format!("failed to open {name}: {e}")))?;
    let mut content = String::new();
    part.read_to_string(&mut content)?;
    Ok(content)
}

/// Parses the model XML into a mesh.
pub fn parse_model(content: &str) -> ModelResult<Mesh> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut parser = ModelParser::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.open(e, false)?,
            Ok(Event::Empty(ref e)) => parser.open(e, true)?,
            Ok(Event::End(ref e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ModelError::invalid_content(
                    0,
                    format!("failed to parse 3MF XML at byte {}: {e}", reader.buffer_position()),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

/// Element nesting and the object currently being read.
#[derive(Default)]
struct ModelParser {
    mesh: Mesh,
    seen_model: bool,
    seen_resources: bool,
    in_resources: bool,
    in_object: bool,
    in_mesh: bool,
    in_vertices: bool,
    in_triangles: bool,
    vertices: Vec<Vec3>,
    faces: Vec<[i64; 3]>,
    skipped: usize,
}

impl ModelParser {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> ModelResult<()> {
        match e.local_name().as_ref() {
            b"model" => self.seen_model = true,
            b"resources" if self.seen_model => {
                self.seen_resources = true;
                self.in_resources = !empty;
            }
            // A missing type means "model".
            b"object" if self.in_resources && !empty => {
                self.in_object = attribute(e, b"type")?.map_or(true, |t| t == "model");
            }
            b"mesh" if self.in_object && !empty => {
                self.in_mesh = true;
                self.vertices.clear();
                self.faces.clear();
            }
            b"vertices" if self.in_mesh => self.in_vertices = !empty,
            b"triangles" if self.in_mesh => self.in_triangles = !empty,
            b"vertex" if self.in_vertices => {
                self.vertices.push(Vec3::new(
                    number(e, b"x")?,
                    number(e, b"y")?,
                    number(e, b"z")?,
                ));
            }
            b"triangle" if self.in_triangles => {
                if self.mesh.triangle_count() + self.faces.len() >= MAX_IMPORT_TRIANGLES {
                    return Err(ModelError::invalid_content(
                        0,
                        format!("3MF model exceeds {MAX_IMPORT_TRIANGLES} triangles"),
                    ));
                }
                self.faces
                    .push([index(e, b"v1")?, index(e, b"v2")?, index(e, b"v3")?]);
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"resources" => self.in_resources = false,
            b"object" => self.in_object = false,
            b"mesh" if self.in_mesh => {
                self.flush_object();
                self.in_mesh = false;
            }
            b"vertices" => self.in_vertices = false,
            b"triangles" => self.in_triangles = false,
            _ => {}
        }
    }

    /// Resolves the current object's faces against its own vertices.
    fn flush_object(&mut self) {
        let vertex = |i: i64| usize::try_from(i).ok().and_then(|i| self.vertices.get(i)).copied();
        for &[a, b, c] in &self.faces {
            match (vertex(a), vertex(b), vertex(c)) {
                (Some(v0), Some(v1), Some(v2)) => {
                    self.mesh.push(Triangle::from_vertices(v0, v1, v2));
                }
                _ => self.skipped += 1,
            }
        }
    }

    fn finish(self) -> ModelResult<Mesh> {
        if !self.seen_model {
            return Err(ModelError::invalid_content(0, "No <model> element in 3MF"));
        }
        if !self.seen_resources {
            return Err(ModelError::invalid_content(0, "No <resources> in 3MF"));
        }
        if self.skipped > 0 {
            warn!(skipped = self.skipped, "Skipped 3MF triangles with out-of-range indices");
        }
        debug!(triangles = self.mesh.triangle_count(), "3MF parsed");
        Ok(self.mesh)
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> ModelResult<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            let value = std::str::from_utf8(&attr.value).map_err(|err| {
                ModelError::invalid_content(0, format!("invalid UTF-8 in attribute: {err}"))
            })?;
            return Ok(Some(value.to_owned()));
        }
    }
    Ok(None)
}

/// Coordinate attribute; absent reads as zero.
fn number(e: &BytesStart<'_>, key: &[u8]) -> ModelResult<f64> {
    parse_attribute(e, key, 0.0)
}

/// Vertex index attribute; absent reads as zero.
fn index(e: &BytesStart<'_>, key: &[u8]) -> ModelResult<i64> {
    parse_attribute(e, key, 0)
}

fn parse_attribute<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8], default: T) -> ModelResult<T> {
    match attribute(e, key)? {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            ModelError::invalid_content(
                0,
                format!("invalid {} value '{value}'", String::from_utf8_lossy(key)),
            )
        }),
    }
}
