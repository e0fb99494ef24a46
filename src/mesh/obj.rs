//! Wavefront OBJ loader.
//!
//! Reads the subset of the OBJ format a triangle viewer needs:
//!
//! - `v x y z` vertex positions
//! - `vn x y z` vertex normals
//! - `f a b c` faces, with `a` in any of the `i`, `i/j`, `i//k`, `i/j/k`
//!   corner forms (1-based indices)
//!
//! Grouping, material and texture records are skipped. Faces with more or
//! fewer than three corners are rejected; this viewer draws triangles only.
//!
//! File normals are attached to the mesh only when they pair one-to-one with
//! the positions (`i//i` style corners and equal table lengths). Anything
//! looser is discarded and recomputed from the geometry instead.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use tracing::debug;

use crate::error::{ViewerError, ViewerResult};
use crate::mesh::TriMesh;

/// Load a triangle mesh from the OBJ file at `path`.
///
/// Fails on unreadable files, malformed records, out-of-range indices,
/// non-triangular faces and meshes without any vertex.
pub fn load_obj(path: impl AsRef<Path>) -> ViewerResult<TriMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ViewerError::MeshOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut positions: Vec<Vec3> = Vec::new();
    let mut file_normals: Vec<Vec3> = Vec::new();
    let mut faces: Vec<[u32; 3]> = Vec::new();
    // Cleared as soon as a corner pairs a position with a different normal.
    let mut normals_aligned = true;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => positions.push(parse_vec3(path, line_no, &mut tokens)?),
            "vn" => file_normals.push(parse_vec3(path, line_no, &mut tokens)?),
            "f" => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() != 3 {
                    return Err(ViewerError::obj_parse(
                        path,
                        line_no,
                        format!(
                            "face with {} corners; only triangles are supported",
                            corners.len()
                        ),
                    ));
                }

                let mut face = [0u32; 3];
                for (slot, corner) in face.iter_mut().zip(&corners) {
                    let (position, normal) =
                        parse_corner(path, line_no, corner, positions.len())?;
                    if normal != Some(position) {
                        normals_aligned = false;
                    }
                    *slot = position;
                }
                faces.push(face);
            }
            // Texture coordinates, groups, objects, smoothing and materials
            // have no bearing on this viewer.
            "vt" | "g" | "o" | "s" | "usemtl" | "mtllib" => {}
            other => {
                debug!("{}:{line_no}: skipping `{other}` record", path.display());
            }
        }
    }

    let normals =
        (normals_aligned && file_normals.len() == positions.len()).then_some(file_normals);

    let mesh = TriMesh {
        positions,
        normals,
        faces,
    };
    if mesh.is_empty() {
        return Err(ViewerError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    Ok(mesh)
}

/// Parse the next three whitespace tokens as a `Vec3`.
fn parse_vec3<'a>(
    path: &Path,
    line_no: usize,
    tokens: &mut impl Iterator<Item = &'a str>,
) -> ViewerResult<Vec3> {
    let mut out = [0.0f32; 3];
    for slot in &mut out {
        let token = tokens
            .next()
            .ok_or_else(|| ViewerError::obj_parse(path, line_no, "expected three coordinates"))?;
        *slot = token.parse().map_err(|_| {
            ViewerError::obj_parse(path, line_no, format!("invalid coordinate `{token}`"))
        })?;
    }
    Ok(Vec3::from_array(out))
}

/// Parse one face corner.
///
/// Returns the 0-based position index and, when the corner carries one, the
/// 0-based normal index.
fn parse_corner(
    path: &Path,
    line_no: usize,
    corner: &str,
    position_count: usize,
) -> ViewerResult<(u32, Option<u32>)> {
    let mut fields = corner.split('/');
    let position = parse_index(path, line_no, fields.next().unwrap_or(""))?;
    if position as usize >= position_count {
        return Err(ViewerError::obj_parse(
            path,
            line_no,
            format!("vertex index {} out of range", u64::from(position) + 1),
        ));
    }

    let _texture = fields.next();
    let normal = match fields.next() {
        Some(field) if !field.is_empty() => Some(parse_index(path, line_no, field)?),
        _ => None,
    };

    Ok((position, normal))
}

/// Parse a 1-based OBJ index into a 0-based `u32`.
fn parse_index(path: &Path, line_no: usize, field: &str) -> ViewerResult<u32> {
    let value: i64 = field.parse().map_err(|_| {
        ViewerError::obj_parse(path, line_no, format!("invalid index `{field}`"))
    })?;
    if value < 1 {
        // Relative (negative) indices are rare enough not to support.
        return Err(ViewerError::obj_parse(
            path,
            line_no,
            format!("unsupported index `{field}`; expected a positive integer"),
        ));
    }
    u32::try_from(value - 1)
        .map_err(|_| ViewerError::obj_parse(path, line_no, format!("index {value} out of range")))
}
