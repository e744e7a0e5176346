//! Triangle mesh loaded from Wavefront OBJ text.
//!
//! A [`Mesh`] owns flat arrays of positions, texture coordinates, and normals,
//! plus triangles that index into them. Texture coordinates and normals are
//! optional per face; use [`Mesh::has_texcoords`] and [`Mesh::has_normals`]
//! to find out what a loaded file actually provides.
//!
//! # Supported records
//!
//! ```text
//! v  x y z [w]        position (w ignored)
//! vt u v [w]          texture coordinate (w ignored)
//! vn x y z            normal
//! f  a b c ...        face; each vertex is v, v/vt, v/vt/vn or v//vn
//! ```
//!
//! Indices are 1-based in the file and stored 0-based. Polygons with more
//! than three vertices are split into a triangle fan. Everything else
//! (comments, groups, materials, smoothing) is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{IndexKind, LoadError, ParseErrorKind};
use crate::math::{Vec2, Vec3};

/// Indices of one face corner into the mesh arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceVertex {
    pub fn new(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// A triangle defined by three corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub corners: [FaceVertex; 3],
}

impl Face {
    pub fn new(corners: [FaceVertex; 3]) -> Self {
        Self { corners }
    }

    pub fn positions(&self) -> [usize; 3] {
        self.corners.map(|c| c.position)
    }

    /// Texture coordinate indices, if all three corners carry one.
    pub fn texcoords(&self) -> Option<[usize; 3]> {
        Some([
            self.corners[0].texcoord?,
            self.corners[1].texcoord?,
            self.corners[2].texcoord?,
        ])
    }

    /// Normal indices, if all three corners carry one.
    pub fn normals(&self) -> Option<[usize; 3]> {
        Some([
            self.corners[0].normal?,
            self.corners[1].normal?,
            self.corners[2].normal?,
        ])
    }
}

/// A triangle mesh whose face indices are guaranteed to be in range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh from raw parts, checking every face index.
    pub fn from_parts(
        vertices: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        normals: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Result<Self, LoadError> {
        for (face_index, face) in faces.iter().enumerate() {
            for corner in &face.corners {
                check_index(face_index, IndexKind::Vertex, corner.position, vertices.len())?;
                if let Some(t) = corner.texcoord {
                    check_index(face_index, IndexKind::TexCoord, t, texcoords.len())?;
                }
                if let Some(n) = corner.normal {
                    check_index(face_index, IndexKind::Normal, n, normals.len())?;
                }
            }
        }

        Ok(Self {
            vertices,
            texcoords,
            normals,
            faces,
        })
    }

    /// Load a mesh from an OBJ file.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mesh = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "loaded {}: {} vertices, {} texcoords, {} normals, {} faces",
            path.display(),
            mesh.vertices.len(),
            mesh.texcoords.len(),
            mesh.normals.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let mut vertices = Vec::new();
        let mut texcoords = Vec::new();
        let mut normals = Vec::new();
        let mut faces = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let parse_err = |kind| LoadError::Parse {
                line: line_no,
                kind,
            };

            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let [x, y, z] = parse_floats::<3>(&mut tokens, "v").map_err(parse_err)?;
                    vertices.push(Vec3::new(x, y, z));
                }
                Some("vt") => {
                    let [u, v] = parse_floats::<2>(&mut tokens, "vt").map_err(parse_err)?;
                    texcoords.push(Vec2::new(u, v));
                }
                Some("vn") => {
                    let [x, y, z] = parse_floats::<3>(&mut tokens, "vn").map_err(parse_err)?;
                    normals.push(Vec3::new(x, y, z));
                }
                Some("f") => {
                    let corners = tokens
                        .map(parse_face_vertex)
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(parse_err)?;
                    if corners.len() < 3 {
                        return Err(parse_err(ParseErrorKind::TooFewVertices(corners.len())));
                    }
                    for k in 1..corners.len() - 1 {
                        faces.push(Face::new([corners[0], corners[k], corners[k + 1]]));
                    }
                }
                _ => {}
            }
        }

        Self::from_parts(vertices, texcoords, normals, faces)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when every face carries texture coordinate indices.
    pub fn has_texcoords(&self) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(|f| f.texcoords().is_some())
    }

    /// True when every face carries normal indices.
    pub fn has_normals(&self) -> bool {
        !self.faces.is_empty() && self.faces.iter().all(|f| f.normals().is_some())
    }

    pub fn face_positions(&self, face: &Face) -> [Vec3; 3] {
        face.positions().map(|i| self.vertices[i])
    }

    pub fn face_texcoords(&self, face: &Face) -> Option<[Vec2; 3]> {
        face.texcoords().map(|idx| idx.map(|i| self.texcoords[i]))
    }

    pub fn face_normals(&self, face: &Face) -> Option<[Vec3; 3]> {
        face.normals().map(|idx| idx.map(|i| self.normals[i]))
    }
}

fn check_index(face: usize, kind: IndexKind, index: usize, len: usize) -> Result<(), LoadError> {
    if index < len {
        Ok(())
    } else {
        Err(LoadError::IndexOutOfRange {
            face,
            kind,
            index,
            len,
        })
    }
}

/// Reads the first `N` fields as floats; extra trailing fields are ignored.
fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    record: &'static str,
) -> Result<[f32; N], ParseErrorKind> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let token = tokens
            .next()
            .ok_or(ParseErrorKind::MissingComponent(record))?;
        *slot = token
            .parse()
            .map_err(|_| ParseErrorKind::MalformedNumber(token.to_string()))?;
    }
    Ok(out)
}

/// Parses `v`, `v/vt`, `v/vt/vn` or `v//vn` into 0-based indices.
fn parse_face_vertex(token: &str) -> Result<FaceVertex, ParseErrorKind> {
    let mut parts = token.split('/');
    let position = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(ParseErrorKind::MissingComponent("f"))
        .and_then(parse_index)?;
    let texcoord = parts.next().filter(|s| !s.is_empty()).map(parse_index).transpose()?;
    let normal = parts.next().filter(|s| !s.is_empty()).map(parse_index).transpose()?;
    Ok(FaceVertex::new(position, texcoord, normal))
}

fn parse_index(token: &str) -> Result<usize, ParseErrorKind> {
    let index: usize = token
        .parse()
        .map_err(|_| ParseErrorKind::MalformedNumber(token.to_string()))?;
    index.checked_sub(1).ok_or(ParseErrorKind::ZeroIndex)
}
