//! Triangle meshes.
//!
//! A [`Mesh`] owns its vertex and face arrays. Besides the data loaded at import
//! time, both carry per-frame scratch fields (world and screen positions, face
//! normal, centroid depth) that the pipeline overwrites every frame.
//!
//! # Winding
//!
//! Faces are wound **clockwise** as seen by the viewer (X right, Y up). The
//! back-face test and the rasterizer's left/right edge assignment both rely on
//! it. [`Mesh::from_obj`] converts the counter-clockwise, right-handed OBJ
//! convention on import.

use std::path::Path;

use crate::math::{Vec2, Vec3};

/// Errors raised while building or importing a mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("face {face} references vertex {index}, but the mesh has {count} vertices")]
    IndexOutOfRange { face: usize, index: u32, count: usize },
    #[error("mesh `{0}` contains no triangles")]
    Empty(String),
    #[error("no face {face} in a mesh of {count} faces")]
    FaceOutOfRange { face: usize, count: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position in the mesh's own space.
    pub local: Vec3,
    /// Position after the body offset and world transform; rewritten every frame.
    pub world: Vec3,
    /// Unit normal in the mesh's own space.
    pub normal: Vec3,
    /// Texture coordinate, both components within `[0, 1]`.
    pub uv: Vec2,
    /// Projected position; rewritten for every drawn triangle.
    pub screen: Vec2,
}

impl Vertex {
    pub fn new(local: Vec3, uv: Vec2) -> Self {
        Self {
            local,
            world: local,
            normal: Vec3::ZERO,
            uv: uv.clamp(0.0, 1.0),
            screen: Vec2::ZERO,
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal.normalize();
        self
    }
}

// This struct represents a triangle defined by three vertices.
// The members a, b, and c are indices into the vertex array of the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    /// Mean of the three vertex normals in world orientation, per frame.
    pub normal: Vec3,
    /// Mean world Z of the three vertices. Only used as the paint-order key.
    pub centroid_z: f32,
    pub material: Option<usize>,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            a,
            b,
            c,
            normal: Vec3::ZERO,
            centroid_z: 0.0,
            material: None,
        }
    }

    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        [self.a as usize, self.b as usize, self.c as usize]
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh, checking that every face index points at a vertex.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        faces: Vec<Face>,
    ) -> Result<Self, MeshError> {
        let name = name.into();
        if faces.is_empty() {
            return Err(MeshError::Empty(name));
        }
        for (face_index, face) in faces.iter().enumerate() {
            check_indices(face_index, face, vertices.len())?;
        }
        Ok(Self {
            name,
            vertices,
            faces,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Replaces face `index`, checking its vertex indices like [`Mesh::new`].
    /// On error the mesh is left unchanged.
    pub fn set_face(&mut self, index: usize, face: Face) -> Result<(), MeshError> {
        let count = self.faces.len();
        let slot = self
            .faces
            .get_mut(index)
            .ok_or(MeshError::FaceOutOfRange { face: index, count })?;
        check_indices(index, &face, self.vertices.len())?;
        *slot = face;
        Ok(())
    }

    /// Split borrow used by the pipeline, which updates faces from vertex data.
    pub(crate) fn parts_mut(&mut self) -> (&mut [Vertex], &mut [Face]) {
        (&mut self.vertices, &mut self.faces)
    }

    /// Recomputes every vertex normal as the normalized sum of the normals of
    /// the faces that use it.
    pub fn compute_vertex_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.vertices.len()];
        for face in &self.faces {
            let [a, b, c] = face.indices();
            let pa = self.vertices[a].local;
            let pb = self.vertices[b].local;
            let pc = self.vertices[c].local;
            // Clockwise winding in a left-handed space: (b - a) x (c - a) points outward.
            let normal = (pb - pa).cross(pc - pa).normalize();
            sums[a] += normal;
            sums[b] += normal;
            sums[c] += normal;
        }
        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            vertex.normal = sum.normalize();
        }
    }

    /// A 2x2x2 cube centred on the origin; every side carries the full texture.
    pub fn cube() -> Self {
        // Corners of each side as seen from outside: top-left, top-right,
        // bottom-right, bottom-left.
        const SIDES: [[[f32; 3]; 4]; 6] = [
            // front (-Z)
            [[-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0]],
            // right (+X)
            [[1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0]],
            // back (+Z)
            [[1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0]],
            // left (-X)
            [[-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]],
            // top (+Y)
            [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
            // bottom (-Y)
            [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut faces = Vec::with_capacity(12);
        for side in SIDES {
            let first = vertices.len() as u32;
            push_quad(&mut vertices, &mut faces, first, side);
        }
        Self::assemble("cube", vertices, faces)
    }

    /// A 2x2 quad in the XY plane facing the viewer (normal -Z).
    pub fn plane() -> Self {
        let mut vertices = Vec::with_capacity(4);
        let mut faces = Vec::with_capacity(2);
        push_quad(
            &mut vertices,
            &mut faces,
            0,
            [[-1.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0]],
        );
        Self::assemble("plane", vertices, faces)
    }

    /// Built-in geometry is valid by construction.
    fn assemble(name: &str, vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        debug_assert!(faces
            .iter()
            .flat_map(|f| f.indices())
            .all(|i| i < vertices.len()));
        let mut mesh = Self {
            name: name.to_string(),
            vertices,
            faces,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    /// Loads every object of an OBJ file into a single mesh.
    ///
    /// Faces are triangulated and re-indexed so each vertex carries one
    /// position, one texture coordinate and one normal. Z is negated and the
    /// winding reversed to move from OBJ's right-handed counter-clockwise
    /// convention to this crate's left-handed clockwise one, and V is flipped
    /// because textures are stored top row first. Missing normals are
    /// recomputed from the faces.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "obj".to_string());

        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        let mut has_normals = true;

        for model in &models {
            let mesh = &model.mesh;
            let base = vertices.len() as u32;
            let count = mesh.positions.len() / 3;
            has_normals &= mesh.normals.len() == count * 3;

            for i in 0..count {
                let local = Vec3::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    -mesh.positions[3 * i + 2],
                );
                let uv = if mesh.texcoords.len() >= 2 * (i + 1) {
                    Vec2::new(mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1])
                } else {
                    Vec2::ZERO
                };
                let mut vertex = Vertex::new(local, uv);
                if mesh.normals.len() >= 3 * (i + 1) {
                    vertex = vertex.with_normal(Vec3::new(
                        mesh.normals[3 * i],
                        mesh.normals[3 * i + 1],
                        -mesh.normals[3 * i + 2],
                    ));
                }
                vertices.push(vertex);
            }

            for tri in mesh.indices.chunks_exact(3) {
                let mut face = Face::new(base + tri[0], base + tri[2], base + tri[1]);
                face.material = mesh.material_id;
                faces.push(face);
            }
        }

        let mut mesh = Self::new(name, vertices, faces)?;
        if !has_normals {
            mesh.compute_vertex_normals();
        }
        tracing::debug!(
            mesh = mesh.name(),
            vertices = mesh.vertices.len(),
            faces = mesh.faces.len(),
            "loaded OBJ mesh"
        );
        Ok(mesh)
    }
}

fn check_indices(face_index: usize, face: &Face, count: usize) -> Result<(), MeshError> {
    match [face.a, face.b, face.c]
        .into_iter()
        .find(|&index| index as usize >= count)
    {
        Some(index) => Err(MeshError::IndexOutOfRange {
            face: face_index,
            index,
            count,
        }),
        None => Ok(()),
    }
}

/// Appends two clockwise triangles covering a quad given as
/// top-left, top-right, bottom-right, bottom-left.
fn push_quad(vertices: &mut Vec<Vertex>, faces: &mut Vec<Face>, first: u32, corners: [[f32; 3]; 4]) {
    const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    for (corner, uv) in corners.iter().zip(UVS) {
        vertices.push(Vertex::new(
            Vec3::new(corner[0], corner[1], corner[2]),
            Vec2::new(uv[0], uv[1]),
        ));
    }
    faces.push(Face::new(first, first + 1, first + 2));
    faces.push(Face::new(first, first + 2, first + 3));
}
