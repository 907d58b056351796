//! Scene objects: a mesh placed in the world by a body, with a bound texture.
//!
//! An [`Object`] is what the renderer draws. Its mesh supplies geometry and
//! per-frame scratch fields, its [`Body`] supplies the world-space offset, and
//! its texture id names the entry of a [`TextureBank`](crate::texture::TextureBank)
//! that is made current before any of its triangles are painted.

use std::path::Path;

use crate::body::Body;
use crate::math::Vec3;
use crate::mesh::{Mesh, MeshError};
use crate::texture::TextureId;

#[derive(Debug, Clone)]
pub struct Object {
    name: String,
    mesh: Mesh,
    body: Body,
    texture: Option<TextureId>,
}

impl Object {
    /// Create an object at the origin with no texture bound.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            body: Body::default(),
            texture: None,
        }
    }

    /// Load an object from an OBJ file.
    ///
    /// All objects/groups in the file are merged into a single mesh.
    pub fn from_obj(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, MeshError> {
        Ok(Self::new(name, Mesh::from_obj(path)?))
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.body.position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    /// Name and mesh borrowed together for the render loop.
    pub(crate) fn parts_mut(&mut self) -> (&str, &mut Mesh) {
        (&self.name, &mut self.mesh)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = Some(texture);
    }

    pub fn clear_texture(&mut self) {
        self.texture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_placement_and_texture() {
        let object = Object::new("cube", Mesh::cube())
            .at(Vec3::new(0.0, 1.0, 0.0))
            .with_texture(TextureId(3));
        assert_eq!(object.name(), "cube");
        assert_eq!(object.body().position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(object.texture(), Some(TextureId(3)));
    }

    #[test]
    fn missing_obj_file_is_an_error() {
        let err = Object::from_obj("missing", "no/such/file.obj").unwrap_err();
        assert!(matches!(err, MeshError::Obj(_)));
    }
}
