//! Minimal linear algebra for the pipeline: 2-D screen/texture vectors, 3-D
//! positions and the 4x4 affine world transform.

pub mod mat4;
pub mod vec2;
pub mod vec3;

pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
