//! A span-based software 3D rasterizer for small screens.
//!
//! Meshes are transformed by a single world matrix, back faces are dropped,
//! the rest are painted back to front, and every triangle is scan-converted
//! into horizontal spans filled with affinely interpolated texels. There is
//! no depth buffer and no GPU; the whole pipeline runs on one thread.
//!
//! SDL2 is used only for the demo window and for presenting finished frames.
//!
//! # Quick Start
//!
//! ```ignore
//! use spanrast::prelude::*;
//!
//! let mut renderer = Renderer::new(RendererConfig::handheld());
//! let mut textures = TextureBank::new();
//! let id = textures.add(Texture::checkerboard(64, 8, 0xFFFFFFFF, 0xFF202020));
//! let mut objects = vec![Object::new("cube", Mesh::cube()).with_texture(id)];
//! let mut surface = Surface::new(320, 240, BACKGROUND_COLOR);
//!
//! renderer.identity();
//! renderer.translate(Vec3::new(0.0, 0.0, 3.0));
//! renderer.rotate(Vec3::new(30.0, 45.0, 0.0));
//! renderer.render_scene(&mut objects, &textures, &mut surface.frame_buffer());
//! ```

// Public API - exposed to library consumers
pub mod body;
pub mod config;
pub mod light;
pub mod math;
pub mod mesh;
pub mod object;
pub mod projection;
pub mod render;
pub mod renderer;
pub mod texture;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use config::{RenderMode, RendererConfig, Viewport};
pub use mesh::{Mesh, MeshError};
pub use object::Object;
pub use renderer::{RenderStats, Renderer};
pub use texture::{Texture, TextureBank, TextureError, TextureId};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use spanrast::prelude::*;
/// ```
pub mod prelude {
    // Configuration
    pub use crate::config::{
        LightConfig, RenderMode, RendererConfig, Viewport, BACKGROUND_COLOR, OUTLINE_COLOR,
    };

    // Scene
    pub use crate::body::Body;
    pub use crate::mesh::{Face, Mesh, MeshError, Vertex};
    pub use crate::object::Object;
    pub use crate::texture::{Texture, TextureBank, TextureError, TextureId};

    // Rendering
    pub use crate::render::{FrameBuffer, Surface};
    pub use crate::renderer::{RenderStats, Renderer};

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3};

    // Window & Input
    pub use crate::window::{Axis, Command, FpsCounter, FrameLimiter, Window};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::edge::scan_triangle;
    pub use crate::render::visibility::{prepare, selection_sort_by_depth_descending};
    pub use crate::render::{FillStyle, FrameBuffer, ScreenTriangle, SpanRasterizer, SpanTable};
}
