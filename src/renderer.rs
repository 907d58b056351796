//! Frame driver.
//!
//! The [`Renderer`] owns everything that persists between frames: the
//! projector, the world transform, the span table and the visible-face arena.
//! It borrows the frame buffer and the texture bank for each call, so nothing
//! reaches for global state.
//!
//! A frame looks like:
//!
//! ```ignore
//! buffer.clear(BACKGROUND_COLOR);
//! renderer.identity();
//! renderer.translate(Vec3::new(0.0, 0.0, 3.0));
//! renderer.rotate(angles);
//! renderer.render_scene(&mut objects, &textures, &mut buffer);
//! window.present(&pixels)?;
//! ```

use std::collections::{HashMap, HashSet};
use std::ops::AddAssign;

use crate::config::{RenderMode, RendererConfig, Viewport};
use crate::light::{grey, DirectionalLight};
use crate::math::{Mat4, Vec3};
use crate::object::Object;
use crate::projection::Projector;
use crate::render::visibility;
use crate::render::{FillStyle, FrameBuffer, ScreenTriangle, SpanRasterizer, TriangleFault};
use crate::texture::{Texture, TextureBank, TextureId};

/// Face counts for one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub faces: usize,
    /// Faces that passed the back-face test.
    pub visible: usize,
    /// Visible faces handed to the span filler without a fault.
    pub drawn: usize,
    /// Visible faces dropped as degenerate or faulty.
    pub skipped: usize,
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, rhs: Self) {
        self.faces += rhs.faces;
        self.visible += rhs.visible;
        self.drawn += rhs.drawn;
        self.skipped += rhs.skipped;
    }
}

pub struct Renderer {
    config: RendererConfig,
    projector: Projector,
    world: Mat4,
    light: DirectionalLight,
    raster: SpanRasterizer,
    visible: Vec<usize>,
    /// Faces already reported per object name, so a bad face logs once.
    reported_faces: HashMap<String, HashSet<usize>>,
    reported_textures: HashSet<TextureId>,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        let projector = Projector::new(config.fov, config.fov_min, config.fov_max, config.viewport);
        tracing::debug!(
            fov = projector.fov(),
            focal = projector.focal(),
            width = config.viewport.width,
            height = config.viewport.height,
            max_rows = config.max_screen_height,
            "renderer created"
        );
        Self {
            light: DirectionalLight::from(config.light),
            raster: SpanRasterizer::new(config.max_screen_height as usize),
            projector,
            world: Mat4::identity(),
            visible: Vec::new(),
            reported_faces: HashMap::new(),
            reported_textures: HashSet::new(),
            config,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    // ============ Projection ============

    pub fn fov(&self) -> f32 {
        self.projector.fov()
    }

    /// Sets the field of view in degrees, clamped to the configured range.
    pub fn set_fov(&mut self, fov: f32) {
        self.projector.set_fov(fov);
        self.config.fov = self.projector.fov();
    }

    pub fn viewport(&self) -> Viewport {
        self.projector.viewport()
    }

    /// Sets the viewport. The span table keeps its start-up size, so rows
    /// past `max_screen_height` are not drawn.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.projector.set_viewport(x, y, width, height);
        self.config.viewport = self.projector.viewport();
        let rows = self.raster.spans().capacity();
        if self.config.viewport.height as usize > rows {
            tracing::warn!(
                height = self.config.viewport.height,
                rows,
                "viewport taller than the span table, lower rows are cut off"
            );
        }
    }

    // ============ World transform ============

    /// Resets the world transform. Call once at the start of every frame.
    pub fn identity(&mut self) {
        self.world = Mat4::identity();
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.world = self.world.translate(offset);
    }

    /// Rotates about X, then Y, then Z by the given angles in degrees.
    pub fn rotate(&mut self, degrees: Vec3) {
        self.world = self.world.rotate_degrees(degrees);
    }

    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.world = world;
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    // ============ Modes ============

    pub fn render_mode(&self) -> RenderMode {
        self.config.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.config.render_mode = mode;
    }

    pub fn toggle_render_mode(&mut self, bits: RenderMode) {
        self.config.render_mode.toggle(bits);
    }

    pub fn backface_culling(&self) -> bool {
        self.config.backface_culling
    }

    pub fn set_backface_culling(&mut self, enabled: bool) {
        self.config.backface_culling = enabled;
    }

    // ============ Rendering ============

    /// Draws every object in order, binding each one's texture first.
    pub fn render_scene(
        &mut self,
        objects: &mut [Object],
        textures: &TextureBank,
        buffer: &mut FrameBuffer,
    ) -> RenderStats {
        let mut total = RenderStats::default();
        for object in objects {
            total += self.render_object(object, textures, buffer);
        }
        total
    }

    /// Draws one object: binds its texture, culls and orders its faces, then
    /// rasterizes them back to front.
    pub fn render_object(
        &mut self,
        object: &mut Object,
        textures: &TextureBank,
        buffer: &mut FrameBuffer,
    ) -> RenderStats {
        let texture = self.bind_texture(object, textures);
        let offset = object.body().position;
        let (name, mesh) = object.parts_mut();
        visibility::prepare(
            mesh,
            offset,
            &self.world,
            self.config.backface_culling,
            &mut self.visible,
        );

        let mut stats = RenderStats {
            faces: mesh.faces().len(),
            visible: self.visible.len(),
            ..RenderStats::default()
        };

        let (vertices, faces) = mesh.parts_mut();
        for &index in &self.visible {
            let face = &faces[index];
            let [a, b, c] = face.indices();
            for i in [a, b, c] {
                self.projector.project(&mut vertices[i]);
            }

            let triangle = ScreenTriangle {
                points: [vertices[a].screen, vertices[b].screen, vertices[c].screen],
                uvs: [vertices[a].uv, vertices[b].uv, vertices[c].uv],
            };
            let outline = if self.config.shaded_outline {
                grey(self.light.intensity(face.normal))
            } else {
                self.config.outline_color
            };
            let style = FillStyle {
                mode: self.config.render_mode,
                outline,
            };

            match self.raster.fill_triangle(&triangle, texture, &style, buffer) {
                Ok(_) => stats.drawn += 1,
                Err(TriangleFault::Degenerate(_)) => stats.skipped += 1,
                Err(fault) => {
                    stats.skipped += 1;
                    let first_report = match self.reported_faces.get_mut(name) {
                        Some(seen) => seen.insert(index),
                        None => {
                            self.reported_faces
                                .insert(name.to_string(), HashSet::from([index]));
                            true
                        }
                    };
                    if first_report {
                        tracing::warn!(
                            object = %name,
                            face = index,
                            a = face.a,
                            b = face.b,
                            c = face.c,
                            %fault,
                            "triangle skipped"
                        );
                    }
                }
            }
        }

        tracing::trace!(
            object = %name,
            faces = stats.faces,
            visible = stats.visible,
            drawn = stats.drawn,
            skipped = stats.skipped,
            "object rendered"
        );
        stats
    }

    /// Looks up the object's texture, logging each unknown id once.
    fn bind_texture<'t>(&mut self, object: &Object, textures: &'t TextureBank) -> Option<&'t Texture> {
        let id = object.texture()?;
        match textures.bind(id) {
            Ok(texture) => Some(texture),
            Err(err) => {
                if self.reported_textures.insert(id) {
                    tracing::warn!(object = object.name(), %err, "drawing untextured");
                }
                None
            }
        }
    }
}
