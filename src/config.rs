//! Renderer configuration.
//!
//! [`RendererConfig`] gathers every knob the pipeline reads. The defaults
//! describe a 640x480 desktop window; [`RendererConfig::handheld`] describes the
//! 320x240 handheld screen the renderer was sized for.

use bitflags::bitflags;

pub const DESKTOP_WIDTH: u32 = 640;
pub const DESKTOP_HEIGHT: u32 = 480;
pub const HANDHELD_WIDTH: u32 = 320;
pub const HANDHELD_HEIGHT: u32 = 240;

pub const DEFAULT_FOV: f32 = 90.0;
pub const MIN_FOV: f32 = 60.0;
pub const MAX_FOV: f32 = 100.0;

/// Outline value written by the wireframe pass (opaque black).
pub const OUTLINE_COLOR: u32 = 0xFF00_0000;
pub const BACKGROUND_COLOR: u32 = 0xFFFF_FFFF;

bitflags! {
    /// Output selection for the span filler. The two bits are independent:
    /// both may be set, and with both cleared a triangle writes nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderMode: u8 {
        /// Write the sampled texel for every covered pixel.
        const TEXTURED = 1 << 0;
        /// Overwrite the border pixels of every triangle with the outline value.
        const WIREFRAME = 1 << 1;
    }
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::TEXTURED
    }
}

/// Screen-space rectangle the projector maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Directional light used for the per-triangle intensity term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    /// Direction the light travels along; normalized by the renderer.
    pub direction: [f32; 3],
    pub ambient: u8,
    pub diffuse: u8,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [0.0, 0.0, 1.0],
            ambient: 20,
            diffuse: 215,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Field of view in degrees, clamped into `[fov_min, fov_max]`.
    pub fov: f32,
    pub fov_min: f32,
    pub fov_max: f32,
    pub viewport: Viewport,
    /// Rows reserved in the span table. Frames taller than this are cut off.
    pub max_screen_height: u32,
    pub render_mode: RenderMode,
    pub outline_color: u32,
    /// Use the triangle's light intensity as a grey outline instead of `outline_color`.
    pub shaded_outline: bool,
    pub backface_culling: bool,
    pub light: LightConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::with_screen(DESKTOP_WIDTH, DESKTOP_HEIGHT)
    }
}

impl RendererConfig {
    /// Defaults for a full-screen viewport of the given size.
    pub fn with_screen(width: u32, height: u32) -> Self {
        Self {
            fov: DEFAULT_FOV,
            fov_min: MIN_FOV,
            fov_max: MAX_FOV,
            viewport: Viewport::new(0, 0, width, height),
            max_screen_height: height,
            render_mode: RenderMode::default(),
            outline_color: OUTLINE_COLOR,
            shaded_outline: false,
            backface_culling: true,
            light: LightConfig::default(),
        }
    }

    /// The 320x240 handheld screen.
    pub fn handheld() -> Self {
        Self::with_screen(HANDHELD_WIDTH, HANDHELD_HEIGHT)
    }
}
