//! The per-frame pipeline below the [`Renderer`](crate::renderer::Renderer):
//! visibility and ordering, edge scanning into spans, and span filling.

pub mod edge;
pub mod framebuffer;
pub mod rasterizer;
pub mod span;
pub mod visibility;

pub use framebuffer::{FrameBuffer, Surface};
pub use rasterizer::{
    classify, Classification, FillStyle, ScreenTriangle, SpanRasterizer, TriangleFault,
    TriangleShape,
};
pub use span::{Span, SpanTable};
