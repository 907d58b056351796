//! Span-based triangle rasterization with affine texture mapping.
//!
//! Each triangle goes through four steps:
//!
//! 1. **Classify** the projected vertices into one of three shapes and pick the
//!    apex, left and right vertices ([`classify`]).
//! 2. **Scan** the three edges into the [`SpanTable`].
//! 3. **Set up** texture interpolation along the left and right sides.
//! 4. **Walk** the spans top to bottom, interpolating `(u, v)` linearly in
//!    screen space across every span.
//!
//! ```text
//!   flat-top        flat-bottom        general
//!
//!      A            A________R            A
//!     / \            \      /            / \
//!    /   \            \    /            /   \
//!   /     \            \  /            /     M  <- one side re-anchors here
//!  L_______R            L             /   _/
//!                                    L_/
//! ```
//!
//! Texture coordinates are interpolated without perspective correction, so
//! large triangles at a steep angle visibly swim. No depth test is done; the
//! caller paints triangles back to front.

use super::edge::scan_triangle;
use super::framebuffer::FrameBuffer;
use super::span::SpanTable;
use crate::config::RenderMode;
use crate::math::Vec2;
use crate::texture::Texture;

/// Screen-space areas smaller than this are treated as zero.
const AREA_EPSILON: f32 = 1e-6;

/// A triangle the span filler cannot draw.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriangleFault {
    #[error("projected vertices are not finite: {0:?}")]
    NonFinite([Vec2; 3]),
    #[error("projected vertices enclose no area: {0:?}")]
    Degenerate([Vec2; 3]),
    #[error("no apex/middle ordering exists for projected vertices {0:?}")]
    Unclassified([Vec2; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleShape {
    /// Two vertices share the greatest screen Y; the apex is above them.
    FlatTop,
    /// Two vertices share the least screen Y; the apex is below them.
    FlatBottom,
    /// All three screen Y values differ.
    General,
}

/// Vertex roles of a classified triangle, as indices into its three vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub shape: TriangleShape,
    /// Where texture interpolation starts. For flat-bottom triangles this is
    /// the left end of the top edge rather than a geometric apex.
    pub anchor: usize,
    pub left: usize,
    pub right: usize,
    /// The vertex whose scanline splits a general triangle.
    pub middle: Option<usize>,
}

/// Classifies a projected triangle.
///
/// Y values are compared exactly. The left/right roles come from the sign of
/// a 2-D cross product rather than from the vertex order, so either winding
/// classifies the same way.
pub fn classify(points: [Vec2; 3]) -> Result<Classification, TriangleFault> {
    if !points.iter().all(|p| p.is_finite()) {
        return Err(TriangleFault::NonFinite(points));
    }
    if (points[1] - points[0]).cross(points[2] - points[0]).abs() < AREA_EPSILON {
        return Err(TriangleFault::Degenerate(points));
    }

    let y = |i: usize| points[i].y;
    let mut found = None;
    'search: for i in 0..3 {
        for j in (0..3).filter(|&j| j != i) {
            let k = 3 - i - j;
            if y(i) == y(j) {
                found = Some(if y(i) > y(k) {
                    (TriangleShape::FlatTop, k, None)
                } else if points[i].x < points[j].x {
                    (TriangleShape::FlatBottom, i, None)
                } else {
                    (TriangleShape::FlatBottom, j, None)
                });
                break 'search;
            }
            if y(i) < y(j) && y(j) < y(k) {
                found = Some((TriangleShape::General, i, Some(j)));
                break 'search;
            }
        }
    }
    let (shape, anchor, middle) = found.ok_or(TriangleFault::Unclassified(points))?;

    let mut left = (anchor + 1) % 3;
    let mut right = (left + 1) % 3;
    if (points[anchor] - points[left]).cross(points[right] - points[left]) < 0.0 {
        std::mem::swap(&mut left, &mut right);
    }

    Ok(Classification {
        shape,
        anchor,
        left,
        right,
        middle,
    })
}

/// Projected positions and texture coordinates of one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Vec2; 3],
    /// Normalized texture coordinates, within `[0, 1]`.
    pub uvs: [Vec2; 3],
}

/// What the span filler writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub mode: RenderMode,
    /// Value written over border pixels in wireframe mode.
    pub outline: u32,
}

/// Running texture coordinate along one side of a triangle, in texel units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct UvEdge {
    uv: Vec2,
    step: Vec2,
}

impl UvEdge {
    fn toward(from: Vec2, to: Vec2, rows: i32) -> Self {
        let step = if rows > 0 {
            (to - from) * (1.0 / rows as f32)
        } else {
            Vec2::ZERO
        };
        Self { uv: from, step }
    }

    #[inline]
    fn advance(&mut self, rows: i32) {
        self.uv = self.uv + self.step * rows as f32;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Replacement edge taken over at the middle vertex's scanline.
#[derive(Debug, Clone, Copy)]
struct Switch {
    row: i32,
    side: Side,
    edge: UvEdge,
}

#[inline]
fn row_of(p: Vec2) -> i32 {
    p.y.floor() as i32
}

/// Scan-converts triangles into a frame buffer through a reused span table.
#[derive(Debug, Clone)]
pub struct SpanRasterizer {
    spans: SpanTable,
}

impl SpanRasterizer {
    /// Creates a rasterizer able to draw into screens up to `max_height` rows.
    pub fn new(max_height: usize) -> Self {
        Self {
            spans: SpanTable::new(max_height),
        }
    }

    /// Spans of the last triangle drawn.
    pub fn spans(&self) -> &SpanTable {
        &self.spans
    }

    /// Fills one triangle.
    ///
    /// With [`RenderMode::TEXTURED`] set and a texture given, every covered
    /// pixel receives the nearest texel. With [`RenderMode::WIREFRAME`] set,
    /// the first and last pixel of every span and every pixel of the first and
    /// last scanline are overwritten with `style.outline`.
    pub fn fill_triangle(
        &mut self,
        triangle: &ScreenTriangle,
        texture: Option<&Texture>,
        style: &FillStyle,
        buffer: &mut FrameBuffer,
    ) -> Result<TriangleShape, TriangleFault> {
        let class = classify(triangle.points)?;

        self.spans.reset(buffer.height() as usize);
        scan_triangle(&mut self.spans, triangle.points);
        let scanlines = self.spans.scanlines();
        if scanlines.is_empty() {
            return Ok(class.shape);
        }

        let (mut left, mut right, top, mut switch) = setup_edges(triangle, &class, texture);

        // Rows above the screen were never scanned; catch the edges up.
        let first = scanlines.start;
        if first > top {
            match switch {
                Some(s) if s.row <= first => {
                    let mut taken = s.edge;
                    taken.advance(first.saturating_sub(s.row));
                    match s.side {
                        Side::Left => {
                            left = taken;
                            right.advance(first.saturating_sub(top));
                        }
                        Side::Right => {
                            right = taken;
                            left.advance(first.saturating_sub(top));
                        }
                    }
                    switch = None;
                }
                _ => {
                    left.advance(first.saturating_sub(top));
                    right.advance(first.saturating_sub(top));
                }
            }
        }

        let textured = style.mode.contains(RenderMode::TEXTURED);
        let wireframe = style.mode.contains(RenderMode::WIREFRAME);
        let width = buffer.width() as i32;
        let (min_y, max_y) = (scanlines.start, scanlines.end);

        for y in scanlines {
            if let Some(s) = switch.filter(|s| s.row == y) {
                match s.side {
                    Side::Left => left = s.edge,
                    Side::Right => right = s.edge,
                }
                switch = None;
            }

            let span = self.spans.get(y).unwrap_or_default();
            if !span.is_empty() && span.start < width && span.end >= 0 {
                // Spans of nearly edge-on geometry can reach the i32 limits.
                let dx = span.end as i64 - span.start as i64;
                let du = if dx != 0 {
                    (right.uv - left.uv) * (1.0 / dx as f32)
                } else {
                    Vec2::ZERO
                };
                let x1 = span.start.max(0);
                let x2 = span.end.min(width - 1);
                let mut uv = left.uv + du * (x1 as i64 - span.start as i64) as f32;

                let border_row = y == min_y || y == max_y - 1;
                let row = buffer.row_mut(y as usize);
                for x in x1..=x2 {
                    let pixel = &mut row[x as usize];
                    if textured {
                        if let Some(texture) = texture {
                            *pixel = texture.texel(uv.x, uv.y);
                        }
                    }
                    if wireframe && (border_row || x == x1 || x == x2) {
                        *pixel = style.outline;
                    }
                    uv = uv + du;
                }
            }

            left.advance(1);
            right.advance(1);
        }

        Ok(class.shape)
    }
}

/// Starting texture edges for the left and right sides, the row they start
/// on, and for general triangles the edge that takes over at the middle row.
fn setup_edges(
    triangle: &ScreenTriangle,
    class: &Classification,
    texture: Option<&Texture>,
) -> (UvEdge, UvEdge, i32, Option<Switch>) {
    let (tw, th) = texture.map_or((0.0, 0.0), |t| (t.width() as f32, t.height() as f32));
    let uv = |i: usize| Vec2::new(triangle.uvs[i].x * tw, triangle.uvs[i].y * th);
    let row = |i: usize| row_of(triangle.points[i]);
    let edge =
        |from: usize, to: usize| UvEdge::toward(uv(from), uv(to), row(to).saturating_sub(row(from)));

    let (a, l, r) = (class.anchor, class.left, class.right);
    match class.shape {
        // Both sides leave the apex and diverge.
        TriangleShape::FlatTop => (edge(a, l), edge(a, r), row(a), None),
        // Both sides leave the top edge and converge on the bottom vertex,
        // which the cross-product test always labels `left`.
        TriangleShape::FlatBottom => (edge(a, l), edge(r, l), row(a), None),
        TriangleShape::General => {
            let middle = class.middle.unwrap_or(l);
            let switch = if middle == l {
                Switch {
                    row: row(l),
                    side: Side::Left,
                    edge: edge(l, r),
                }
            } else {
                Switch {
                    row: row(r),
                    side: Side::Right,
                    edge: edge(r, l),
                }
            };
            (edge(a, l), edge(a, r), row(a), Some(switch))
        }
    }
}
