//! Edge scanning: turns one screen-space triangle edge into span updates.
//!
//! X is stepped with the edge's inverse slope, one scanline at a time, starting
//! from the upper endpoint's exact X, and floored into a pixel column. Row
//! numbers are the floor of the endpoint Y values; the upper endpoint's row is
//! written, the lower one's is not.

use super::span::SpanTable;
use crate::math::Vec2;

/// Endpoints closer than this in Y form a horizontal edge, which is skipped.
pub const EDGE_EPSILON: f32 = 1e-5;

/// Widens the spans of every row the edge `a`-`b` crosses.
///
/// Edges entirely above or below the table's active rows write nothing. An
/// edge starting above row 0 is advanced to row 0 first.
pub fn scan_edge(spans: &mut SpanTable, a: Vec2, b: Vec2) {
    if (a.y - b.y).abs() < EDGE_EPSILON {
        return;
    }
    let (top, bottom) = if a.y < b.y { (a, b) } else { (b, a) };

    let rows = spans.rows() as i64;
    let mut first = top.y.floor() as i64;
    let last = (bottom.y.floor() as i64).min(rows);
    if first >= rows || last < 0 {
        return;
    }

    let slope = (bottom.x - top.x) / (bottom.y - top.y);
    let mut x = top.x;
    if first < 0 {
        // Stepped in f32: a far-off top row saturates `first` at i64::MIN.
        x -= slope * top.y.floor();
        first = 0;
    }

    spans.extend_bounds(first as i32, last as i32);
    for y in first..last {
        spans.widen(y as usize, x.floor() as i32);
        x += slope;
    }
}

/// Scans all three edges of a screen-space triangle.
pub fn scan_triangle(spans: &mut SpanTable, [a, b, c]: [Vec2; 3]) {
    scan_edge(spans, a, b);
    scan_edge(spans, b, c);
    scan_edge(spans, c, a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::span::Span;

    fn table(rows: usize) -> SpanTable {
        let mut table = SpanTable::new(rows);
        table.reset(rows);
        table
    }

    #[test]
    fn horizontal_edges_are_skipped() {
        let mut spans = table(10);
        scan_edge(&mut spans, Vec2::new(0.0, 4.0), Vec2::new(8.0, 4.0));
        assert!(spans.is_empty());
    }

    #[test]
    fn vertical_edge_covers_rows_top_inclusive_bottom_exclusive() {
        let mut spans = table(10);
        scan_edge(&mut spans, Vec2::new(3.0, 6.0), Vec2::new(3.0, 2.0));
        assert_eq!(spans.scanlines(), 2..6);
        for y in 2..6 {
            assert_eq!(spans.get(y), Some(Span { start: 3, end: 3 }));
        }
        assert!(spans.get(6).is_some_and(|s| s.is_empty()));
    }

    #[test]
    fn slope_advances_x_per_row() {
        let mut spans = table(10);
        scan_edge(&mut spans, Vec2::new(0.0, 0.0), Vec2::new(8.0, 4.0));
        let starts: Vec<i32> = (0..4).map(|y| spans.get(y).map_or(-1, |s| s.start)).collect();
        assert_eq!(starts, vec![0, 2, 4, 6]);
    }

    #[test]
    fn top_clipped_edge_starts_at_row_zero_with_advanced_x() {
        let mut spans = table(10);
        scan_edge(&mut spans, Vec2::new(0.0, -4.0), Vec2::new(8.0, 4.0));
        assert_eq!(spans.scanlines(), 0..4);
        // x at y = 0 is 4 for a slope of 1.
        assert_eq!(spans.get(0), Some(Span { start: 4, end: 4 }));
    }

    #[test]
    fn far_off_top_endpoint_is_stepped_without_overflow() {
        let mut spans = table(20);
        scan_edge(&mut spans, Vec2::new(0.0, -1e20), Vec2::new(10.0, 10.0));
        assert_eq!(spans.scanlines(), 0..10);
        // The edge is all but vertical by the time it reaches the screen.
        let x = spans.get(0).map_or(-1, |s| s.start);
        assert!((9..=10).contains(&x), "x = {x}");
    }

    #[test]
    fn bottom_clipped_edge_stops_at_last_row() {
        let mut spans = table(5);
        scan_edge(&mut spans, Vec2::new(1.0, 2.0), Vec2::new(1.0, 40.0));
        assert_eq!(spans.scanlines(), 2..5);
    }

    #[test]
    fn triangles_outside_the_screen_write_nothing() {
        let mut spans = table(20);
        scan_triangle(
            &mut spans,
            [Vec2::new(0.0, -30.0), Vec2::new(10.0, -12.0), Vec2::new(5.0, -1.5)],
        );
        assert!(spans.is_empty());

        scan_triangle(
            &mut spans,
            [Vec2::new(0.0, 20.0), Vec2::new(10.0, 35.0), Vec2::new(5.0, 28.0)],
        );
        assert!(spans.is_empty());
        assert!((0..20).all(|y| spans.get(y).is_some_and(|s| s.is_empty())));
    }

    #[test]
    fn flat_bottom_triangle_spans_twenty_rows() {
        let mut spans = table(64);
        scan_triangle(
            &mut spans,
            [Vec2::new(10.0, 10.0), Vec2::new(30.0, 10.0), Vec2::new(20.0, 30.0)],
        );
        assert_eq!(spans.scanlines(), 10..30);
        assert_eq!(spans.get(10), Some(Span { start: 10, end: 30 }));
        let last = spans.get(29).unwrap_or(Span::EMPTY);
        assert!(last.start >= 19 && last.end <= 21);
    }
}
