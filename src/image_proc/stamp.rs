//! Boundary-safe stamp compositing
//!
//! A rendered stamp is anchored on the canvas by truncating its top-left
//! corner to integer pixel coordinates, then only the sub-rectangle that
//! actually overlaps the canvas is added. The intersection arithmetic lives
//! in one place so the stellar and galaxy renderers cannot disagree about
//! edge handling.

use ndarray::{s, Array2};
use std::ops::Range;

/// Overlapping sub-rectangles of a stamp and the canvas it lands on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampOverlap {
    /// Row range within the canvas
    pub canvas_rows: Range<usize>,
    /// Column range within the canvas
    pub canvas_cols: Range<usize>,
    /// Row range within the stamp
    pub stamp_rows: Range<usize>,
    /// Column range within the stamp
    pub stamp_cols: Range<usize>,
}

/// Intersect a centered square stamp with the canvas bounds
///
/// The stamp's top-left corner is `trunc(center - size/2)` in each axis,
/// matching integer truncation toward zero. Returns `None` when the stamp
/// lies entirely outside the canvas.
pub fn clipped_overlap(
    canvas_dim: (usize, usize),
    x: f64,
    y: f64,
    stamp_size: usize,
) -> Option<StampOverlap> {
    let (height, width) = canvas_dim;
    let center = (stamp_size / 2) as f64;
    let size = stamp_size as i64;

    let x_start = (x - center) as i64;
    let y_start = (y - center) as i64;

    let canvas_x0 = x_start.max(0);
    let canvas_y0 = y_start.max(0);
    let canvas_x1 = (x_start + size).min(width as i64);
    let canvas_y1 = (y_start + size).min(height as i64);

    if canvas_x1 <= canvas_x0 || canvas_y1 <= canvas_y0 {
        return None;
    }

    let stamp_x0 = (canvas_x0 - x_start) as usize;
    let stamp_y0 = (canvas_y0 - y_start) as usize;
    let stamp_x1 = stamp_x0 + (canvas_x1 - canvas_x0) as usize;
    let stamp_y1 = stamp_y0 + (canvas_y1 - canvas_y0) as usize;

    Some(StampOverlap {
        canvas_rows: canvas_y0 as usize..canvas_y1 as usize,
        canvas_cols: canvas_x0 as usize..canvas_x1 as usize,
        stamp_rows: stamp_y0..stamp_y1,
        stamp_cols: stamp_x0..stamp_x1,
    })
}

/// Add a stamp into the canvas at sub-pixel position (x, y), clipping at the
/// image edges
///
/// Sources near or beyond an edge are flux-truncated: the composited sum is
/// always <= the stamp total, with equality when the stamp lies fully inside
/// the canvas. A fully off-canvas stamp is a no-op.
pub fn composite_stamp(canvas: &mut Array2<f64>, stamp: &Array2<f64>, x: f64, y: f64) {
    let (stamp_h, stamp_w) = stamp.dim();
    debug_assert_eq!(stamp_h, stamp_w, "stamps are square");

    let Some(overlap) = clipped_overlap(canvas.dim(), x, y, stamp_h) else {
        return;
    };

    let mut target = canvas.slice_mut(s![
        overlap.canvas_rows.clone(),
        overlap.canvas_cols.clone()
    ]);
    target += &stamp.slice(s![overlap.stamp_rows, overlap.stamp_cols]);
}
