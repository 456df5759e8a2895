use crate::tileset::TILE_SIZE;
use macroquad::prelude::*;
use std::ops::Range;

const CULL_MARGIN_CELLS: i64 = 1;

/// Cell ranges of a layer that intersect the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    /// Columns
    pub xs: Range<usize>,
    /// Rows
    pub ys: Range<usize>,
}

/// Cells of a `width` × `height` layer drawn at `origin` that touch `view`,
/// padded by one cell. Without a view every cell is visible.
pub fn visible_cells(view: Option<Rect>, origin: Vec2, width: u16, height: u16) -> CellRange {
    let Some(view) = view else {
        return CellRange {
            xs: 0..width as usize,
            ys: 0..height as usize,
        };
    };

    let size = TILE_SIZE as f32;
    let axis = |min: f32, max: f32, o: f32, len: u16| -> Range<usize> {
        let (mut lo, mut hi) = (min, max);
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        let first = ((lo - o) / size).floor() as i64 - CULL_MARGIN_CELLS;
        let last = ((hi - o) / size).floor() as i64 + CULL_MARGIN_CELLS;
        let start = first.clamp(0, len as i64) as usize;
        let end = (last + 1).clamp(0, len as i64) as usize;
        start..end.max(start)
    };

    CellRange {
        xs: axis(view.x, view.x + view.w, origin.x, width),
        ys: axis(view.y, view.y + view.h, origin.y, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_view_means_whole_layer() {
        let r = visible_cells(None, Vec2::ZERO, 10, 4);
        assert_eq!(r, CellRange { xs: 0..10, ys: 0..4 });
    }

    #[test]
    fn view_is_padded_and_clamped() {
        // cells 2..=4 on x, 0..=1 on y, plus one cell of margin
        let view = Rect::new(40.0, 0.0, 30.0, 20.0);
        let r = visible_cells(Some(view), Vec2::ZERO, 100, 100);
        assert_eq!(r.xs, 1..6);
        assert_eq!(r.ys, 0..3);
    }

    #[test]
    fn view_outside_layer_is_empty() {
        let view = Rect::new(-500.0, -500.0, 100.0, 100.0);
        let r = visible_cells(Some(view), Vec2::ZERO, 8, 8);
        assert!(r.xs.is_empty());
        assert!(r.ys.is_empty());
    }

    #[test]
    fn origin_shifts_cells() {
        let view = Rect::new(0.0, 0.0, 16.0, 16.0);
        let r = visible_cells(Some(view), vec2(160.0, 0.0), 20, 20);
        assert!(r.xs.is_empty());
    }
}
