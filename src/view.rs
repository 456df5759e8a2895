use crate::layer::Layer;
use crate::tileset::TILE_SIZE;
use macroquad::prelude::*;

/// Zoom applied whenever a level is (re)loaded.
pub const DEFAULT_ZOOM: f32 = 2.0;
/// Smallest zoom the wheel can reach.
pub const MIN_ZOOM: f32 = 0.25;
/// Largest zoom the wheel can reach.
pub const MAX_ZOOM: f32 = 8.0;

/// Editor camera. A world point `p` lands on screen at `(p - target) * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorCamera {
    /// Screen position of `target`
    pub offset: Vec2,
    /// World point pinned to `offset`
    pub target: Vec2,
    /// Unused by the editor, kept at 0
    pub rotation: f32,
    /// Screen pixels per world pixel
    pub zoom: f32,
}

impl Default for EditorCamera {
    fn default() -> Self {
        EditorCamera {
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
            rotation: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl EditorCamera {
    /// Back to offset 0, zoom 2, rotation 0.
    pub fn reset(&mut self) {
        *self = EditorCamera::default();
    }

    /// Moves the camera horizontally, by `amount` or to `amount`.
    pub fn move_x(&mut self, amount: f32, relative: bool) {
        if relative {
            self.offset.x += amount;
        } else {
            self.offset.x = amount;
        }
    }

    /// Vertical counterpart of [`EditorCamera::move_x`].
    pub fn move_y(&mut self, amount: f32, relative: bool) {
        if relative {
            self.offset.y += amount;
        } else {
            self.offset.y = amount;
        }
    }

    /// Multiplies zoom by `factor`, keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Vec2, factor: f32) {
        if factor <= 0.0 {
            return;
        }
        let world = self.screen_to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = anchor - (world - self.target) * self.zoom;
    }

    /// World (editor pixel) position to window position.
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        (p - self.target) * self.zoom + self.offset
    }

    /// Window position to world position.
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        (p - self.offset) / self.zoom + self.target
    }

    /// Column under the window position `pointer`, `None` for "no tile": a negative
    /// column, or one at or past the width of `layer` when given.
    pub fn tile_x(&self, pointer: Vec2, layer: Option<&Layer>) -> Option<usize> {
        let x = self.cell(pointer.x - self.offset.x, self.target.x)?;
        match layer {
            Some(l) if x >= l.width() as usize => None,
            _ => Some(x),
        }
    }

    /// Row under `pointer`. Like the column, it is only rejected when negative or at
    /// or past the layer's *width*; writes further down miss the grid and do nothing.
    pub fn tile_y(&self, pointer: Vec2, layer: Option<&Layer>) -> Option<usize> {
        let y = self.cell(pointer.y - self.offset.y, self.target.y)?;
        match layer {
            Some(l) if y >= l.width() as usize => None,
            _ => Some(y),
        }
    }

    /// Both coordinates, or `None` if either is off the layer.
    pub fn tile_at(&self, pointer: Vec2, layer: Option<&Layer>) -> Option<(usize, usize)> {
        Some((self.tile_x(pointer, layer)?, self.tile_y(pointer, layer)?))
    }

    fn cell(&self, delta: f32, target: f32) -> Option<usize> {
        if self.zoom <= 0.0 {
            return None;
        }
        let world = delta / self.zoom + target;
        let c = (world / TILE_SIZE as f32).floor();
        (c >= 0.0 && c.is_finite()).then_some(c as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_pointer_through_offset_and_zoom() {
        let cam = EditorCamera {
            offset: vec2(100.0, 50.0),
            zoom: 2.0,
            ..Default::default()
        };
        // one tile is 32 screen pixels at zoom 2
        assert_eq!(cam.tile_x(vec2(100.0, 0.0), None), Some(0));
        assert_eq!(cam.tile_x(vec2(131.9, 0.0), None), Some(0));
        assert_eq!(cam.tile_x(vec2(132.0, 0.0), None), Some(1));
        assert_eq!(cam.tile_y(vec2(0.0, 50.0 + 32.0 * 5.0 + 1.0), None), Some(5));
    }

    #[test]
    fn negative_coordinates_are_no_tile() {
        let cam = EditorCamera {
            offset: vec2(100.0, 100.0),
            zoom: 1.0,
            ..Default::default()
        };
        assert_eq!(cam.tile_x(vec2(99.0, 0.0), None), None);
        assert_eq!(cam.tile_y(vec2(0.0, 84.0), None), None);
    }

    #[test]
    fn layer_bounds_limit_each_axis() {
        let cam = EditorCamera {
            zoom: 1.0,
            ..Default::default()
        };
        let layer = Layer::new(4, 2);
        assert_eq!(cam.tile_x(vec2(63.0, 0.0), Some(&layer)), Some(3));
        assert_eq!(cam.tile_x(vec2(64.0, 0.0), Some(&layer)), None);
        assert_eq!(cam.tile_y(vec2(0.0, 63.0), Some(&layer)), Some(3));
        assert_eq!(cam.tile_y(vec2(0.0, 64.0), Some(&layer)), None);
        assert_eq!(cam.tile_at(vec2(70.0, 10.0), Some(&layer)), None);
    }

    #[test]
    fn row_is_bounded_by_layer_width_not_height() {
        let cam = EditorCamera {
            zoom: 1.0,
            ..Default::default()
        };
        let wide = Layer::new(10, 5);
        assert_eq!(cam.tile_y(vec2(0.0, 7.0 * 16.0 + 1.0), Some(&wide)), Some(7));
        assert_eq!(cam.tile_y(vec2(0.0, 10.0 * 16.0), Some(&wide)), None);

        let tall = Layer::new(2, 8);
        assert_eq!(cam.tile_y(vec2(0.0, 3.0 * 16.0), Some(&tall)), None);
    }

    #[test]
    fn tile_mapping_holds_across_offsets_and_zooms() {
        let layer = Layer::new(10, 10);
        for &zoom in &[0.25f32, 0.5, 1.0, 1.5, 2.0, 3.0, 8.0] {
            for &off in &[-300.0f32, -17.0, 0.0, 33.0, 250.0] {
                let cam = EditorCamera {
                    offset: vec2(off, off),
                    zoom,
                    ..Default::default()
                };
                for px in (-400..800).step_by(7) {
                    let p = vec2(px as f32, px as f32);
                    let expected = ((p.x - off) / zoom / TILE_SIZE as f32).floor();
                    let got = cam.tile_x(p, Some(&layer));
                    if expected < 0.0 || expected >= 10.0 {
                        assert_eq!(got, None, "zoom {zoom} off {off} px {px}");
                    } else {
                        assert_eq!(got, Some(expected as usize), "zoom {zoom} off {off} px {px}");
                    }
                }
            }
        }
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed_and_clamps() {
        let mut cam = EditorCamera::default();
        let anchor = vec2(200.0, 120.0);
        let before = cam.screen_to_world(anchor);
        cam.zoom_at(anchor, 1.5);
        let after = cam.screen_to_world(anchor);
        assert!((before - after).length() < 1e-3);

        for _ in 0..50 {
            cam.zoom_at(anchor, 2.0);
        }
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn move_relative_and_absolute() {
        let mut cam = EditorCamera::default();
        cam.move_x(10.0, true);
        cam.move_x(5.0, true);
        cam.move_y(-3.0, false);
        assert_eq!(cam.offset, vec2(15.0, -3.0));
    }
}
