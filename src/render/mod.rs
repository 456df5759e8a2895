//! Drawing seam between the map model and whatever draws it.

/// Macroquad implementation of [`Canvas`].
pub mod backend;
/// View culling.
pub mod cull;

use crate::tileset::TILE_SIZE;
use image::RgbaImage;
use macroquad::prelude::*;

/// Identifies an atlas so a backend can cache its GPU copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtlasKey {
    /// A loaded tileset, by load id
    Tileset(u64),
    /// The tile attribute overlay atlas
    Attribute,
    /// The entity (unit type) atlas
    UnitType,
}

/// A square-tile image atlas.
#[derive(Clone, Copy)]
pub struct Atlas<'a> {
    /// Cache key
    pub key: AtlasKey,
    /// Decoded pixels
    pub image: &'a RgbaImage,
}

impl Atlas<'_> {
    /// Source rectangle of sprite `index`, `TILE_SIZE` pixels square, row-major.
    pub fn source(&self, index: u32) -> Rect {
        sprite_source(self.image.width(), index)
    }
}

/// Source rectangle of sprite `index` in an atlas `image_width` pixels wide.
pub fn sprite_source(image_width: u32, index: u32) -> Rect {
    let columns = (image_width / TILE_SIZE).max(1);
    Rect::new(
        ((index % columns) * TILE_SIZE) as f32,
        ((index / columns) * TILE_SIZE) as f32,
        TILE_SIZE as f32,
        TILE_SIZE as f32,
    )
}

/// World-space drawing surface. Coordinates are editor pixels before the camera transform.
pub trait Canvas {
    /// Draws one atlas sprite stretched to `dest`.
    fn draw_sprite(&mut self, atlas: Atlas<'_>, index: u32, dest: Rect);
    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Outlines a rectangle.
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    /// World-space area currently on screen, if known. Used for culling.
    fn view_rect(&self) -> Option<Rect> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_source_wraps_on_atlas_width() {
        assert_eq!(sprite_source(64, 0), Rect::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(sprite_source(64, 3), Rect::new(48.0, 0.0, 16.0, 16.0));
        assert_eq!(sprite_source(64, 5), Rect::new(16.0, 16.0, 16.0, 16.0));
        // narrower than one tile still yields a single column
        assert_eq!(sprite_source(8, 2), Rect::new(0.0, 32.0, 16.0, 16.0));
    }
}
