use super::{Atlas, AtlasKey, Canvas};
use crate::tileset::TilesetStore;
use crate::view::EditorCamera;
use macroquad::prelude::*;
use std::collections::HashMap;

/// [`Canvas`] that draws with macroquad, applying the editor camera by hand.
///
/// Atlases are uploaded to the GPU the first time they are drawn and dropped by
/// [`MacroquadCanvas::prune`] once the store no longer has them.
#[derive(Default)]
pub struct MacroquadCanvas {
    camera: EditorCamera,
    textures: HashMap<AtlasKey, Texture2D>,
}

impl MacroquadCanvas {
    /// Empty texture cache and a default camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera used for the frame about to be drawn.
    pub fn set_camera(&mut self, camera: EditorCamera) {
        self.camera = camera;
    }

    /// Drops textures of tilesets that are no longer loaded.
    pub fn prune(&mut self, store: &TilesetStore) {
        let live: Vec<u64> = store.live_ids().collect();
        self.textures.retain(|key, _| match key {
            AtlasKey::Tileset(id) => live.contains(id),
            AtlasKey::Attribute => store.attribute_atlas().is_some(),
            AtlasKey::UnitType => store.unit_atlas().is_some(),
        });
    }

    fn texture(&mut self, atlas: Atlas<'_>) -> &Texture2D {
        self.textures.entry(atlas.key).or_insert_with(|| {
            let (w, h) = atlas.image.dimensions();
            let tex = Texture2D::from_rgba8(w as u16, h as u16, atlas.image.as_raw());
            tex.set_filter(FilterMode::Nearest);
            tex
        })
    }

    fn to_screen(&self, r: Rect) -> Rect {
        let p = self.camera.world_to_screen(vec2(r.x, r.y));
        Rect::new(p.x, p.y, r.w * self.camera.zoom, r.h * self.camera.zoom)
    }
}

impl Canvas for MacroquadCanvas {
    fn draw_sprite(&mut self, atlas: Atlas<'_>, index: u32, dest: Rect) {
        let source = atlas.source(index);
        let d = self.to_screen(dest);
        let tex = self.texture(atlas).clone();
        draw_texture_ex(
            &tex,
            d.x,
            d.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(d.w, d.h)),
                source: Some(source),
                ..Default::default()
            },
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = self.to_screen(rect);
        draw_rectangle(r.x, r.y, r.w, r.h, color);
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        let r = self.to_screen(rect);
        draw_rectangle_lines(r.x, r.y, r.w, r.h, thickness, color);
    }

    fn view_rect(&self) -> Option<Rect> {
        let min = self.camera.screen_to_world(Vec2::ZERO);
        let max = self.camera.screen_to_world(vec2(screen_width(), screen_height()));
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }
}
