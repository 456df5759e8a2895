use crate::error::{EditorError, Result};
use crate::layer::{Layer, MapLayer};
use crate::loader::pxpack::{decode_level, encode_level};
use crate::persist::write_atomic;
use crate::render::cull::visible_cells;
use crate::render::Canvas;
use crate::tileset::{TilesetStore, TILE_SIZE};
use log::{debug, info};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};

/// File extension of level files.
pub const LEVEL_EXTENSION: &str = "pxpack";

/// Level settings written into every new level.
pub const DEFAULT_LEVEL_SETTINGS: [u8; 8] = [0, 0, 0, 0, 1, 0, 0, 0];
/// Per-layer visibility mode for new levels.
pub const DEFAULT_TILESET_SETTINGS1: [u8; 3] = [2, 2, 2];
/// Per-layer scroll mode for new levels.
pub const DEFAULT_TILESET_SETTINGS2: [u8; 3] = [0, 0, 0];

const ENTITY_BOX_COLOR: Color = Color::new(1.0, 0.85, 0.1, 1.0);

/// Path of level `name` under the resource root.
pub fn level_path(root: &Path, name: &str) -> PathBuf {
    root.join("field").join(format!("{name}.{LEVEL_EXTENSION}"))
}

/// A placed unit (entity). Coordinates are in tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    /// Flag byte
    pub flags: u8,
    /// Unit type, also its sprite index
    pub kind: u8,
    /// Stored and written back untouched
    pub unknown: u8,
    /// Column
    pub x: u16,
    /// Row
    pub y: u16,
    /// Type-specific parameters
    pub params: [u8; 2],
    /// Unit name
    pub name: String,
}

/// One level: three tile layers, the settings vectors, header strings and units.
#[derive(Debug, Clone)]
pub struct Map {
    /// Free-form level comment
    pub description: String,
    /// Adjacent levels: left, right, up, down
    pub neighbors: [String; 4],
    /// NPC palette name
    pub npc_palette: String,
    /// Raw level settings bytes
    pub level_settings: [u8; 8],
    /// Tileset name per layer, empty for none
    pub tilesets: [String; 3],
    /// First raw settings byte per layer
    pub tileset_settings1: [u8; 3],
    /// Second raw settings byte per layer
    pub tileset_settings2: [u8; 3],
    /// Placed units
    pub entities: Vec<Entity>,
    layers: [Layer; 3],
    // tilesets this map acquired from the store and must release
    held: Vec<String>,
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.neighbors == other.neighbors
            && self.npc_palette == other.npc_palette
            && self.level_settings == other.level_settings
            && self.tilesets == other.tilesets
            && self.tileset_settings1 == other.tileset_settings1
            && self.tileset_settings2 == other.tileset_settings2
            && self.layers == other.layers
            && self.entities == other.entities
    }
}

impl Default for Map {
    fn default() -> Self {
        Map::new_template()
    }
}

impl Map {
    /// The map behind "New Level": empty layers and the documented default settings.
    pub fn new_template() -> Self {
        Map {
            description: String::new(),
            neighbors: Default::default(),
            npc_palette: String::new(),
            level_settings: DEFAULT_LEVEL_SETTINGS,
            tilesets: Default::default(),
            tileset_settings1: DEFAULT_TILESET_SETTINGS1,
            tileset_settings2: DEFAULT_TILESET_SETTINGS2,
            entities: Vec::new(),
            layers: Default::default(),
            held: Vec::new(),
        }
    }

    /// Reads `<root>/field/<level>.pxpack` and acquires every tileset it names.
    ///
    /// On error nothing stays acquired in `store`.
    pub fn load(root: &Path, level: &str, store: &mut TilesetStore) -> Result<Self> {
        let path = level_path(root, level);
        let bytes = std::fs::read(&path).map_err(|e| EditorError::from_read(&path, e))?;
        let mut map = decode_level(&bytes, &path)?;

        for name in map.tilesets.clone() {
            if name.is_empty() {
                continue;
            }
            if let Err(e) = store.acquire(root, &name) {
                map.unload(store);
                return Err(e);
            }
            map.held.push(name);
        }

        info!(
            "Loaded level {level}: {} entities, layers {:?}",
            map.entities.len(),
            map.layers.iter().map(|l| (l.width(), l.height())).collect::<Vec<_>>()
        );
        Ok(map)
    }

    /// Writes the map to `<root>/field/<level>.pxpack`, replacing the file atomically.
    pub fn write(&self, root: &Path, level: &str) -> Result<()> {
        let path = level_path(root, level);
        let bytes = encode_level(self, &path)?;
        write_atomic(&path, &bytes)?;
        info!("Wrote level {level} ({} bytes)", bytes.len());
        Ok(())
    }

    /// Releases the tilesets this map acquired and clears its contents. Safe to call twice.
    pub fn unload(&mut self, store: &mut TilesetStore) {
        for name in self.held.drain(..) {
            store.release(&name);
        }
        for layer in &mut self.layers {
            layer.clear();
        }
        self.entities.clear();
        debug!("Unloaded map");
    }

    /// Tileset names this map currently holds in the store.
    pub fn held_tilesets(&self) -> &[String] {
        &self.held
    }

    /// Grid of `layer`.
    #[inline]
    pub fn layer(&self, layer: MapLayer) -> &Layer {
        &self.layers[layer.index()]
    }

    /// Grid of `layer`, mutably.
    #[inline]
    pub fn layer_mut(&mut self, layer: MapLayer) -> &mut Layer {
        &mut self.layers[layer.index()]
    }

    /// All grids in draw order.
    pub fn layers(&self) -> &[Layer; 3] {
        &self.layers
    }

    /// Switches the tileset of `layer`, acquiring the new one before releasing the old.
    pub fn set_tileset(
        &mut self,
        root: &Path,
        layer: MapLayer,
        name: &str,
        store: &mut TilesetStore,
    ) -> Result<()> {
        let i = layer.index();
        if self.tilesets[i] == name {
            return Ok(());
        }
        if !name.is_empty() {
            store.acquire(root, name)?;
            self.held.push(name.to_owned());
        }
        let old = std::mem::replace(&mut self.tilesets[i], name.to_owned());
        if let Some(pos) = self.held.iter().position(|h| *h == old) {
            self.held.swap_remove(pos);
            store.release(&old);
        }
        Ok(())
    }

    /// Index of the first entity standing on tile `(x, y)`.
    pub fn entity_at(&self, x: usize, y: usize) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.x as usize == x && e.y as usize == y)
    }

    /// Moves entity `index`, returning its previous position.
    pub fn move_entity(&mut self, index: usize, x: u16, y: u16) -> Option<(u16, u16)> {
        let e = self.entities.get_mut(index)?;
        let old = (e.x, e.y);
        e.x = x;
        e.y = y;
        Some(old)
    }

    /// Editor-space rectangle covered by `layer`.
    pub fn play_area(&self, layer: MapLayer) -> Rect {
        let l = self.layer(layer);
        Rect::new(
            0.0,
            0.0,
            l.width() as f32 * TILE_SIZE as f32,
            l.height() as f32 * TILE_SIZE as f32,
        )
    }

    /// Draws one layer's tiles at `origin`, optionally with the attribute overlay.
    pub fn draw_layer(
        &self,
        layer: MapLayer,
        store: &TilesetStore,
        origin: Vec2,
        show_attributes: bool,
        canvas: &mut dyn Canvas,
    ) -> Result<()> {
        let name = &self.tilesets[layer.index()];
        let grid = self.layer(layer);
        if name.is_empty() || grid.is_empty() {
            return Ok(());
        }
        let tileset = store.get(name).ok_or_else(|| {
            EditorError::InvalidState(format!(
                "tileset {name} for the {} layer is not loaded",
                layer.name()
            ))
        })?;

        let size = TILE_SIZE as f32;
        let range = visible_cells(canvas.view_rect(), origin, grid.width(), grid.height());
        let overlay = show_attributes.then(|| store.attribute_atlas()).flatten();

        for y in range.ys.clone() {
            for x in range.xs.clone() {
                let Some(tile) = grid.get(x, y) else { continue };
                let dest = Rect::new(origin.x + x as f32 * size, origin.y + y as f32 * size, size, size);
                canvas.draw_sprite(tileset.atlas(), tile as u32, dest);

                if let Some(atlas) = overlay {
                    let attr = tileset.attribute(tile);
                    if attr != 0 {
                        canvas.draw_sprite(atlas, attr as u32, dest);
                    }
                }
            }
        }
        Ok(())
    }

    /// Draws units as sprites from the unit-type atlas and/or as outlined boxes.
    pub fn draw_entities(
        &self,
        store: &TilesetStore,
        origin: Vec2,
        boxes: bool,
        images: bool,
        canvas: &mut dyn Canvas,
    ) {
        let size = TILE_SIZE as f32;
        let atlas = images.then(|| store.unit_atlas()).flatten();
        for e in &self.entities {
            let dest = Rect::new(origin.x + e.x as f32 * size, origin.y + e.y as f32 * size, size, size);
            if let Some(atlas) = atlas {
                canvas.draw_sprite(atlas, e.kind as u32, dest);
            }
            if boxes {
                canvas.stroke_rect(dest, 1.0, ENTITY_BOX_COLOR);
            }
        }
    }
}
