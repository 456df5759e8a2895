// tests/common/mod.rs
#![allow(dead_code)]

use image::RgbaImage;
use macroquad::prelude::{Color, Rect};
use pxpack_editor::loader::pxpack::encode_attributes;
use pxpack_editor::{Atlas, AtlasKey, Canvas, Layer, Map, Settings, TILE_SIZE};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A resource root (`rsc/field`, `rsc/img`) plus an editor data dir, in a temp dir.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("rsc/field")).unwrap();
        fs::create_dir_all(dir.path().join("rsc/img")).unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/alwaysLoaded.txt"), "").unwrap();
        Fixture { dir }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("rsc")
    }

    pub fn data(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.path().join("settings.json")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            resource_path: self.root(),
            data_path: self.data(),
            ..Settings::default()
        }
    }

    /// Writes a `columns` x `rows` tile atlas and a matching attribute grid where
    /// tile `i` has attribute `i % 4`.
    pub fn add_tileset(&self, name: &str, columns: u16, rows: u16) {
        let img = RgbaImage::new(columns as u32 * TILE_SIZE, rows as u32 * TILE_SIZE);
        img.save(self.root().join("img").join(format!("{name}.png"))).unwrap();

        let mut attrs = Layer::new(columns, rows);
        for y in 0..rows as usize {
            for x in 0..columns as usize {
                attrs.set(x, y, ((y * columns as usize + x) % 4) as u8);
            }
        }
        fs::write(
            self.root().join("img").join(format!("{name}.pxattr")),
            encode_attributes(&attrs),
        )
        .unwrap();
    }

    pub fn pin(&self, names: &[&str]) {
        fs::write(self.data().join("alwaysLoaded.txt"), names.join("\n")).unwrap();
    }

    pub fn add_overlay_atlases(&self) {
        RgbaImage::new(64, 16).save(self.data().join("attribute.png")).unwrap();
        RgbaImage::new(64, 64).save(self.data().join("unittype.png")).unwrap();
    }

    pub fn level_file(&self, name: &str) -> PathBuf {
        self.root().join("field").join(format!("{name}.pxpack"))
    }

    /// Writes a level with a 4x3 foreground on `fg` and a 2x2 background on `bg`.
    pub fn add_level(&self, name: &str, bg: &str, fg: &str) -> Map {
        let mut map = sample_map(bg, fg);
        map.description = format!("level {name}");
        map.write(&self.root(), name).unwrap();
        map
    }
}

pub fn sample_map(bg: &str, fg: &str) -> Map {
    use pxpack_editor::{Entity, MapLayer};

    let mut map = Map::new_template();
    map.tilesets = [bg.to_owned(), String::new(), fg.to_owned()];
    *map.layer_mut(MapLayer::Background) = Layer::from_cells(2, 2, vec![1, 2, 3, 4]).unwrap();
    *map.layer_mut(MapLayer::Foreground) = Layer::new(4, 3);
    map.layer_mut(MapLayer::Foreground).set(1, 1, 5);
    map.entities.push(Entity {
        flags: 0,
        kind: 3,
        unknown: 0,
        x: 2,
        y: 1,
        params: [7, 8],
        name: "chest".into(),
    });
    map
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Sprite { key: AtlasKey, index: u32, dest: Rect },
    Fill { rect: Rect, color: Color },
    Stroke { rect: Rect },
}

/// Canvas that just records what it was asked to draw.
#[derive(Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    pub view: Option<Rect>,
}

impl RecordingCanvas {
    pub fn sprites(&self, key: AtlasKey) -> Vec<(u32, Rect)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Sprite { key: k, index, dest } if *k == key => Some((*index, *dest)),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Fill { .. })).count()
    }

    pub fn strokes(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Stroke { rect } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_sprite(&mut self, atlas: Atlas<'_>, index: u32, dest: Rect) {
        self.calls.push(DrawCall::Sprite {
            key: atlas.key,
            index,
            dest,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, _thickness: f32, _color: Color) {
        self.calls.push(DrawCall::Stroke { rect });
    }

    fn view_rect(&self) -> Option<Rect> {
        self.view
    }
}
