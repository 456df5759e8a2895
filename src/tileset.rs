use crate::error::{EditorError, Result};
use crate::layer::Layer;
use crate::loader::pxpack::decode_attributes;
use crate::render::{Atlas, AtlasKey};
use image::RgbaImage;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Edge length in pixels of one tile, both in tileset images and in editor space.
pub const TILE_SIZE: u32 = 16;

/// A decoded tileset: the tile atlas plus its per-tile attribute grid.
#[derive(Debug, Clone)]
pub struct Tileset {
    /// Name the tileset was loaded under
    pub name: String,
    id: u64,
    image: RgbaImage,
    attributes: Layer,
}

impl Tileset {
    /// Reads `<root>/img/<name>.png` and `<root>/img/<name>.pxattr`.
    pub fn load(root: &Path, name: &str, id: u64) -> Result<Self> {
        let image_path = image_path(root, name);
        let attr_path = attribute_path(root, name);
        for p in [&image_path, &attr_path] {
            if !p.is_file() {
                return Err(EditorError::ResourceNotFound { path: p.clone() });
            }
        }

        let image = load_rgba(&image_path)?;
        let bytes =
            std::fs::read(&attr_path).map_err(|e| EditorError::from_read(&attr_path, e))?;
        let attributes = decode_attributes(&bytes, &attr_path)?;

        Ok(Tileset {
            name: name.to_owned(),
            id,
            image,
            attributes,
        })
    }

    /// Unique id of this load; a reload gets a new id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Tiles per atlas row.
    pub fn columns(&self) -> u32 {
        (self.image.width() / TILE_SIZE).max(1)
    }

    /// Attribute byte of `tile`, 0 when the attribute grid does not cover it.
    pub fn attribute(&self, tile: u8) -> u8 {
        let cols = self.columns() as usize;
        let (x, y) = (tile as usize % cols, tile as usize / cols);
        self.attributes.get(x, y).unwrap_or(0)
    }

    /// Atlas image keyed by this load.
    pub fn atlas(&self) -> Atlas<'_> {
        Atlas {
            key: AtlasKey::Tileset(self.id),
            image: &self.image,
        }
    }
}

/// `<root>/img/<name>.png`
pub fn image_path(root: &Path, name: &str) -> PathBuf {
    root.join("img").join(format!("{name}.png"))
}

/// `<root>/img/<name>.pxattr`
pub fn attribute_path(root: &Path, name: &str) -> PathBuf {
    root.join("img").join(format!("{name}.pxattr"))
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(e) => EditorError::from_read(path, e),
        source => EditorError::Image {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(img.to_rgba8())
}

struct Entry {
    tileset: Tileset,
    holders: usize,
    pinned: bool,
}

/// Loaded tilesets by name, with holder counts so maps can share them.
#[derive(Default)]
pub struct TilesetStore {
    entries: HashMap<String, Entry>,
    next_id: u64,
    attribute_atlas: Option<RgbaImage>,
    unit_atlas: Option<RgbaImage>,
}

impl TilesetStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `name` unless it is already present.
    pub fn load(&mut self, root: &Path, name: &str) -> Result<&Tileset> {
        if !self.entries.contains_key(name) {
            let id = self.next_id;
            let tileset = Tileset::load(root, name, id)?;
            self.next_id += 1;
            debug!("Loaded tileset {name} (id {id})");
            self.entries.insert(
                name.to_owned(),
                Entry {
                    tileset,
                    holders: 0,
                    pinned: false,
                },
            );
        }
        Ok(&self.entries[name].tileset)
    }

    /// Loads `name` if needed and registers one more holder.
    pub fn acquire(&mut self, root: &Path, name: &str) -> Result<&Tileset> {
        self.load(root, name)?;
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| EditorError::InvalidState(format!("tileset {name} vanished")))?;
        entry.holders += 1;
        Ok(&entry.tileset)
    }

    /// Drops one holder; the tileset is unloaded once nothing holds it and it is not pinned.
    pub fn release(&mut self, name: &str) {
        let Some(entry) = self.entries.get_mut(name) else {
            return;
        };
        entry.holders = entry.holders.saturating_sub(1);
        if entry.holders == 0 && !entry.pinned {
            self.unload(name);
        }
    }

    /// Removes a tileset regardless of holders. Returns false if it was not loaded.
    pub fn unload(&mut self, name: &str) -> bool {
        let removed = self.entries.remove(name).is_some();
        if removed {
            debug!("Unloaded tileset {name}");
        }
        removed
    }

    /// Loads and pins every name listed in `<data_dir>/alwaysLoaded.txt`, then the
    /// attribute and unit-type atlases from the same directory.
    pub fn load_fixed(&mut self, root: &Path, data_dir: &Path) -> Result<()> {
        let list = data_dir.join("alwaysLoaded.txt");
        let txt = std::fs::read_to_string(&list).map_err(|e| EditorError::from_read(&list, e))?;
        for name in txt.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.load(root, name)?;
            if let Some(entry) = self.entries.get_mut(name) {
                entry.pinned = true;
            }
        }

        self.attribute_atlas = load_optional_atlas(&data_dir.join("attribute.png"))?;
        self.unit_atlas = load_optional_atlas(&data_dir.join("unittype.png"))?;
        info!("Loaded {} fixed tilesets", self.entries.len());
        Ok(())
    }

    /// Loaded tileset called `name`.
    pub fn get(&self, name: &str) -> Option<&Tileset> {
        self.entries.get(name).map(|e| &e.tileset)
    }

    /// Whether `name` is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of maps currently holding `name`.
    pub fn holders(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, |e| e.holders)
    }

    /// Whether `name` is always loaded.
    pub fn is_pinned(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.pinned)
    }

    /// Loaded tilesets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load ids of every tileset still present.
    pub fn live_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.values().map(|e| e.tileset.id)
    }

    /// Attribute overlay sprites, when present.
    pub fn attribute_atlas(&self) -> Option<Atlas<'_>> {
        self.attribute_atlas.as_ref().map(|image| Atlas {
            key: AtlasKey::Attribute,
            image,
        })
    }

    /// Unit sprites, when present.
    pub fn unit_atlas(&self) -> Option<Atlas<'_>> {
        self.unit_atlas.as_ref().map(|image| Atlas {
            key: AtlasKey::UnitType,
            image,
        })
    }

    /// Drops everything, pinned tilesets included.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.attribute_atlas = None;
        self.unit_atlas = None;
    }
}

fn load_optional_atlas(path: &Path) -> Result<Option<RgbaImage>> {
    if !path.is_file() {
        warn!("Editor atlas {} is missing", path.display());
        return Ok(None);
    }
    load_rgba(path).map(Some)
}
