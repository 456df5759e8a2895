// src/loader/pxpack.rs
use crate::error::{EditorError, Result};
use crate::layer::{Layer, MapLayer};
use crate::map::{Entity, Map};
use std::path::Path;

/// Level file header.
pub const LEVEL_MAGIC: &[u8; 16] = b"PXPACK121127a**\0";
/// Start of each layer block.
pub const LAYER_MAGIC: &[u8; 8] = b"pxMAP01\0";
/// Start of the unit block.
pub const UNIT_MAGIC: &[u8; 8] = b"pxUNIT\0\0";

/// Byte cursor that reports failures against the file being decoded.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], path: &'a Path) -> Self {
        Reader { bytes, pos: 0, path }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.bytes.len());
        match end {
            Some(end) => {
                let out = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(out)
            }
            None => Err(EditorError::format(
                self.path,
                format!("unexpected end of file reading {what} at offset {}", self.pos),
            )),
        }
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &str) -> Result<u16> {
        let b = self.take(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn string(&mut self, what: &str) -> Result<String> {
        let len = self.u8(what)? as usize;
        let raw = self.take(len, what)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| EditorError::format(self.path, format!("{what} is not valid UTF-8")))
    }

    fn magic(&mut self, expected: &[u8], what: &str) -> Result<()> {
        let found = self.take(expected.len(), what)?;
        if found != expected {
            return Err(EditorError::format(
                self.path,
                format!("bad {what} header {:?}", String::from_utf8_lossy(found)),
            ));
        }
        Ok(())
    }

    fn grid(&mut self, what: &str) -> Result<Layer> {
        self.magic(LAYER_MAGIC, what)?;
        let width = self.u16(what)?;
        let height = self.u16(what)?;
        let cells = self.take(width as usize * height as usize, what)?;
        Layer::from_cells(width, height, cells.to_vec()).ok_or_else(|| {
            EditorError::format(self.path, format!("{what} cell count does not match {width}x{height}"))
        })
    }

    fn finish(&self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(EditorError::format(
                self.path,
                format!("{} trailing bytes after unit list", self.bytes.len() - self.pos),
            ));
        }
        Ok(())
    }
}

struct Writer<'a> {
    out: Vec<u8>,
    path: &'a Path,
}

impl<'a> Writer<'a> {
    fn string(&mut self, s: &str, what: &str) -> Result<()> {
        let len = u8::try_from(s.len()).map_err(|_| {
            EditorError::format(self.path, format!("{what} is longer than 255 bytes"))
        })?;
        self.out.push(len);
        self.out.extend_from_slice(s.as_bytes());
        Ok(())
    }

    fn u16(&mut self, v: u16) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn grid(&mut self, layer: &Layer) {
        self.out.extend_from_slice(LAYER_MAGIC);
        self.u16(layer.width());
        self.u16(layer.height());
        self.out.extend_from_slice(layer.cells());
    }
}

/// Decodes a `.pxpack` level. `path` is only used for error messages.
pub fn decode_level(bytes: &[u8], path: &Path) -> Result<Map> {
    let mut r = Reader::new(bytes, path);
    r.magic(LEVEL_MAGIC, "level")?;

    let mut map = Map::new_template();
    map.description = r.string("description")?;
    for n in map.neighbors.iter_mut() {
        *n = r.string("neighbor level name")?;
    }
    map.npc_palette = r.string("npc palette")?;
    map.level_settings = r.array::<8>("level settings")?;

    for layer in MapLayer::ALL {
        let i = layer.index();
        map.tilesets[i] = r.string("tileset name")?;
        map.tileset_settings1[i] = r.u8("tileset settings")?;
        map.tileset_settings2[i] = r.u8("tileset settings")?;
    }

    for layer in MapLayer::ALL {
        *map.layer_mut(layer) = r.grid(layer.name())?;
    }

    r.magic(UNIT_MAGIC, "unit list")?;
    let count = r.u16("unit count")?;
    map.entities = Vec::with_capacity(count as usize);
    for _ in 0..count {
        map.entities.push(Entity {
            flags: r.u8("unit")?,
            kind: r.u8("unit")?,
            unknown: r.u8("unit")?,
            x: r.u16("unit")?,
            y: r.u16("unit")?,
            params: r.array::<2>("unit")?,
            name: r.string("unit name")?,
        });
    }

    r.finish()?;
    Ok(map)
}

/// Encodes a map into `.pxpack` bytes.
pub fn encode_level(map: &Map, path: &Path) -> Result<Vec<u8>> {
    let mut w = Writer {
        out: Vec::with_capacity(256 + map.layers().iter().map(|l| l.cells().len()).sum::<usize>()),
        path,
    };
    w.out.extend_from_slice(LEVEL_MAGIC);
    w.string(&map.description, "description")?;
    for n in &map.neighbors {
        w.string(n, "neighbor level name")?;
    }
    w.string(&map.npc_palette, "npc palette")?;
    w.out.extend_from_slice(&map.level_settings);

    for layer in MapLayer::ALL {
        let i = layer.index();
        w.string(&map.tilesets[i], "tileset name")?;
        w.out.push(map.tileset_settings1[i]);
        w.out.push(map.tileset_settings2[i]);
    }

    for layer in MapLayer::ALL {
        w.grid(map.layer(layer));
    }

    let count = u16::try_from(map.entities.len())
        .map_err(|_| EditorError::format(path, "more than 65535 units"))?;
    w.out.extend_from_slice(UNIT_MAGIC);
    w.u16(count);
    for e in &map.entities {
        w.out.extend_from_slice(&[e.flags, e.kind, e.unknown]);
        w.u16(e.x);
        w.u16(e.y);
        w.out.extend_from_slice(&e.params);
        w.string(&e.name, "unit name")?;
    }

    Ok(w.out)
}

/// Decodes a `.pxattr` attribute grid.
pub fn decode_attributes(bytes: &[u8], path: &Path) -> Result<Layer> {
    Reader::new(bytes, path).grid("attribute grid")
}

/// Encodes an attribute grid in the `.pxattr` layout.
pub fn encode_attributes(grid: &Layer) -> Vec<u8> {
    let mut w = Writer {
        out: Vec::with_capacity(12 + grid.cells().len()),
        path: Path::new(""),
    };
    w.grid(grid);
    w.out
}
