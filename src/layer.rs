/// The three depth-ordered tile layers of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapLayer {
    /// Drawn first
    Background,
    /// Drawn between background and foreground
    Middleground,
    /// Drawn last
    Foreground,
}

impl MapLayer {
    /// Number of layers in every level.
    pub const COUNT: usize = 3;
    /// All layers in draw order.
    pub const ALL: [MapLayer; MapLayer::COUNT] = [
        MapLayer::Background,
        MapLayer::Middleground,
        MapLayer::Foreground,
    ];

    /// Position of the layer in per-layer arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Layer for an array position.
    pub fn from_index(i: usize) -> Option<MapLayer> {
        MapLayer::ALL.get(i).copied()
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            MapLayer::Background => "background",
            MapLayer::Middleground => "middleground",
            MapLayer::Foreground => "foreground",
        }
    }
}

/// A width × height grid of one byte per cell, row-major.
///
/// Used for tile layers and for tileset attribute grids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    width: u16,
    height: u16,
    cells: Vec<u8>,
}

impl Layer {
    /// Creates a zero-filled grid.
    pub fn new(width: u16, height: u16) -> Self {
        Layer {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    /// Wraps existing cells, `None` if the length does not match the dimensions.
    pub fn from_cells(width: u16, height: u16, cells: Vec<u8>) -> Option<Self> {
        (cells.len() == width as usize * height as usize).then_some(Layer {
            width,
            height,
            cells,
        })
    }

    /// Columns.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Rows.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cells, row by row.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Whether the layer has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width as usize && y < self.height as usize).then(|| y * self.width as usize + x)
    }

    /// Cell value, `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.offset(x, y).map(|i| self.cells[i])
    }

    /// Writes a cell and returns the previous value, `None` outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: u8) -> Option<u8> {
        let i = self.offset(x, y)?;
        Some(std::mem::replace(&mut self.cells[i], value))
    }

    /// Resizes in place, keeping the overlapping top-left region.
    pub fn resize(&mut self, width: u16, height: u16) {
        let mut next = Layer::new(width, height);
        let w = width.min(self.width) as usize;
        for y in 0..height.min(self.height) as usize {
            let src = y * self.width as usize;
            let dst = y * width as usize;
            next.cells[dst..dst + w].copy_from_slice(&self.cells[src..src + w]);
        }
        *self = next;
    }

    /// Iterates `(x, y, value)` for every cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        let w = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % w, i / w, v))
    }

    pub(crate) fn clear(&mut self) {
        *self = Layer::default();
    }
}
