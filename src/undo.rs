//! Reversible edit history.

use crate::error::Result;
use crate::layer::{Layer, MapLayer};
use crate::map::Map;
use crate::tileset::TilesetStore;
use log::warn;
use std::path::Path;

/// Oldest entries are dropped beyond this many undo steps.
pub const UNDO_LIMIT: usize = 100;

/// One cell write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChange {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Value before the write
    pub before: u8,
    /// Value written
    pub after: u8,
}

/// A recorded mutation of a [`Map`] that can be applied in both directions.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Cell writes on one layer, in the order they happened
    Tiles {
        /// Layer written to
        layer: MapLayer,
        /// Writes in order
        changes: Vec<TileChange>,
    },
    /// An entity moved between two tiles
    MoveEntity {
        /// Position in the entity list
        index: usize,
        /// Tile it started on
        from: (u16, u16),
        /// Tile it ended on
        to: (u16, u16),
    },
    /// A layer was resized; both full grids are kept
    ResizeLayer {
        /// Resized layer
        layer: MapLayer,
        /// Grid before
        before: Layer,
        /// Grid after
        after: Layer,
    },
    /// A layer switched tilesets
    SetTileset {
        /// Layer whose tileset changed
        layer: MapLayer,
        /// Previous tileset name
        before: String,
        /// New tileset name
        after: String,
    },
}

impl Edit {
    /// True when applying the edit would change nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Edit::Tiles { changes, .. } => changes.iter().all(|c| c.before == c.after),
            Edit::MoveEntity { from, to, .. } => from == to,
            Edit::ResizeLayer { before, after, .. } => before == after,
            Edit::SetTileset { before, after, .. } => before == after,
        }
    }

    fn apply(&self, map: &mut Map, ctx: &mut TilesetContext<'_>, forward: bool) -> Result<()> {
        match self {
            Edit::Tiles { layer, changes } => {
                let grid = map.layer_mut(*layer);
                if forward {
                    for c in changes {
                        grid.set(c.x, c.y, c.after);
                    }
                } else {
                    for c in changes.iter().rev() {
                        grid.set(c.x, c.y, c.before);
                    }
                }
            }
            Edit::MoveEntity { index, from, to } => {
                let (x, y) = if forward { *to } else { *from };
                map.move_entity(*index, x, y);
            }
            Edit::ResizeLayer { layer, before, after } => {
                *map.layer_mut(*layer) = if forward { after.clone() } else { before.clone() };
            }
            Edit::SetTileset { layer, before, after } => {
                let name = if forward { after } else { before };
                map.set_tileset(ctx.root, *layer, name, ctx.store)?;
            }
        }
        Ok(())
    }
}

/// What tileset edits need to reach the store.
pub struct TilesetContext<'a> {
    /// Resource root tilesets load from
    pub root: &'a Path,
    /// Store the map holds its tilesets in
    pub store: &'a mut TilesetStore,
}

impl<'a> TilesetContext<'a> {
    /// Bundles `root` and `store`.
    pub fn new(root: &'a Path, store: &'a mut TilesetStore) -> Self {
        TilesetContext { root, store }
    }
}

/// Undo and redo stacks. Pushing a new edit drops everything that could be redone.
#[derive(Debug, Default)]
pub struct UndoStack {
    undo: Vec<Edit>,
    redo: Vec<Edit>,
}

impl UndoStack {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all history.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Whether there is something to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether there is something to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undo steps held.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Redo steps held.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Records an edit that has already been applied to the map.
    pub fn push(&mut self, edit: Edit) {
        if edit.is_empty() {
            return;
        }
        self.undo.push(edit);
        self.redo.clear();
        if self.undo.len() > UNDO_LIMIT {
            self.undo.remove(0);
        }
    }

    /// Reverts the latest edit. Returns false if there was nothing to undo or the
    /// edit could not be reverted, in which case it stays on the undo stack.
    pub fn undo(&mut self, map: &mut Map, ctx: &mut TilesetContext<'_>) -> bool {
        let Some(edit) = self.undo.pop() else {
            return false;
        };
        if let Err(e) = edit.apply(map, ctx, false) {
            warn!("Undo failed: {e}");
            self.undo.push(edit);
            return false;
        }
        self.redo.push(edit);
        true
    }

    /// Re-applies the latest undone edit. Returns false if there was nothing to redo
    /// or the edit could not be applied, in which case it stays on the redo stack.
    pub fn redo(&mut self, map: &mut Map, ctx: &mut TilesetContext<'_>) -> bool {
        let Some(edit) = self.redo.pop() else {
            return false;
        };
        if let Err(e) = edit.apply(map, ctx, true) {
            warn!("Redo failed: {e}");
            self.redo.push(edit);
            return false;
        }
        self.undo.push(edit);
        true
    }
}
