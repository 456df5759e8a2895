#![warn(missing_docs)]

//! Level editor core for `.pxpack` tile maps, with a Macroquad front end.

mod error;
/// Tile grids and the three map layers.
pub mod layer;
/// Binary codecs for level and attribute files.
pub mod loader {
    /// `.pxpack` levels and `.pxattr` attribute grids.
    pub mod pxpack;
}
/// Level model: load, write, draw.
pub mod map;
mod persist;
/// Drawing seam and its Macroquad backend.
pub mod render;
/// Tile images and their shared store.
pub mod tileset;
/// Editor camera and pointer-to-tile mapping.
pub mod view;
/// Undo/redo history.
pub mod undo;
/// Per-frame pointer snapshot.
pub mod input;
/// Editing tools and mouse bindings.
pub mod tools;
/// Persisted editor configuration.
pub mod settings;
/// Session lifecycle.
pub mod session;
/// Immediate-mode menus and popups.
pub mod ui;

pub use error::{EditorError, Result};
pub use input::{ButtonSet, FrameInput, PointerButton};
pub use layer::{Layer, MapLayer};
pub use map::{Entity, Map};
pub use render::{Atlas, AtlasKey, Canvas};
pub use session::{SaveKind, SaveRequest, Session, SessionState};
pub use settings::Settings;
pub use tileset::{Tileset, TilesetStore, TILE_SIZE};
pub use tools::{ButtonBindings, ToolBinding, ToolDispatch, ToolKind};
pub use undo::{Edit, TileChange, UndoStack};
pub use view::EditorCamera;
