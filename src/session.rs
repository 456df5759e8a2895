//! Level session: which level is open, what happens on New/Open/Save/Close/Quit,
//! and the per-frame update and draw entry points.

use crate::error::{EditorError, Result};
use crate::input::FrameInput;
use crate::layer::MapLayer;
use crate::map::{level_path, Map, LEVEL_EXTENSION};
use crate::render::Canvas;
use crate::settings::Settings;
use crate::tileset::{TilesetStore, TILE_SIZE};
use crate::tools::{ToolContext, ToolDispatch};
use crate::undo::{Edit, TilesetContext, UndoStack};
use crate::view::EditorCamera;
use log::{error, info, warn};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};

const GRID_ALPHA: f32 = 0.1;
const PLAY_AREA_COLOR: Color = RED;
const WHEEL_ZOOM_STEP: f32 = 1.1;

/// Where the editor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing loaded yet
    Startup,
    /// A level is open and editable
    LevelLoaded,
    /// No level open, window still up
    Unloaded,
    /// The settings form is shown exclusively
    ShowingSettings,
    /// Shutting down
    Quitting,
}

/// Which write a Save-As style request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// Write a blank template level
    New,
    /// Write the open level under another name
    SaveAs,
}

/// Outcome of a New / Save-As request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    /// Written and opened
    Done,
    /// The target exists; waiting for [`Session::confirm_overwrite`] or [`Session::decline_overwrite`]
    NeedsConfirmation {
        /// File that would be overwritten
        path: PathBuf,
    },
}

#[derive(Debug, Clone)]
struct PendingSave {
    kind: SaveKind,
    name: String,
}

/// The editor core, independent of any window or UI toolkit.
pub struct Session {
    settings: Settings,
    settings_path: PathBuf,
    tilesets: TilesetStore,
    map: Map,
    level: String,
    undo: UndoStack,
    tools: ToolDispatch,
    camera: EditorCamera,
    state: SessionState,
    pending: Option<PendingSave>,
    quit: bool,
}

impl Session {
    /// Takes ownership of the loaded settings; they are written back to `settings_path`.
    pub fn new(settings: Settings, settings_path: impl Into<PathBuf>) -> Self {
        Session {
            settings,
            settings_path: settings_path.into(),
            tilesets: TilesetStore::new(),
            map: Map::new_template(),
            level: String::new(),
            undo: UndoStack::new(),
            tools: ToolDispatch::new(),
            camera: EditorCamera::default(),
            state: SessionState::Startup,
            pending: None,
            quit: false,
        }
    }

    /// Loads the fixed tilesets and reopens the last level.
    pub fn startup(&mut self) {
        if self.settings.show {
            self.state = SessionState::ShowingSettings;
            return;
        }
        if !self.settings.resource_path.is_dir() {
            warn!(
                "Resource folder {} does not exist",
                self.settings.resource_path.display()
            );
            self.show_settings();
            return;
        }

        self.tilesets.clear();
        if let Err(e) = self
            .tilesets
            .load_fixed(&self.settings.resource_path, &self.settings.data_path)
        {
            error!("Failed to load fixed tilesets: {e}");
            self.show_settings();
            return;
        }

        self.state = SessionState::Unloaded;
        let last = self.settings.last_level.clone();
        if !last.is_empty() {
            if let Err(e) = self.open_level(&last) {
                error!("Could not reopen {last}: {e}");
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while a level is open and the editor accepts input.
    pub fn is_enabled(&self) -> bool {
        self.state == SessionState::LevelLoaded
    }

    /// Settings in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings in effect, for the settings form.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Open level, or a blank template when none is.
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Name of the open level; empty when none is.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Editor view.
    pub fn camera(&self) -> &EditorCamera {
        &self.camera
    }

    /// Editor view, mutably.
    pub fn camera_mut(&mut self) -> &mut EditorCamera {
        &mut self.camera
    }

    /// Tool selection and brush.
    pub fn tools(&self) -> &ToolDispatch {
        &self.tools
    }

    /// Tool selection and brush, mutably.
    pub fn tools_mut(&mut self) -> &mut ToolDispatch {
        &mut self.tools
    }

    /// Loaded tilesets.
    pub fn tilesets(&self) -> &TilesetStore {
        &self.tilesets
    }

    /// Edit history of the open level.
    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    fn root(&self) -> &Path {
        &self.settings.resource_path
    }

    /// Replaces the open level with `name`. On failure the current level stays open.
    pub fn open_level(&mut self, name: &str) -> Result<()> {
        let root = self.settings.resource_path.clone();
        let map = Map::load(&root, name, &mut self.tilesets)?;

        let mut old = std::mem::replace(&mut self.map, map);
        old.unload(&mut self.tilesets);

        self.camera.reset();
        self.tools.cancel();
        self.undo.reset();
        self.level = name.to_owned();
        self.state = SessionState::LevelLoaded;

        self.settings.last_level = name.to_owned();
        if let Err(e) = self.settings.save(&self.settings_path) {
            warn!("Could not save settings: {e}");
        }
        info!("Opened level {name}");
        Ok(())
    }

    /// Writes the open level back to its file.
    pub fn save(&mut self) -> Result<()> {
        if !self.is_enabled() {
            return Err(EditorError::InvalidState("no level is open".into()));
        }
        self.map.write(self.root(), &self.level)
    }

    /// Starts "New Level" under `name`.
    pub fn request_new(&mut self, name: &str) -> Result<SaveRequest> {
        self.request_write(SaveKind::New, name)
    }

    /// Starts "Save As" under `name`.
    pub fn request_save_as(&mut self, name: &str) -> Result<SaveRequest> {
        if !self.is_enabled() {
            return Err(EditorError::InvalidState("no level is open".into()));
        }
        self.request_write(SaveKind::SaveAs, name)
    }

    fn request_write(&mut self, kind: SaveKind, name: &str) -> Result<SaveRequest> {
        if name.is_empty() {
            return Err(EditorError::InvalidState("level name is empty".into()));
        }
        let path = level_path(self.root(), name);
        if path.exists() {
            self.pending = Some(PendingSave {
                kind,
                name: name.to_owned(),
            });
            return Ok(SaveRequest::NeedsConfirmation { path });
        }
        self.perform_write(kind, name)?;
        Ok(SaveRequest::Done)
    }

    /// True while an overwrite question is open.
    pub fn has_pending_overwrite(&self) -> bool {
        self.pending.is_some()
    }

    /// Answers "yes" to the overwrite question.
    pub fn confirm_overwrite(&mut self) -> Result<()> {
        let Some(p) = self.pending.take() else {
            return Err(EditorError::InvalidState("nothing to overwrite".into()));
        };
        self.perform_write(p.kind, &p.name)
    }

    /// Answers "no"; nothing is written.
    pub fn decline_overwrite(&mut self) {
        self.pending = None;
    }

    fn perform_write(&mut self, kind: SaveKind, name: &str) -> Result<()> {
        match kind {
            SaveKind::New => Map::new_template().write(self.root(), name)?,
            SaveKind::SaveAs => self.map.write(self.root(), name)?,
        }
        self.open_level(name)
    }

    /// Closes the open level but keeps the editor running.
    pub fn close_level(&mut self) {
        self.map.unload(&mut self.tilesets);
        self.tools.cancel();
        self.undo.reset();
        self.level.clear();
        if self.state == SessionState::LevelLoaded {
            self.state = SessionState::Unloaded;
        }
    }

    /// Closes the level and asks the main loop to stop.
    pub fn quit(&mut self) {
        self.map.unload(&mut self.tilesets);
        self.quit = true;
        self.state = SessionState::Quitting;
    }

    /// Whether the main loop should stop.
    pub fn should_exit(&self, close_requested: bool) -> bool {
        close_requested || self.quit
    }

    /// Reverts the latest edit, closing any open stroke first.
    pub fn undo(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.tools.flush(&self.map, &mut self.undo);
        let mut ctx = TilesetContext::new(&self.settings.resource_path, &mut self.tilesets);
        self.undo.undo(&mut self.map, &mut ctx)
    }

    /// Re-applies the latest undone edit, closing any open stroke first.
    pub fn redo(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.tools.flush(&self.map, &mut self.undo);
        let mut ctx = TilesetContext::new(&self.settings.resource_path, &mut self.tilesets);
        self.undo.redo(&mut self.map, &mut ctx)
    }

    /// Resizes a layer of the open level as one undoable step.
    pub fn resize_layer(&mut self, layer: MapLayer, width: u16, height: u16) {
        if !self.is_enabled() {
            return;
        }
        let before = self.map.layer(layer).clone();
        self.map.layer_mut(layer).resize(width, height);
        self.undo.push(Edit::ResizeLayer {
            layer,
            before,
            after: self.map.layer(layer).clone(),
        });
    }

    /// Switches a layer's tileset as one undoable step.
    pub fn set_layer_tileset(&mut self, layer: MapLayer, name: &str) -> Result<()> {
        if !self.is_enabled() {
            return Err(EditorError::InvalidState("no level is open".into()));
        }
        let before = self.map.tilesets[layer.index()].clone();
        let root = self.settings.resource_path.clone();
        self.map.set_tileset(&root, layer, name, &mut self.tilesets)?;
        self.undo.push(Edit::SetTileset {
            layer,
            before,
            after: name.to_owned(),
        });
        Ok(())
    }

    /// Switches to the settings form until [`Session::apply_settings`] is called.
    pub fn show_settings(&mut self) {
        self.settings.show = true;
        self.state = SessionState::ShowingSettings;
    }

    /// Accepts edited settings, persists them and starts over.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<()> {
        let root_changed = settings.resource_path != self.settings.resource_path
            || settings.data_path != self.settings.data_path;
        self.settings = Settings {
            show: false,
            ..settings
        };
        self.settings.save(&self.settings_path)?;

        if root_changed || self.level.is_empty() {
            self.close_level();
            self.state = SessionState::Startup;
            self.startup();
        } else {
            self.state = SessionState::LevelLoaded;
        }
        Ok(())
    }

    /// Level names available for "Open", sorted.
    pub fn level_names(&self) -> Vec<String> {
        let dir = self.root().join("field");
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().and_then(|x| x.to_str()) == Some(LEVEL_EXTENSION))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
            .collect();
        names.sort();
        names
    }

    /// One frame of editing. Does nothing unless a level is open.
    pub fn update(&mut self, input: &FrameInput) {
        if !self.is_enabled() {
            return;
        }
        if input.wheel != 0.0 {
            self.camera
                .zoom_at(input.pointer, WHEEL_ZOOM_STEP.powf(input.wheel));
        }
        self.tools.refresh(&self.settings.bindings);
        let mut ctx = ToolContext {
            map: &mut self.map,
            camera: &mut self.camera,
            undo: &mut self.undo,
        };
        self.tools.update(input, &mut ctx);
    }

    /// Draws the open level. Does nothing unless a level is open.
    pub fn draw(&self, canvas: &mut dyn Canvas) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let s = &self.settings;
        for layer in MapLayer::ALL {
            if s.layer_visible(layer) {
                self.map
                    .draw_layer(layer, &self.tilesets, Vec2::ZERO, s.view_tile_attributes, canvas)?;
            }
        }

        if s.show_play_area {
            for layer in MapLayer::ALL.into_iter().filter(|l| s.layer_visible(*l)) {
                canvas.stroke_rect(self.map.play_area(layer), 1.0, PLAY_AREA_COLOR);
            }
        }

        if s.view_entities {
            self.map.draw_entities(
                &self.tilesets,
                Vec2::ZERO,
                s.view_entity_boxes,
                s.view_entity_images,
                canvas,
            );
        }

        if s.show_grid {
            self.draw_grid(canvas);
        }
        Ok(())
    }

    fn draw_grid(&self, canvas: &mut dyn Canvas) {
        let (mut w, mut h) = (0, 0);
        for layer in MapLayer::ALL.into_iter().filter(|l| self.settings.layer_visible(*l)) {
            w = w.max(self.map.layer(layer).width());
            h = h.max(self.map.layer(layer).height());
        }
        let size = TILE_SIZE as f32;
        let dark = Color::new(0.2, 0.2, 0.2, GRID_ALPHA);
        let light = Color::new(0.5, 0.5, 0.5, GRID_ALPHA);
        for x in 0..w {
            for y in 0..h {
                let c = if x % 2 != y % 2 { dark } else { light };
                canvas.fill_rect(Rect::new(x as f32 * size, y as f32 * size, size, size), c);
            }
        }
    }
}
