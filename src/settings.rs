use crate::error::{EditorError, Result};
use crate::layer::MapLayer;
use crate::persist::write_atomic;
use crate::tools::ButtonBindings;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the settings file, relative to the working directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// UI color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiStyle {
    /// Dark panels, light text
    #[default]
    Dark,
    /// Light panels, dark text
    Light,
    /// Grey panels with a blue accent
    Classic,
}

impl UiStyle {
    /// Every style, in cycling order.
    pub const ALL: [UiStyle; 3] = [UiStyle::Dark, UiStyle::Light, UiStyle::Classic];

    /// Name shown in the settings form.
    pub fn label(self) -> &'static str {
        match self {
            UiStyle::Dark => "Dark",
            UiStyle::Light => "Light",
            UiStyle::Classic => "Classic",
        }
    }
}

/// Persisted editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window width in pixels
    pub width: i32,
    /// Window height in pixels
    pub height: i32,
    /// Game resource root containing `field/` and `img/`
    pub resource_path: PathBuf,
    /// Editor data directory containing `alwaysLoaded.txt` and the overlay atlases
    pub data_path: PathBuf,
    /// Level reopened on startup; empty for none
    pub last_level: String,
    /// Visibility per layer
    pub view_layers: [bool; MapLayer::COUNT],
    /// Draw the tile grid
    pub show_grid: bool,
    /// Outline the play area
    pub show_play_area: bool,
    /// Overlay tile attributes
    pub view_tile_attributes: bool,
    /// Draw units at all
    pub view_entities: bool,
    /// Outline units
    pub view_entity_boxes: bool,
    /// Draw unit sprites
    pub view_entity_images: bool,
    /// Tool per mouse button
    pub bindings: ButtonBindings,
    /// UI color scheme
    pub style: UiStyle,
    /// Set when the editor cannot run until the user fixes the settings
    #[serde(skip)]
    pub show: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 1280,
            height: 720,
            resource_path: PathBuf::from("rsc_k"),
            data_path: PathBuf::from("object_data"),
            last_level: String::new(),
            view_layers: [true; MapLayer::COUNT],
            show_grid: true,
            show_play_area: true,
            view_tile_attributes: false,
            view_entities: true,
            view_entity_boxes: true,
            view_entity_images: true,
            bindings: ButtonBindings::default(),
            style: UiStyle::default(),
            show: false,
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file gives defaults; an unreadable one gives
    /// defaults with `show` set so the settings form comes up.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(s) => s,
            Err(EditorError::ResourceNotFound { .. }) => {
                info!("No settings at {}, using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                warn!("{e}");
                Settings {
                    show: true,
                    ..Settings::default()
                }
            }
        }
    }

    /// Like [`Settings::load`] but reports every failure.
    pub fn try_load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path).map_err(|e| EditorError::from_read(path, e))?;
        serde_json::from_str(&txt).map_err(|source| EditorError::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the settings as pretty JSON, atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let txt = serde_json::to_string_pretty(self).map_err(|source| EditorError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(path, txt.as_bytes())
    }

    /// Whether `layer` is drawn.
    pub fn layer_visible(&self, layer: MapLayer) -> bool {
        self.view_layers[layer.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolBinding, ToolKind};
    use tempfile::TempDir;

    #[test]
    fn save_then_load_keeps_everything_but_show() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = Settings::default();
        s.last_level = "town1".into();
        s.view_layers[1] = false;
        s.bindings.right = ToolBinding::Tool(ToolKind::EntityHand);
        s.style = UiStyle::Classic;
        s.show = true;

        s.save(&path).unwrap();
        let back = Settings::load(&path);
        assert_eq!(back, Settings { show: false, ..s });
    }

    #[test]
    fn missing_file_gives_defaults_without_prompt() {
        let dir = TempDir::new().unwrap();
        let s = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(s, Settings::default());
        assert!(!s.show);
    }

    #[test]
    fn corrupt_file_requests_settings_form() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(&path).show);
        assert!(matches!(Settings::try_load(&path), Err(EditorError::Settings { .. })));
    }

    #[test]
    fn unknown_and_missing_fields_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "width": 800, "maximized": true, "somethingElse": 3 }"#).unwrap();
        let s = Settings::try_load(&path).unwrap();
        assert_eq!(s.width, 800);
        assert_eq!(s.height, Settings::default().height);

        // window state that is not applied is not written back either
        s.save(&path).unwrap();
        let txt = std::fs::read_to_string(&path).unwrap();
        assert!(txt.contains("\"width\": 800"));
        assert!(!txt.contains("maximized"));
    }
}
