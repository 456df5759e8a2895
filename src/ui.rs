//! Immediate-mode front end: menu bar, tool strip, shortcuts and popups.
//!
//! Everything here is redrawn every frame from the session state. The only
//! state kept between frames is which popup is open and its text fields.

use crate::input::PointerButton;
use crate::layer::MapLayer;
use crate::session::{SaveKind, SaveRequest, Session, SessionState};
use crate::settings::{Settings, UiStyle};
use crate::tools::{ToolBinding, ToolKind};
use crate::undo::UndoStack;
use log::error;
use macroquad::prelude::*;
use std::path::PathBuf;

const BAR_HEIGHT: f32 = 26.0;
const ROW_HEIGHT: f32 = 24.0;
const FONT_SIZE: f32 = 18.0;
const POPUP_WIDTH: f32 = 420.0;
const FADE: Color = Color::new(0.0, 0.0, 0.0, 0.5);

/// Colors for one [`UiStyle`].
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Behind popups and text boxes
    pub background: Color,
    /// Bars and buttons
    pub panel: Color,
    /// Hovered buttons and outlines
    pub hover: Color,
    /// Selected buttons and focus
    pub accent: Color,
    /// Labels
    pub text: Color,
}

impl Theme {
    /// Colors of `style`.
    pub fn for_style(style: UiStyle) -> Self {
        match style {
            UiStyle::Dark => Theme {
                background: Color::from_rgba(24, 24, 28, 255),
                panel: Color::from_rgba(40, 40, 48, 255),
                hover: Color::from_rgba(60, 60, 70, 255),
                accent: Color::new(0.0, 0.75, 0.9, 1.0),
                text: Color::from_rgba(220, 220, 220, 255),
            },
            UiStyle::Light => Theme {
                background: Color::from_rgba(200, 200, 205, 255),
                panel: Color::from_rgba(235, 235, 240, 255),
                hover: Color::from_rgba(210, 215, 225, 255),
                accent: Color::from_rgba(70, 130, 220, 255),
                text: Color::from_rgba(20, 20, 20, 255),
            },
            UiStyle::Classic => Theme {
                background: Color::from_rgba(0, 0, 64, 255),
                panel: Color::from_rgba(192, 192, 192, 255),
                hover: Color::from_rgba(160, 160, 170, 255),
                accent: Color::from_rgba(0, 0, 128, 255),
                text: BLACK,
            },
        }
    }
}

/// One-line text field edited from the keyboard while focused.
#[derive(Debug, Clone, Default)]
struct TextField {
    text: String,
}

impl TextField {
    fn new(text: impl Into<String>) -> Self {
        TextField { text: text.into() }
    }

    fn handle_keys(&mut self) {
        while let Some(c) = get_char_pressed() {
            if !c.is_control() {
                self.text.push(c);
            }
        }
        if is_key_pressed(KeyCode::Backspace) {
            self.text.pop();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    New,
    Open,
    Save,
    SaveAs,
    Close,
    Undo,
    Redo,
    Settings,
    About,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 10] = [
        MenuItem::New,
        MenuItem::Open,
        MenuItem::Save,
        MenuItem::SaveAs,
        MenuItem::Close,
        MenuItem::Undo,
        MenuItem::Redo,
        MenuItem::Settings,
        MenuItem::About,
        MenuItem::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuItem::New => "New",
            MenuItem::Open => "Open",
            MenuItem::Save => "Save",
            MenuItem::SaveAs => "Save As",
            MenuItem::Close => "Close",
            MenuItem::Undo => "Undo",
            MenuItem::Redo => "Redo",
            MenuItem::Settings => "Settings",
            MenuItem::About => "About",
            MenuItem::Quit => "Quit",
        }
    }

    /// Undo and Redo need an open level and something on the matching stack.
    fn is_enabled(self, level_open: bool, history: &UndoStack) -> bool {
        match self {
            MenuItem::Undo => level_open && history.can_undo(),
            MenuItem::Redo => level_open && history.can_redo(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
enum Popup {
    LevelName { kind: SaveKind, field: TextField },
    Open { names: Vec<String>, scroll: usize },
    Overwrite { path: PathBuf },
    About,
    Settings(Box<SettingsForm>),
}

#[derive(Debug, Clone)]
struct SettingsForm {
    draft: Settings,
    resource: TextField,
    data: TextField,
    /// 0 = resource path, 1 = data path
    focus: usize,
}

impl SettingsForm {
    fn new(settings: &Settings) -> Self {
        SettingsForm {
            draft: settings.clone(),
            resource: TextField::new(settings.resource_path.display().to_string()),
            data: TextField::new(settings.data_path.display().to_string()),
            focus: 0,
        }
    }

    fn finish(&self) -> Settings {
        Settings {
            resource_path: PathBuf::from(&self.resource.text),
            data_path: PathBuf::from(&self.data.text),
            ..self.draft.clone()
        }
    }
}

/// Front-end state kept across frames.
#[derive(Default)]
pub struct EditorUi {
    popup: Option<Popup>,
    status: String,
}

impl EditorUi {
    /// No popup open, empty status line.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a modal popup is open; map interaction is suspended.
    pub fn is_modal(&self) -> bool {
        self.popup.is_some()
    }

    /// Draws the UI and applies whatever the user clicked. Returns true when the
    /// pointer is over UI and must not reach the map this frame.
    pub fn frame(&mut self, session: &mut Session) -> bool {
        let theme = Theme::for_style(session.settings().style);

        if session.state() == SessionState::ShowingSettings
            && !matches!(self.popup, Some(Popup::Settings(_)))
        {
            self.popup = Some(Popup::Settings(Box::new(SettingsForm::new(session.settings()))));
        }

        if !session.is_enabled() {
            draw_rectangle(0.0, BAR_HEIGHT, screen_width(), screen_height(), FADE);
        }

        if self.popup.is_none() {
            // typed characters only matter to an open text field
            while get_char_pressed().is_some() {}
            self.shortcuts(session);
        }
        let over_bar = self.menu_bar(session, &theme);
        let over_tools = if session.is_enabled() {
            self.tool_strip(session, &theme)
        } else {
            false
        };
        self.status_line(session, &theme);

        if let Some(popup) = self.popup.take() {
            self.popup = self.draw_popup(popup, session, &theme);
            return true;
        }
        over_bar || over_tools
    }

    fn report(&mut self, what: &str, result: crate::Result<()>) {
        match result {
            Ok(()) => self.status.clear(),
            Err(e) => {
                error!("{what}: {e}");
                self.status = format!("{what}: {e}");
            }
        }
    }

    fn request(&mut self, session: &mut Session, kind: SaveKind, name: &str) -> Option<Popup> {
        let result = match kind {
            SaveKind::New => session.request_new(name),
            SaveKind::SaveAs => session.request_save_as(name),
        };
        match result {
            Ok(SaveRequest::Done) => {
                self.status.clear();
                None
            }
            Ok(SaveRequest::NeedsConfirmation { path }) => Some(Popup::Overwrite { path }),
            Err(e) => {
                self.report("Save", Err(e));
                None
            }
        }
    }

    fn open_popup(session: &Session) -> Popup {
        Popup::Open {
            names: session.level_names(),
            scroll: 0,
        }
    }

    fn shortcuts(&mut self, session: &mut Session) {
        let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
        if !ctrl {
            return;
        }
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        let new_name = || Popup::LevelName {
            kind: SaveKind::New,
            field: TextField::default(),
        };

        if is_key_pressed(KeyCode::N) {
            self.popup = Some(new_name());
        } else if is_key_pressed(KeyCode::O) {
            self.popup = Some(Self::open_popup(session));
        } else if is_key_pressed(KeyCode::S) {
            if shift {
                self.save_as_popup(session);
            } else {
                let r = session.save();
                self.report("Save", r);
            }
        } else if shift && is_key_pressed(KeyCode::C) {
            session.close_level();
        } else if shift && is_key_pressed(KeyCode::Q) {
            session.quit();
        } else if is_key_pressed(KeyCode::Z) || is_key_pressed(KeyCode::Y) {
            let item = if shift || is_key_pressed(KeyCode::Y) {
                MenuItem::Redo
            } else {
                MenuItem::Undo
            };
            if !item.is_enabled(session.is_enabled(), session.undo_stack()) {
                return;
            }
            if item == MenuItem::Redo {
                session.redo();
            } else {
                session.undo();
            }
        }
    }

    fn save_as_popup(&mut self, session: &Session) {
        if session.is_enabled() {
            self.popup = Some(Popup::LevelName {
                kind: SaveKind::SaveAs,
                field: TextField::new(session.level()),
            });
        }
    }

    fn menu_bar(&mut self, session: &mut Session, theme: &Theme) -> bool {
        draw_rectangle(0.0, 0.0, screen_width(), BAR_HEIGHT, theme.panel);
        let mut x = 4.0;
        let mut clicked = None;
        for item in MenuItem::ALL {
            let label = item.label();
            let w = measure_text(label, None, FONT_SIZE as u16, 1.0).width + 16.0;
            let r = Rect::new(x, 2.0, w, BAR_HEIGHT - 4.0);
            x += w + 4.0;
            let enabled = item.is_enabled(session.is_enabled(), session.undo_stack());
            if menu_button(r, label, enabled, theme) {
                clicked = Some(item);
            }
        }

        let over = pointer_in(Rect::new(0.0, 0.0, screen_width(), BAR_HEIGHT));
        if self.popup.is_some() {
            return over;
        }
        match clicked {
            Some(MenuItem::New) => {
                self.popup = Some(Popup::LevelName {
                    kind: SaveKind::New,
                    field: TextField::default(),
                });
            }
            Some(MenuItem::Open) => self.popup = Some(Self::open_popup(session)),
            Some(MenuItem::Save) => {
                let r = session.save();
                self.report("Save", r);
            }
            Some(MenuItem::SaveAs) => self.save_as_popup(session),
            Some(MenuItem::Close) => session.close_level(),
            Some(MenuItem::Undo) => {
                session.undo();
            }
            Some(MenuItem::Redo) => {
                session.redo();
            }
            Some(MenuItem::Settings) => session.show_settings(),
            Some(MenuItem::About) => self.popup = Some(Popup::About),
            Some(MenuItem::Quit) => session.quit(),
            None => {}
        }
        over
    }

    /// Tool, layer and brush tile selectors along the left edge.
    fn tool_strip(&mut self, session: &mut Session, theme: &Theme) -> bool {
        let width = 120.0;
        let height = (ToolKind::COUNT + MapLayer::COUNT + 3) as f32 * ROW_HEIGHT + 8.0;
        let area = Rect::new(0.0, BAR_HEIGHT, width, height);
        draw_rectangle(area.x, area.y, area.w, area.h, theme.panel);

        let mut y = BAR_HEIGHT + 4.0;
        let mut row = || {
            let r = Rect::new(4.0, y, width - 8.0, ROW_HEIGHT - 2.0);
            y += ROW_HEIGHT;
            r
        };

        let modal = self.popup.is_some();
        let current = session.tools().current();
        for tool in ToolKind::ALL {
            if button(row(), tool.label(), tool == current, theme) && !modal {
                session.tools_mut().select_tool(tool);
            }
        }
        let brush_layer = session.tools().brush_layer();
        for layer in MapLayer::ALL {
            if button(row(), layer.name(), layer == brush_layer, theme) && !modal {
                session.tools_mut().set_brush_layer(layer);
            }
        }

        let tile = session.tools().brush_tile();
        label(row(), &format!("Tile {tile}"), theme);
        let r = row();
        let half = Rect::new(r.x, r.y, r.w / 2.0 - 1.0, r.h);
        if button(half, "-", false, theme) && !modal {
            session.tools_mut().set_brush_tile(tile.wrapping_sub(1));
        }
        let half = Rect::new(r.x + r.w / 2.0 + 1.0, r.y, r.w / 2.0 - 1.0, r.h);
        if button(half, "+", false, theme) && !modal {
            session.tools_mut().set_brush_tile(tile.wrapping_add(1));
        }
        pointer_in(area)
    }

    fn status_line(&self, session: &Session, theme: &Theme) {
        let y = screen_height() - ROW_HEIGHT;
        draw_rectangle(0.0, y, screen_width(), ROW_HEIGHT, theme.panel);
        let text = if !self.status.is_empty() {
            self.status.clone()
        } else if session.is_enabled() {
            let (mx, my) = mouse_position();
            let layer = session.map().layer(session.tools().brush_layer());
            match session.camera().tile_at(vec2(mx, my), Some(layer)) {
                Some((x, y)) => format!("{}  ({x}, {y})", session.level()),
                None => session.level().to_owned(),
            }
        } else {
            "No level open".to_owned()
        };
        draw_text(&text, 6.0, y + ROW_HEIGHT - 7.0, FONT_SIZE, theme.text);
    }

    fn draw_popup(&mut self, popup: Popup, session: &mut Session, theme: &Theme) -> Option<Popup> {
        match popup {
            Popup::LevelName { kind, mut field } => {
                let title = match kind {
                    SaveKind::New => "New level",
                    SaveKind::SaveAs => "Save level as",
                };
                let body = popup_frame(title, 3, theme);
                field.handle_keys();
                text_box(row_at(body, 0), &field.text, true, theme);
                let ok = button(half_row(body, 2, 0), "OK", false, theme) || is_key_pressed(KeyCode::Enter);
                let cancel = button(half_row(body, 2, 1), "Cancel", false, theme)
                    || is_key_pressed(KeyCode::Escape);
                if ok {
                    self.request(session, kind, field.text.trim())
                } else if cancel {
                    None
                } else {
                    Some(Popup::LevelName { kind, field })
                }
            }
            Popup::Open { names, mut scroll } => {
                let visible = 12;
                let body = popup_frame("Open level", visible + 1, theme);
                let (_, wheel) = mouse_wheel();
                if wheel < 0.0 && scroll + visible < names.len() {
                    scroll += 1;
                } else if wheel > 0.0 {
                    scroll = scroll.saturating_sub(1);
                }
                let mut chosen = None;
                for (i, name) in names.iter().skip(scroll).take(visible).enumerate() {
                    if button(row_at(body, i), name, name == session.level(), theme) {
                        chosen = Some(name.clone());
                    }
                }
                if names.is_empty() {
                    label(row_at(body, 0), "No levels found", theme);
                }
                let cancel = button(row_at(body, visible), "Cancel", false, theme)
                    || is_key_pressed(KeyCode::Escape);
                if let Some(name) = chosen {
                    let r = session.open_level(&name);
                    self.report("Open", r);
                    None
                } else if cancel {
                    None
                } else {
                    Some(Popup::Open { names, scroll })
                }
            }
            Popup::Overwrite { path } => {
                let body = popup_frame("File exists", 3, theme);
                label(row_at(body, 0), &format!("Overwrite {}?", path.display()), theme);
                if button(half_row(body, 2, 0), "Yes", false, theme) {
                    let r = session.confirm_overwrite();
                    self.report("Save", r);
                    None
                } else if button(half_row(body, 2, 1), "No", false, theme)
                    || is_key_pressed(KeyCode::Escape)
                {
                    session.decline_overwrite();
                    None
                } else {
                    Some(Popup::Overwrite { path })
                }
            }
            Popup::About => {
                let body = popup_frame("About", 3, theme);
                label(
                    row_at(body, 0),
                    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
                    theme,
                );
                label(row_at(body, 1), env!("CARGO_PKG_DESCRIPTION"), theme);
                if button(row_at(body, 2), "Close", false, theme) || is_key_pressed(KeyCode::Escape) {
                    None
                } else {
                    Some(Popup::About)
                }
            }
            Popup::Settings(form) => self.settings_form(*form, session, theme),
        }
    }

    fn settings_form(&mut self, mut form: SettingsForm, session: &mut Session, theme: &Theme) -> Option<Popup> {
        let rows = 14 + MapLayer::COUNT + PointerButton::ALL.len();
        let body = popup_frame("Settings", rows, theme);
        let mut r = 0;
        let mut next = || {
            let row = row_at(body, r);
            r += 1;
            row
        };

        label(next(), "Resource folder", theme);
        let row = next();
        if pointer_in(row) && is_mouse_button_pressed(MouseButton::Left) {
            form.focus = 0;
        }
        text_box(row, &form.resource.text, form.focus == 0, theme);
        label(next(), "Editor data folder", theme);
        let row = next();
        if pointer_in(row) && is_mouse_button_pressed(MouseButton::Left) {
            form.focus = 1;
        }
        text_box(row, &form.data.text, form.focus == 1, theme);
        match form.focus {
            0 => form.resource.handle_keys(),
            _ => form.data.handle_keys(),
        }

        let d = &mut form.draft;
        for layer in MapLayer::ALL {
            let i = layer.index();
            toggle(next(), &format!("Show {}", layer.name()), &mut d.view_layers[i], theme);
        }
        toggle(next(), "Grid", &mut d.show_grid, theme);
        toggle(next(), "Play area", &mut d.show_play_area, theme);
        toggle(next(), "Tile attributes", &mut d.view_tile_attributes, theme);
        toggle(next(), "Entities", &mut d.view_entities, theme);
        toggle(next(), "Entity boxes", &mut d.view_entity_boxes, theme);
        toggle(next(), "Entity images", &mut d.view_entity_images, theme);

        if button(next(), &format!("Style: {}", d.style.label()), false, theme) {
            let i = UiStyle::ALL.iter().position(|s| *s == d.style).unwrap_or(0);
            d.style = UiStyle::ALL[(i + 1) % UiStyle::ALL.len()];
        }
        for b in PointerButton::ALL {
            let slot = match b {
                PointerButton::Left => &mut d.bindings.left,
                PointerButton::Middle => &mut d.bindings.middle,
                PointerButton::Right => &mut d.bindings.right,
            };
            let text = format!("{b:?} button: {}", binding_label(*slot));
            if button(next(), &text, false, theme) {
                *slot = next_binding(*slot);
            }
        }

        next();
        let row = next();
        let apply = button(Rect::new(row.x, row.y, row.w / 2.0 - 2.0, row.h), "Apply", false, theme)
            || is_key_pressed(KeyCode::Enter);
        let cancel = button(
            Rect::new(row.x + row.w / 2.0 + 2.0, row.y, row.w / 2.0 - 2.0, row.h),
            "Cancel",
            false,
            theme,
        ) || is_key_pressed(KeyCode::Escape);

        if apply {
            // if startup fails again the form is reopened on the next frame
            let r = session.apply_settings(form.finish());
            self.report("Settings", r);
            None
        } else if cancel {
            let unchanged = Settings {
                show: false,
                ..session.settings().clone()
            };
            let r = session.apply_settings(unchanged);
            self.report("Settings", r);
            None
        } else {
            Some(Popup::Settings(Box::new(form)))
        }
    }
}

fn binding_label(b: ToolBinding) -> &'static str {
    match b {
        ToolBinding::Current => "Current tool",
        ToolBinding::Tool(t) => t.label(),
    }
}

/// Cycles Current -> each tool -> Current.
fn next_binding(b: ToolBinding) -> ToolBinding {
    match b {
        ToolBinding::Current => ToolBinding::Tool(ToolKind::ALL[0]),
        ToolBinding::Tool(t) => match ToolKind::ALL.get(t.index() + 1) {
            Some(n) => ToolBinding::Tool(*n),
            None => ToolBinding::Current,
        },
    }
}

fn pointer_in(r: Rect) -> bool {
    let (x, y) = mouse_position();
    r.contains(vec2(x, y))
}

/// Draws a flat button; true on the frame it is clicked.
fn button(r: Rect, text: &str, active: bool, theme: &Theme) -> bool {
    let hovered = pointer_in(r);
    let fill = if active {
        theme.accent
    } else if hovered {
        theme.hover
    } else {
        theme.panel
    };
    draw_rectangle(r.x, r.y, r.w, r.h, fill);
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, theme.hover);
    let color = if active { WHITE } else { theme.text };
    draw_text(text, r.x + 6.0, r.y + r.h - 6.0, FONT_SIZE, color);
    hovered && is_mouse_button_pressed(MouseButton::Left)
}

/// Like [`button`], but a disabled item is drawn dimmed and ignores clicks.
fn menu_button(r: Rect, text: &str, enabled: bool, theme: &Theme) -> bool {
    if enabled {
        return button(r, text, false, theme);
    }
    draw_rectangle(r.x, r.y, r.w, r.h, theme.panel);
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, theme.hover);
    let dim = Color { a: 0.4, ..theme.text };
    draw_text(text, r.x + 6.0, r.y + r.h - 6.0, FONT_SIZE, dim);
    false
}

fn toggle(r: Rect, text: &str, value: &mut bool, theme: &Theme) {
    let mark = if *value { "[x]" } else { "[ ]" };
    if button(r, &format!("{mark} {text}"), false, theme) {
        *value = !*value;
    }
}

fn label(r: Rect, text: &str, theme: &Theme) {
    draw_text(text, r.x + 2.0, r.y + r.h - 6.0, FONT_SIZE, theme.text);
}

fn text_box(r: Rect, text: &str, focused: bool, theme: &Theme) {
    draw_rectangle(r.x, r.y, r.w, r.h, theme.background);
    let border = if focused { theme.accent } else { theme.hover };
    draw_rectangle_lines(r.x, r.y, r.w, r.h, 1.0, border);
    let caret = if focused && (get_time() * 2.0) as i64 % 2 == 0 { "|" } else { "" };
    draw_text(&format!("{text}{caret}"), r.x + 4.0, r.y + r.h - 6.0, FONT_SIZE, theme.text);
}

/// Draws a centered popup with a title and `rows` content rows; returns the content area.
fn popup_frame(title: &str, rows: usize, theme: &Theme) -> Rect {
    draw_rectangle(0.0, 0.0, screen_width(), screen_height(), FADE);
    let h = (rows + 1) as f32 * ROW_HEIGHT + 12.0;
    let x = ((screen_width() - POPUP_WIDTH) / 2.0).max(0.0);
    let y = ((screen_height() - h) / 2.0).max(0.0);
    draw_rectangle(x, y, POPUP_WIDTH, h, theme.panel);
    draw_rectangle_lines(x, y, POPUP_WIDTH, h, 2.0, theme.accent);
    draw_text(title, x + 8.0, y + ROW_HEIGHT - 4.0, FONT_SIZE + 2.0, theme.text);
    Rect::new(x + 8.0, y + ROW_HEIGHT + 4.0, POPUP_WIDTH - 16.0, h - ROW_HEIGHT - 8.0)
}

fn row_at(body: Rect, i: usize) -> Rect {
    Rect::new(body.x, body.y + i as f32 * ROW_HEIGHT, body.w, ROW_HEIGHT - 2.0)
}

fn half_row(body: Rect, i: usize, half: usize) -> Rect {
    let r = row_at(body, i);
    let w = r.w / 2.0 - 2.0;
    Rect::new(r.x + half as f32 * (w + 4.0), r.y, w, r.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_cycle_visits_every_tool_then_current() {
        let mut b = ToolBinding::Current;
        let mut seen = Vec::new();
        for _ in 0..ToolKind::COUNT {
            b = next_binding(b);
            seen.push(b);
        }
        assert_eq!(
            seen,
            ToolKind::ALL.iter().map(|t| ToolBinding::Tool(*t)).collect::<Vec<_>>()
        );
        assert_eq!(next_binding(b), ToolBinding::Current);
    }

    #[test]
    fn settings_form_takes_paths_from_text_fields() {
        let mut form = SettingsForm::new(&Settings::default());
        form.resource.text = "game/rsc".into();
        form.draft.show_grid = false;
        let s = form.finish();
        assert_eq!(s.resource_path, PathBuf::from("game/rsc"));
        assert!(!s.show_grid);
        assert_eq!(s.data_path, Settings::default().data_path);
    }

    #[test]
    fn history_items_follow_the_undo_stack() {
        use crate::layer::Layer;
        use crate::undo::Edit;

        let mut history = UndoStack::new();
        assert!(!MenuItem::Undo.is_enabled(true, &history));
        assert!(!MenuItem::Redo.is_enabled(true, &history));

        history.push(Edit::ResizeLayer {
            layer: MapLayer::Foreground,
            before: Layer::default(),
            after: Layer::new(2, 2),
        });
        assert!(MenuItem::Undo.is_enabled(true, &history));
        assert!(!MenuItem::Redo.is_enabled(true, &history));
        // nothing applies without an open level
        assert!(!MenuItem::Undo.is_enabled(false, &history));

        assert!(MenuItem::ALL
            .iter()
            .filter(|i| !matches!(i, MenuItem::Undo | MenuItem::Redo))
            .all(|i| i.is_enabled(false, &history)));
    }
}
