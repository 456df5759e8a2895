//! Editing tools and the routing of pointer buttons to them.
//!
//! Every frame the configured mouse bindings are resolved into a set of buttons
//! per tool. A binding either names a tool directly or names the "current
//! tool", in which case it follows whatever tool is selected.

use crate::input::{ButtonSet, FrameInput, PointerButton};
use crate::layer::MapLayer;
use crate::map::Map;
use crate::undo::{Edit, TileChange, UndoStack};
use crate::view::EditorCamera;
use serde::{Deserialize, Serialize};

/// Selectable editing tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Pan the camera
    Hand,
    /// Paint the brush tile
    #[default]
    TileBrush,
    /// Paint tile 0
    Eraser,
    /// Drag units around
    EntityHand,
}

impl ToolKind {
    /// Number of tools.
    pub const COUNT: usize = 4;
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; ToolKind::COUNT] = [
        ToolKind::Hand,
        ToolKind::TileBrush,
        ToolKind::Eraser,
        ToolKind::EntityHand,
    ];

    /// Position in [`ToolKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name shown in the toolbar.
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Hand => "Hand",
            ToolKind::TileBrush => "Tile Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::EntityHand => "Entity Hand",
        }
    }
}

/// What a mouse button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolBinding {
    /// Whatever tool is currently selected
    Current,
    /// Always this tool
    Tool(ToolKind),
}

/// Binding per pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBindings {
    /// Left button
    pub left: ToolBinding,
    /// Middle button
    pub middle: ToolBinding,
    /// Right button
    pub right: ToolBinding,
}

impl Default for ButtonBindings {
    fn default() -> Self {
        ButtonBindings {
            left: ToolBinding::Current,
            middle: ToolBinding::Tool(ToolKind::Hand),
            right: ToolBinding::Tool(ToolKind::Eraser),
        }
    }
}

impl ButtonBindings {
    /// Binding of `button`.
    pub fn get(&self, button: PointerButton) -> ToolBinding {
        match button {
            PointerButton::Left => self.left,
            PointerButton::Middle => self.middle,
            PointerButton::Right => self.right,
        }
    }
}

/// Buttons that drive `tool`: bound to it by name, or bound to the current tool while it is `current`.
pub fn resolve_buttons(bindings: &ButtonBindings, current: ToolKind, tool: ToolKind) -> ButtonSet {
    PointerButton::ALL
        .into_iter()
        .filter(|b| match bindings.get(*b) {
            ToolBinding::Tool(t) => t == tool,
            ToolBinding::Current => current == tool,
        })
        .collect()
}

/// Mutable state a tool works against for one frame.
pub struct ToolContext<'a> {
    /// Level being edited
    pub map: &'a mut Map,
    /// View the pointer is mapped through
    pub camera: &'a mut EditorCamera,
    /// History finished edits go to
    pub undo: &'a mut UndoStack,
}

#[derive(Debug)]
struct Stroke {
    layer: MapLayer,
    changes: Vec<TileChange>,
}

#[derive(Debug)]
struct EntityDrag {
    index: usize,
    from: (u16, u16),
}

/// Per-tool button assignment plus the brush and in-progress strokes.
#[derive(Debug)]
pub struct ToolDispatch {
    current: ToolKind,
    active: [ButtonSet; ToolKind::COUNT],
    brush_tile: u8,
    brush_layer: MapLayer,
    stroke: Option<Stroke>,
    drag: Option<EntityDrag>,
}

impl Default for ToolDispatch {
    fn default() -> Self {
        ToolDispatch {
            current: ToolKind::default(),
            active: [ButtonSet::EMPTY; ToolKind::COUNT],
            brush_tile: 1,
            brush_layer: MapLayer::Foreground,
            stroke: None,
            drag: None,
        }
    }
}

impl ToolDispatch {
    /// Tile brush selected, brush tile 1 on the foreground, no buttons assigned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected tool.
    pub fn current(&self) -> ToolKind {
        self.current
    }

    /// Selects `tool`; takes effect on the next [`ToolDispatch::refresh`].
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.current = tool;
    }

    /// Tile the brush paints.
    pub fn brush_tile(&self) -> u8 {
        self.brush_tile
    }

    /// Sets the tile the brush paints.
    pub fn set_brush_tile(&mut self, tile: u8) {
        self.brush_tile = tile;
    }

    /// Layer brush and eraser write to.
    pub fn brush_layer(&self) -> MapLayer {
        self.brush_layer
    }

    /// Sets the layer brush and eraser write to.
    pub fn set_brush_layer(&mut self, layer: MapLayer) {
        self.brush_layer = layer;
    }

    /// Buttons currently assigned to `tool`.
    pub fn active_buttons(&self, tool: ToolKind) -> ButtonSet {
        self.active[tool.index()]
    }

    /// Assigns `buttons` to `tool`.
    pub fn set_active(&mut self, tool: ToolKind, buttons: ButtonSet) {
        self.active[tool.index()] = buttons;
    }

    /// Re-resolves the button assignment of every tool.
    pub fn refresh(&mut self, bindings: &ButtonBindings) {
        for tool in ToolKind::ALL {
            self.set_active(tool, resolve_buttons(bindings, self.current, tool));
        }
    }

    /// Drops any unfinished stroke or drag without recording it.
    pub fn cancel(&mut self) {
        self.stroke = None;
        self.drag = None;
    }

    /// Runs every tool that has a bound button held this frame and records finished edits.
    ///
    /// Brush and eraser share one stroke: it stays open while any button of either
    /// is held and is recorded once, on the first frame where none is.
    pub fn update(&mut self, input: &FrameInput, ctx: &mut ToolContext<'_>) {
        let mut painting = false;
        for tool in ToolKind::ALL {
            let bound = self.active[tool.index()];
            let held = !input.down.intersection(bound).is_empty();
            let pressed = !input.pressed.intersection(bound).is_empty();

            match tool {
                ToolKind::Hand => {
                    if held {
                        let d = input.delta();
                        ctx.camera.move_x(d.x, true);
                        ctx.camera.move_y(d.y, true);
                    }
                }
                ToolKind::TileBrush | ToolKind::Eraser => {
                    if held {
                        painting = true;
                        let value = if tool == ToolKind::Eraser { 0 } else { self.brush_tile };
                        self.paint(value, input, ctx);
                    }
                }
                ToolKind::EntityHand => self.drag_entity(held, pressed, input, ctx),
            }
        }
        if !painting {
            self.finish_stroke(ctx.undo);
        }
    }

    /// Records whatever stroke or drag is still open. Called before undo and redo.
    pub fn flush(&mut self, map: &Map, undo: &mut UndoStack) {
        self.finish_stroke(undo);
        self.finish_drag(map, undo);
    }

    fn paint(&mut self, value: u8, input: &FrameInput, ctx: &mut ToolContext<'_>) {
        let layer = self.brush_layer;
        let stroke = self.stroke.get_or_insert_with(|| Stroke {
            layer,
            changes: Vec::new(),
        });

        let grid = ctx.map.layer_mut(stroke.layer);
        let Some((x, y)) = ctx.camera.tile_at(input.pointer, Some(&*grid)) else {
            return;
        };
        if let Some(before) = grid.set(x, y, value) {
            if before != value {
                stroke.changes.push(TileChange {
                    x,
                    y,
                    before,
                    after: value,
                });
            }
        }
    }

    fn finish_stroke(&mut self, undo: &mut UndoStack) {
        if let Some(s) = self.stroke.take() {
            undo.push(Edit::Tiles {
                layer: s.layer,
                changes: s.changes,
            });
        }
    }

    fn finish_drag(&mut self, map: &Map, undo: &mut UndoStack) {
        if let Some(drag) = self.drag.take() {
            if let Some(e) = map.entities.get(drag.index) {
                undo.push(Edit::MoveEntity {
                    index: drag.index,
                    from: drag.from,
                    to: (e.x, e.y),
                });
            }
        }
    }

    fn drag_entity(&mut self, held: bool, pressed: bool, input: &FrameInput, ctx: &mut ToolContext<'_>) {
        let tile = ctx.camera.tile_at(input.pointer, None);

        if pressed && self.drag.is_none() {
            self.drag = tile
                .and_then(|(x, y)| ctx.map.entity_at(x, y))
                .map(|index| {
                    let e = &ctx.map.entities[index];
                    EntityDrag {
                        index,
                        from: (e.x, e.y),
                    }
                });
        }

        if held {
            if let (Some(drag), Some((x, y))) = (&self.drag, tile) {
                if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
                    ctx.map.move_entity(drag.index, x, y);
                }
            }
        } else {
            self.finish_drag(ctx.map, ctx.undo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use crate::map::Entity;
    use macroquad::prelude::*;

    const ALL_BINDINGS: [ToolBinding; 5] = [
        ToolBinding::Current,
        ToolBinding::Tool(ToolKind::Hand),
        ToolBinding::Tool(ToolKind::TileBrush),
        ToolBinding::Tool(ToolKind::Eraser),
        ToolBinding::Tool(ToolKind::EntityHand),
    ];

    #[test]
    fn resolution_matches_rule_for_every_combination() {
        for left in ALL_BINDINGS {
            for middle in ALL_BINDINGS {
                for right in ALL_BINDINGS {
                    let bindings = ButtonBindings { left, middle, right };
                    for current in ToolKind::ALL {
                        let mut dispatch = ToolDispatch::new();
                        dispatch.select_tool(current);
                        dispatch.refresh(&bindings);
                        for tool in ToolKind::ALL {
                            let set = dispatch.active_buttons(tool);
                            for b in PointerButton::ALL {
                                let expected = match bindings.get(b) {
                                    ToolBinding::Tool(t) => t == tool,
                                    ToolBinding::Current => current == tool,
                                };
                                assert_eq!(set.contains(b), expected, "{bindings:?} {current:?} {tool:?} {b:?}");
                            }
                        }
                    }
                }
            }
        }
    }

    struct Fixture {
        map: Map,
        camera: EditorCamera,
        undo: UndoStack,
    }

    impl Fixture {
        fn new() -> Self {
            let mut map = Map::new_template();
            *map.layer_mut(MapLayer::Foreground) = Layer::new(8, 8);
            Fixture {
                map,
                camera: EditorCamera {
                    zoom: 1.0,
                    ..Default::default()
                },
                undo: UndoStack::new(),
            }
        }

        fn frame(&mut self, dispatch: &mut ToolDispatch, input: FrameInput) {
            let mut ctx = ToolContext {
                map: &mut self.map,
                camera: &mut self.camera,
                undo: &mut self.undo,
            };
            dispatch.update(&input, &mut ctx);
        }
    }

    fn left(pointer: Vec2, down: bool, pressed: bool) -> FrameInput {
        let set: ButtonSet = [PointerButton::Left].into_iter().collect();
        FrameInput {
            pointer,
            previous_pointer: pointer,
            down: if down { set } else { ButtonSet::EMPTY },
            pressed: if pressed { set } else { ButtonSet::EMPTY },
            ..Default::default()
        }
    }

    #[test]
    fn brush_stroke_is_one_undo_step() {
        let mut fx = Fixture::new();
        let mut dispatch = ToolDispatch::new();
        dispatch.set_brush_tile(7);
        dispatch.refresh(&ButtonBindings::default());

        fx.frame(&mut dispatch, left(vec2(1.0, 1.0), true, true));
        fx.frame(&mut dispatch, left(vec2(17.0, 1.0), true, false));
        fx.frame(&mut dispatch, left(vec2(33.0, 1.0), true, false));
        assert!(!fx.undo.can_undo(), "stroke is recorded on release");
        fx.frame(&mut dispatch, left(vec2(33.0, 1.0), false, false));

        let fg = fx.map.layer(MapLayer::Foreground);
        assert_eq!((fg.get(0, 0), fg.get(1, 0), fg.get(2, 0)), (Some(7), Some(7), Some(7)));
        assert_eq!(fx.undo.undo_len(), 1);
    }

    #[test]
    fn painting_outside_the_layer_does_nothing() {
        let mut fx = Fixture::new();
        let mut dispatch = ToolDispatch::new();
        dispatch.refresh(&ButtonBindings::default());

        fx.frame(&mut dispatch, left(vec2(-5.0, 3.0), true, true));
        fx.frame(&mut dispatch, left(vec2(500.0, 3.0), true, false));
        fx.frame(&mut dispatch, left(vec2(500.0, 3.0), false, false));
        assert!(fx.map.layer(MapLayer::Foreground).cells().iter().all(|&c| c == 0));
        assert!(!fx.undo.can_undo());
    }

    #[test]
    fn right_button_erases_with_default_bindings() {
        let mut fx = Fixture::new();
        fx.map.layer_mut(MapLayer::Foreground).set(2, 2, 5);
        let mut dispatch = ToolDispatch::new();
        dispatch.refresh(&ButtonBindings::default());
        let right: ButtonSet = [PointerButton::Right].into_iter().collect();

        let p = vec2(40.0, 40.0);
        let idle = FrameInput {
            pointer: p,
            previous_pointer: p,
            ..Default::default()
        };
        fx.frame(&mut dispatch, FrameInput { down: right, pressed: right, ..idle });
        fx.frame(&mut dispatch, idle);
        assert_eq!(fx.map.layer(MapLayer::Foreground).get(2, 2), Some(0));
        assert_eq!(fx.undo.undo_len(), 1);
    }

    #[test]
    fn hand_pans_by_pointer_delta() {
        let mut fx = Fixture::new();
        let mut dispatch = ToolDispatch::new();
        dispatch.select_tool(ToolKind::Hand);
        dispatch.refresh(&ButtonBindings::default());

        let mut input = left(vec2(30.0, 20.0), true, true);
        input.previous_pointer = vec2(10.0, 25.0);
        fx.frame(&mut dispatch, input);
        assert_eq!(fx.camera.offset, vec2(20.0, -5.0));
        assert!(!fx.undo.can_undo());
    }

    #[test]
    fn entity_hand_drags_and_records_move() {
        let mut fx = Fixture::new();
        fx.map.entities.push(Entity {
            x: 1,
            y: 1,
            ..Default::default()
        });
        let mut dispatch = ToolDispatch::new();
        dispatch.select_tool(ToolKind::EntityHand);
        dispatch.refresh(&ButtonBindings::default());

        fx.frame(&mut dispatch, left(vec2(20.0, 20.0), true, true));
        fx.frame(&mut dispatch, left(vec2(70.0, 52.0), true, false));
        fx.frame(&mut dispatch, left(vec2(70.0, 52.0), false, false));

        assert_eq!((fx.map.entities[0].x, fx.map.entities[0].y), (4, 3));
        assert_eq!(fx.undo.undo_len(), 1);
    }

    fn buttons(pointer: Vec2, down: &[PointerButton], pressed: &[PointerButton]) -> FrameInput {
        FrameInput {
            pointer,
            previous_pointer: pointer,
            down: down.iter().copied().collect(),
            pressed: pressed.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn brush_and_eraser_chord_is_one_stroke() {
        use PointerButton::{Left, Right};
        let mut fx = Fixture::new();
        fx.map.layer_mut(MapLayer::Foreground).set(1, 1, 9);
        let original = fx.map.clone();
        let mut dispatch = ToolDispatch::new();
        dispatch.set_brush_tile(4);
        dispatch.refresh(&ButtonBindings::default());

        let p = vec2(20.0, 20.0);
        fx.frame(&mut dispatch, buttons(p, &[Left, Right], &[Left, Right]));
        for _ in 0..4 {
            fx.frame(&mut dispatch, buttons(p, &[Left, Right], &[]));
        }
        assert!(!fx.undo.can_undo());
        // letting go of one button keeps the stroke open
        fx.frame(&mut dispatch, buttons(p, &[Right], &[]));
        assert!(!fx.undo.can_undo());
        fx.frame(&mut dispatch, buttons(p, &[], &[]));

        assert_eq!(fx.undo.undo_len(), 1);
        assert_eq!(fx.map.layer(MapLayer::Foreground).get(1, 1), Some(0));

        let mut store = crate::tileset::TilesetStore::new();
        let mut ctx = crate::undo::TilesetContext::new(std::path::Path::new(""), &mut store);
        assert!(fx.undo.undo(&mut fx.map, &mut ctx));
        assert_eq!(fx.map, original);
    }

    #[test]
    fn unbinding_the_painting_button_closes_the_stroke() {
        let mut fx = Fixture::new();
        let mut dispatch = ToolDispatch::new();
        dispatch.refresh(&ButtonBindings::default());

        fx.frame(&mut dispatch, left(vec2(1.0, 1.0), true, true));
        fx.frame(&mut dispatch, left(vec2(17.0, 1.0), true, false));
        dispatch.refresh(&ButtonBindings {
            left: ToolBinding::Tool(ToolKind::Hand),
            ..Default::default()
        });
        fx.frame(&mut dispatch, left(vec2(33.0, 1.0), true, false));

        assert_eq!(fx.undo.undo_len(), 1);
        assert_eq!(fx.map.layer(MapLayer::Foreground).get(2, 0), Some(0));
    }

    #[test]
    fn flush_records_open_stroke_and_drag() {
        let mut fx = Fixture::new();
        fx.map.entities.push(Entity::default());
        let mut dispatch = ToolDispatch::new();
        dispatch.refresh(&ButtonBindings {
            right: ToolBinding::Tool(ToolKind::EntityHand),
            ..Default::default()
        });
        let right = [PointerButton::Right];

        fx.frame(&mut dispatch, left(vec2(40.0, 40.0), true, true));
        fx.frame(&mut dispatch, buttons(vec2(1.0, 1.0), &right, &right));
        fx.frame(&mut dispatch, buttons(vec2(50.0, 1.0), &right, &[]));
        assert_eq!(fx.undo.undo_len(), 1, "stroke closed once left was let go");

        dispatch.flush(&fx.map, &mut fx.undo);
        assert_eq!(fx.undo.undo_len(), 2);
        dispatch.flush(&fx.map, &mut fx.undo);
        assert_eq!(fx.undo.undo_len(), 2);
    }
}
