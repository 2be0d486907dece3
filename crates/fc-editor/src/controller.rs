//! The interaction state machine.
//!
//! Consumes normalized input events and turns them into viewport mutations
//! (pan/zoom) or graph mutations (drag, menu actions, shortcuts) on the
//! active board. Continuous pointer-move is coalesced: `handle` only buffers
//! the latest position, and `on_frame` applies it once per animation frame.
//! A completed drag commits a single history entry for its net effect;
//! nothing commits mid-gesture.

use crate::board::Board;
use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use fc_core::{BoardPayload, NodeId, NodeKind, NodePatch, NodeStatus, Point, Size};

/// Zoom speed for ctrl/cmd + wheel. The factor is exponential in the wheel
/// delta so successive ticks compose multiplicatively.
const WHEEL_ZOOM_RATE: f32 = 0.0015;

/// Zoom step for keyboard zoom in/out.
const KEY_ZOOM_STEP: f32 = 1.2;

/// What a context menu was opened on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuTarget {
    Node(NodeId),
    /// Empty canvas; keeps the screen position for "add node here".
    Canvas { screen: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    PanningCanvas {
        last_screen: Point,
    },
    DraggingNode {
        id: NodeId,
        start_screen: Point,
        /// Canvas-space position of the node at drag start.
        start_pos: Point,
        moved: bool,
    },
    ContextMenuOpen {
        target: MenuTarget,
    },
}

/// An entry in a context menu. Node-scoped entries carry their target id;
/// `AddNode` places at the menu's canvas position. `ImportBoard` only
/// signals intent — the host supplies the payload to `Board::import`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    DuplicateNode(NodeId),
    DeleteNode(NodeId),
    ResetNode(NodeId),
    ActivateNode(NodeId),
    AddNode(NodeKind),
    CenterView,
    ExportBoard,
    ImportBoard,
    ClearBoard,
}

pub struct Controller {
    state: InteractionState,
    /// Latest unapplied pointer position; at most one update per frame.
    pending_move: Option<Point>,
    /// Size of the viewing surface, for view-relative placements.
    view_size: Size,
}

impl Controller {
    pub fn new(view_size: Size) -> Self {
        Self {
            state: InteractionState::Idle,
            pending_move: None,
            view_size,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn set_view_size(&mut self, view_size: Size) {
        self.view_size = view_size;
    }

    fn view_center(&self) -> Point {
        Point::new(self.view_size.width / 2.0, self.view_size.height / 2.0)
    }

    /// Feed one input event. Pointer moves are buffered; everything else
    /// takes effect immediately.
    pub fn handle(&mut self, board: &mut Board, event: &InputEvent) {
        match event {
            InputEvent::PointerDown {
                pos,
                button,
                modifiers,
            } => self.pointer_down(board, *pos, *button, *modifiers),
            InputEvent::PointerMove { pos, .. } => {
                if matches!(
                    self.state,
                    InteractionState::DraggingNode { .. } | InteractionState::PanningCanvas { .. }
                ) {
                    self.pending_move = Some(*pos);
                }
            }
            InputEvent::PointerUp { .. } => self.pointer_up(board),
            InputEvent::Wheel {
                pos,
                delta,
                modifiers,
            } => self.wheel(board, *pos, *delta, *modifiers),
            InputEvent::Key { key, modifiers } => {
                self.handle_key(board, key, *modifiers, false);
            }
        }
    }

    fn pointer_down(
        &mut self,
        board: &mut Board,
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) {
        // Any click while a menu is open closes it and is otherwise ignored.
        if matches!(self.state, InteractionState::ContextMenuOpen { .. }) {
            self.state = InteractionState::Idle;
            return;
        }

        let canvas_pos = board.viewport.screen_to_canvas(pos);
        let hit = board.store.node_at(canvas_pos);

        match button {
            PointerButton::Right => {
                let target = match hit {
                    Some(id) => MenuTarget::Node(id),
                    None => MenuTarget::Canvas { screen: pos },
                };
                self.state = InteractionState::ContextMenuOpen { target };
            }
            PointerButton::Left => match hit {
                Some(id) => {
                    if modifiers.shift {
                        board.select(id, true);
                    } else if !board.selection().contains(id) {
                        board.select(id, false);
                    } else {
                        // Already selected: keep the selection, still raise.
                        board.store.bring_to_front(id);
                    }
                    // The node may have been shift-toggled out, but the
                    // gesture still drags the node under the pointer.
                    let start_pos = board
                        .store
                        .node(id)
                        .map(|n| n.position)
                        .unwrap_or(canvas_pos);
                    self.state = InteractionState::DraggingNode {
                        id,
                        start_screen: pos,
                        start_pos,
                        moved: false,
                    };
                }
                None => {
                    if !modifiers.shift {
                        board.clear_selection();
                    }
                    self.state = InteractionState::PanningCanvas { last_screen: pos };
                }
            },
        }
    }

    fn pointer_up(&mut self, board: &mut Board) {
        // Apply whatever the last frame hasn't, so the committed state is
        // the gesture's final position.
        self.apply_pending(board);
        if let InteractionState::DraggingNode { moved: true, .. } = self.state {
            board.commit();
        }
        if !matches!(self.state, InteractionState::ContextMenuOpen { .. }) {
            self.state = InteractionState::Idle;
        }
        self.pending_move = None;
    }

    fn wheel(&mut self, board: &mut Board, pos: Point, delta: Point, modifiers: Modifiers) {
        if modifiers.command() {
            let factor = (-delta.y * WHEEL_ZOOM_RATE).exp();
            board.viewport = board.viewport.zoom_at_point(pos, factor, board.zoom_range);
        } else {
            // Two-axis pan straight from the wheel delta.
            board.viewport = board.viewport.pan_by(delta);
        }
    }

    /// Apply the buffered pointer position. Call once per animation frame.
    pub fn on_frame(&mut self, board: &mut Board) {
        self.apply_pending(board);
    }

    fn apply_pending(&mut self, board: &mut Board) {
        let Some(pos) = self.pending_move.take() else {
            return;
        };
        match &mut self.state {
            InteractionState::DraggingNode {
                id,
                start_screen,
                start_pos,
                moved,
            } => {
                // Screen delta shrinks/grows with zoom; canvas delta doesn't.
                let canvas_delta = (pos - *start_screen) / board.viewport.zoom;
                if board.move_node_live(*id, *start_pos + canvas_delta) {
                    *moved = true;
                }
            }
            InteractionState::PanningCanvas { last_screen } => {
                board.viewport = board.viewport.pan_by(pos - *last_screen);
                *last_screen = pos;
            }
            _ => {}
        }
    }

    /// Abort the in-flight gesture: a dragged node snaps back to where it
    /// started, menus close, nothing is committed.
    pub fn cancel(&mut self, board: &mut Board) {
        if let InteractionState::DraggingNode {
            id,
            start_pos,
            moved: true,
            ..
        } = self.state
        {
            board.move_node_live(id, start_pos);
        }
        self.state = InteractionState::Idle;
        self.pending_move = None;
    }

    // ─── Context menus ───────────────────────────────────────────────────

    /// The actions the currently open menu offers, scoped to its target.
    /// Empty when no menu is open.
    pub fn menu_actions(&self) -> Vec<MenuAction> {
        match self.state {
            InteractionState::ContextMenuOpen {
                target: MenuTarget::Node(id),
            } => vec![
                MenuAction::DuplicateNode(id),
                MenuAction::DeleteNode(id),
                MenuAction::ResetNode(id),
                MenuAction::ActivateNode(id),
            ],
            InteractionState::ContextMenuOpen {
                target: MenuTarget::Canvas { .. },
            } => {
                let mut actions: Vec<MenuAction> =
                    NodeKind::ALL.iter().map(|&k| MenuAction::AddNode(k)).collect();
                actions.extend([
                    MenuAction::CenterView,
                    MenuAction::ExportBoard,
                    MenuAction::ImportBoard,
                    MenuAction::ClearBoard,
                ]);
                actions
            }
            _ => Vec::new(),
        }
    }

    /// Dispatch a menu entry and close the menu. `ExportBoard` returns the
    /// payload; every other action returns `None`.
    pub fn apply_menu_action(&mut self, board: &mut Board, action: MenuAction) -> Option<BoardPayload> {
        let menu_screen = match self.state {
            InteractionState::ContextMenuOpen {
                target: MenuTarget::Canvas { screen },
            } => Some(screen),
            _ => None,
        };
        self.state = InteractionState::Idle;

        match action {
            MenuAction::DuplicateNode(id) => {
                board.duplicate_node(id);
            }
            MenuAction::DeleteNode(id) => {
                board.delete_node(id);
            }
            MenuAction::ResetNode(id) => {
                board.update_node(
                    id,
                    NodePatch {
                        status: Some(NodeStatus::Idle),
                        data: Some(serde_json::Value::Null),
                        ..NodePatch::default()
                    },
                );
            }
            MenuAction::ActivateNode(id) => {
                board.set_status(id, NodeStatus::Active);
            }
            MenuAction::AddNode(kind) => {
                let screen = menu_screen.unwrap_or_else(|| self.view_center());
                board.add_node_at(kind, board.viewport.screen_to_canvas(screen));
            }
            MenuAction::CenterView => board.center_view(self.view_size),
            MenuAction::ExportBoard => {
                let name = board.name.clone();
                return Some(board.export(name));
            }
            MenuAction::ImportBoard => {}
            MenuAction::ClearBoard => board.clear(),
        }
        None
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and run a keyboard shortcut. Returns whether it was handled.
    /// Suppressed entirely while a text-entry element has focus.
    pub fn handle_key(
        &mut self,
        board: &mut Board,
        key: &str,
        modifiers: Modifiers,
        text_input_focused: bool,
    ) -> bool {
        if text_input_focused {
            return false;
        }
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return false;
        };
        log::trace!("shortcut {action:?}");
        match action {
            ShortcutAction::AddNode => {
                let kind = NodeKind::Task;
                let center = board.viewport.screen_to_canvas(self.view_center());
                let size = kind.default_size();
                let pos = center - Point::new(size.width / 2.0, size.height / 2.0);
                board.add_node_at(kind, pos);
            }
            ShortcutAction::DeleteSelection => {
                board.delete_selection();
            }
            ShortcutAction::Undo => {
                board.undo();
            }
            ShortcutAction::Redo => {
                board.redo();
            }
            ShortcutAction::Duplicate => {
                board.duplicate_selection();
            }
            ShortcutAction::SelectAll => board.select_all(),
            ShortcutAction::Deselect => {
                if matches!(self.state, InteractionState::Idle) {
                    board.clear_selection();
                } else {
                    self.cancel(board);
                }
            }
            ShortcutAction::ZoomIn => self.zoom_step(board, KEY_ZOOM_STEP),
            ShortcutAction::ZoomOut => self.zoom_step(board, 1.0 / KEY_ZOOM_STEP),
            ShortcutAction::ZoomReset => {
                let reset = 1.0 / board.viewport.zoom;
                self.zoom_step(board, reset);
            }
        }
        true
    }

    fn zoom_step(&self, board: &mut Board, factor: f32) {
        board.viewport =
            board
                .viewport
                .zoom_at_point(self.view_center(), factor, board.zoom_range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::EdgeKind;
    use pretty_assertions::assert_eq;

    fn setup() -> (Controller, Board, NodeId) {
        let mut board = Board::new("test");
        let id = board.add_node_at(NodeKind::Task, Point::new(100.0, 100.0));
        board.clear_selection();
        (Controller::new(Size::new(800.0, 600.0)), board, id)
    }

    fn left_down(pos: Point) -> InputEvent {
        InputEvent::PointerDown {
            pos,
            button: PointerButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    fn pointer_move(pos: Point) -> InputEvent {
        InputEvent::PointerMove {
            pos,
            modifiers: Modifiers::NONE,
        }
    }

    fn pointer_up(pos: Point) -> InputEvent {
        InputEvent::PointerUp {
            pos,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn down_on_node_starts_drag_and_selects() {
        let (mut ctl, mut board, id) = setup();
        ctl.handle(&mut board, &left_down(Point::new(150.0, 150.0)));
        assert!(matches!(
            ctl.state(),
            InteractionState::DraggingNode { id: d, moved: false, .. } if *d == id
        ));
        assert!(board.selection().contains(id));
    }

    #[test]
    fn down_on_empty_pans_and_clears_selection() {
        let (mut ctl, mut board, id) = setup();
        board.select(id, false);
        ctl.handle(&mut board, &left_down(Point::new(700.0, 500.0)));
        assert!(matches!(
            ctl.state(),
            InteractionState::PanningCanvas { .. }
        ));
        assert!(board.selection().is_empty());
    }

    #[test]
    fn drag_moves_node_scaled_by_zoom() {
        let (mut ctl, mut board, id) = setup();
        board.viewport.zoom = 2.0;
        // At zoom 2, the node at canvas (100,100) paints at screen (200,200).
        ctl.handle(&mut board, &left_down(Point::new(210.0, 210.0)));
        ctl.handle(&mut board, &pointer_move(Point::new(250.0, 230.0)));
        ctl.on_frame(&mut board);

        // Screen delta (40, 20) → canvas delta (20, 10).
        assert_eq!(
            board.store.node(id).unwrap().position,
            Point::new(120.0, 110.0)
        );
        ctl.handle(&mut board, &pointer_up(Point::new(250.0, 230.0)));
        assert!(matches!(ctl.state(), InteractionState::Idle));
    }

    #[test]
    fn moves_are_coalesced_to_one_per_frame() {
        let (mut ctl, mut board, id) = setup();
        ctl.handle(&mut board, &left_down(Point::new(150.0, 150.0)));
        ctl.handle(&mut board, &pointer_move(Point::new(160.0, 150.0)));
        ctl.handle(&mut board, &pointer_move(Point::new(170.0, 150.0)));
        ctl.handle(&mut board, &pointer_move(Point::new(190.0, 150.0)));
        // Nothing applied until the frame tick; then only the latest.
        assert_eq!(
            board.store.node(id).unwrap().position,
            Point::new(100.0, 100.0)
        );
        ctl.on_frame(&mut board);
        assert_eq!(
            board.store.node(id).unwrap().position,
            Point::new(140.0, 100.0)
        );
    }

    #[test]
    fn completed_drag_commits_once() {
        let (mut ctl, mut board, id) = setup();
        ctl.handle(&mut board, &left_down(Point::new(150.0, 150.0)));
        for step in 1..=5 {
            ctl.handle(
                &mut board,
                &pointer_move(Point::new(150.0 + step as f32 * 10.0, 150.0)),
            );
            ctl.on_frame(&mut board);
        }
        ctl.handle(&mut board, &pointer_up(Point::new(200.0, 150.0)));

        assert_eq!(
            board.store.node(id).unwrap().position,
            Point::new(150.0, 100.0)
        );
        // One undo reverts the whole gesture.
        assert!(board.undo());
        assert_eq!(
            board.store.node(id).unwrap().position,
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn click_without_movement_commits_nothing() {
        let (mut ctl, mut board, _) = setup();
        let before = board.store.snapshot();
        ctl.handle(&mut board, &left_down(Point::new(150.0, 150.0)));
        ctl.handle(&mut board, &pointer_up(Point::new(150.0, 150.0)));
        board.undo();
        // The only undoable step is still the original add_node, so undoing
        // once goes back past it — the click itself added no entry.
        assert_ne!(board.store.snapshot(), before);
        assert_eq!(board.store.node_count(), 0);
    }

    #[test]
    fn pan_never_touches_graph_or_history() {
        let (mut ctl, mut board, id) = setup();
        let snap_before = board.store.snapshot();
        ctl.handle(&mut board, &left_down(Point::new(700.0, 500.0)));
        ctl.handle(&mut board, &pointer_move(Point::new(650.0, 480.0)));
        ctl.on_frame(&mut board);
        ctl.handle(&mut board, &pointer_up(Point::new(650.0, 480.0)));

        assert_eq!(board.viewport.pan, Point::new(-50.0, -20.0));
        assert_eq!(board.store.snapshot(), snap_before);
        assert!(board.store.node(id).is_some());
    }

    #[test]
    fn escape_cancels_drag_and_restores_position() {
        let (mut ctl, mut board, id) = setup();
        ctl.handle(&mut board, &left_down(Point::new(150.0, 150.0)));
        ctl.handle(&mut board, &pointer_move(Point::new(400.0, 400.0)));
        ctl.on_frame(&mut board);
        assert_ne!(
            board.store.node(id).unwrap().position,
            Point::new(100.0, 100.0)
        );

        assert!(ctl.handle_key(&mut board, "Escape", Modifiers::NONE, false));
        assert_eq!(
            board.store.node(id).unwrap().position,
            Point::new(100.0, 100.0)
        );
        assert!(matches!(ctl.state(), InteractionState::Idle));
    }

    #[test]
    fn wheel_with_command_zooms_at_cursor() {
        let (mut ctl, mut board, _) = setup();
        let cursor = Point::new(400.0, 300.0);
        let canvas_before = board.viewport.screen_to_canvas(cursor);
        ctl.handle(
            &mut board,
            &InputEvent::Wheel {
                pos: cursor,
                delta: Point::new(0.0, -120.0),
                modifiers: Modifiers {
                    ctrl: true,
                    ..Modifiers::NONE
                },
            },
        );
        assert!(board.viewport.zoom > 1.0);
        let canvas_after = board.viewport.screen_to_canvas(cursor);
        assert!((canvas_before.x - canvas_after.x).abs() < 1e-3);
        assert!((canvas_before.y - canvas_after.y).abs() < 1e-3);
    }

    #[test]
    fn plain_wheel_pans_two_axes() {
        let (mut ctl, mut board, _) = setup();
        ctl.handle(
            &mut board,
            &InputEvent::Wheel {
                pos: Point::new(400.0, 300.0),
                delta: Point::new(30.0, -10.0),
                modifiers: Modifiers::NONE,
            },
        );
        assert_eq!(board.viewport.pan, Point::new(30.0, -10.0));
        assert_eq!(board.viewport.zoom, 1.0);
    }

    #[test]
    fn right_click_opens_scoped_menu() {
        let (mut ctl, mut board, id) = setup();
        ctl.handle(
            &mut board,
            &InputEvent::PointerDown {
                pos: Point::new(150.0, 150.0),
                button: PointerButton::Right,
                modifiers: Modifiers::NONE,
            },
        );
        assert!(matches!(
            ctl.state(),
            InteractionState::ContextMenuOpen {
                target: MenuTarget::Node(n)
            } if *n == id
        ));
        assert!(ctl.menu_actions().contains(&MenuAction::DeleteNode(id)));

        // Click elsewhere closes the menu without other effects.
        let count_before = board.store.node_count();
        ctl.handle(&mut board, &left_down(Point::new(700.0, 500.0)));
        assert!(matches!(ctl.state(), InteractionState::Idle));
        assert_eq!(board.store.node_count(), count_before);
    }

    #[test]
    fn canvas_menu_adds_node_at_click_position() {
        let (mut ctl, mut board, _) = setup();
        board.viewport.pan = Point::new(100.0, 0.0);
        let screen = Point::new(700.0, 500.0);
        ctl.handle(
            &mut board,
            &InputEvent::PointerDown {
                pos: screen,
                button: PointerButton::Right,
                modifiers: Modifiers::NONE,
            },
        );
        ctl.apply_menu_action(&mut board, MenuAction::AddNode(NodeKind::Note));

        let expected = Point::new(600.0, 500.0);
        assert!(
            board
                .store
                .nodes()
                .any(|n| n.kind == NodeKind::Note && n.position == expected)
        );
        assert!(matches!(ctl.state(), InteractionState::Idle));
    }

    #[test]
    fn shortcuts_suppressed_in_text_input() {
        let (mut ctl, mut board, _) = setup();
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(!ctl.handle_key(&mut board, "n", cmd, true));
        assert_eq!(board.store.node_count(), 1);

        assert!(ctl.handle_key(&mut board, "n", cmd, false));
        assert_eq!(board.store.node_count(), 2);
    }

    #[test]
    fn delete_selection_shortcut_cascades() {
        let (mut ctl, mut board, id) = setup();
        let other = board.add_node_at(NodeKind::Chat, Point::new(500.0, 100.0));
        board.connect(id, other, EdgeKind::Flow);
        board.select(id, false);

        let cmd = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert!(ctl.handle_key(&mut board, "Backspace", cmd, false));
        assert_eq!(board.store.node_count(), 1);
        assert_eq!(board.store.edge_count(), 0);
        assert!(board.selection().is_empty());
    }
}
