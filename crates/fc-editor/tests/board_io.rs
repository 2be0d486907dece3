//! Export/import contract at the board level: wire shape, atomic rejection,
//! and state isolation across boards in the manager.

use fc_core::{BoardPayload, EdgeKind, NodeKind, NodeStatus, Point, Viewport};
use fc_editor::{Board, BoardManager, campaign_starter};
use pretty_assertions::assert_eq;

fn sample_board() -> Board {
    let mut board = Board::new("sample");
    let a = board.add_node_at(NodeKind::Task, Point::new(0.0, 0.0));
    let b = board.add_node_at(NodeKind::VideoGen, Point::new(420.0, 60.0));
    let c = board.add_node_at(NodeKind::ResultCard, Point::new(840.0, 120.0));
    board.connect(a, b, EdgeKind::Flow);
    board.connect(b, c, EdgeKind::Flow);
    board.set_status(c, NodeStatus::Done);
    board
}

#[test]
fn export_json_matches_wire_contract() {
    let board = sample_board();
    let json = board.export("q3-launch").to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["project"], "q3-launch");
    assert!(value["timestamp"].is_string());
    assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(value["edges"].as_array().unwrap().len(), 2);
    assert_eq!(value["stats"]["totalNodes"], 3);
    assert_eq!(value["stats"]["completedNodes"], 1);
    assert_eq!(value["stats"]["activeConnections"], 0);

    let node = &value["nodes"][0];
    assert!(node["type"].is_string());
    assert!(node["zIndex"].is_number());
    let edge = &value["edges"][0];
    assert!(edge["fromNodeId"].is_string());
    assert!(edge["toNodeId"].is_string());

    assert!(value["viewport"]["pan"]["x"].is_number());
    assert!(value["viewport"]["zoom"].is_number());
}

#[test]
fn json_roundtrip_through_import() {
    let source = sample_board();
    let json = source.export("roundtrip").to_json().unwrap();
    let payload = BoardPayload::from_json(&json).unwrap();

    let mut target = Board::new("target");
    target.import(&payload).unwrap();
    assert_eq!(target.store.snapshot(), source.store.snapshot());
}

#[test]
fn import_rejects_dangling_edge_without_side_effects() {
    let mut target = sample_board();
    let nodes_before = target.store.snapshot();
    let viewport_before = target.viewport;

    let mut payload = target.export("broken");
    // Drop one endpoint but keep the edges referencing it.
    payload.nodes.retain(|n| n.kind != NodeKind::VideoGen);
    assert!(target.import(&payload).is_err());

    assert_eq!(target.store.snapshot(), nodes_before);
    assert_eq!(target.viewport, viewport_before);
}

#[test]
fn import_rejects_malformed_json() {
    assert!(BoardPayload::from_json("{\"project\": 12}").is_err());
    assert!(BoardPayload::from_json("not json at all").is_err());
}

#[test]
fn import_clamps_incoming_viewport() {
    let source = sample_board();
    let mut payload = source.export("zoomed");
    payload.viewport = Viewport {
        pan: Point::new(10.0, 10.0),
        zoom: 250.0,
    };

    let mut target = Board::new("target");
    target.import(&payload).unwrap();
    assert!(target.viewport.zoom <= target.zoom_range.max);
}

#[test]
fn msgpack_save_load_contract() {
    let board = sample_board();
    let bytes = board.export("binary").to_msgpack().unwrap();
    let payload = BoardPayload::from_msgpack(&bytes).unwrap();

    let mut restored = Board::new("restored");
    restored.import(&payload).unwrap();
    assert_eq!(restored.store.snapshot(), board.store.snapshot());
}

#[test]
fn manager_boards_are_fully_isolated() {
    let mut mgr = BoardManager::new();
    let storyboard = mgr.create_from_template("storyboard", &campaign_starter());
    let scratch = mgr.create("scratch");

    // Mutate the scratch board only.
    let active = mgr.active_mut().unwrap();
    assert_eq!(active.id, scratch);
    active.add_node_at(NodeKind::Note, Point::ZERO);
    active.viewport.zoom = 0.5;

    // The template board is exactly as instantiated.
    mgr.switch_to(storyboard);
    let board = mgr.active().unwrap();
    assert_eq!(board.store.node_count(), 4);
    assert_eq!(board.store.edge_count(), 2);
    assert_eq!(board.viewport.zoom, 1.0);
    assert!(!board.can_undo(), "template state is the baseline");

    // Round-trip the template board through export/import into scratch;
    // the storyboard itself is untouched.
    let payload = mgr.export_active("iso").unwrap();
    mgr.switch_to(scratch);
    mgr.active_mut().unwrap().import(&payload).unwrap();
    assert_eq!(mgr.active().unwrap().store.node_count(), 4);

    let storyboard_again = mgr.board(storyboard).unwrap();
    assert_eq!(storyboard_again.store.node_count(), 4);
}
