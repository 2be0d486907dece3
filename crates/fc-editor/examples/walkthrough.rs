//! End-to-end driver: build a board from the starter template, simulate a
//! drag gesture and an undo, then print the JSON export.
//!
//! Run with `RUST_LOG=debug cargo run --example walkthrough` to watch the
//! engine's mutation log.

use fc_core::{Point, Size};
use fc_editor::{
    BoardManager, Controller, InputEvent, Modifiers, PointerButton, campaign_starter,
};

fn main() {
    env_logger::init();

    let mut manager = BoardManager::new();
    manager.create_from_template("spring launch", &campaign_starter());

    let mut controller = Controller::new(Size::new(1280.0, 800.0));
    let board = manager.active_mut().expect("board was just created");

    // Drag the task module 120px to the right, one frame at a time.
    controller.handle(
        board,
        &InputEvent::PointerDown {
            pos: Point::new(140.0, 90.0),
            button: PointerButton::Left,
            modifiers: Modifiers::NONE,
        },
    );
    for step in 1..=4 {
        controller.handle(
            board,
            &InputEvent::PointerMove {
                pos: Point::new(140.0 + step as f32 * 30.0, 90.0),
                modifiers: Modifiers::NONE,
            },
        );
        controller.on_frame(board);
    }
    controller.handle(
        board,
        &InputEvent::PointerUp {
            pos: Point::new(260.0, 90.0),
            modifiers: Modifiers::NONE,
        },
    );

    // Zoom in a couple of notches around the middle of the view.
    for _ in 0..3 {
        controller.handle(
            board,
            &InputEvent::Wheel {
                pos: Point::new(640.0, 400.0),
                delta: Point::new(0.0, -120.0),
                modifiers: Modifiers {
                    ctrl: true,
                    ..Modifiers::NONE
                },
            },
        );
    }

    println!(
        "after drag: {} nodes, {} edges, zoom {:.2}, can_undo={}",
        board.store.node_count(),
        board.store.edge_count(),
        board.viewport.zoom,
        board.can_undo(),
    );

    board.undo();
    println!("after undo: drag reverted, can_redo={}", board.can_redo());
    board.redo();

    match board.export("walkthrough").to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("export failed: {err}"),
    }
}
