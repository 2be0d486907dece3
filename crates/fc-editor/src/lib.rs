pub mod board;
pub mod controller;
pub mod history;
pub mod input;
pub mod selection;
pub mod shortcuts;
pub mod template;

pub use board::{Board, BoardManager};
pub use controller::{Controller, InteractionState, MenuAction, MenuTarget};
pub use history::History;
pub use input::{InputEvent, Modifiers, PointerButton};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use template::{BoardTemplate, TemplateEdge, TemplateNode, campaign_starter};
