pub mod connector;
pub mod geometry;
pub mod id;
pub mod model;
pub mod payload;
pub mod store;
pub mod viewport;

pub use connector::{CubicCurve, route};
pub use geometry::{Point, Rect, Size};
pub use id::{BoardId, EdgeId, NodeId};
pub use model::*;
pub use payload::{BoardPayload, BoardStats, PayloadError};
pub use store::{DUPLICATE_OFFSET, GraphStore, NodePatch, NodeProto, Snapshot};
pub use viewport::{Viewport, ZoomRange};
