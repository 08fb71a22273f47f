//! Graph model and the session store that edits it.

mod changes;
mod session;
mod types;

pub use changes::{EdgeChange, NodeChange};
pub use session::{GraphSession, NODE_SPACING, SaveMark};
pub use types::{
	Edge, EdgeId, EdgeKind, GraphId, GraphSnapshot, Node, NodeId, NodeKind, Position, UserId,
	default_label,
};
