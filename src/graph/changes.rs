//! Discrete mutations produced by pointer gestures on the canvas.
//!
//! Each variant is applied on its own by the session; there is no
//! heterogeneous batch to dispatch over.

use super::types::{Edge, EdgeId, Node, NodeId, Position};

/// A change to one node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	/// The node was dragged to `position`. `dragging` is false on release.
	Position {
		/// Node being moved.
		id: NodeId,
		/// New position.
		position: Position,
		/// False on release.
		dragging: bool,
	},
	/// The node's selection flag changed.
	Select {
		/// Node whose flag changed.
		id: NodeId,
		/// New flag value.
		selected: bool,
	},
	/// The node was removed, together with every edge touching it.
	Remove {
		/// Node to remove.
		id: NodeId,
	},
	/// A node was inserted. Ignored if the id is taken.
	Add(Node),
}

impl NodeChange {
	/// Node the change is about.
	pub fn id(&self) -> &NodeId {
		match self {
			NodeChange::Position { id, .. }
			| NodeChange::Select { id, .. }
			| NodeChange::Remove { id } => id,
			NodeChange::Add(node) => &node.id,
		}
	}
}

/// A change to one edge.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	/// The edge was removed.
	Remove {
		/// Edge to remove.
		id: EdgeId,
	},
	/// An edge was inserted. Ignored unless both endpoints exist and the id is free.
	Add(Edge),
}
