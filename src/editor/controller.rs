//! Gesture handling on top of the graph session.
//!
//! The canvas and panels never touch [`GraphSession`] directly: they feed
//! [`Gesture`]s to an [`InteractionController`], which turns each one into
//! at most one session operation and keeps the label editor and hover state
//! consistent with what the session now holds.

use log::debug;

use crate::graph::{
	EdgeChange, EdgeId, GraphSession, GraphSnapshot, NodeChange, NodeId, Position,
};

/// A discrete user input on the editing surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
	/// "Create node" button.
	CreateNode,
	/// Pointer entered or left a node.
	HoverNode {
		/// Node under the pointer.
		id: NodeId,
		/// True on enter, false on leave.
		hovered: bool,
	},
	/// Pointer entered or left an edge.
	HoverEdge {
		/// Edge under the pointer.
		id: EdgeId,
		/// True on enter, false on leave.
		hovered: bool,
	},
	/// Click on a node body.
	SelectNode(NodeId),
	/// Node dragged to a new position.
	DragNode {
		/// Node being dragged.
		id: NodeId,
		/// New top-left corner in world units.
		position: Position,
		/// False on release.
		dragging: bool,
	},
	/// Drag released from `source`'s handle over `target`.
	Connect {
		/// Node the drag started from.
		source: NodeId,
		/// Node the drag ended on.
		target: NodeId,
	},
	/// Text typed into the label field.
	EditLabel(String),
	/// Label editor "save".
	SaveLabel,
	/// Label editor "cancel".
	CancelLabel,
	/// Delete glyph on a node.
	DeleteNode(NodeId),
	/// Delete glyph on an edge.
	DeleteEdge(EdgeId),
}

/// State of the inline label editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LabelEditor {
	/// No label is being edited.
	#[default]
	Idle,
	/// `node` is being renamed; `draft` holds the text typed so far.
	Editing {
		/// Node being renamed.
		node: NodeId,
		/// Text typed so far.
		draft: String,
	},
}

impl LabelEditor {
	/// Node being edited, if any.
	pub fn node(&self) -> Option<&NodeId> {
		match self {
			LabelEditor::Idle => None,
			LabelEditor::Editing { node, .. } => Some(node),
		}
	}

	/// Text typed so far, if editing.
	pub fn draft(&self) -> Option<&str> {
		match self {
			LabelEditor::Idle => None,
			LabelEditor::Editing { draft, .. } => Some(draft),
		}
	}
}

/// Which element the pointer is over. Only drives delete glyph visibility.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
	/// Hovered node.
	pub node: Option<NodeId>,
	/// Hovered edge.
	pub edge: Option<EdgeId>,
}

/// Binds gestures to session mutations and owns the label editor.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	session: GraphSession,
	editor: LabelEditor,
	hover: HoverState,
}

impl InteractionController {
	/// Controller driving `session`.
	pub fn new(session: GraphSession) -> Self {
		Self {
			session,
			editor: LabelEditor::Idle,
			hover: HoverState::default(),
		}
	}

	/// The graph being edited.
	pub fn session(&self) -> &GraphSession {
		&self.session
	}

	/// Direct access for finishing a save; gestures go through [`Self::handle`].
	pub fn session_mut(&mut self) -> &mut GraphSession {
		&mut self.session
	}

	/// Label editor state.
	pub fn editor(&self) -> &LabelEditor {
		&self.editor
	}

	/// What the pointer is over.
	pub fn hover(&self) -> &HoverState {
		&self.hover
	}

	/// Open `snapshot` for editing, dropping any in-progress edit or hover.
	pub fn load(&mut self, snapshot: GraphSnapshot) {
		self.session.load_snapshot(snapshot);
		self.hover = HoverState::default();
		self.sync_editor();
	}

	/// Apply one gesture. Returns true if the graph itself changed.
	pub fn handle(&mut self, gesture: Gesture) -> bool {
		let revision_before = self.session.save_mark();
		match gesture {
			Gesture::CreateNode => {
				if let Err(err) = self.session.create_node() {
					debug!("nodeboard: create node refused: {err}");
				}
			}
			Gesture::HoverNode { id, hovered } => {
				set_hover(&mut self.hover.node, id, hovered);
			}
			Gesture::HoverEdge { id, hovered } => {
				set_hover(&mut self.hover.edge, id, hovered);
			}
			Gesture::SelectNode(id) => {
				self.session
					.apply_node_change(NodeChange::Select { id, selected: true });
			}
			Gesture::DragNode {
				id,
				position,
				dragging,
			} => {
				self.session.apply_node_change(NodeChange::Position {
					id,
					position,
					dragging,
				});
			}
			Gesture::Connect { source, target } => {
				if let Err(err) = self.session.connect(&source, &target) {
					debug!("nodeboard: connect refused: {err}");
				}
			}
			Gesture::EditLabel(text) => {
				if let LabelEditor::Editing { draft, .. } = &mut self.editor {
					*draft = text;
				}
			}
			Gesture::SaveLabel => {
				if let LabelEditor::Editing { draft, .. } = &self.editor {
					let draft = draft.clone();
					self.session.rename_selected_node(&draft);
				}
			}
			Gesture::CancelLabel => {
				self.session.clear_selection();
			}
			Gesture::DeleteNode(id) => {
				self.session.apply_node_change(NodeChange::Remove { id });
			}
			Gesture::DeleteEdge(id) => {
				self.session.apply_edge_change(EdgeChange::Remove { id });
			}
		}
		self.prune_hover();
		self.sync_editor();
		self.session.save_mark() != revision_before
	}

	/// Bring the label editor in line with the session's selection.
	fn sync_editor(&mut self) {
		match self.session.selected_node() {
			None => self.editor = LabelEditor::Idle,
			Some(node) => {
				if self.editor.node() != Some(&node.id) {
					self.editor = LabelEditor::Editing {
						node: node.id.clone(),
						draft: node.label.clone(),
					};
				}
			}
		}
	}

	fn prune_hover(&mut self) {
		if let Some(id) = &self.hover.node {
			if self.session.node(id).is_none() {
				self.hover.node = None;
			}
		}
		if let Some(id) = &self.hover.edge {
			if self.session.edge(id).is_none() {
				self.hover.edge = None;
			}
		}
	}
}

fn set_hover<T: PartialEq>(slot: &mut Option<T>, id: T, hovered: bool) {
	if hovered {
		*slot = Some(id);
	} else if slot.as_ref() == Some(&id) {
		*slot = None;
	}
}
