//! The graph currently open in the editor.
//!
//! [`GraphSession`] owns the node and edge collections and is the only
//! place they are mutated. Every mutation keeps the collection invariants:
//! node ids are unique, and no edge outlives either of its endpoints.
//!
//! The session also tracks a mutation revision so the UI can tell whether
//! the graph has unsaved edits, and a load epoch so a save that finishes
//! after another graph was opened does not mark the wrong graph as saved.

use log::debug;

use super::changes::{EdgeChange, NodeChange};
use super::types::{Edge, EdgeId, GraphId, GraphSnapshot, Node, NodeId, Position, default_label};
use crate::error::GraphError;

/// Vertical gap between a new node and the lowest existing one.
pub const NODE_SPACING: f64 = 100.0;

/// Captures which graph, at which revision, a save started from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveMark {
	epoch: u64,
	revision: u64,
}

/// Authoritative in-memory state of the graph being edited.
#[derive(Clone, Debug)]
pub struct GraphSession {
	graph_id: Option<GraphId>,
	title: String,
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	selected: Option<NodeId>,
	epoch: u64,
	revision: u64,
	saved_revision: u64,
}

impl Default for GraphSession {
	fn default() -> Self {
		Self::new()
	}
}

impl GraphSession {
	/// A fresh, unsaved graph holding only the seed node.
	pub fn new() -> Self {
		let mut session = Self {
			graph_id: None,
			title: String::new(),
			nodes: Vec::new(),
			edges: Vec::new(),
			selected: None,
			epoch: 0,
			revision: 0,
			saved_revision: 0,
		};
		session.load_snapshot(GraphSnapshot::empty());
		session
	}

	/// Persistence id, once the graph has been saved or was loaded from storage.
	pub fn graph_id(&self) -> Option<&GraphId> {
		self.graph_id.as_ref()
	}

	/// Title of the open graph. Empty for a graph that was never saved.
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Look up a node by id.
	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.nodes.iter().find(|node| &node.id == id)
	}

	/// Look up an edge by id.
	pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
		self.edges.iter().find(|edge| &edge.id == id)
	}

	/// The node currently targeted for label editing.
	pub fn selected_node(&self) -> Option<&Node> {
		self.selected.as_ref().and_then(|id| self.node(id))
	}

	/// Bumped on every load. Views use it to notice a different graph.
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// True when the graph has edits no save has captured yet.
	pub fn is_dirty(&self) -> bool {
		self.revision != self.saved_revision
	}

	/// Replace everything with `snapshot`.
	///
	/// A snapshot without nodes resets to the seed node, no edges, and no
	/// persistence id. Selection is always cleared.
	pub fn load_snapshot(&mut self, snapshot: GraphSnapshot) {
		if snapshot.nodes.is_empty() {
			self.graph_id = None;
			self.nodes = vec![Node::seed()];
			self.edges = Vec::new();
		} else {
			self.graph_id = snapshot.id;
			self.nodes = snapshot.nodes;
			self.edges = snapshot.edges;
		}
		self.title = snapshot.title;
		self.selected = None;
		self.epoch += 1;
		self.revision += 1;
		self.saved_revision = self.revision;
	}

	/// The complete current graph, ready to persist.
	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			id: self.graph_id.clone(),
			title: self.title.clone(),
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
			owner: None,
		}
	}

	/// Remember where a save is starting from.
	pub fn save_mark(&self) -> SaveMark {
		SaveMark {
			epoch: self.epoch,
			revision: self.revision,
		}
	}

	/// Apply the result of a finished save.
	///
	/// Adopts the persisted id and title. Returns false (and changes
	/// nothing) when a different graph has been loaded since the save
	/// started. Edits made during the save keep the session dirty.
	pub fn record_save(&mut self, mark: SaveMark, id: GraphId, title: impl Into<String>) -> bool {
		if mark.epoch != self.epoch {
			return false;
		}
		self.graph_id = Some(id);
		self.title = title.into();
		self.saved_revision = mark.revision;
		true
	}

	/// Id the next created node will get: highest numeric id plus one.
	pub fn next_node_id(&self) -> Result<NodeId, GraphError> {
		let mut highest: u64 = 0;
		for node in &self.nodes {
			let n = node
				.id
				.numeric()
				.ok_or_else(|| GraphError::NonNumericId(node.id.clone()))?;
			highest = highest.max(n);
		}
		highest
			.checked_add(1)
			.map(NodeId::from)
			.ok_or(GraphError::IdsExhausted)
	}

	/// Add a node below the lowest existing one.
	///
	/// On an empty graph this inserts the seed node. Fails without mutating
	/// when an existing id is not numeric or no larger id is left.
	pub fn create_node(&mut self) -> Result<NodeId, GraphError> {
		if self.nodes.is_empty() {
			let seed = Node::seed();
			let id = seed.id.clone();
			self.nodes.push(seed);
			self.touch();
			return Ok(id);
		}

		let id = self.next_node_id()?;
		let lowest = self
			.nodes
			.iter()
			.map(|node| node.position.y)
			.fold(f64::NEG_INFINITY, f64::max);
		let label = default_label(&id);
		self.nodes
			.push(Node::new(id.clone(), Position::new(0.0, lowest + NODE_SPACING), label));
		self.touch();
		Ok(id)
	}

	/// Apply each change in order.
	pub fn apply_node_changes(&mut self, changes: impl IntoIterator<Item = NodeChange>) {
		for change in changes {
			self.apply_node_change(change);
		}
	}

	/// Apply one node change. Changes naming unknown nodes are ignored.
	pub fn apply_node_change(&mut self, change: NodeChange) {
		match change {
			NodeChange::Position { id, position, .. } => {
				if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
					node.position = position;
					self.touch();
				}
			}
			NodeChange::Select { id, selected } => {
				if selected {
					self.selected = self.node(&id).map(|node| node.id.clone());
				}
			}
			NodeChange::Remove { id } => {
				self.delete_node(&id);
			}
			NodeChange::Add(node) => {
				if self.node(&node.id).is_none() {
					self.nodes.push(node);
					self.touch();
				} else {
					debug!("nodeboard: ignoring add of existing node {}", node.id);
				}
			}
		}
	}

	/// Apply each change in order.
	pub fn apply_edge_changes(&mut self, changes: impl IntoIterator<Item = EdgeChange>) {
		for change in changes {
			self.apply_edge_change(change);
		}
	}

	/// Apply one edge change. Adds that would break an invariant are dropped.
	pub fn apply_edge_change(&mut self, change: EdgeChange) {
		match change {
			EdgeChange::Remove { id } => {
				self.delete_edge(&id);
			}
			EdgeChange::Add(edge) => {
				if let Err(err) = self.insert_edge(edge) {
					debug!("nodeboard: ignoring edge add: {err}");
				}
			}
		}
	}

	/// Join `source` to `target` with a deletable edge.
	pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId, GraphError> {
		self.insert_edge(Edge::between(source.clone(), target.clone()))
	}

	fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
		if edge.source == edge.target {
			return Err(GraphError::SelfLoop(edge.source));
		}
		for endpoint in [&edge.source, &edge.target] {
			if self.node(endpoint).is_none() {
				return Err(GraphError::UnknownNode(endpoint.clone()));
			}
		}
		let existing = self
			.edges
			.iter()
			.find(|e| e.id == edge.id || (e.source == edge.source && e.target == edge.target));
		if let Some(existing) = existing {
			return Err(GraphError::DuplicateEdge(existing.id.clone()));
		}
		let id = edge.id.clone();
		self.edges.push(edge);
		self.touch();
		Ok(id)
	}

	/// Mark `id` as the node being edited, or clear selection if it is absent.
	pub fn select_node(&mut self, id: &NodeId) {
		self.apply_node_change(NodeChange::Select {
			id: id.clone(),
			selected: true,
		});
	}

	/// Forget the selected node.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// Rewrite the selected node's label and clear selection.
	///
	/// Does nothing when `label` is empty or nothing is selected.
	pub fn rename_selected_node(&mut self, label: &str) -> bool {
		if label.is_empty() {
			return false;
		}
		let Some(selected) = self.selected.take() else {
			return false;
		};
		let Some(node) = self.nodes.iter_mut().find(|node| node.id == selected) else {
			return false;
		};
		node.label = label.to_string();
		self.touch();
		true
	}

	/// Remove a node and every edge that touches it.
	pub fn delete_node(&mut self, id: &NodeId) -> bool {
		let before = self.nodes.len();
		self.nodes.retain(|node| &node.id != id);
		if self.nodes.len() == before {
			return false;
		}
		self.edges.retain(|edge| !edge.touches(id));
		if self.selected.as_ref() == Some(id) {
			self.selected = None;
		}
		self.touch();
		true
	}

	/// Remove one edge. Returns false if it was not there.
	pub fn delete_edge(&mut self, id: &EdgeId) -> bool {
		let before = self.edges.len();
		self.edges.retain(|edge| &edge.id != id);
		if self.edges.len() == before {
			return false;
		}
		self.touch();
		true
	}

	fn touch(&mut self) {
		self.revision += 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(session: &GraphSession) -> Vec<&str> {
		session.nodes().iter().map(|n| n.id.as_str()).collect()
	}

	fn empty_session() -> GraphSession {
		let mut session = GraphSession::new();
		session.delete_node(&NodeId::from("1"));
		assert!(session.nodes().is_empty());
		session
	}

	fn snapshot_of(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphSnapshot {
		GraphSnapshot {
			id: Some(GraphId::new("42")),
			title: "Saved".into(),
			nodes,
			edges,
			owner: None,
		}
	}

	#[test]
	fn create_on_empty_yields_seed() {
		let mut session = empty_session();
		let id = session.create_node().unwrap();
		assert_eq!(id, NodeId::from("1"));
		assert_eq!(session.nodes(), &[Node::seed()]);
		assert_eq!(session.nodes()[0].label, "Node 1");
		assert_eq!(session.nodes()[0].position, Position::ORIGIN);
	}

	#[test]
	fn create_uses_highest_id_and_lowest_position() {
		let mut session = GraphSession::new();
		session.load_snapshot(snapshot_of(
			vec![
				Node::new("7", Position::new(30.0, 250.0), "a"),
				Node::new("3", Position::new(0.0, 400.0), "b"),
			],
			vec![],
		));
		let id = session.create_node().unwrap();
		assert_eq!(id, NodeId::from("8"));
		let node = session.node(&id).unwrap();
		assert_eq!(node.position, Position::new(0.0, 500.0));
		assert_eq!(node.label, "Node 8");
	}

	#[test]
	fn create_refuses_non_numeric_ids() {
		let mut session = GraphSession::new();
		session.load_snapshot(snapshot_of(
			vec![
				Node::new("1", Position::ORIGIN, "a"),
				Node::new("alpha", Position::ORIGIN, "b"),
			],
			vec![],
		));
		let before = session.nodes().to_vec();
		assert_eq!(
			session.create_node(),
			Err(GraphError::NonNumericId(NodeId::from("alpha")))
		);
		assert_eq!(session.nodes(), before.as_slice());
		assert!(!session.is_dirty());
	}

	#[test]
	fn create_refuses_when_ids_run_out() {
		let mut session = GraphSession::new();
		session.load_snapshot(snapshot_of(
			vec![
				Node::new("0", Position::ORIGIN, "a"),
				Node::new(NodeId::from(u64::MAX), Position::ORIGIN, "b"),
			],
			vec![],
		));
		let before = session.nodes().to_vec();
		assert_eq!(session.next_node_id(), Err(GraphError::IdsExhausted));
		assert_eq!(session.create_node(), Err(GraphError::IdsExhausted));
		assert_eq!(session.nodes(), before.as_slice());
		assert!(!session.is_dirty());
	}

	#[test]
	fn basic_editing_scenario() {
		let mut session = empty_session();
		session.create_node().unwrap();
		session.create_node().unwrap();
		assert_eq!(ids(&session), ["1", "2"]);
		assert_eq!(session.node(&NodeId::from("2")).unwrap().position.y, 100.0);

		session
			.connect(&NodeId::from("1"), &NodeId::from("2"))
			.unwrap();
		assert_eq!(session.edges().len(), 1);
		assert_eq!(session.edges()[0].source, NodeId::from("1"));
		assert_eq!(session.edges()[0].target, NodeId::from("2"));

		assert!(session.delete_node(&NodeId::from("1")));
		assert_eq!(ids(&session), ["2"]);
		assert!(session.edges().is_empty());
	}

	#[test]
	fn delete_node_leaves_no_dangling_edges() {
		let mut session = GraphSession::new();
		for _ in 0..3 {
			session.create_node().unwrap();
		}
		let hub = NodeId::from("2");
		for other in ["1", "3", "4"] {
			session.connect(&hub, &NodeId::from(other)).unwrap();
		}
		session.connect(&NodeId::from("1"), &hub).unwrap();
		session.connect(&NodeId::from("3"), &NodeId::from("4")).unwrap();

		session.delete_node(&hub);
		assert!(session.node(&hub).is_none());
		assert!(session.edges().iter().all(|edge| !edge.touches(&hub)));
		assert_eq!(session.edges().len(), 1);
	}

	#[test]
	fn deleting_absent_ids_is_a_no_op() {
		let mut session = GraphSession::new();
		let before = session.snapshot();
		assert!(!session.delete_node(&NodeId::from("99")));
		assert!(!session.delete_edge(&EdgeId::from("edge-1-99")));
		assert_eq!(session.snapshot(), before);
		assert!(!session.is_dirty());
	}

	#[test]
	fn connect_rejects_self_loops_unknown_nodes_and_duplicates() {
		let mut session = GraphSession::new();
		session.create_node().unwrap();
		let (one, two) = (NodeId::from("1"), NodeId::from("2"));

		assert_eq!(session.connect(&one, &one), Err(GraphError::SelfLoop(one.clone())));
		assert_eq!(
			session.connect(&one, &NodeId::from("9")),
			Err(GraphError::UnknownNode(NodeId::from("9")))
		);
		let id = session.connect(&one, &two).unwrap();
		assert_eq!(session.connect(&one, &two), Err(GraphError::DuplicateEdge(id)));
		assert_eq!(session.edges().len(), 1);

		// The reverse direction is a different edge.
		assert!(session.connect(&two, &one).is_ok());
	}

	#[test]
	fn duplicates_are_found_by_endpoints_not_id() {
		let (one, two) = (NodeId::from("1"), NodeId::from("2"));
		let legacy = Edge {
			id: EdgeId::from("reactflow__edge-1-2"),
			..Edge::between(one.clone(), two.clone())
		};
		let mut session = GraphSession::new();
		session.load_snapshot(snapshot_of(
			vec![
				Node::new("1", Position::ORIGIN, "a"),
				Node::new("2", Position::new(0.0, 100.0), "b"),
			],
			vec![legacy.clone()],
		));

		assert_eq!(
			session.connect(&one, &two),
			Err(GraphError::DuplicateEdge(legacy.id.clone()))
		);
		session.apply_edge_change(EdgeChange::Add(Edge {
			id: EdgeId::from("another-1-2"),
			..Edge::between(one, two)
		}));
		assert_eq!(session.edges(), &[legacy]);
		assert!(!session.is_dirty());
	}

	#[test]
	fn rename_requires_selection_and_text() {
		let mut session = GraphSession::new();
		let before = session.snapshot();
		assert!(!session.rename_selected_node("Renamed"));
		assert_eq!(session.snapshot(), before);

		session.select_node(&NodeId::from("1"));
		assert!(!session.rename_selected_node(""));
		assert_eq!(session.snapshot(), before);
		assert!(session.selected_node().is_some());

		assert!(session.rename_selected_node("Renamed"));
		let node = session.node(&NodeId::from("1")).unwrap();
		assert_eq!(node.label, "Renamed");
		assert_eq!(node.position, Position::ORIGIN);
		assert!(session.selected_node().is_none());
	}

	#[test]
	fn selecting_unknown_node_clears_selection() {
		let mut session = GraphSession::new();
		session.select_node(&NodeId::from("1"));
		session.select_node(&NodeId::from("5"));
		assert!(session.selected_node().is_none());
	}

	#[test]
	fn deleting_selected_node_clears_selection() {
		let mut session = GraphSession::new();
		session.select_node(&NodeId::from("1"));
		session.delete_node(&NodeId::from("1"));
		assert!(session.selected_node().is_none());
		assert!(!session.rename_selected_node("x"));
	}

	#[test]
	fn empty_snapshot_resets_to_seed() {
		let mut session = GraphSession::new();
		session.create_node().unwrap();
		session.connect(&NodeId::from("1"), &NodeId::from("2")).unwrap();
		session.record_save(session.save_mark(), GraphId::new("5"), "Saved");
		session.select_node(&NodeId::from("2"));

		session.load_snapshot(GraphSnapshot::empty());
		assert_eq!(session.nodes(), &[Node::seed()]);
		assert!(session.edges().is_empty());
		assert!(session.graph_id().is_none());
		assert!(session.selected_node().is_none());
	}

	#[test]
	fn loaded_snapshot_reads_back_verbatim() {
		let nodes = vec![
			Node::new("1", Position::new(5.0, 5.0), "Start"),
			Node::new("2", Position::new(5.0, 105.0), "End"),
		];
		let edges = vec![Edge::between(NodeId::from("1"), NodeId::from("2"))];
		let snapshot = snapshot_of(nodes.clone(), edges.clone());

		let mut session = GraphSession::new();
		session.load_snapshot(snapshot.clone());
		assert_eq!(session.nodes(), nodes.as_slice());
		assert_eq!(session.edges(), edges.as_slice());
		assert_eq!(session.graph_id(), snapshot.id.as_ref());
		assert_eq!(session.snapshot(), snapshot);
		assert!(!session.is_dirty());
	}

	#[test]
	fn node_changes_apply_one_by_one() {
		let mut session = GraphSession::new();
		session.create_node().unwrap();
		session.connect(&NodeId::from("1"), &NodeId::from("2")).unwrap();

		session.apply_node_changes([
			NodeChange::Position {
				id: NodeId::from("2"),
				position: Position::new(40.0, 60.0),
				dragging: false,
			},
			NodeChange::Select {
				id: NodeId::from("2"),
				selected: true,
			},
			NodeChange::Add(Node::new("1", Position::ORIGIN, "duplicate")),
			NodeChange::Remove { id: NodeId::from("1") },
		]);

		assert_eq!(ids(&session), ["2"]);
		assert_eq!(session.nodes()[0].position, Position::new(40.0, 60.0));
		assert_eq!(session.selected_node().map(|n| n.id.as_str()), Some("2"));
		assert!(session.edges().is_empty());
	}

	#[test]
	fn edge_changes_keep_endpoints_valid() {
		let mut session = GraphSession::new();
		session.create_node().unwrap();
		session.apply_edge_changes([
			EdgeChange::Add(Edge::between(NodeId::from("1"), NodeId::from("3"))),
			EdgeChange::Add(Edge::between(NodeId::from("1"), NodeId::from("2"))),
		]);
		assert_eq!(session.edges().len(), 1);

		session.apply_edge_changes([EdgeChange::Remove {
			id: EdgeId::from("edge-1-2"),
		}]);
		assert!(session.edges().is_empty());
	}

	#[test]
	fn edits_during_save_keep_session_dirty() {
		let mut session = GraphSession::new();
		session.create_node().unwrap();
		let mark = session.save_mark();
		session.create_node().unwrap();

		assert!(session.record_save(mark, GraphId::new("10"), "New Graph"));
		assert_eq!(session.graph_id(), Some(&GraphId::new("10")));
		assert_eq!(session.title(), "New Graph");
		assert!(session.is_dirty());

		let mark = session.save_mark();
		assert!(session.record_save(mark, GraphId::new("10"), "New Graph"));
		assert!(!session.is_dirty());
	}

	#[test]
	fn save_for_previous_graph_is_discarded() {
		let mut session = GraphSession::new();
		let mark = session.save_mark();
		session.load_snapshot(snapshot_of(vec![Node::seed()], vec![]));
		assert!(!session.record_save(mark, GraphId::new("77"), "Other"));
		assert_eq!(session.title(), "Saved");
		assert_eq!(session.graph_id(), Some(&GraphId::new("42")));
	}
}
