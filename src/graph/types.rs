//! Graph data structures shared by the session store and persistence.
//!
//! Nodes and edges are fixed records. Their wire form matches what the
//! hosted `graphs` table stores, and every record is checked on the way in.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Identifier of a node, unique within one graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	/// Wrap a raw id.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The raw id.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The id as a counter value, if it is one.
	pub fn numeric(&self) -> Option<u64> {
		self.0.parse().ok()
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<u64> for NodeId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Identifier of an edge, unique within one graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
	/// Wrap a raw id.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Id for the edge joining `source` to `target`.
	pub fn between(source: &NodeId, target: &NodeId) -> Self {
		Self(format!("edge-{source}-{target}"))
	}

	/// The raw id.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for EdgeId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Persistence identifier of a saved graph.
///
/// The hosted table may hand out integer or uuid keys, so both JSON numbers
/// and strings are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawGraphId", into = "String")]
pub struct GraphId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGraphId {
	Number(i64),
	Text(String),
}

impl From<RawGraphId> for GraphId {
	fn from(raw: RawGraphId) -> Self {
		match raw {
			RawGraphId::Number(n) => Self(n.to_string()),
			RawGraphId::Text(s) => Self(s),
		}
	}
}

impl From<GraphId> for String {
	fn from(id: GraphId) -> Self {
		id.0
	}
}

impl GraphId {
	/// Wrap a raw id.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The raw id.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for GraphId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Identifier of the account owning a graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
	/// Wrap a raw id.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The raw id.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Top-left corner of a node in canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Position {
	/// Where the seed node sits.
	pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Visual kind of a node. Only the labeled box exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
	/// Box with a text label.
	#[default]
	#[serde(rename = "custom")]
	Labeled,
}

/// Visual kind of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
	/// Plain edge, as written by clients that predate delete affordances.
	#[serde(rename = "default")]
	Plain,
	/// Edge that shows a delete glyph while hovered.
	#[default]
	#[serde(rename = "custom_edge")]
	Deletable,
}

/// A labeled, positioned vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireNode", into = "WireNode")]
pub struct Node {
	/// Unique within the graph.
	pub id: NodeId,
	/// Top-left corner in world units.
	pub position: Position,
	/// Text shown in the box.
	pub label: String,
	/// Visual kind.
	pub kind: NodeKind,
}

impl Node {
	/// A labeled node at `position`.
	pub fn new(id: impl Into<NodeId>, position: Position, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			position,
			label: label.into(),
			kind: NodeKind::Labeled,
		}
	}

	/// The node every empty graph starts from.
	pub fn seed() -> Self {
		let id = NodeId::from(1_u64);
		let label = default_label(&id);
		Self::new(id, Position::ORIGIN, label)
	}
}

/// Label given to freshly created nodes.
pub fn default_label(id: &NodeId) -> String {
	format!("Node {id}")
}

#[derive(Serialize, Deserialize)]
struct WireNodeData {
	#[serde(default)]
	label: String,
}

#[derive(Serialize, Deserialize)]
struct WireNode {
	id: NodeId,
	position: Position,
	data: WireNodeData,
	#[serde(rename = "type", default)]
	kind: NodeKind,
}

impl TryFrom<WireNode> for Node {
	type Error = SchemaError;

	fn try_from(wire: WireNode) -> Result<Self, Self::Error> {
		if wire.id.as_str().is_empty() {
			return Err(SchemaError::EmptyNodeId);
		}
		if !wire.position.x.is_finite() || !wire.position.y.is_finite() {
			return Err(SchemaError::NonFinitePosition(wire.id));
		}
		Ok(Self {
			id: wire.id,
			position: wire.position,
			label: wire.data.label,
			kind: wire.kind,
		})
	}
}

impl From<Node> for WireNode {
	fn from(node: Node) -> Self {
		Self {
			id: node.id,
			position: node.position,
			data: WireNodeData { label: node.label },
			kind: node.kind,
		}
	}
}

/// A directed connection between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	/// Unique within the graph.
	pub id: EdgeId,
	/// Node the edge starts from.
	pub source: NodeId,
	/// Node the edge points to.
	pub target: NodeId,
	/// Visual kind.
	#[serde(rename = "type", default)]
	pub kind: EdgeKind,
}

impl Edge {
	/// A deletable edge with the id derived from its endpoints.
	pub fn between(source: NodeId, target: NodeId) -> Self {
		Self {
			id: EdgeId::between(&source, &target),
			source,
			target,
			kind: EdgeKind::Deletable,
		}
	}

	/// True if `node` is either endpoint.
	pub fn touches(&self, node: &NodeId) -> bool {
		&self.source == node || &self.target == node
	}
}

/// The persisted unit: one complete graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	/// Persistence id, absent until first saved.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<GraphId>,
	/// Display name.
	#[serde(default, deserialize_with = "null_as_default")]
	pub title: String,
	/// All nodes.
	#[serde(default, deserialize_with = "null_as_default")]
	pub nodes: Vec<Node>,
	/// All edges. Both endpoints of each are in `nodes`.
	#[serde(default, deserialize_with = "null_as_default")]
	pub edges: Vec<Edge>,
	/// Owning account.
	#[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
	pub owner: Option<UserId>,
}

/// Rows written by older clients may hold `null` columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: serde::Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphSnapshot {
	/// An unsaved graph with nothing in it.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Check the collection invariants: unique ids and no dangling edges.
	pub fn validate(&self) -> Result<(), SchemaError> {
		let mut node_ids = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !node_ids.insert(&node.id) {
				return Err(SchemaError::DuplicateNodeId(node.id.clone()));
			}
		}

		let mut edge_ids = HashSet::with_capacity(self.edges.len());
		for edge in &self.edges {
			if edge.id.as_str().is_empty() {
				return Err(SchemaError::EmptyEdgeId);
			}
			if !edge_ids.insert(&edge.id) {
				return Err(SchemaError::DuplicateEdgeId(edge.id.clone()));
			}
			for endpoint in [&edge.source, &edge.target] {
				if !node_ids.contains(endpoint) {
					return Err(SchemaError::DanglingEdge {
						edge: edge.id.clone(),
						node: endpoint.clone(),
					});
				}
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_reads_stored_wire_shape() {
		let json = r#"{
			"id": "3",
			"position": { "x": 0, "y": 200 },
			"data": { "label": "Third" },
			"type": "custom",
			"width": 150,
			"selected": false
		}"#;
		let node: Node = serde_json::from_str(json).unwrap();
		assert_eq!(node.id, NodeId::from("3"));
		assert_eq!(node.position, Position::new(0.0, 200.0));
		assert_eq!(node.label, "Third");
		assert_eq!(node.kind, NodeKind::Labeled);
	}

	#[test]
	fn node_writes_label_under_data() {
		let value = serde_json::to_value(Node::seed()).unwrap();
		assert_eq!(value["id"], "1");
		assert_eq!(value["data"]["label"], "Node 1");
		assert_eq!(value["type"], "custom");
	}

	#[test]
	fn node_with_empty_id_is_rejected() {
		let json = r#"{"id":"","position":{"x":0,"y":0},"data":{"label":"x"}}"#;
		assert!(serde_json::from_str::<Node>(json).is_err());
	}

	#[test]
	fn edge_kind_defaults_to_deletable() {
		let edge: Edge = serde_json::from_str(r#"{"id":"e","source":"1","target":"2"}"#).unwrap();
		assert_eq!(edge.kind, EdgeKind::Deletable);
		let plain: Edge =
			serde_json::from_str(r#"{"id":"e","source":"1","target":"2","type":"default"}"#)
				.unwrap();
		assert_eq!(plain.kind, EdgeKind::Plain);
	}

	#[test]
	fn graph_id_accepts_numbers_and_strings() {
		let numeric: GraphSnapshot = serde_json::from_str(r#"{"id": 42, "title": "a"}"#).unwrap();
		assert_eq!(numeric.id, Some(GraphId::new("42")));
		let text: GraphSnapshot =
			serde_json::from_str(r#"{"id": "9b1d", "title": "b"}"#).unwrap();
		assert_eq!(text.id, Some(GraphId::new("9b1d")));
	}

	#[test]
	fn null_columns_read_as_empty() {
		let snapshot: GraphSnapshot =
			serde_json::from_str(r#"{"id": 1, "title": null, "nodes": null, "edges": null}"#)
				.unwrap();
		assert!(snapshot.nodes.is_empty());
		assert!(snapshot.edges.is_empty());
		assert_eq!(snapshot.title, "");
	}

	#[test]
	fn unsaved_snapshot_omits_id() {
		let value = serde_json::to_value(GraphSnapshot::empty()).unwrap();
		assert!(value.get("id").is_none());
		assert!(value.get("user_id").is_none());
	}

	#[test]
	fn validate_flags_dangling_edges() {
		let snapshot = GraphSnapshot {
			nodes: vec![Node::seed()],
			edges: vec![Edge::between(NodeId::from(1_u64), NodeId::from("7"))],
			..GraphSnapshot::empty()
		};
		assert_eq!(
			snapshot.validate(),
			Err(SchemaError::DanglingEdge {
				edge: EdgeId::new("edge-1-7"),
				node: NodeId::from("7"),
			})
		);
	}

	#[test]
	fn validate_flags_duplicate_nodes() {
		let snapshot = GraphSnapshot {
			nodes: vec![Node::seed(), Node::seed()],
			..GraphSnapshot::empty()
		};
		assert_eq!(
			snapshot.validate(),
			Err(SchemaError::DuplicateNodeId(NodeId::from(1_u64)))
		);
	}
}
