//! Error types for every layer of the editor.
//!
//! Graph operations and boundary validation fail with small, comparable
//! enums. Anything that crosses the network carries a [`BackendError`].

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// A graph mutation that was refused. The session is left untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	/// An existing node id is not a number.
	#[error("cannot allocate a numeric id: node {0} has a non-numeric id")]
	NonNumericId(NodeId),
	/// The highest node id has no successor.
	#[error("cannot allocate a numeric id: the largest id is already taken")]
	IdsExhausted,
	/// Source and target are the same node.
	#[error("node {0} cannot be connected to itself")]
	SelfLoop(NodeId),
	/// An endpoint is not in the graph.
	#[error("node {0} does not exist")]
	UnknownNode(NodeId),
	/// The pair is already connected. Carries the existing edge id.
	#[error("edge {0} already exists")]
	DuplicateEdge(EdgeId),
}

/// A snapshot that does not describe a well-formed graph.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
	/// A node has an empty id.
	#[error("node id must not be empty")]
	EmptyNodeId,
	/// An edge has an empty id.
	#[error("edge id must not be empty")]
	EmptyEdgeId,
	/// A coordinate is NaN or infinite.
	#[error("node {0} has a non-finite position")]
	NonFinitePosition(NodeId),
	/// Two nodes share an id.
	#[error("node id {0} appears more than once")]
	DuplicateNodeId(NodeId),
	/// Two edges share an id.
	#[error("edge id {0} appears more than once")]
	DuplicateEdgeId(EdgeId),
	/// An edge points at a node that is not in the snapshot.
	#[error("edge {edge} references missing node {node}")]
	DanglingEdge {
		/// The offending edge.
		edge: EdgeId,
		/// The endpoint that is missing.
		node: NodeId,
	},
}

/// Failure talking to the hosted service (or its in-process stand-in).
#[derive(Debug, Error)]
pub enum BackendError {
	/// The request never got a response.
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	/// The service answered with an error status.
	#[error("service replied {status}: {message}")]
	Remote {
		/// HTTP status code.
		status: u16,
		/// Service-specific error code, e.g. `PGRST116`.
		code: Option<String>,
		/// Human-readable reason.
		message: String,
	},
	/// The response body had an unexpected shape.
	#[error("unexpected response body: {0}")]
	Decode(String),
	/// A row decoded but is not a valid graph.
	#[error("malformed graph record: {0}")]
	Schema(#[from] SchemaError),
	/// The call needs a signed-in account.
	#[error("not signed in")]
	Unauthenticated,
}

impl BackendError {
	/// Service-specific error code, when the remote side supplied one.
	pub fn code(&self) -> Option<&str> {
		match self {
			BackendError::Remote { code, .. } => code.as_deref(),
			_ => None,
		}
	}
}

/// Why a save did not reach the remote store.
#[derive(Debug, Error)]
pub enum SaveError {
	/// Another save has not finished yet.
	#[error("a save is already in progress")]
	InProgress,
	/// Nobody is signed in.
	#[error("sign in before saving")]
	Unauthenticated,
	/// Asking who is signed in failed.
	#[error("could not resolve the signed-in account: {0}")]
	Identity(#[source] BackendError),
	/// Looking up the existing row failed.
	#[error("could not look up the saved graph: {0}")]
	Lookup(#[source] BackendError),
	/// Writing the row failed.
	#[error("could not write the graph: {0}")]
	Write(#[source] BackendError),
	/// The graph is malformed.
	#[error("graph is not in a savable state: {0}")]
	Invalid(#[from] SchemaError),
}

/// Sign-in, sign-up, recovery and sign-out failures.
#[derive(Debug, Error)]
pub enum AuthError {
	/// The form input was refused before sending.
	#[error("{0}")]
	Invalid(String),
	/// The service refused the credentials or request.
	#[error("{0}")]
	Rejected(String),
	/// Transport or decoding failure.
	#[error(transparent)]
	Backend(#[from] BackendError),
}
