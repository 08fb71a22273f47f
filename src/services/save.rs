//! Insert-or-update save of the open graph.

use log::{info, warn};

use super::{GraphRepository, IdentityProvider};
use crate::error::SaveError;
use crate::graph::{GraphId, GraphSnapshot};

/// Which path a save took.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
	/// A new row was written with this id.
	Inserted(GraphId),
	/// The existing row with this id was overwritten.
	Updated(GraphId),
}

impl SaveOutcome {
	/// Id of the row written.
	pub fn id(&self) -> &GraphId {
		match self {
			SaveOutcome::Inserted(id) | SaveOutcome::Updated(id) => id,
		}
	}
}

/// A finished save: how it went and the row as written.
#[derive(Clone, Debug, PartialEq)]
pub struct SavedGraph {
	/// Which path the save took.
	pub outcome: SaveOutcome,
	/// The row as written, owner and title filled in.
	pub record: GraphSnapshot,
}

/// Persist `snapshot` for the signed-in account.
///
/// The account is resolved first; without one nothing is written. A
/// snapshot carrying an id is looked up and updated in place if the row
/// still exists, otherwise (or without an id) a new row is inserted. Any
/// lookup fault other than "not found" aborts the save.
pub async fn save_graph(
	repository: &dyn GraphRepository,
	identity: &dyn IdentityProvider,
	snapshot: GraphSnapshot,
	default_title: &str,
) -> Result<SavedGraph, SaveError> {
	let user = identity
		.current_user()
		.await
		.map_err(SaveError::Identity)?
		.ok_or(SaveError::Unauthenticated)?;
	snapshot.validate()?;

	let mut record = GraphSnapshot {
		owner: Some(user.id),
		..snapshot
	};
	if record.title.is_empty() {
		record.title = default_title.to_string();
	}

	let existing = match &record.id {
		Some(id) => repository.get_by_id(id).await.map_err(SaveError::Lookup)?,
		None => None,
	};

	let outcome = if existing.is_some() {
		let id = repository.upsert(&record).await.map_err(SaveError::Write)?;
		SaveOutcome::Updated(id)
	} else {
		if let Some(stale) = record.id.take() {
			warn!("nodeboard: graph {stale} no longer exists, saving as a new graph");
		}
		let id = repository.upsert(&record).await.map_err(SaveError::Write)?;
		SaveOutcome::Inserted(id)
	};

	info!(
		"nodeboard: saved graph {} ({} nodes, {} edges)",
		outcome.id(),
		record.nodes.len(),
		record.edges.len()
	);
	record.id = Some(outcome.id().clone());
	Ok(SavedGraph { outcome, record })
}

/// Allows one save in flight at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveGate {
	/// No save running.
	#[default]
	Idle,
	/// A save is running.
	Saving,
}

impl SaveGate {
	/// Start a save, or refuse if one is already running.
	pub fn begin(&mut self) -> Result<(), SaveError> {
		match self {
			SaveGate::Saving => Err(SaveError::InProgress),
			SaveGate::Idle => {
				*self = SaveGate::Saving;
				Ok(())
			}
		}
	}

	/// Mark the running save as done.
	pub fn finish(&mut self) {
		*self = SaveGate::Idle;
	}

	/// True while a save runs.
	pub fn is_saving(&self) -> bool {
		matches!(self, SaveGate::Saving)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;

	use async_trait::async_trait;
	use futures::executor::block_on;

	use super::*;
	use crate::error::BackendError;
	use crate::graph::{Edge, GraphSession, Node, NodeId, Position, UserId};
	use crate::services::UserIdentity;
	use crate::services::memory::{LocalIdentity, MemoryGraphRepository};

	/// Records calls and fails lookups on demand.
	#[derive(Default)]
	struct ScriptedRepository {
		lookup_fault: Option<u16>,
		upserts: Mutex<Vec<GraphSnapshot>>,
	}

	#[async_trait(?Send)]
	impl GraphRepository for ScriptedRepository {
		async fn list_all(&self) -> Result<Vec<GraphSnapshot>, BackendError> {
			Ok(Vec::new())
		}

		async fn get_by_id(&self, _id: &GraphId) -> Result<Option<GraphSnapshot>, BackendError> {
			match self.lookup_fault {
				Some(status) => Err(BackendError::Remote {
					status,
					code: None,
					message: "boom".into(),
				}),
				None => Ok(None),
			}
		}

		async fn upsert(&self, record: &GraphSnapshot) -> Result<GraphId, BackendError> {
			self.upserts.lock().unwrap().push(record.clone());
			Ok(GraphId::new("100"))
		}
	}

	struct BrokenIdentity;

	#[async_trait(?Send)]
	impl IdentityProvider for BrokenIdentity {
		async fn current_user(&self) -> Result<Option<UserIdentity>, BackendError> {
			Err(BackendError::Decode("no user payload".into()))
		}
	}

	fn signed_in() -> LocalIdentity {
		LocalIdentity::signed_in(UserIdentity {
			id: UserId::new("user-1"),
			email: Some("ada@example.com".into()),
		})
	}

	fn two_node_session() -> GraphSession {
		let mut session = GraphSession::new();
		session.create_node().unwrap();
		session.connect(&NodeId::from("1"), &NodeId::from("2")).unwrap();
		session
	}

	#[test]
	fn unsaved_graph_is_inserted_with_default_title() {
		let repository = MemoryGraphRepository::default();
		let session = two_node_session();

		let saved = block_on(save_graph(
			&repository,
			&signed_in(),
			session.snapshot(),
			"New Graph",
		))
		.unwrap();

		assert!(matches!(saved.outcome, SaveOutcome::Inserted(_)));
		assert_eq!(saved.record.title, "New Graph");
		assert_eq!(saved.record.owner, Some(UserId::new("user-1")));

		let rows = block_on(repository.list_all()).unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].nodes, session.nodes());
		assert_eq!(rows[0].edges, session.edges());
		assert_eq!(rows[0].id.as_ref(), Some(saved.outcome.id()));
	}

	#[test]
	fn insert_sends_no_id() {
		let repository = ScriptedRepository::default();
		block_on(save_graph(
			&repository,
			&signed_in(),
			two_node_session().snapshot(),
			"New Graph",
		))
		.unwrap();
		let upserts = repository.upserts.lock().unwrap();
		assert_eq!(upserts.len(), 1);
		assert!(upserts[0].id.is_none());
		assert_eq!(upserts[0].nodes.len(), 2);
	}

	#[test]
	fn returned_id_drives_the_next_save_to_update() {
		let repository = MemoryGraphRepository::default();
		let identity = signed_in();
		let mut session = two_node_session();

		let mark = session.save_mark();
		let first = block_on(save_graph(&repository, &identity, session.snapshot(), "New Graph"))
			.unwrap();
		session.record_save(mark, first.outcome.id().clone(), first.record.title.clone());
		assert_eq!(session.title(), "New Graph");

		session.create_node().unwrap();
		let second = block_on(save_graph(&repository, &identity, session.snapshot(), "New Graph"))
			.unwrap();

		assert_eq!(second.outcome, SaveOutcome::Updated(first.outcome.id().clone()));
		let rows = block_on(repository.list_all()).unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].nodes.len(), 3);
		assert_eq!(rows[0].title, "New Graph");
	}

	#[test]
	fn stale_id_takes_insert_path() {
		let repository = ScriptedRepository::default();
		let snapshot = GraphSnapshot {
			id: Some(GraphId::new("gone")),
			title: "Kept title".into(),
			nodes: vec![Node::seed()],
			..GraphSnapshot::empty()
		};

		let saved =
			block_on(save_graph(&repository, &signed_in(), snapshot, "New Graph")).unwrap();

		assert_eq!(saved.outcome, SaveOutcome::Inserted(GraphId::new("100")));
		let upserts = repository.upserts.lock().unwrap();
		assert!(upserts[0].id.is_none());
		assert_eq!(upserts[0].title, "Kept title");
	}

	#[test]
	fn lookup_fault_aborts_without_writing() {
		let repository = ScriptedRepository {
			lookup_fault: Some(500),
			..Default::default()
		};
		let snapshot = GraphSnapshot {
			id: Some(GraphId::new("7")),
			nodes: vec![Node::seed()],
			..GraphSnapshot::empty()
		};

		let err = block_on(save_graph(&repository, &signed_in(), snapshot, "New Graph"))
			.unwrap_err();
		assert!(matches!(err, SaveError::Lookup(_)));
		assert!(repository.upserts.lock().unwrap().is_empty());
	}

	#[test]
	fn missing_account_writes_nothing() {
		let repository = ScriptedRepository::default();
		let err = block_on(save_graph(
			&repository,
			&LocalIdentity::default(),
			two_node_session().snapshot(),
			"New Graph",
		))
		.unwrap_err();
		assert!(matches!(err, SaveError::Unauthenticated));
		assert!(repository.upserts.lock().unwrap().is_empty());
	}

	#[test]
	fn identity_fault_is_reported() {
		let repository = ScriptedRepository::default();
		let err = block_on(save_graph(
			&repository,
			&BrokenIdentity,
			two_node_session().snapshot(),
			"New Graph",
		))
		.unwrap_err();
		assert!(matches!(err, SaveError::Identity(_)));
	}

	#[test]
	fn malformed_graph_is_refused() {
		let repository = ScriptedRepository::default();
		let snapshot = GraphSnapshot {
			nodes: vec![Node::new("1", Position::ORIGIN, "a")],
			edges: vec![Edge::between(NodeId::from("1"), NodeId::from("2"))],
			..GraphSnapshot::empty()
		};
		let err = block_on(save_graph(&repository, &signed_in(), snapshot, "New Graph"))
			.unwrap_err();
		assert!(matches!(err, SaveError::Invalid(_)));
		assert!(repository.upserts.lock().unwrap().is_empty());
	}

	#[test]
	fn gate_rejects_overlapping_saves() {
		let mut gate = SaveGate::default();
		assert!(gate.begin().is_ok());
		assert!(gate.is_saving());
		assert!(matches!(gate.begin(), Err(SaveError::InProgress)));
		gate.finish();
		assert!(gate.begin().is_ok());
	}
}
