//! The list of saved graphs shown beside the canvas.

use log::{info, warn};

use super::GraphRepository;
use crate::error::BackendError;
use crate::graph::{GraphId, GraphSnapshot};

/// Fetch progress of the graph list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryStatus {
	/// The list request is in flight.
	Loading,
	/// The list arrived.
	Ready,
	/// The list request failed with this message.
	Failed(String),
}

/// Which gallery entry is highlighted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GallerySelection {
	/// The synthetic "create graph" entry.
	#[default]
	NewGraph,
	/// A saved graph.
	Saved(GraphId),
}

/// Saved graphs of the signed-in account plus the current pick.
#[derive(Clone, Debug)]
pub struct Gallery {
	status: GalleryStatus,
	graphs: Vec<GraphSnapshot>,
	selection: GallerySelection,
}

impl Default for Gallery {
	fn default() -> Self {
		Self::new()
	}
}

impl Gallery {
	/// An empty gallery waiting for its first fetch.
	pub fn new() -> Self {
		Self {
			status: GalleryStatus::Loading,
			graphs: Vec::new(),
			selection: GallerySelection::NewGraph,
		}
	}

	/// Fetch progress.
	pub fn status(&self) -> &GalleryStatus {
		&self.status
	}

	/// Saved graphs in list order.
	pub fn graphs(&self) -> &[GraphSnapshot] {
		&self.graphs
	}

	/// The highlighted entry.
	pub fn selection(&self) -> &GallerySelection {
		&self.selection
	}

	/// Store the outcome of [`fetch_gallery`]. A failure leaves the list empty.
	pub fn finish_loading(&mut self, result: Result<Vec<GraphSnapshot>, BackendError>) {
		match result {
			Ok(graphs) => {
				self.graphs = graphs;
				self.status = GalleryStatus::Ready;
			}
			Err(err) => {
				self.graphs.clear();
				self.status = GalleryStatus::Failed(err.to_string());
			}
		}
	}

	/// Pick "create graph". The returned snapshot seeds a fresh session.
	pub fn select_new(&mut self) -> GraphSnapshot {
		self.selection = GallerySelection::NewGraph;
		GraphSnapshot::empty()
	}

	/// Pick a listed graph and return it for loading.
	pub fn select(&mut self, id: &GraphId) -> Option<GraphSnapshot> {
		let graph = self
			.graphs
			.iter()
			.find(|graph| graph.id.as_ref() == Some(id))?
			.clone();
		self.selection = GallerySelection::Saved(id.clone());
		Some(graph)
	}

	/// Reflect a finished save in the list.
	///
	/// The row replaces the entry with the same id, or is appended. With
	/// `focus` the entry also becomes the selection.
	pub fn record_saved(&mut self, record: GraphSnapshot, focus: bool) {
		let Some(id) = record.id.clone() else {
			return;
		};
		match self
			.graphs
			.iter_mut()
			.find(|graph| graph.id.as_ref() == Some(&id))
		{
			Some(entry) => *entry = record,
			None => self.graphs.push(record),
		}
		if focus {
			self.selection = GallerySelection::Saved(id);
		}
	}
}

/// Load every saved graph for the current session.
pub async fn fetch_gallery(
	repository: &dyn GraphRepository,
) -> Result<Vec<GraphSnapshot>, BackendError> {
	match repository.list_all().await {
		Ok(graphs) => {
			info!("nodeboard: fetched {} saved graphs", graphs.len());
			Ok(graphs)
		}
		Err(err) => {
			warn!("nodeboard: failed to fetch saved graphs: {err}");
			Err(err)
		}
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::graph::Node;
	use crate::services::memory::MemoryGraphRepository;

	fn saved(id: &str, title: &str) -> GraphSnapshot {
		GraphSnapshot {
			id: Some(GraphId::new(id)),
			title: title.into(),
			nodes: vec![Node::seed()],
			..GraphSnapshot::empty()
		}
	}

	#[test]
	fn starts_loading_on_new_graph() {
		let gallery = Gallery::new();
		assert_eq!(gallery.status(), &GalleryStatus::Loading);
		assert_eq!(gallery.selection(), &GallerySelection::NewGraph);
	}

	#[test]
	fn failed_fetch_surfaces_error_and_no_entries() {
		let mut gallery = Gallery::new();
		gallery.finish_loading(Err(BackendError::Remote {
			status: 401,
			code: None,
			message: "JWT expired".into(),
		}));
		assert!(matches!(gallery.status(), GalleryStatus::Failed(msg) if msg.contains("JWT expired")));
		assert!(gallery.graphs().is_empty());
	}

	#[test]
	fn selecting_returns_the_stored_snapshot() {
		let mut gallery = Gallery::new();
		gallery.finish_loading(Ok(vec![saved("1", "First"), saved("2", "Second")]));

		let picked = gallery.select(&GraphId::new("2")).unwrap();
		assert_eq!(picked, saved("2", "Second"));
		assert_eq!(gallery.selection(), &GallerySelection::Saved(GraphId::new("2")));

		assert!(gallery.select(&GraphId::new("9")).is_none());
		assert_eq!(gallery.selection(), &GallerySelection::Saved(GraphId::new("2")));

		assert_eq!(gallery.select_new(), GraphSnapshot::empty());
		assert_eq!(gallery.selection(), &GallerySelection::NewGraph);
	}

	#[test]
	fn saved_rows_are_replaced_or_appended() {
		let mut gallery = Gallery::new();
		gallery.finish_loading(Ok(vec![saved("1", "First")]));

		gallery.record_saved(saved("1", "First, edited"), false);
		assert_eq!(gallery.graphs().len(), 1);
		assert_eq!(gallery.graphs()[0].title, "First, edited");
		assert_eq!(gallery.selection(), &GallerySelection::NewGraph);

		gallery.record_saved(saved("5", "New Graph"), true);
		assert_eq!(gallery.graphs().len(), 2);
		assert_eq!(gallery.selection(), &GallerySelection::Saved(GraphId::new("5")));
	}

	#[test]
	fn fetch_reads_the_repository() {
		let repository = MemoryGraphRepository::default();
		block_on(repository.upsert(&saved("ignored", "One"))).unwrap();
		let graphs = block_on(fetch_gallery(&repository)).unwrap();
		assert_eq!(graphs.len(), 1);
		assert_eq!(graphs[0].title, "One");
	}
}
