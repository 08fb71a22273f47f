//! Saved graphs as rows of the hosted REST table.

use async_trait::async_trait;
use log::warn;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::{HostedBackend, check, read_json};
use crate::error::BackendError;
use crate::graph::{Edge, GraphId, GraphSnapshot, Node, UserId};
use crate::services::GraphRepository;

/// Code the REST layer returns when a single-object read matched no rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Columns written on insert and update. The id is never sent.
#[derive(Serialize)]
struct RowBody<'a> {
	title: &'a str,
	nodes: &'a [Node],
	edges: &'a [Edge],
	#[serde(skip_serializing_if = "Option::is_none")]
	user_id: Option<&'a UserId>,
}

impl<'a> From<&'a GraphSnapshot> for RowBody<'a> {
	fn from(record: &'a GraphSnapshot) -> Self {
		Self {
			title: &record.title,
			nodes: &record.nodes,
			edges: &record.edges,
			user_id: record.owner.as_ref(),
		}
	}
}

#[derive(Deserialize)]
struct InsertedRow {
	id: GraphId,
}

/// Decode listed rows, skipping any that are not well-formed graphs.
fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<GraphSnapshot> {
	rows.into_iter()
		.filter_map(|row| {
			let graph = serde_json::from_value::<GraphSnapshot>(row)
				.map_err(|e| e.to_string())
				.and_then(|graph| graph.validate().map(|()| graph).map_err(|e| e.to_string()));
			match graph {
				Ok(graph) => Some(graph),
				Err(e) => {
					warn!("nodeboard: skipping malformed graph row: {}", e);
					None
				}
			}
		})
		.collect()
}

fn id_filter(id: &GraphId) -> [(&'static str, String); 1] {
	[("id", format!("eq.{id}"))]
}

#[async_trait(?Send)]
impl GraphRepository for HostedBackend {
	async fn list_all(&self) -> Result<Vec<GraphSnapshot>, BackendError> {
		let response = self
			.request(Method::GET, &self.rest_url())
			.query(&[("select", "*")])
			.send()
			.await?;
		let rows: Vec<serde_json::Value> = read_json(response).await?;
		Ok(decode_rows(rows))
	}

	async fn get_by_id(&self, id: &GraphId) -> Result<Option<GraphSnapshot>, BackendError> {
		let response = self
			.request(Method::GET, &self.rest_url())
			.query(&id_filter(id))
			.query(&[("select", "*")])
			.header("Accept", SINGLE_OBJECT)
			.send()
			.await?;
		match read_json::<GraphSnapshot>(response).await {
			Ok(graph) => {
				graph.validate()?;
				Ok(Some(graph))
			}
			Err(err) if err.code() == Some(NO_ROWS_CODE) => Ok(None),
			Err(err) => Err(err),
		}
	}

	async fn upsert(&self, record: &GraphSnapshot) -> Result<GraphId, BackendError> {
		let body = RowBody::from(record);
		match &record.id {
			Some(id) => {
				let response = self
					.request(Method::PATCH, &self.rest_url())
					.query(&id_filter(id))
					.header("Prefer", "return=minimal")
					.json(&body)
					.send()
					.await?;
				check(response).await?;
				Ok(id.clone())
			}
			None => {
				let response = self
					.request(Method::POST, &self.rest_url())
					.header("Prefer", "return=representation")
					.json(&body)
					.send()
					.await?;
				let rows: Vec<InsertedRow> = read_json(response).await?;
				rows.into_iter()
					.next()
					.map(|row| row.id)
					.ok_or_else(|| BackendError::Decode("insert returned no rows".into()))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{NodeId, Position};

	#[test]
	fn row_body_has_no_id() {
		let record = GraphSnapshot {
			id: Some(GraphId::new("3")),
			title: "Flow".into(),
			nodes: vec![Node::new("1", Position::ORIGIN, "Node 1")],
			edges: vec![],
			owner: Some(UserId::new("u1")),
		};
		let value = serde_json::to_value(RowBody::from(&record)).unwrap();
		assert!(value.get("id").is_none());
		assert_eq!(value["title"], "Flow");
		assert_eq!(value["user_id"], "u1");
		assert_eq!(value["nodes"][0]["data"]["label"], "Node 1");
	}

	#[test]
	fn malformed_rows_are_skipped() {
		let rows = vec![
			serde_json::json!({
				"id": 1, "title": "ok", "user_id": "u1",
				"nodes": [{"id": "1", "position": {"x": 0, "y": 0}, "data": {"label": "a"}, "type": "custom"}],
				"edges": []
			}),
			serde_json::json!({
				"id": 2, "title": "dangling",
				"nodes": [{"id": "1", "position": {"x": 0, "y": 0}, "data": {"label": "a"}}],
				"edges": [{"id": "e", "source": "1", "target": "2"}]
			}),
			serde_json::json!({ "id": 3, "nodes": "not a list" }),
		];
		let graphs = decode_rows(rows);
		assert_eq!(graphs.len(), 1);
		assert_eq!(graphs[0].id, Some(GraphId::new("1")));
		assert_eq!(graphs[0].nodes[0].id, NodeId::from("1"));
	}

	#[test]
	fn insert_response_yields_id() {
		let rows: Vec<InsertedRow> =
			serde_json::from_str(r#"[{"id": 17, "title": "New Graph"}]"#).unwrap();
		assert_eq!(rows[0].id, GraphId::new("17"));
	}
}
