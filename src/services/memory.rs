//! In-process stand-ins for the hosted services.
//!
//! Used when no backend is configured, and as the fake in tests. Nothing
//! survives a page reload.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{AuthService, GraphRepository, IdentityProvider, SignUpOutcome, UserIdentity};
use crate::error::{AuthError, BackendError};
use crate::graph::{GraphId, GraphSnapshot, UserId};
use crate::validation;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct Rows {
	graphs: Vec<GraphSnapshot>,
	last_id: u64,
}

/// Graph rows kept in memory, with integer ids handed out in order.
#[derive(Debug, Default)]
pub struct MemoryGraphRepository {
	rows: Mutex<Rows>,
}

#[async_trait(?Send)]
impl GraphRepository for MemoryGraphRepository {
	async fn list_all(&self) -> Result<Vec<GraphSnapshot>, BackendError> {
		Ok(lock(&self.rows).graphs.clone())
	}

	async fn get_by_id(&self, id: &GraphId) -> Result<Option<GraphSnapshot>, BackendError> {
		Ok(lock(&self.rows)
			.graphs
			.iter()
			.find(|graph| graph.id.as_ref() == Some(id))
			.cloned())
	}

	async fn upsert(&self, record: &GraphSnapshot) -> Result<GraphId, BackendError> {
		record.validate()?;
		let mut rows = lock(&self.rows);
		if let Some(id) = &record.id {
			if let Some(row) = rows.graphs.iter_mut().find(|g| g.id.as_ref() == Some(id)) {
				*row = record.clone();
				return Ok(id.clone());
			}
		}
		rows.last_id += 1;
		let id = GraphId::new(rows.last_id.to_string());
		rows.graphs.push(GraphSnapshot {
			id: Some(id.clone()),
			..record.clone()
		});
		Ok(id)
	}
}

/// A single local account that any well-formed credentials unlock.
#[derive(Debug, Default)]
pub struct LocalIdentity {
	user: Mutex<Option<UserIdentity>>,
}

impl LocalIdentity {
	/// An identity that starts signed in as `user`.
	pub fn signed_in(user: UserIdentity) -> Self {
		Self {
			user: Mutex::new(Some(user)),
		}
	}

	fn local_user(email: &str) -> UserIdentity {
		UserIdentity {
			id: UserId::new("local"),
			email: Some(email.to_string()),
		}
	}
}

#[async_trait(?Send)]
impl IdentityProvider for LocalIdentity {
	async fn current_user(&self) -> Result<Option<UserIdentity>, BackendError> {
		Ok(lock(&self.user).clone())
	}
}

#[async_trait(?Send)]
impl AuthService for LocalIdentity {
	async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
		validation::check_credentials(email, password).map_err(AuthError::Invalid)?;
		let user = Self::local_user(email);
		*lock(&self.user) = Some(user.clone());
		Ok(user)
	}

	async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
		self.sign_in(email, password)
			.await
			.map(SignUpOutcome::SignedIn)
	}

	async fn recover_password(&self, email: &str) -> Result<(), AuthError> {
		validation::check_email(email).map_err(AuthError::Invalid)
	}

	async fn sign_out(&self) -> Result<(), AuthError> {
		*lock(&self.user) = None;
		Ok(())
	}
}
