//! Boundaries to the hosted identity and graph storage services.
//!
//! The editor only talks to these traits. [`crate::backend`] implements them
//! over HTTP; [`memory`] implements them in-process for local mode and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, BackendError};
use crate::graph::{GraphId, GraphSnapshot, UserId};

pub mod gallery;
pub mod memory;
mod save;

pub use gallery::{Gallery, GallerySelection, GalleryStatus, fetch_gallery};
pub use save::{SaveGate, SaveOutcome, SavedGraph, save_graph};

/// The signed-in account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
	/// Account id.
	pub id: UserId,
	/// Email, when the service shares it.
	#[serde(default)]
	pub email: Option<String>,
}

/// Row storage for saved graphs.
///
/// Futures are not `Send`: everything runs on the browser's event loop.
#[async_trait(?Send)]
pub trait GraphRepository: Send + Sync {
	/// Every graph visible to the current session.
	async fn list_all(&self) -> Result<Vec<GraphSnapshot>, BackendError>;

	/// One graph, or `None` when no row has this id.
	async fn get_by_id(&self, id: &GraphId) -> Result<Option<GraphSnapshot>, BackendError>;

	/// Insert `record` when it has no id, otherwise update the row in place.
	/// Returns the row's id.
	async fn upsert(&self, record: &GraphSnapshot) -> Result<GraphId, BackendError>;
}

/// Source of the current session's account.
#[async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
	/// `Ok(None)` when nobody is signed in.
	async fn current_user(&self) -> Result<Option<UserIdentity>, BackendError>;
}

/// Result of a successful sign-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
	/// The account is active and signed in.
	SignedIn(UserIdentity),
	/// The service sent a confirmation mail; no session yet.
	ConfirmEmail,
}

/// Account lifecycle operations behind the auth screens.
#[async_trait(?Send)]
pub trait AuthService: IdentityProvider {
	/// Sign in with email and password.
	async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;
	/// Create an account. May require email confirmation before signing in.
	async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;
	/// Send password reset instructions to `email`.
	async fn recover_password(&self, email: &str) -> Result<(), AuthError>;
	/// End the session.
	async fn sign_out(&self) -> Result<(), AuthError>;
}
