//! HTTP plumbing shared by the graph table and auth endpoints.

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::BackendError;
use crate::services::UserIdentity;

/// An authenticated session handed out by the identity service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthSession {
	/// Bearer token for authenticated requests.
	pub access_token: String,
	pub user: UserIdentity,
}

/// Client for the hosted service: REST rows under `/rest/v1`, accounts
/// under `/auth/v1`.
#[derive(Debug)]
pub struct HostedBackend {
	http: reqwest::Client,
	base_url: String,
	anon_key: String,
	table: String,
	session: Mutex<Option<AuthSession>>,
}

impl HostedBackend {
	/// Client for the service at `base_url`, storing graphs in `table`.
	pub fn new(
		base_url: impl Into<String>,
		anon_key: impl Into<String>,
		table: impl Into<String>,
	) -> Self {
		Self {
			http: reqwest::Client::new(),
			base_url: base_url.into().trim_end_matches('/').to_string(),
			anon_key: anon_key.into(),
			table: table.into(),
			session: Mutex::new(None),
		}
	}

	pub(crate) fn rest_url(&self) -> String {
		format!("{}/rest/v1/{}", self.base_url, self.table)
	}

	pub(crate) fn auth_url(&self, path: &str) -> String {
		format!("{}/auth/v1/{}", self.base_url, path)
	}

	/// Request carrying the API key and the session token (or the anon key
	/// when signed out).
	pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
		let token = self
			.session()
			.as_ref()
			.map(|session| session.access_token.clone())
			.unwrap_or_else(|| self.anon_key.clone());
		self.http
			.request(method, url)
			.header("apikey", &self.anon_key)
			.bearer_auth(token)
	}

	pub(crate) fn session(&self) -> MutexGuard<'_, Option<AuthSession>> {
		self.session.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub(crate) fn set_session(&self, session: Option<AuthSession>) {
		*self.session() = session;
	}
}

/// Pass successful responses through; turn the rest into [`BackendError::Remote`].
pub(crate) async fn check(response: Response) -> Result<Response, BackendError> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}
	let body = response.text().await.unwrap_or_default();
	Err(remote_error(status.as_u16(), &body))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
	let body = check(response).await?.text().await?;
	serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Error bodies differ between the REST and auth endpoints; take whichever
/// fields are present.
#[derive(Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
	code: Option<serde_json::Value>,
	error_code: Option<String>,
	message: Option<String>,
	msg: Option<String>,
	error_description: Option<String>,
	error: Option<String>,
}

pub(crate) fn remote_error(status: u16, body: &str) -> BackendError {
	let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
	let code = parsed.error_code.or(match parsed.code {
		Some(serde_json::Value::String(code)) => Some(code),
		Some(serde_json::Value::Number(code)) => Some(code.to_string()),
		_ => None,
	});
	let message = parsed
		.message
		.or(parsed.msg)
		.or(parsed.error_description)
		.or(parsed.error)
		.unwrap_or_else(|| {
			if body.trim().is_empty() {
				format!("HTTP {status}")
			} else {
				body.trim().to_string()
			}
		});
	BackendError::Remote {
		status,
		code,
		message,
	}
}
