//! Account operations against the hosted identity endpoints.

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Method;
use serde::Serialize;

use super::client::{AuthSession, HostedBackend, check, read_json};
use crate::error::{AuthError, BackendError};
use crate::services::{AuthService, IdentityProvider, SignUpOutcome, UserIdentity};
use crate::validation;

#[derive(Serialize)]
struct Credentials<'a> {
	email: &'a str,
	password: &'a str,
}

#[derive(Serialize)]
struct RecoveryRequest<'a> {
	email: &'a str,
}

/// Rejections by the service (bad password, taken address) are shown to the
/// user as-is; anything else stays a backend failure.
fn classify(err: BackendError) -> AuthError {
	match err {
		BackendError::Remote {
			status: 400..=499,
			message,
			..
		} => AuthError::Rejected(message),
		other => AuthError::Backend(other),
	}
}

/// Sign-up answers with a session when confirmation is off, and with the
/// bare user when a confirmation mail went out.
fn parse_sign_up(body: serde_json::Value) -> Result<Option<AuthSession>, BackendError> {
	if body.get("access_token").is_some() {
		serde_json::from_value(body)
			.map(Some)
			.map_err(|e| BackendError::Decode(e.to_string()))
	} else {
		Ok(None)
	}
}

#[async_trait(?Send)]
impl IdentityProvider for HostedBackend {
	async fn current_user(&self) -> Result<Option<UserIdentity>, BackendError> {
		if self.session().is_none() {
			return Ok(None);
		}
		let response = self
			.request(Method::GET, &self.auth_url("user"))
			.send()
			.await?;
		match read_json::<UserIdentity>(response).await {
			Ok(user) => Ok(Some(user)),
			Err(BackendError::Remote { status: 401, .. }) => {
				warn!("nodeboard: session expired");
				self.set_session(None);
				Ok(None)
			}
			Err(err) => Err(err),
		}
	}
}

#[async_trait(?Send)]
impl AuthService for HostedBackend {
	async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
		validation::check_credentials(email, password).map_err(AuthError::Invalid)?;
		let response = self
			.request(Method::POST, &self.auth_url("token?grant_type=password"))
			.json(&Credentials { email, password })
			.send()
			.await
			.map_err(BackendError::from)?;
		let session: AuthSession = read_json(response).await.map_err(classify)?;
		let user = session.user.clone();
		self.set_session(Some(session));
		Ok(user)
	}

	async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
		validation::check_credentials(email, password).map_err(AuthError::Invalid)?;
		let response = self
			.request(Method::POST, &self.auth_url("signup"))
			.json(&Credentials { email, password })
			.send()
			.await
			.map_err(BackendError::from)?;
		let body: serde_json::Value = read_json(response).await.map_err(classify)?;
		match parse_sign_up(body)? {
			Some(session) => {
				let user = session.user.clone();
				self.set_session(Some(session));
				Ok(SignUpOutcome::SignedIn(user))
			}
			None => {
				info!("nodeboard: confirmation mail sent to {email}");
				Ok(SignUpOutcome::ConfirmEmail)
			}
		}
	}

	async fn recover_password(&self, email: &str) -> Result<(), AuthError> {
		validation::check_email(email).map_err(AuthError::Invalid)?;
		let response = self
			.request(Method::POST, &self.auth_url("recover"))
			.json(&RecoveryRequest { email })
			.send()
			.await
			.map_err(BackendError::from)?;
		check(response).await.map_err(classify)?;
		Ok(())
	}

	/// The local session is dropped even when the remote call fails.
	async fn sign_out(&self) -> Result<(), AuthError> {
		if self.session().is_none() {
			return Ok(());
		}
		let result = match self
			.request(Method::POST, &self.auth_url("logout"))
			.send()
			.await
		{
			Ok(response) => check(response).await.map(drop),
			Err(e) => Err(e.into()),
		};
		self.set_session(None);
		result.map_err(AuthError::Backend)
	}
}
