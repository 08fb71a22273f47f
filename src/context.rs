//! Collaborators shared with the whole component tree through Leptos context.

use std::sync::Arc;

use leptos::prelude::*;
use log::info;

use crate::backend::HostedBackend;
use crate::config::{AppConfig, Backend};
use crate::services::memory::{LocalIdentity, MemoryGraphRepository};
use crate::services::{AuthService, GraphRepository, IdentityProvider};

/// Storage and account services picked from the config.
#[derive(Clone)]
pub struct Services {
	/// Saved graph rows.
	pub graphs: Arc<dyn GraphRepository>,
	/// Who is signed in. Same object as `auth`.
	pub identity: Arc<dyn IdentityProvider>,
	/// Sign in, sign up, recovery and sign out.
	pub auth: Arc<dyn AuthService>,
	/// Settings the services were built from.
	pub config: Arc<AppConfig>,
}

impl Services {
	/// Hosted services when the config names a backend, in-memory ones otherwise.
	pub fn from_config(config: AppConfig) -> Self {
		match config.backend() {
			Backend::Hosted { url, anon_key } => {
				info!("nodeboard: using hosted backend at {url}");
				let backend = Arc::new(HostedBackend::new(url, anon_key, config.table.clone()));
				Self {
					graphs: backend.clone(),
					identity: backend.clone(),
					auth: backend,
					config: Arc::new(config),
				}
			}
			Backend::Local => {
				info!("nodeboard: no backend configured, graphs are kept in memory");
				let identity = Arc::new(LocalIdentity::default());
				Self {
					graphs: Arc::new(MemoryGraphRepository::default()),
					identity: identity.clone(),
					auth: identity,
					config: Arc::new(config),
				}
			}
		}
	}
}

/// The [`Services`] provided by the app root.
pub fn use_services() -> Services {
	expect_context::<Services>()
}
