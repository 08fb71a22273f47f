//! Runtime configuration.
//!
//! Read from a `<script id="app-config" type="application/json">` element in
//! the host page. Missing fields fall back to values baked in at build time
//! through `NODEBOARD_BACKEND_URL` and `NODEBOARD_ANON_KEY`.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// Id of the script element holding the JSON config.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Editor configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Base URL of the hosted service, e.g. `https://xyz.example.co`.
	pub backend_url: Option<String>,
	/// Public API key sent with every request.
	pub anon_key: Option<String>,
	/// Table holding saved graphs.
	pub table: String,
	/// Title given to graphs saved for the first time.
	pub default_title: String,
	/// Log at debug level instead of info.
	pub debug: bool,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			backend_url: option_env!("NODEBOARD_BACKEND_URL").map(str::to_string),
			anon_key: option_env!("NODEBOARD_ANON_KEY").map(str::to_string),
			table: "graphs".into(),
			default_title: "New Graph".into(),
			debug: false,
		}
	}
}

/// Where graphs and accounts live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
	/// A hosted service at `url`.
	Hosted {
		/// Base url, without a trailing slash.
		url: String,
		/// Public API key.
		anon_key: String,
	},
	/// In-memory; lost on reload.
	Local,
}

impl AppConfig {
	/// Parse a config document.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Read the config element, or fall back to defaults.
	pub fn load() -> Self {
		let Some(text) = config_element_text() else {
			info!("nodeboard: no #{CONFIG_ELEMENT_ID} element, using build defaults");
			return Self::default();
		};
		match Self::from_json(&text) {
			Ok(config) => {
				info!("nodeboard: loaded config, backend {:?}", config.backend_kind());
				config
			}
			Err(e) => {
				warn!("nodeboard: failed to parse config: {}", e);
				Self::default()
			}
		}
	}

	/// Which storage to use. Hosted needs both a url and a key.
	pub fn backend(&self) -> Backend {
		let url = self
			.backend_url
			.as_deref()
			.map(|url| url.trim().trim_end_matches('/'))
			.filter(|url| !url.is_empty());
		let key = self
			.anon_key
			.as_deref()
			.map(str::trim)
			.filter(|key| !key.is_empty());
		match (url, key) {
			(Some(url), Some(key)) => Backend::Hosted {
				url: url.to_string(),
				anon_key: key.to_string(),
			},
			_ => Backend::Local,
		}
	}

	fn backend_kind(&self) -> &'static str {
		match self.backend() {
			Backend::Hosted { .. } => "hosted",
			Backend::Local => "local",
		}
	}
}

fn config_element_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}
