//! nodeboard: a browser graph editor with account-backed save and load.
//!
//! Users sign in, sketch graphs of labeled nodes and directed edges on a
//! canvas, and save them as named graphs tied to their account. Storage and
//! accounts are provided by a hosted backend, or kept in memory when none is
//! configured.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, LevelFilter, info, warn};

pub mod backend;
pub mod components;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod graph;
pub mod pages;
pub mod services;
pub mod state;
pub mod validation;

use crate::components::layout::APP_TITLE;
use crate::components::{Shell, ToastHost};
use crate::config::AppConfig;
use crate::context::Services;
use crate::pages::about::About;
use crate::pages::auth::{Login, PublicOnly, Recovery, Signup};
use crate::pages::not_found::NotFound;
use crate::pages::workspace::Workspace;
use crate::state::{AppAction, AppState, dispatch};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("nodeboard: logging initialized");
}

/// Root component: loads the config, provides services and app state, asks
/// the identity service who is signed in, and routes.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = AppConfig::load();
	if !config.debug {
		log::set_max_level(LevelFilter::Info);
	}
	let services = Services::from_config(config);
	provide_context(services.clone());

	let store = RwSignal::new(AppState::default());
	provide_context(store);

	let identity = services.identity.clone();
	spawn_local(async move {
		let user = match identity.current_user().await {
			Ok(user) => user,
			Err(err) => {
				warn!("nodeboard: could not resolve the session: {err}");
				None
			}
		};
		dispatch(store, AppAction::AuthResolved(user));
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text=APP_TITLE />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ToastHost>
			<Router>
				<Shell>
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=Workspace />
						<Route path=path!("/about") view=About />
						<Route
							path=path!("/auth/login")
							view=|| view! { <PublicOnly><Login /></PublicOnly> }
						/>
						<Route
							path=path!("/auth/signup")
							view=|| view! { <PublicOnly><Signup /></PublicOnly> }
						/>
						<Route
							path=path!("/auth/recovery")
							view=|| view! { <PublicOnly><Recovery /></PublicOnly> }
						/>
					</Routes>
				</Shell>
			</Router>
		</ToastHost>
	}
}
