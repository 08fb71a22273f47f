//! Page shell: top bar with navigation, theme toggle and account controls.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use log::warn;

use super::toast::use_toaster;
use crate::context::use_services;
use crate::state::{AppAction, AppState, dispatch};

/// Product name shown in the top bar and the tab title.
pub const APP_TITLE: &str = "Nodeboard";

/// Page frame: top bar with navigation, the dark-mode switch, and the
/// account controls above the routed content.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
	let store = expect_context::<RwSignal<AppState>>();
	let services = use_services();
	let toaster = use_toaster();
	let navigate = use_navigate();

	let signed_in = move || store.with(|s| s.is_authenticated());
	let email = move || {
		store.with(|s| {
			s.current_user
				.as_ref()
				.and_then(|u| u.email.clone())
				.unwrap_or_default()
		})
	};
	let theme_label = move || if store.with(|s| s.dark_mode) { "Light" } else { "Dark" };

	let sign_out = move |_| {
		let auth = services.auth.clone();
		let navigate = navigate.clone();
		spawn_local(async move {
			if let Err(err) = auth.sign_out().await {
				warn!("nodeboard: sign out failed: {err}");
				toaster.error(format!("Sign out failed: {err}"));
			}
			dispatch(store, AppAction::LogOut);
			navigate("/", Default::default());
		});
	};

	view! {
		<div class="app" class:dark=move || store.with(|s| s.dark_mode)>
			<header class="top-bar">
				<A href="/">
					<span class="logo">{APP_TITLE}</span>
				</A>
				<nav>
					<Show
						when=signed_in
						fallback=|| view! {
							<A href="/auth/login">"Log In"</A>
							<A href="/auth/signup">"Sign Up"</A>
						}
					>
						<A href="/">"Editor"</A>
					</Show>
					<A href="/about">"About"</A>
				</nav>
				<div class="account">
					<button
						class="icon-button"
						title="Switch theme"
						on:click=move |_| dispatch(store, AppAction::ToggleDarkMode)
					>
						{theme_label}
					</button>
					<span class="muted" class:hidden=move || !signed_in()>{email}</span>
					<button class="icon-button" class:hidden=move || !signed_in() on:click=sign_out>
						"Sign Out"
					</button>
				</div>
			</header>
			<main class="content">{children()}</main>
		</div>
	}
}
