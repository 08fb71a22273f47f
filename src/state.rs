//! Application-wide state: who is signed in and the dark-mode preference.
//!
//! [`reduce`] is a pure `(state, action) -> state` function. The live value
//! sits in an `RwSignal<AppState>` provided as Leptos context at the root;
//! components change it only through [`dispatch`].

use leptos::prelude::*;
use log::info;

use crate::services::UserIdentity;

/// Global app state shared through context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
	/// The signed-in account, if any.
	pub current_user: Option<UserIdentity>,
	/// Whether the dark palette is active.
	pub dark_mode: bool,
	/// False until the first answer about the session arrives.
	pub auth_resolved: bool,
}

impl AppState {
	/// True once someone is signed in.
	pub fn is_authenticated(&self) -> bool {
		self.current_user.is_some()
	}
}

/// Everything that can change [`AppState`].
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
	/// Startup session check finished.
	AuthResolved(Option<UserIdentity>),
	/// Sign-in or sign-up finished with a session.
	LogIn(UserIdentity),
	/// Sign-out finished.
	LogOut,
	/// Pick the palette explicitly.
	SetDarkMode(bool),
	/// Flip the palette.
	ToggleDarkMode,
}

/// Pure transition from `state` under `action`.
pub fn reduce(state: &AppState, action: AppAction) -> AppState {
	match action {
		AppAction::AuthResolved(user) => AppState {
			current_user: user,
			auth_resolved: true,
			..state.clone()
		},
		AppAction::LogIn(user) => AppState {
			current_user: Some(user),
			auth_resolved: true,
			..state.clone()
		},
		AppAction::LogOut => AppState {
			current_user: None,
			auth_resolved: true,
			..state.clone()
		},
		AppAction::SetDarkMode(dark_mode) => AppState {
			dark_mode,
			..state.clone()
		},
		AppAction::ToggleDarkMode => AppState {
			dark_mode: !state.dark_mode,
			..state.clone()
		},
	}
}

/// Apply `action` to the shared store.
pub fn dispatch(store: RwSignal<AppState>, action: AppAction) {
	match &action {
		AppAction::LogIn(user) | AppAction::AuthResolved(Some(user)) => {
			info!("nodeboard: signed in as {}", user.id);
		}
		AppAction::LogOut | AppAction::AuthResolved(None) => info!("nodeboard: signed out"),
		_ => {}
	}
	store.update(|state| *state = reduce(state, action));
}
