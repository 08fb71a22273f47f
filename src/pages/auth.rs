//! Login, sign-up and password recovery forms.
//!
//! Each form checks its input locally first; only well-formed requests reach
//! the identity service. Service errors are shown inline under the form.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::{A, Redirect};
use leptos_router::hooks::use_navigate;

use crate::context::use_services;
use crate::services::SignUpOutcome;
use crate::state::{AppAction, AppState, dispatch};
use crate::validation;

/// Shows `children` only while signed out; otherwise sends the user home.
#[component]
pub fn PublicOnly(children: ChildrenFn) -> impl IntoView {
	let store = expect_context::<RwSignal<AppState>>();
	view! {
		<Show
			when=move || !store.with(|s| s.is_authenticated())
			fallback=|| view! { <Redirect path="/" /> }
		>
			{children()}
		</Show>
	}
}

fn alert(message: RwSignal<Option<String>>, class: &'static str) -> impl IntoView {
	move || {
		message.get().map(|text| {
			view! {
				<p class=class on:click=move |_| message.set(None)>
					{text}
				</p>
			}
		})
	}
}

fn replace_home() -> NavigateOptions {
	NavigateOptions {
		replace: true,
		..Default::default()
	}
}

/// Email and password sign-in.
#[component]
pub fn Login() -> impl IntoView {
	let store = expect_context::<RwSignal<AppState>>();
	let services = use_services();
	let navigate = use_navigate();

	let email = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let error = RwSignal::new(None::<String>);
	let pending = RwSignal::new(false);

	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if pending.get_untracked() {
			return;
		}
		let (address, secret) = (email.get_untracked(), password.get_untracked());
		if let Err(message) = validation::check_credentials(&address, &secret) {
			error.set(Some(message));
			return;
		}
		error.set(None);
		pending.set(true);
		let auth = services.auth.clone();
		let navigate = navigate.clone();
		spawn_local(async move {
			let result = auth.sign_in(address.trim(), &secret).await;
			pending.try_set(false);
			match result {
				Ok(user) => {
					dispatch(store, AppAction::LogIn(user));
					navigate("/", replace_home());
				}
				Err(err) => {
					error.try_set(Some(err.to_string()));
				}
			}
		});
	};

	view! {
		<form class="auth-card" on:submit=submit>
			<h2>"Login with Email"</h2>
			<label>"Email" <input type="email" required bind:value=email /></label>
			<label>"Password" <input type="password" required bind:value=password /></label>
			{alert(error, "error")}
			<button type="submit" disabled=move || pending.get()>"Login with Email"</button>
			<A href="/auth/recovery">"Forgot Password"</A>
			<A href="/auth/signup">"Create an account"</A>
		</form>
	}
}

/// Account creation with password confirmation.
#[component]
pub fn Signup() -> impl IntoView {
	let store = expect_context::<RwSignal<AppState>>();
	let services = use_services();
	let navigate = use_navigate();

	let email = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let confirmation = RwSignal::new(String::new());
	let error = RwSignal::new(None::<String>);
	let pending = RwSignal::new(false);
	let awaiting_confirmation = RwSignal::new(None::<String>);

	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if pending.get_untracked() {
			return;
		}
		let (address, secret) = (email.get_untracked(), password.get_untracked());
		let checked = validation::check_credentials(&address, &secret)
			.and_then(|()| validation::check_confirmation(&secret, &confirmation.get_untracked()));
		if let Err(message) = checked {
			error.set(Some(message));
			return;
		}
		error.set(None);
		pending.set(true);
		let auth = services.auth.clone();
		let navigate = navigate.clone();
		spawn_local(async move {
			let address = address.trim().to_string();
			let result = auth.sign_up(&address, &secret).await;
			pending.try_set(false);
			match result {
				Ok(SignUpOutcome::SignedIn(user)) => {
					dispatch(store, AppAction::LogIn(user));
					navigate("/", replace_home());
				}
				Ok(SignUpOutcome::ConfirmEmail) => {
					awaiting_confirmation.try_set(Some(address));
				}
				Err(err) => {
					error.try_set(Some(err.to_string()));
				}
			}
		});
	};

	let confirming = move || awaiting_confirmation.with(Option::is_some);

	view! {
		<Show when=confirming>
			<div class="auth-card">
				<h2>"Email Confirmation"</h2>
				<p>
					"A confirmation link was sent to "
					<strong>{move || awaiting_confirmation.get().unwrap_or_default()}</strong>
					". Follow it, then log in."
				</p>
				<A href="/auth/login">"Log In"</A>
			</div>
		</Show>
		<form class="auth-card" class:hidden=confirming on:submit=submit>
			<h2>"Sign Up"</h2>
			<label>"Email" <input type="email" required bind:value=email /></label>
			<label>"Password" <input type="password" required bind:value=password /></label>
			<label>"Confirm Password" <input type="password" required bind:value=confirmation /></label>
			{alert(error, "error")}
			<button type="submit" disabled=move || pending.get()>"Sign Up"</button>
			<A href="/auth/login">"Already have an account?"</A>
		</form>
	}
}

/// Password reset request.
#[component]
pub fn Recovery() -> impl IntoView {
	let services = use_services();

	let email = RwSignal::new(String::new());
	let error = RwSignal::new(None::<String>);
	let sent = RwSignal::new(None::<String>);
	let pending = RwSignal::new(false);

	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if pending.get_untracked() {
			return;
		}
		let address = email.get_untracked();
		if let Err(message) = validation::check_email(&address) {
			error.set(Some(message));
			return;
		}
		error.set(None);
		pending.set(true);
		let auth = services.auth.clone();
		spawn_local(async move {
			let result = auth.recover_password(address.trim()).await;
			pending.try_set(false);
			match result {
				Ok(()) => {
					sent.try_set(Some("Email with instructions has been sent to your address".into()));
				}
				Err(err) => {
					error.try_set(Some(err.to_string()));
				}
			}
		});
	};

	view! {
		<form class="auth-card" on:submit=submit>
			<h2>"Recover Password"</h2>
			<label>"Email" <input type="email" required bind:value=email /></label>
			{alert(error, "error")}
			{alert(sent, "success")}
			<button type="submit" disabled=move || pending.get()>"Send Password Recovery Email"</button>
			<A href="/auth/login">"Back to login"</A>
		</form>
	}
}
