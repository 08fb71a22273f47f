//! The editor route.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;

use super::auth::Login;
use crate::components::{GallerySidebar, GraphCanvas, LabelEditorPanel, send_gesture, use_toaster};
use crate::context::use_services;
use crate::editor::{Gesture, InteractionController};
use crate::graph::GraphSnapshot;
use crate::services::{Gallery, SaveGate, SaveOutcome, fetch_gallery, save_graph};
use crate::state::AppState;

/// Home route: the editor when signed in, otherwise the login form.
#[component]
pub fn Workspace() -> impl IntoView {
	let store = expect_context::<RwSignal<AppState>>();

	view! {
		<Show
			when=move || store.with(|s| s.auth_resolved)
			fallback=|| view! { <p class="loading">"Loading…"</p> }
		>
			<Show
				when=move || store.with(|s| s.is_authenticated())
				fallback=|| view! { <Login /> }
			>
				<Editor />
			</Show>
		</Show>
	}
}

/// Gallery beside the canvas, with the toolbar and label editor on top.
#[component]
fn Editor() -> impl IntoView {
	let store = expect_context::<RwSignal<AppState>>();
	let services = use_services();
	let toaster = use_toaster();

	let controller = RwSignal::new(InteractionController::default());
	let gallery = RwSignal::new(Gallery::new());
	let gate = RwSignal::new(SaveGate::default());

	let graphs = services.graphs.clone();
	spawn_local(async move {
		let result = fetch_gallery(graphs.as_ref()).await;
		if let Err(err) = &result {
			toaster.error(format!("Could not load graphs: {err}"));
		}
		gallery.try_update(|g| g.finish_loading(result));
	});

	let on_pick = Callback::new(move |snapshot: GraphSnapshot| {
		controller.update(|c| c.load(snapshot));
	});

	let save = move |_| {
		if let Some(Err(err)) = gate.try_update(|g| g.begin()) {
			toaster.info(err.to_string());
			return;
		}
		let Some((snapshot, mark)) =
			controller.try_with_untracked(|c| (c.session().snapshot(), c.session().save_mark()))
		else {
			return;
		};
		let services = services.clone();
		spawn_local(async move {
			let result = save_graph(
				services.graphs.as_ref(),
				services.identity.as_ref(),
				snapshot,
				&services.config.default_title,
			)
			.await;
			gate.try_update(|g| g.finish());
			match result {
				Ok(saved) => {
					let id = saved.outcome.id().clone();
					let still_open = controller
						.try_update(|c| {
							c.session_mut().record_save(mark, id, saved.record.title.clone())
						})
						.unwrap_or(false);
					gallery.try_update(|g| g.record_saved(saved.record, still_open));
					toaster.success(match saved.outcome {
						SaveOutcome::Updated(_) => "Graph updated successfully!",
						SaveOutcome::Inserted(_) => "Graph saved successfully!",
					});
				}
				Err(err) => {
					warn!("nodeboard: save failed: {err}");
					toaster.error(format!("Error saving graph: {err}"));
				}
			}
		});
	};

	let title = move || {
		controller.with(|c| match c.session().title() {
			"" => "Untitled graph".to_string(),
			title => title.to_string(),
		})
	};
	let dirty = move || controller.with(|c| c.session().is_dirty());
	let saving = move || gate.with(|g| g.is_saving());
	let dark = Signal::derive(move || store.with(|s| s.dark_mode));

	view! {
		<div class="workspace">
			<GallerySidebar gallery=gallery on_pick=on_pick />
			<section class="editor">
				<div class="toolbar">
					<button on:click=move |_| send_gesture(controller, Gesture::CreateNode)>"Create Node"</button>
					<button on:click=save>{move || if saving() { "Saving…" } else { "Save Graph" }}</button>
					<span class="graph-title">{title}</span>
					<span class="dirty" class:hidden=move || !dirty()>"Unsaved changes"</span>
				</div>
				<LabelEditorPanel controller=controller />
				<div class="canvas-host">
					<GraphCanvas controller=controller dark=dark />
				</div>
			</section>
		</div>
	}
}
