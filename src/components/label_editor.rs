//! Inline panel for renaming the selected node.

use leptos::ev::KeyboardEvent;
use leptos::prelude::*;

use super::send_gesture;
use crate::editor::{Gesture, InteractionController};

/// Inline field for renaming the selected node. Hidden while nothing is
/// selected.
#[component]
pub fn LabelEditorPanel(controller: RwSignal<InteractionController>) -> impl IntoView {
	let editing = move || controller.with(|c| c.editor().node().is_some());
	let draft = move || controller.with(|c| c.editor().draft().unwrap_or_default().to_string());
	let blank = move || controller.with(|c| c.editor().draft().is_none_or(|d| d.trim().is_empty()));

	let on_keydown = move |ev: KeyboardEvent| match ev.key().as_str() {
		"Enter" => send_gesture(controller, Gesture::SaveLabel),
		"Escape" => send_gesture(controller, Gesture::CancelLabel),
		_ => {}
	};

	view! {
		<Show when=editing>
			<div class="label-editor">
				<input
					type="text"
					placeholder="Node label"
					prop:value=draft
					on:input=move |ev| send_gesture(controller, Gesture::EditLabel(event_target_value(&ev)))
					on:keydown=on_keydown
				/>
				<button
					class="icon-button"
					title="Save label"
					disabled=blank
					on:click=move |_| send_gesture(controller, Gesture::SaveLabel)
				>
					"Save"
				</button>
				<button
					class="icon-button secondary"
					title="Cancel"
					on:click=move |_| send_gesture(controller, Gesture::CancelLabel)
				>
					"Cancel"
				</button>
			</div>
		</Show>
	}
}
