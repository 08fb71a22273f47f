//! Sidebar listing saved graphs.

use leptos::prelude::*;

use crate::graph::{GraphId, GraphSnapshot};
use crate::services::{Gallery, GallerySelection, GalleryStatus};

/// Sidebar listing saved graphs under a "create graph" entry.
///
/// Picking an entry updates the gallery selection and hands the snapshot to
/// open to `on_pick`.
#[component]
pub fn GallerySidebar(gallery: RwSignal<Gallery>, on_pick: Callback<GraphSnapshot>) -> impl IntoView {
	let pick_new = move |_| {
		if let Some(snapshot) = gallery.try_update(|g| g.select_new()) {
			on_pick.run(snapshot);
		}
	};
	let new_selected = move || gallery.with(|g| g.selection() == &GallerySelection::NewGraph);

	let entries = move || {
		gallery.with(|g| {
			g.graphs()
				.iter()
				.filter_map(|graph| {
					let title = if graph.title.is_empty() {
						"Untitled".to_string()
					} else {
						graph.title.clone()
					};
					Some((graph.id.clone()?, title))
				})
				.collect::<Vec<_>>()
		})
	};

	view! {
		<nav class="gallery">
			<ul>
				<li class:selected=new_selected on:click=pick_new>
					<span class="icon">"+"</span>
					"CREATE GRAPH"
				</li>
			</ul>
			<hr />
			{move || match gallery.with(|g| g.status().clone()) {
				GalleryStatus::Loading => view! { <p class="muted">"Loading graphs…"</p> }.into_any(),
				GalleryStatus::Failed(message) => view! { <p class="error">{message}</p> }.into_any(),
				GalleryStatus::Ready => view! {
					<ul>
						<For
							each=entries
							key=|(id, title)| (id.clone(), title.clone())
							children=move |(id, title)| view! { <GalleryEntry gallery=gallery on_pick=on_pick id=id title=title /> }
						/>
					</ul>
				}
				.into_any(),
			}}
		</nav>
	}
}

#[component]
fn GalleryEntry(
	gallery: RwSignal<Gallery>,
	on_pick: Callback<GraphSnapshot>,
	id: GraphId,
	title: String,
) -> impl IntoView {
	let selected = {
		let id = id.clone();
		move || gallery.with(|g| g.selection() == &GallerySelection::Saved(id.clone()))
	};
	let pick = move |_| {
		if let Some(snapshot) = gallery.try_update(|g| g.select(&id)).flatten() {
			on_pick.run(snapshot);
		}
	};

	view! {
		<li class:selected=selected on:click=pick>
			<span class="icon">"›"</span>
			{title}
		</li>
	}
}
