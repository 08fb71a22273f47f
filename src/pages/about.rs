//! About page.

use leptos::prelude::*;

use crate::components::layout::APP_TITLE;
use crate::config::Backend;
use crate::context::use_services;

/// Usage hints and where graphs are stored.
#[component]
pub fn About() -> impl IntoView {
	let services = use_services();
	let storage = match services.config.backend() {
		Backend::Hosted { .. } => "Graphs are saved to your account.",
		Backend::Local => {
			"No backend is configured: graphs live in this tab and are lost on reload."
		}
	};

	view! {
		<article class="about">
			<h2>{APP_TITLE}</h2>
			<p>"Sketch graphs of labeled nodes and save them by name."</p>
			<ul>
				<li>"Create Node adds a node below the lowest one."</li>
				<li>"Drag from a node's bottom dot onto another node to connect them."</li>
				<li>"Click a node to rename it. Enter saves, Escape cancels."</li>
				<li>"Hover a node or edge and click its red × to delete it."</li>
				<li>"Drag the background to pan, scroll to zoom."</li>
			</ul>
			<p class="muted">{storage}</p>
		</article>
	}
}
