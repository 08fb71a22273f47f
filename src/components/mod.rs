//! Reusable view pieces: the canvas and the panels around it.

use leptos::prelude::*;

use crate::editor::{Gesture, InteractionController};

pub mod gallery;
pub mod graph_canvas;
pub mod label_editor;
pub mod layout;
pub mod toast;

pub use gallery::GallerySidebar;
pub use graph_canvas::GraphCanvas;
pub use label_editor::LabelEditorPanel;
pub use layout::Shell;
pub use toast::{ToastHost, Toaster, use_toaster};

/// Feed one gesture to the shared controller.
pub fn send_gesture(controller: RwSignal<InteractionController>, gesture: Gesture) {
	controller.try_update(|c| {
		c.handle(gesture);
	});
}
