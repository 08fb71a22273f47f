//! Leptos component binding the editor canvas to an [`InteractionController`].
//!
//! The component owns only view state (pan/zoom and the pointer gesture in
//! progress). Every change to the graph goes through the controller signal as
//! a [`Gesture`]. An animation loop via `requestAnimationFrame` redraws from
//! the controller each frame and stops once the signal is disposed.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::geometry::{self, HitTarget};
use super::render::{self, Frame};
use super::scale::{ScaleConfig, ScaledValues, ViewTransform};
use super::theme::Theme;
use crate::components::send_gesture as send;
use crate::editor::{Gesture, InteractionController};
use crate::graph::{NodeId, Position};

const FIT_PADDING: f64 = 60.0;

/// Pointer gesture in progress.
#[derive(Clone, Debug, Default)]
enum Pointer {
	#[default]
	Idle,
	Panning {
		start: (f64, f64),
		origin: (f64, f64),
	},
	/// Pressed on a node. Turns into a drag once it moves, or a select on
	/// release.
	Pressing {
		id: NodeId,
		grab: Position,
		moved: bool,
	},
	Connecting {
		source: NodeId,
		cursor: Position,
	},
}

struct CanvasContext {
	transform: ViewTransform,
	scale: ScaleConfig,
	pointer: Pointer,
	width: f64,
	height: f64,
	/// Load epoch the view was last fitted to.
	fitted_epoch: Option<u64>,
}

impl CanvasContext {
	fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.transform.k)
	}
}

fn pointer_at(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Emit hover enter/leave gestures so hover follows `hit`.
fn track_hover(controller: RwSignal<InteractionController>, hit: &HitTarget) {
	let (node, edge) = (hit.hovered_node().cloned(), hit.hovered_edge().cloned());
	let Some(current) = controller.try_with_untracked(|c| c.hover().clone()) else {
		return;
	};
	if current.node == node && current.edge == edge {
		return;
	}
	controller.try_update(|c| {
		if current.node != node {
			if let Some(id) = current.node {
				c.handle(Gesture::HoverNode { id, hovered: false });
			}
			if let Some(id) = node {
				c.handle(Gesture::HoverNode { id, hovered: true });
			}
		}
		if current.edge != edge {
			if let Some(id) = current.edge {
				c.handle(Gesture::HoverEdge { id, hovered: false });
			}
			if let Some(id) = edge {
				c.handle(Gesture::HoverEdge { id, hovered: true });
			}
		}
	});
}

/// Size the canvas to its parent. Returns the size in pixels.
fn fit_to_parent(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0));
	if canvas.width() != w as u32 || canvas.height() != h as u32 {
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
	}
	(w, h)
}

/// Draw one frame. Returns false once the controller is gone.
fn draw_frame(
	c: &mut CanvasContext,
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	controller: RwSignal<InteractionController>,
	dark: Signal<bool>,
) -> bool {
	(c.width, c.height) = fit_to_parent(canvas);
	let theme = Theme::for_mode(dark.try_get_untracked().unwrap_or(false));
	controller
		.try_with_untracked(|ic| {
			let session = ic.session();
			if c.fitted_epoch != Some(session.epoch()) {
				if let Some((min, max)) = geometry::bounds(session.nodes()) {
					c.transform = ViewTransform::fit(min, max, c.width, c.height, FIT_PADDING);
				}
				c.fitted_epoch = Some(session.epoch());
			}
			let preview = match &c.pointer {
				Pointer::Connecting { source, cursor } => session
					.node(source)
					.map(|node| (geometry::source_handle(node), *cursor)),
				_ => None,
			};
			let frame = Frame {
				nodes: session.nodes(),
				edges: session.edges(),
				hover: ic.hover(),
				selected: ic.editor().node(),
				transform: c.transform,
				width: c.width,
				height: c.height,
				preview,
			};
			render::render(&frame, ctx, &c.scale, &theme);
		})
		.is_some()
}

/// Renders the graph held by `controller` on a canvas filling its parent.
///
/// Drag the background to pan, scroll to zoom, drag a node to move it, click
/// it to edit its label, and drag from its bottom handle onto another node
/// to connect them. Hovering a node or edge reveals its delete glyph.
#[component]
pub fn GraphCanvas(
	controller: RwSignal<InteractionController>,
	#[prop(into)] dark: Signal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context = Rc::new(RefCell::new(CanvasContext {
		transform: ViewTransform::default(),
		scale: ScaleConfig::default(),
		pointer: Pointer::Idle,
		width: 0.0,
		height: 0.0,
		fitted_epoch: None,
	}));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("nodeboard: canvas has no 2d context");
			return;
		};

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let alive = draw_frame(
				&mut context_anim.borrow_mut(),
				&canvas,
				&ctx,
				controller,
				dark,
			);
			if !alive {
				return;
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((sx, sy)) = pointer_at(canvas_ref, &ev) else {
			return;
		};
		let c = &mut *context_md.borrow_mut();
		let p = c.transform.to_world(sx, sy);
		let scale = c.scaled();
		let Some(hit) = controller.try_with_untracked(|ic| {
			let session = ic.session();
			geometry::hit_test(session.nodes(), session.edges(), ic.hover(), p, &scale)
		}) else {
			return;
		};
		c.pointer = match hit {
			HitTarget::NodeGlyph(id) => {
				send(controller, Gesture::DeleteNode(id));
				Pointer::Idle
			}
			HitTarget::EdgeGlyph(id) => {
				send(controller, Gesture::DeleteEdge(id));
				Pointer::Idle
			}
			HitTarget::SourceHandle(source) => Pointer::Connecting { source, cursor: p },
			HitTarget::Node(id) => {
				let origin = controller
					.try_with_untracked(|ic| ic.session().node(&id).map(|n| n.position))
					.flatten()
					.unwrap_or(p);
				Pointer::Pressing {
					id,
					grab: Position::new(p.x - origin.x, p.y - origin.y),
					moved: false,
				}
			}
			HitTarget::Edge(_) | HitTarget::Canvas => Pointer::Panning {
				start: (sx, sy),
				origin: (c.transform.x, c.transform.y),
			},
		};
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((sx, sy)) = pointer_at(canvas_ref, &ev) else {
			return;
		};
		let c = &mut *context_mm.borrow_mut();
		let p = c.transform.to_world(sx, sy);
		let scale = c.scaled();
		match &mut c.pointer {
			Pointer::Idle => {
				let hit = controller.try_with_untracked(|ic| {
					let session = ic.session();
					geometry::hit_test(session.nodes(), session.edges(), ic.hover(), p, &scale)
				});
				if let Some(hit) = hit {
					track_hover(controller, &hit);
				}
			}
			Pointer::Panning { start, origin } => {
				c.transform.x = origin.0 + (sx - start.0);
				c.transform.y = origin.1 + (sy - start.1);
			}
			Pointer::Pressing { id, grab, moved } => {
				*moved = true;
				send(
					controller,
					Gesture::DragNode {
						id: id.clone(),
						position: Position::new(p.x - grab.x, p.y - grab.y),
						dragging: true,
					},
				);
			}
			Pointer::Connecting { cursor, .. } => *cursor = p,
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((sx, sy)) = pointer_at(canvas_ref, &ev) else {
			return;
		};
		let c = &mut *context_mu.borrow_mut();
		let p = c.transform.to_world(sx, sy);
		let scale = c.scaled();
		match std::mem::take(&mut c.pointer) {
			Pointer::Pressing {
				id, moved: false, ..
			} => send(controller, Gesture::SelectNode(id)),
			Pointer::Pressing { id, grab, .. } => send(
				controller,
				Gesture::DragNode {
					id,
					position: Position::new(p.x - grab.x, p.y - grab.y),
					dragging: false,
				},
			),
			Pointer::Connecting { source, .. } => {
				let target = controller
					.try_with_untracked(|ic| {
						geometry::drop_target(ic.session().nodes(), p, &scale).cloned()
					})
					.flatten();
				if let Some(target) = target {
					send(controller, Gesture::Connect { source, target });
				}
			}
			Pointer::Idle | Pointer::Panning { .. } => {}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let c = &mut *context_ml.borrow_mut();
		if let Pointer::Pressing {
			id, moved: true, ..
		} = std::mem::take(&mut c.pointer)
		{
			let position = controller
				.try_with_untracked(|ic| ic.session().node(&id).map(|n| n.position))
				.flatten();
			if let Some(position) = position {
				send(
					controller,
					Gesture::DragNode {
						id,
						position,
						dragging: false,
					},
				);
			}
		}
		track_hover(controller, &HitTarget::Canvas);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((sx, sy)) = pointer_at(canvas_ref, &ev) else {
			return;
		};
		context_wh
			.borrow_mut()
			.transform
			.zoom_at(sx, sy, ev.delta_y());
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: default;"
		/>
	}
}
