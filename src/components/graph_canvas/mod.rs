//! Canvas editing surface for a node/edge graph.
//!
//! # Architecture
//!
//! - [`geometry`]: node boxes, handles, edge curves and hit-testing
//! - [`scale`]: pan/zoom transform and zoom-dependent sizes
//! - [`theme`]: light and dark palettes
//! - [`render`]: draws one frame from the graph and view state
//! - [`component`]: the Leptos component turning pointer input into gestures
//!
//! # Usage
//!
//! ```ignore
//! use leptos::prelude::*;
//! use nodeboard::components::graph_canvas::GraphCanvas;
//! use nodeboard::editor::InteractionController;
//!
//! let controller = RwSignal::new(InteractionController::default());
//! view! { <GraphCanvas controller=controller dark=false /> }
//! ```

mod component;
pub mod geometry;
mod render;
pub mod scale;
pub mod theme;

pub use component::GraphCanvas;
