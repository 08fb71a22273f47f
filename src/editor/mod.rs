//! Interaction layer between canvas gestures and the graph session.

mod controller;

pub use controller::{Gesture, HoverState, InteractionController, LabelEditor};
