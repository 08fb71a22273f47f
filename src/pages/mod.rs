//! Routed screens.

pub mod about;
pub mod auth;
pub mod not_found;
pub mod workspace;
