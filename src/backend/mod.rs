//! The hosted service: graph rows over its REST interface and accounts over
//! its identity interface, both through one [`HostedBackend`].

mod auth;
mod client;
mod graphs;

pub use client::{AuthSession, HostedBackend};
pub use graphs::NO_ROWS_CODE;
