//! HTTP JSON API over the session and the gateways.

pub mod app;
mod error;
mod handlers;
pub mod state;
