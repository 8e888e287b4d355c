//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod api;
pub mod webhook;

// Re-export all handlers for use in router
pub use api::*;
pub use webhook::*;
