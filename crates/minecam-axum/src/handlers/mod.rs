//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area. Handlers are
//! thin: they read from the context and wrap the result in the response
//! shape the frontend expects.

pub mod auth;
pub mod cameras;
pub mod enhance;
pub mod settings;
pub mod video;
