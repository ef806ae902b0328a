//! Command handlers.
//!
//! Each handler parses CLI-specific input, calls the server or client
//! crates and formats the result for the terminal.

pub mod cameras;
pub mod debug_env;
pub mod hash_password;
pub mod serve;
pub mod session;
pub mod settings;
