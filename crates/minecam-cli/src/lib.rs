//! Command-line interface of minecam.
//!
//! One binary both runs the server (`minecam serve`, the default) and acts
//! as a client of a running server using a saved login session.

#![deny(unused_crate_dependencies)]

// Used by the binary target only
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

pub use bootstrap::ClientContext;
pub use commands::{Commands, SettingsCommand};
pub use parser::{ClientArgs, Cli, ServeArgs};
