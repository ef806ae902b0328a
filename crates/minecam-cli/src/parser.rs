//! Main CLI parser and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser};
use minecam_axum::bootstrap::{DEFAULT_HOST, DEFAULT_PORT};
use minecam_client::DEFAULT_BASE_URL;

use crate::commands::Commands;

/// Command-line interface of minecam.
///
/// Without a subcommand the server is started, so the serve flags are also
/// accepted at the top level.
#[derive(Parser)]
#[command(name = "minecam")]
#[command(about = "Serve and view enhanced mine camera streams")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve(self.serve))
    }
}

/// Options of the web server.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "SERVER_IP", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Frontend bundle directory (resolved automatically when omitted)
    #[arg(long, env = "FRONTEND_DIST")]
    pub static_dir: Option<PathBuf>,

    /// Serve only the API, without the frontend bundle
    #[arg(long)]
    pub api_only: bool,

    /// Refuse to start when ffmpeg is missing
    #[arg(long, env = "REQUIRE_RUNTIME_DEPENDENCIES")]
    pub strict: bool,
}

/// Where the client commands connect to and keep their session.
#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// Base URL of the minecam server
    #[arg(long, env = "MINECAM_SERVER", default_value = DEFAULT_BASE_URL)]
    pub server: String,

    /// Session file (defaults to the per-user config directory)
    #[arg(long, env = "MINECAM_SESSION")]
    pub session: Option<PathBuf>,
}
