//! Subcommands of the minecam binary.

use clap::Subcommand;

use crate::parser::{ClientArgs, ServeArgs};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    Serve(ServeArgs),

    /// Show run mode, resolved directories, ffmpeg and .env candidates
    DebugEnv,

    /// Print a bcrypt hash for a users.json entry
    HashPassword {
        /// Password to hash (prompted when omitted)
        password: Option<String>,
    },

    /// Log in and save the session
    Login {
        /// User name (defaults to the remembered one)
        username: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "MINECAM_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Remember the user name for the next login
        #[arg(long)]
        remember: bool,
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Drop the saved session
    Logout {
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Show the logged-in user
    Whoami {
        #[command(flatten)]
        client: ClientArgs,
    },

    /// List cameras and their status
    Cameras {
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Show the raw and enhanced stream addresses of a camera
    Stream {
        camera_id: String,
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Show the enhancement status of a camera
    Status {
        camera_id: String,
        #[command(flatten)]
        client: ClientArgs,
    },

    /// Show or change the system settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommand>,
        #[command(flatten)]
        client: ClientArgs,
    },
}

/// Settings actions.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings (default)
    Show,
    /// Merge a JSON object into the settings
    Set {
        /// e.g. '{"enhancement": {"gamma": 1.4}}'
        patch: String,
    },
    /// Restore the default settings
    Reset,
    /// Print the live enhancement parameters
    Params,
}
