//! CLI entry point - the composition root.

use clap::Parser;
use minecam_cli::{Cli, Commands, handlers};
use minecam_core::{default_env_candidates, load_env_files};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Before parsing so clap sees .env values
    let env_file = load_env_files(&default_env_candidates());

    match Cli::parse().into_command() {
        Commands::Serve(args) => handlers::serve::execute(args).await?,
        Commands::DebugEnv => handlers::debug_env::execute(env_file.as_deref())?,
        Commands::HashPassword { password } => handlers::hash_password::execute(password)?,
        Commands::Login {
            username,
            password,
            remember,
            client,
        } => handlers::session::login(&client, username, password, remember).await?,
        Commands::Logout { client } => handlers::session::logout(&client).await?,
        Commands::Whoami { client } => handlers::session::whoami(&client).await?,
        Commands::Cameras { client } => handlers::cameras::list(&client).await?,
        Commands::Stream { camera_id, client } => {
            handlers::cameras::stream(&client, &camera_id).await?;
        }
        Commands::Status { camera_id, client } => {
            handlers::cameras::status(&client, &camera_id).await?;
        }
        Commands::Settings { command, client } => {
            handlers::settings::execute(&client, command).await?;
        }
    }

    Ok(())
}
