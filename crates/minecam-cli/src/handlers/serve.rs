//! Serve command handler.

use anyhow::Result;
use minecam_axum::{ServerConfig, start_server};

use crate::parser::ServeArgs;

/// Server configuration from the environment, overridden by the flags.
pub fn server_config(args: ServeArgs) -> Result<ServerConfig> {
    let mut config = ServerConfig::with_defaults()?;
    config.host = args.host;
    config.port = args.port;
    config.api_only = args.api_only;
    config.strict_dependencies |= args.strict;
    if let Some(dir) = args.static_dir {
        config = config.with_static_dir(dir);
    }
    Ok(config)
}

/// Run the web server until Ctrl-C or SIGTERM.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = server_config(args)?;

    println!();
    if config.api_only {
        println!("  minecam web server starting (API only)...");
        println!();
        println!("  API:     http://localhost:{}/api", config.port);
    } else {
        println!("  minecam web server starting...");
        println!();
        println!("  Local:   http://localhost:{}", config.port);
        println!("  Network: http://{}:{}", config.host, config.port);
    }
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    start_server(config).await
}
