//! Wiring of the client commands: API client plus saved session.

use anyhow::{Context, Result};
use minecam_client::{ApiClient, SessionStore, require_session};

use crate::parser::ClientArgs;

/// Everything a client command needs.
pub struct ClientContext {
    pub api: ApiClient,
    pub session: SessionStore,
}

impl ClientContext {
    /// Open the session file and build an unauthenticated client.
    pub fn open(args: &ClientArgs) -> Result<Self> {
        let session = match &args.session {
            Some(path) => SessionStore::open(path),
            None => SessionStore::open_default(),
        }
        .context("Failed to open the session file")?;
        let api = ApiClient::new(&args.server)
            .with_context(|| format!("Invalid server address {}", args.server))?;
        tracing::debug!(
            server = %api.base_url(),
            session = %session.path().display(),
            "Client context ready"
        );
        Ok(Self { api, session })
    }

    /// Client carrying the saved token; fails when nobody is logged in.
    pub fn authorized(&self) -> Result<ApiClient> {
        let token = require_session(&self.session)
            .context("No saved session, run `minecam login` first")?;
        Ok(self.api.clone().with_token(token))
    }
}
