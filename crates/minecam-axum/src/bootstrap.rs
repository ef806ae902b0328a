//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use minecam_core::config::USERS_FILE;
use minecam_core::paths::{config_dir, data_dir, lut_dir, settings_file};
use minecam_core::{
    CameraCatalog, ConfigError, EnhanceParamsStore, JsonSettingsRepository, PathError,
    SettingsService, UserStore,
};
use minecam_runtime::ffmpeg::validate_runtime_dependencies;
use minecam_runtime::{StreamSettings, VideoStreamManager};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::auth::{DEFAULT_TOKEN_TTL, JwtConfig};
use crate::spa::resolve_dist_dir;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;
/// Frontend dev server allowed when `FRONTEND_URLS` is unset.
pub const DEFAULT_FRONTEND_URLS: &str = "http://localhost:5173";
/// Origins of the bundled frontend served by this process.
const LOCAL_ORIGINS: [&str; 2] = ["http://localhost:8000", "http://127.0.0.1:8000"];

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// Build from the values of `ENV` and `FRONTEND_URLS`.
    ///
    /// `development` allows every origin. Anything else allows the listed
    /// origins plus the local addresses of this server.
    pub fn from_values(mode: Option<&str>, frontend_urls: Option<&str>) -> Self {
        if mode == Some("development") {
            warn!("Development mode: allowing all CORS origins");
            return Self::AllowAll;
        }
        let mut origins: Vec<String> = frontend_urls
            .unwrap_or(DEFAULT_FRONTEND_URLS)
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        for local in LOCAL_ORIGINS {
            if !origins.iter().any(|o| o == local) {
                origins.push(local.to_string());
            }
        }
        Self::AllowOrigins(origins)
    }

    /// Build from the process environment.
    pub fn from_env() -> Self {
        let mode = env::var("ENV").ok();
        let urls = env::var("FRONTEND_URLS").ok();
        Self::from_values(mode.as_deref(), urls.as_deref())
    }
}

/// Where the operator-provided files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub lut_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl DataPaths {
    /// Resolve from the environment overrides or the executable's directory.
    pub fn from_env() -> Result<Self, PathError> {
        Ok(Self {
            config_dir: config_dir()?,
            data_dir: data_dir()?,
            lut_dir: lut_dir()?,
            settings_file: settings_file()?,
        })
    }

    /// The standard layout under one root directory.
    pub fn under(root: &Path) -> Self {
        let config_dir = root.join("config");
        Self {
            settings_file: config_dir.join("system_settings.json"),
            config_dir,
            data_dir: root.join("data"),
            lut_dir: root.join("lut"),
        }
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Explicit frontend bundle directory; resolved automatically when unset.
    pub static_dir: Option<PathBuf>,
    /// Serve only the API, never the frontend bundle.
    pub api_only: bool,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// JWT signing secret. The development secret is used when unset.
    pub secret_key: Option<String>,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// Fail startup when ffmpeg is missing instead of warning.
    pub strict_dependencies: bool,
    /// Configuration, data and LUT locations.
    pub paths: DataPaths,
    /// Decoder settings shared by every camera.
    pub stream: StreamSettings,
}

impl ServerConfig {
    /// Create config from the environment with default bind address.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            api_only: false,
            cors: CorsConfig::from_env(),
            secret_key: env::var("SECRET_KEY").ok(),
            token_ttl: DEFAULT_TOKEN_TTL,
            strict_dependencies: env::var("REQUIRE_RUNTIME_DEPENDENCIES").as_deref() == Ok("1"),
            paths: DataPaths::from_env().context("Failed to resolve data directories")?,
            stream: StreamSettings::default(),
        })
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
///
/// Holds every service the handlers use.
pub struct AxumContext {
    /// Camera and RTSP configuration, re-read on every call.
    pub catalog: CameraCatalog,
    /// User records, re-read on every call.
    pub users: UserStore,
    /// Persisted system settings.
    pub settings: SettingsService,
    /// Per-camera stream processors and the shared enhancement parameters.
    pub manager: Arc<VideoStreamManager>,
    /// Token issuer and verifier.
    pub jwt: JwtConfig,
}

/// Bootstrap the Axum server with all services.
///
/// Checks for ffmpeg, loads the camera configuration (an unreadable file
/// yields no cameras), reports the user file and starts a processor for
/// every camera.
pub async fn bootstrap(config: ServerConfig) -> Result<AxumContext> {
    let paths = &config.paths;
    tracing::info!(
        target: "minecam.paths",
        config_dir = %paths.config_dir.display(),
        data_dir = %paths.data_dir.display(),
        lut_dir = %paths.lut_dir.display(),
        settings_file = %paths.settings_file.display(),
        "Axum bootstrap resolved paths"
    );

    // 1. Decoder binary
    let mut stream = config.stream.clone();
    if stream.ffmpeg.is_none() {
        stream.ffmpeg = validate_runtime_dependencies(config.strict_dependencies)
            .context("Runtime dependency check failed")?;
    }

    // 2. Configuration files
    let catalog = CameraCatalog::new(&paths.config_dir, &paths.lut_dir);
    let cameras = catalog.cameras_or_empty();
    info!(count = cameras.len(), "Loaded camera configuration");

    let users = UserStore::new(paths.users_file());
    match users.load_all() {
        Ok(all) => info!(count = all.len(), "Loaded user entries"),
        Err(ConfigError::Missing(path)) => {
            warn!(path = %path.display(), "User file is missing, nobody can log in");
        }
        Err(e) => warn!(error = %e, "User file is unreadable"),
    }

    let settings = SettingsService::new(Arc::new(JsonSettingsRepository::new(
        &paths.settings_file,
    )));

    // 3. Stream processors
    let manager = Arc::new(VideoStreamManager::new(stream, EnhanceParamsStore::new()));
    for camera in &cameras {
        manager.register_camera(camera).await;
    }

    let jwt = JwtConfig::from_secret(config.secret_key.as_deref(), config.token_ttl);

    Ok(AxumContext {
        catalog,
        users,
        settings,
        manager,
        jwt,
    })
}

/// Wait for Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Start the web server and run until a shutdown signal.
///
/// Serves the frontend bundle unless `config.api_only` is set; a missing
/// bundle is an error so the server never starts half-configured. Every
/// decoder is stopped after the server has drained.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let static_dir = if config.api_only {
        None
    } else {
        Some(resolve_dist_dir(config.static_dir.as_deref())?)
    };

    let ctx = bootstrap(config.clone()).await?;
    let manager = Arc::clone(&ctx.manager);

    let app = if let Some(ref static_dir) = static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    if static_dir.is_some() {
        info!("minecam web server (with UI) listening on http://{}", addr);
    } else {
        info!("minecam web server (API only) listening on http://{}", addr);
    }

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    manager.stop_all().await;
    info!("minecam web server stopped");
    served.context("HTTP server failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_allows_everything() {
        assert_eq!(
            CorsConfig::from_values(Some("development"), Some("http://x")),
            CorsConfig::AllowAll
        );
    }

    #[test]
    fn production_appends_local_origins_once() {
        let cors = CorsConfig::from_values(
            Some("production"),
            Some(" http://ui.local , http://localhost:8000,"),
        );
        assert_eq!(
            cors,
            CorsConfig::AllowOrigins(vec![
                "http://ui.local".into(),
                "http://localhost:8000".into(),
                "http://127.0.0.1:8000".into(),
            ])
        );
    }

    #[test]
    fn production_defaults_to_dev_server() {
        let CorsConfig::AllowOrigins(origins) = CorsConfig::from_values(None, None) else {
            panic!("expected explicit origins");
        };
        assert_eq!(origins[0], DEFAULT_FRONTEND_URLS);
        assert_eq!(origins.len(), 3);
    }

    #[test]
    fn standard_layout() {
        let paths = DataPaths::under(Path::new("/srv/minecam"));
        assert_eq!(paths.config_dir, Path::new("/srv/minecam/config"));
        assert_eq!(
            paths.settings_file,
            Path::new("/srv/minecam/config/system_settings.json")
        );
        assert_eq!(paths.users_file(), Path::new("/srv/minecam/data/users.json"));
    }
}
