//! Hosting of the built frontend bundle.
//!
//! The bundle's files are served under `/static` and `/assets`. Every
//! other path that is not an API route falls back to a file of the bundle
//! or to `index.html`, so client-side routes survive a page reload.

use std::collections::HashSet;
use std::env;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use minecam_core::paths::{exe_dir, project_root};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::error::detail_response;

/// Environment variable naming the dist directory explicitly.
pub const FRONTEND_DIST_ENV: &str = "FRONTEND_DIST";

const INDEX_FILE: &str = "index.html";

/// Candidate dist directories in priority order, without duplicates.
///
/// `explicit` (usually `FRONTEND_DIST`) comes first, then the directories
/// next to the executable, then the source tree.
pub fn dist_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Ok(dir) = exe_dir() {
        candidates.push(dir.join("frontend").join("dist"));
        candidates.push(dir.join("dist"));
    }
    candidates.push(project_root().join("frontend").join("dist"));

    let mut seen = HashSet::new();
    candidates.retain(|path| {
        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        seen.insert(key)
    });
    candidates
}

/// First candidate that is a directory containing `index.html`.
pub fn find_dist_dir(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates {
        if !path.is_dir() {
            continue;
        }
        if path.join(INDEX_FILE).is_file() {
            info!(dist = %path.display(), "Located frontend bundle");
            return Some(path.clone());
        }
        warn!(dist = %path.display(), "Directory has no index.html, skipping");
    }
    None
}

/// Resolve the dist directory or fail.
///
/// An explicit path wins over `FRONTEND_DIST`.
pub fn resolve_dist_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let from_env = env::var_os(FRONTEND_DIST_ENV).map(PathBuf::from);
    let candidates = dist_candidates(explicit.or(from_env.as_deref()));
    for candidate in &candidates {
        tracing::debug!(candidate = %candidate.display(), "Frontend dist candidate");
    }
    match find_dist_dir(&candidates) {
        Some(dir) => Ok(dir),
        None => bail!(
            "Frontend dist directory not found (tried {}). Build the frontend, set {FRONTEND_DIST_ENV}, or run with static serving disabled.",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// What the fallback should do with a request path.
#[derive(Debug, PartialEq, Eq)]
enum Fallback {
    ApiNotFound,
    Forbidden,
    File(PathBuf),
    Index,
}

fn classify(dist: &Path, uri_path: &str) -> Fallback {
    let relative = uri_path.trim_start_matches('/');
    if relative.starts_with("api") {
        return Fallback::ApiNotFound;
    }
    if Path::new(relative)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Fallback::Forbidden;
    }

    let requested = dist.join(relative);
    if !requested.is_file() {
        return Fallback::Index;
    }
    // Symlinks may still point outside the bundle
    match (requested.canonicalize(), dist.canonicalize()) {
        (Ok(file), Ok(root)) if file.starts_with(&root) => Fallback::File(requested),
        _ => Fallback::Forbidden,
    }
}

async fn serve_file(path: PathBuf, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(e) => match e {},
    }
}

async fn fallback(State(dist): State<Arc<PathBuf>>, request: Request) -> Response {
    match classify(&dist, request.uri().path()) {
        Fallback::ApiNotFound => detail_response(StatusCode::NOT_FOUND, "API path not found"),
        Fallback::Forbidden => detail_response(StatusCode::FORBIDDEN, "Path not allowed"),
        Fallback::File(path) => serve_file(path, request).await,
        Fallback::Index => {
            let index = dist.join(INDEX_FILE);
            if index.is_file() {
                serve_file(index, request).await
            } else {
                detail_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Frontend entry point is missing",
                )
            }
        }
    }
}

/// Static mounts plus the single-page fallback for `dist`.
pub fn spa_routes(dist: &Path) -> Router {
    Router::new()
        .nest_service("/static", ServeDir::new(dist))
        .nest_service("/assets", ServeDir::new(dist.join("assets")))
        .fallback(fallback)
        .with_state(Arc::new(dist.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn bundle() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(INDEX_FILE), "<html></html>").unwrap();
        fs::write(temp.path().join("favicon.ico"), "icon").unwrap();
        temp
    }

    #[test]
    fn classifies_paths() {
        let temp = bundle();
        let dist = temp.path();
        assert_eq!(classify(dist, "/api/unknown"), Fallback::ApiNotFound);
        assert_eq!(classify(dist, "/apis"), Fallback::ApiNotFound);
        assert_eq!(classify(dist, "/../etc/passwd"), Fallback::Forbidden);
        assert_eq!(
            classify(dist, "/favicon.ico"),
            Fallback::File(dist.join("favicon.ico"))
        );
        assert_eq!(classify(dist, "/settings/video"), Fallback::Index);
        assert_eq!(classify(dist, "/"), Fallback::Index);
    }

    #[test]
    fn skips_directories_without_index() {
        let empty = TempDir::new().unwrap();
        let good = bundle();
        let found = find_dist_dir(&[
            empty.path().join("missing"),
            empty.path().to_path_buf(),
            good.path().to_path_buf(),
        ]);
        assert_eq!(found.as_deref(), Some(good.path()));
    }

    #[test]
    fn explicit_candidate_comes_first_once() {
        let good = bundle();
        let candidates = dist_candidates(Some(good.path()));
        assert_eq!(candidates[0], good.path());
        assert_eq!(
            candidates.iter().filter(|p| p.as_path() == good.path()).count(),
            1
        );
    }

    #[test]
    fn explicit_directory_resolves() {
        let good = bundle();
        assert_eq!(resolve_dist_dir(Some(good.path())).unwrap(), good.path());
    }
}
