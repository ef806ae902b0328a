//! Login, current user and logout.

use axum::extract::State;
use axum::Json;
use minecam_core::{AccessToken, ApiResponse, PublicUser};
use serde::Deserialize;
use tracing::info;

use crate::auth::{self, CurrentUser};
use crate::error::HttpError;
use crate::extract::ApiForm;
use crate::state::AppState;

/// Form body of `POST /api/token`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Exchange a username and password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<ApiResponse<AccessToken>>, HttpError> {
    let users = state.users.clone();
    let username = form.username.clone();
    // bcrypt verification is CPU bound
    let user = tokio::task::spawn_blocking(move || {
        auth::authenticate(&users, &form.username, &form.password)
    })
    .await
    .map_err(|e| HttpError::Internal(format!("Login task failed: {e}")))??;

    let token = state.jwt.issue(&user)?;
    info!(username = %username, "User logged in");

    Ok(Json(ApiResponse::ok(
        AccessToken::bearer(token, PublicUser::from(&user)),
        "Login successful",
    )))
}

/// The user the bearer token belongs to.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<PublicUser>> {
    Json(ApiResponse::ok(
        PublicUser::from(&user),
        "User info retrieved",
    ))
}

/// Tokens are stateless; logging out only tells the client to drop its token.
pub async fn logout() -> Json<ApiResponse<Option<()>>> {
    Json(ApiResponse::ok(None, "Logged out"))
}
