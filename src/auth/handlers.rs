use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{PublicUser, RegisterRequest, RegisteredUser, TokenForm, TokenResponse},
        extractors::CurrentUser,
        jwt::JwtKeys,
        services::{authenticate, register as register_user},
    },
    error::AppError,
    extract::{ApiForm, ApiJson},
    state::AppState,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(token))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUser>), AppError> {
    let username = payload.username.trim();
    let user = register_user(&state.db, username, &payload.password, false).await?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// OAuth2 password flow: form-encoded credentials in, bearer token out.
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn token(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<TokenForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = authenticate(&state.db, form.username.trim(), &form.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&user.username).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;

    info!(user_id = %user.id, "token issued");
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[instrument(skip(user), fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}
