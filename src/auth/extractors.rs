use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;

use super::{
    cookies::{read_cookie, ADMIN_COOKIE, SESSION_COOKIE},
    jwt::JwtKeys,
    repo_types::User,
    services::resolve_token,
};
use crate::{error::AppError, state::AppState};

/// API caller authenticated by `Authorization: Bearer <jwt>`.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AppError::Unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        resolve_token(&state.db, &keys, token).await.map(CurrentUser)
    }
}

/// Browser user authenticated by the `access_token` cookie.
/// Unauthenticated requests are sent back to the landing page.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| Redirect::to("/").into_response())?;

        let keys = JwtKeys::from_ref(state);
        match resolve_token(&state.db, &keys, &token).await {
            Ok(user) => Ok(SessionUser(user)),
            Err(AppError::Unauthorized) => Err(Redirect::to("/").into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// Superuser authenticated by the `admin_token` cookie.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let to_login = || Redirect::to("/admin/login").into_response();

        let token = read_cookie(&parts.headers, ADMIN_COOKIE).ok_or_else(to_login)?;

        let keys = JwtKeys::from_ref(state);
        let user = match resolve_token(&state.db, &keys, &token).await {
            Ok(user) => user,
            Err(AppError::Unauthorized) => return Err(to_login()),
            Err(e) => return Err(e.into_response()),
        };

        if !user.is_superuser {
            warn!(username = %user.username, "admin access by non-superuser");
            return Err(to_login());
        }
        Ok(AdminUser(user))
    }
}
