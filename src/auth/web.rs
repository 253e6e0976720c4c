use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument};

use super::{
    cookies::{clear_cookie, session_cookie, SESSION_COOKIE},
    dto::CredentialsForm,
    jwt::JwtKeys,
    services::{authenticate, register},
};
use crate::{
    error::AppError,
    state::AppState,
    views::pages::{self, Landing},
};

pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/web/login", post(login))
        .route("/web/register", post(register_form))
        .route("/logout", get(logout))
}

pub async fn home() -> impl IntoResponse {
    pages::landing(&Landing::default())
}

fn landing_with(status: StatusCode, page: Landing) -> Response {
    (status, pages::landing(&page)).into_response()
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some((username, password)) = form.pair() else {
        return Ok(landing_with(
            StatusCode::BAD_REQUEST,
            Landing {
                login_error: Some("Username and password are required".into()),
                ..Landing::default()
            },
        ));
    };

    let Some(user) = authenticate(&state.db, username, password).await? else {
        return Ok(landing_with(
            StatusCode::UNAUTHORIZED,
            Landing {
                login_error: Some(AppError::InvalidCredentials.to_string()),
                ..Landing::default()
            },
        ));
    };

    let token = JwtKeys::from_ref(&state).sign(&user.username)?;
    let cookie = session_cookie(
        SESSION_COOKIE,
        &token,
        "/",
        state.config.session_ttl_secs(),
        state.config.cookie_secure,
    );

    info!(user_id = %user.id, "web login");
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
}

#[instrument(skip(state, form))]
pub async fn register_form(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some((username, password)) = form.pair() else {
        return Ok(landing_with(
            StatusCode::BAD_REQUEST,
            Landing {
                register_error: Some("Username and password are required".into()),
                ..Landing::default()
            },
        ));
    };

    match register(&state.db, username, password, false).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "user registered via web");
            Ok(landing_with(
                StatusCode::OK,
                Landing {
                    success: Some("Registration successful! You can now log in.".into()),
                    ..Landing::default()
                },
            ))
        }
        Err(e @ (AppError::Validation(_) | AppError::BadRequest(_))) => Ok(landing_with(
            StatusCode::BAD_REQUEST,
            Landing {
                register_error: Some(e.public_message()),
                ..Landing::default()
            },
        )),
        Err(e) => Err(e),
    }
}

pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_cookie(SESSION_COOKIE, "/"))],
        Redirect::to("/"),
    )
}
