use axum::{
    extract::{FromRef, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CardForm, SearchQuery, UserForm},
    services,
};
use crate::{
    auth::{
        cookies::{clear_cookie, session_cookie, ADMIN_COOKIE},
        dto::CredentialsForm,
        extractors::AdminUser,
        jwt::JwtKeys,
        repo_types::User,
        services::authenticate,
    },
    error::AppError,
    flashcards::repo,
    state::AppState,
    views::{
        admin::{self as pages, CardFormValues, UserFormValues},
        pages::not_found,
        Notice,
    },
};

const SEARCH_LIMIT: i64 = 500;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/login", get(login_page).post(login))
        .route("/admin/logout", get(logout))
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/new", get(new_user))
        .route("/admin/users/:id", get(show_user))
        .route("/admin/users/:id/edit", get(edit_user))
        .route("/admin/users/:id/update", post(update_user))
        .route("/admin/users/:id/delete", post(delete_user))
        .route("/admin/flashcards", get(list_flashcards).post(create_flashcard))
        .route("/admin/flashcards/new", get(new_flashcard))
        .route("/admin/flashcards/:id", get(show_flashcard))
        .route("/admin/flashcards/:id/edit", get(edit_flashcard))
        .route("/admin/flashcards/:id/update", post(update_flashcard))
        .route("/admin/flashcards/:id/delete", post(delete_flashcard))
}

/// Validation and conflict errors are shown in the form; anything else propagates.
fn form_error(e: AppError) -> Result<String, AppError> {
    match e {
        AppError::Validation(_) | AppError::BadRequest(_) => Ok(e.public_message()),
        other => Err(other),
    }
}

// --- session ---

pub async fn login_page() -> impl IntoResponse {
    pages::login(None)
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let Some((username, password)) = form.pair() else {
        return Ok((
            StatusCode::BAD_REQUEST,
            pages::login(Some("Username and password are required")),
        )
            .into_response());
    };

    match authenticate(&state.db, username, password).await? {
        Some(user) if user.is_superuser => {
            let token = JwtKeys::from_ref(&state).sign(&user.username)?;
            let cookie = session_cookie(
                ADMIN_COOKIE,
                &token,
                "/admin",
                state.config.session_ttl_secs(),
                state.config.cookie_secure,
            );
            info!(user_id = %user.id, "admin login");
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/admin")).into_response())
        }
        Some(user) => {
            warn!(user_id = %user.id, "admin login by non-superuser");
            Ok((
                StatusCode::FORBIDDEN,
                pages::login(Some(&AppError::Forbidden.to_string())),
            )
                .into_response())
        }
        None => Ok((
            StatusCode::UNAUTHORIZED,
            pages::login(Some(&AppError::InvalidCredentials.to_string())),
        )
            .into_response()),
    }
}

pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_cookie(ADMIN_COOKIE, "/admin"))],
        Redirect::to("/admin/login"),
    )
}

#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Response, AppError> {
    let users = User::count(&state.db).await?;
    let cards = repo::count(&state.db).await?;
    Ok(pages::index(&admin, users, cards).into_response())
}

// --- users ---

async fn users_page(
    state: &AppState,
    admin: &User,
    status: StatusCode,
    notice: Option<Notice>,
) -> Result<Response, AppError> {
    let users = User::list(&state.db).await?;
    Ok((status, pages::users(admin, &users, notice.as_ref())).into_response())
}

#[instrument(skip(state, admin))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Response, AppError> {
    users_page(&state, &admin, StatusCode::OK, None).await
}

pub async fn new_user(AdminUser(admin): AdminUser) -> impl IntoResponse {
    pages::user_form(&admin, &UserFormValues::default(), None)
}

#[instrument(skip(state, admin, form))]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    match services::create_user(&state.db, &form).await {
        Ok(user) => {
            users_page(
                &state,
                &admin,
                StatusCode::OK,
                Some(Notice::Success(format!("User '{}' created", user.username))),
            )
            .await
        }
        Err(e) => {
            let message = form_error(e)?;
            let values = UserFormValues {
                id: None,
                username: form.username().to_string(),
                is_superuser: form.is_superuser(),
            };
            Ok((
                StatusCode::BAD_REQUEST,
                pages::user_form(&admin, &values, Some(&message)),
            )
                .into_response())
        }
    }
}

#[instrument(skip(state, admin))]
pub async fn show_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    Ok(match User::find_by_id(&state.db, id).await? {
        Some(user) => pages::user_detail(&admin, &user).into_response(),
        None => not_found(),
    })
}

#[instrument(skip(state, admin))]
pub async fn edit_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(user) = User::find_by_id(&state.db, id).await? else {
        return Ok(not_found());
    };
    let values = UserFormValues {
        id: Some(user.id),
        username: user.username,
        is_superuser: user.is_superuser,
    };
    Ok(pages::user_form(&admin, &values, None).into_response())
}

#[instrument(skip(state, admin, form))]
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    match services::update_user(&state.db, &admin, id, &form).await {
        Ok(Some(user)) => {
            users_page(
                &state,
                &admin,
                StatusCode::OK,
                Some(Notice::Success(format!("User '{}' updated", user.username))),
            )
            .await
        }
        Ok(None) => Ok(not_found()),
        Err(e) => {
            let message = form_error(e)?;
            let values = UserFormValues {
                id: Some(id),
                username: form.username().to_string(),
                is_superuser: form.is_superuser(),
            };
            Ok((
                StatusCode::BAD_REQUEST,
                pages::user_form(&admin, &values, Some(&message)),
            )
                .into_response())
        }
    }
}

#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match services::delete_user(&state.db, &admin, id).await {
        Ok(true) => {
            users_page(
                &state,
                &admin,
                StatusCode::OK,
                Some(Notice::Success("User deleted".into())),
            )
            .await
        }
        Ok(false) => Ok(not_found()),
        Err(e) => {
            let message = form_error(e)?;
            users_page(&state, &admin, StatusCode::BAD_REQUEST, Some(Notice::Error(message))).await
        }
    }
}

// --- flashcards ---

async fn flashcards_page(
    state: &AppState,
    admin: &User,
    query: Option<&str>,
    status: StatusCode,
    notice: Option<Notice>,
) -> Result<Response, AppError> {
    let cards = repo::admin_search(&state.db, query, SEARCH_LIMIT).await?;
    Ok((status, pages::flashcards(admin, &cards, query, notice.as_ref())).into_response())
}

async fn card_form_page(
    state: &AppState,
    admin: &User,
    values: &CardFormValues,
    status: StatusCode,
    error: Option<&str>,
) -> Result<Response, AppError> {
    let owners = User::list(&state.db).await?;
    Ok((status, pages::flashcard_form(admin, values, &owners, error)).into_response())
}

fn echo_card_form(id: Option<Uuid>, form: &CardForm) -> CardFormValues {
    CardFormValues {
        id,
        owner_id: form
            .owner_id
            .as_deref()
            .and_then(|s| Uuid::parse_str(s.trim()).ok()),
        foreign_word: form.foreign_word.clone().unwrap_or_default(),
        native_word: form.native_word.clone().unwrap_or_default(),
        example: form.example.clone().unwrap_or_default(),
        is_learned: matches!(form.is_learned.as_deref(), Some("on" | "true" | "1")),
        repetitions: form.repetitions.clone().unwrap_or_default(),
    }
}

#[instrument(skip(state, admin))]
pub async fn list_flashcards(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(search): Query<SearchQuery>,
) -> Result<Response, AppError> {
    flashcards_page(&state, &admin, search.q.as_deref(), StatusCode::OK, None).await
}

#[instrument(skip(state, admin))]
pub async fn new_flashcard(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Response, AppError> {
    let values = CardFormValues {
        owner_id: Some(admin.id),
        repetitions: "0".into(),
        ..CardFormValues::default()
    };
    card_form_page(&state, &admin, &values, StatusCode::OK, None).await
}

#[instrument(skip(state, admin, form))]
pub async fn create_flashcard(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Form(form): Form<CardForm>,
) -> Result<Response, AppError> {
    let parsed = match form.parse() {
        Ok(p) => p,
        Err(e) => {
            let message = form_error(e)?;
            let values = echo_card_form(None, &form);
            return card_form_page(&state, &admin, &values, StatusCode::BAD_REQUEST, Some(&message))
                .await;
        }
    };
    if User::find_by_id(&state.db, parsed.owner_id).await?.is_none() {
        let values = echo_card_form(None, &form);
        return card_form_page(
            &state,
            &admin,
            &values,
            StatusCode::BAD_REQUEST,
            Some("Owner does not exist"),
        )
        .await;
    }

    let card = repo::admin_create(
        &state.db,
        parsed.owner_id,
        &parsed.card,
        parsed.is_learned,
        parsed.repetitions,
    )
    .await?;
    info!(card_id = %card.id, by = %admin.username, "admin created flashcard");
    flashcards_page(
        &state,
        &admin,
        None,
        StatusCode::OK,
        Some(Notice::Success(format!("Flashcard '{}' created", card.foreign_word))),
    )
    .await
}

#[instrument(skip(state, admin))]
pub async fn show_flashcard(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    Ok(match repo::admin_get(&state.db, id).await? {
        Some(card) => pages::flashcard_detail(&admin, &card).into_response(),
        None => not_found(),
    })
}

#[instrument(skip(state, admin))]
pub async fn edit_flashcard(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(c) = repo::admin_get(&state.db, id).await? else {
        return Ok(not_found());
    };
    let values = CardFormValues {
        id: Some(c.card.id),
        owner_id: Some(c.card.owner_id),
        foreign_word: c.card.foreign_word,
        native_word: c.card.native_word,
        example: c.card.example.unwrap_or_default(),
        is_learned: c.card.is_learned,
        repetitions: c.card.repetitions.to_string(),
    };
    card_form_page(&state, &admin, &values, StatusCode::OK, None).await
}

#[instrument(skip(state, admin, form))]
pub async fn update_flashcard(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Form(form): Form<CardForm>,
) -> Result<Response, AppError> {
    let parsed = match form.parse() {
        Ok(p) => p,
        Err(e) => {
            let message = form_error(e)?;
            let values = echo_card_form(Some(id), &form);
            return card_form_page(&state, &admin, &values, StatusCode::BAD_REQUEST, Some(&message))
                .await;
        }
    };
    if User::find_by_id(&state.db, parsed.owner_id).await?.is_none() {
        let values = echo_card_form(Some(id), &form);
        return card_form_page(
            &state,
            &admin,
            &values,
            StatusCode::BAD_REQUEST,
            Some("Owner does not exist"),
        )
        .await;
    }

    let Some(card) = repo::admin_update(
        &state.db,
        id,
        parsed.owner_id,
        &parsed.card,
        parsed.is_learned,
        parsed.repetitions,
    )
    .await?
    else {
        return Ok(not_found());
    };
    info!(card_id = %card.id, by = %admin.username, "admin updated flashcard");
    flashcards_page(
        &state,
        &admin,
        None,
        StatusCode::OK,
        Some(Notice::Success(format!("Flashcard '{}' updated", card.foreign_word))),
    )
    .await
}

#[instrument(skip(state, admin))]
pub async fn delete_flashcard(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !repo::admin_delete(&state.db, id).await? {
        return Ok(not_found());
    }
    info!(card_id = %id, by = %admin.username, "admin deleted flashcard");
    flashcards_page(
        &state,
        &admin,
        None,
        StatusCode::OK,
        Some(Notice::Success("Flashcard deleted".into())),
    )
    .await
}
