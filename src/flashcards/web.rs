use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::FlashcardForm,
    repo,
    repo_types::FlashcardChanges,
    services::validate_new,
};
use crate::{
    auth::{extractors::SessionUser, repo_types::User},
    error::AppError,
    state::AppState,
    views::{
        pages::{self, EditCard},
        Notice,
    },
};

pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/web/flashcards", post(create_flashcard))
        .route("/web/flashcards/:id/edit", get(edit_form))
        .route("/web/flashcards/:id/update", post(update_flashcard))
        .route("/web/flashcards/:id/mark-learned", post(mark_learned))
        .route("/web/flashcards/:id/delete", post(delete_flashcard))
}

async fn render_dashboard(
    state: &AppState,
    user: &User,
    status: StatusCode,
    notice: Option<Notice>,
) -> Result<Response, AppError> {
    let cards = repo::list_all_by_owner(&state.db, user.id).await?;
    Ok((status, pages::dashboard(user, &cards, notice.as_ref())).into_response())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Response, AppError> {
    render_dashboard(&state, &user, StatusCode::OK, None).await
}

#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn create_flashcard(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Form(form): Form<FlashcardForm>,
) -> Result<Response, AppError> {
    let card = match validate_new(
        form.foreign_word.as_deref().unwrap_or_default(),
        form.native_word.as_deref().unwrap_or_default(),
        form.example.as_deref(),
    ) {
        Ok(card) => card,
        Err(e @ AppError::Validation(_)) => {
            return render_dashboard(
                &state,
                &user,
                StatusCode::BAD_REQUEST,
                Some(Notice::Error(e.public_message())),
            )
            .await
        }
        Err(e) => return Err(e),
    };

    let created = repo::create(&state.db, user.id, &card).await?;
    info!(card_id = %created.id, "flashcard created");
    render_dashboard(
        &state,
        &user,
        StatusCode::OK,
        Some(Notice::Success("Flashcard added!".into())),
    )
    .await
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn edit_form(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(card) = repo::get_owned(&state.db, user.id, id).await? else {
        return Ok(pages::not_found());
    };
    Ok(pages::edit_flashcard(&user, &EditCard::from(&card), None).into_response())
}

#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn update_flashcard(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
    Form(form): Form<FlashcardForm>,
) -> Result<Response, AppError> {
    let card = match validate_new(
        form.foreign_word.as_deref().unwrap_or_default(),
        form.native_word.as_deref().unwrap_or_default(),
        form.example.as_deref(),
    ) {
        Ok(card) => card,
        Err(e @ AppError::Validation(_)) => {
            let draft = EditCard {
                id,
                foreign_word: form.foreign_word.unwrap_or_default(),
                native_word: form.native_word.unwrap_or_default(),
                example: form.example.unwrap_or_default(),
            };
            let page = pages::edit_flashcard(&user, &draft, Some(&e.public_message()));
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
        Err(e) => return Err(e),
    };

    let changes = FlashcardChanges {
        foreign_word: Some(card.foreign_word),
        native_word: Some(card.native_word),
        example: Some(card.example),
    };
    if repo::update_owned(&state.db, user.id, id, &changes).await?.is_none() {
        return Ok(pages::not_found());
    }
    info!(card_id = %id, "flashcard updated");
    render_dashboard(
        &state,
        &user,
        StatusCode::OK,
        Some(Notice::Success("Flashcard updated!".into())),
    )
    .await
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn mark_learned(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(card) = repo::toggle_learned(&state.db, user.id, id).await? else {
        return Ok(pages::not_found());
    };
    info!(card_id = %card.id, is_learned = card.is_learned, "flashcard review toggled");
    let status = if card.is_learned { "learned" } else { "not learned" };
    render_dashboard(
        &state,
        &user,
        StatusCode::OK,
        Some(Notice::Success(format!(
            "Flashcard '{}' marked as {status}",
            card.foreign_word
        ))),
    )
    .await
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_flashcard(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(card) = repo::delete_owned(&state.db, user.id, id).await? else {
        return Ok(pages::not_found());
    };
    info!(card_id = %card.id, "flashcard deleted");
    render_dashboard(
        &state,
        &user,
        StatusCode::OK,
        Some(Notice::Success(format!(
            "Flashcard '{}' deleted",
            card.foreign_word
        ))),
    )
    .await
}
