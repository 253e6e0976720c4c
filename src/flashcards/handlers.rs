use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{FlashcardCreate, FlashcardOut, FlashcardUpdate, Pagination},
    repo,
    services::{validate_changes, validate_new},
};
use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/flashcards", get(list_flashcards).post(create_flashcard))
        .route(
            "/flashcards/:id",
            get(get_flashcard)
                .put(update_flashcard)
                .delete(delete_flashcard),
        )
        .route("/flashcards/:id/mark-learned", post(mark_learned))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_flashcard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<FlashcardCreate>,
) -> Result<(StatusCode, Json<FlashcardOut>), AppError> {
    let card = validate_new(&body.foreign_word, &body.native_word, body.example.as_deref())?;
    let created = repo::create(&state.db, user.id, &card).await?;
    info!(card_id = %created.id, "flashcard created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_flashcards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(p): ApiQuery<Pagination>,
) -> Result<Json<Vec<FlashcardOut>>, AppError> {
    let (limit, offset) = p.clamped();
    let cards = repo::list_by_owner(&state.db, user.id, limit, offset).await?;
    Ok(Json(cards.into_iter().map(FlashcardOut::from).collect()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_flashcard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<FlashcardOut>, AppError> {
    repo::get_owned(&state.db, user.id, id)
        .await?
        .map(|c| Json(c.into()))
        .ok_or(AppError::NotFound("Flashcard"))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_flashcard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<FlashcardUpdate>,
) -> Result<Json<FlashcardOut>, AppError> {
    let changes = validate_changes(
        body.foreign_word.as_deref(),
        body.native_word.as_deref(),
        body.example.as_ref().map(|e| e.as_deref()),
    )?;
    repo::update_owned(&state.db, user.id, id, &changes)
        .await?
        .map(|c| Json(c.into()))
        .ok_or(AppError::NotFound("Flashcard"))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn mark_learned(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<FlashcardOut>, AppError> {
    let card = repo::toggle_learned(&state.db, user.id, id)
        .await?
        .ok_or(AppError::NotFound("Flashcard"))?;
    info!(card_id = %card.id, is_learned = card.is_learned, "flashcard review toggled");
    Ok(Json(card.into()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_flashcard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    match repo::delete_owned(&state.db, user.id, id).await? {
        Some(_) => {
            info!(card_id = %id, "flashcard deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::NotFound("Flashcard")),
    }
}
