use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flashcard {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub foreign_word: String,
    pub native_word: String,
    pub example: Option<String>,
    pub is_learned: bool,
    pub repetitions: i32,
    pub last_reviewed: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Validated card fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlashcard {
    pub foreign_word: String,
    pub native_word: String,
    pub example: Option<String>,
}

/// Partial update. `example: Some(None)` clears the example.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashcardChanges {
    pub foreign_word: Option<String>,
    pub native_word: Option<String>,
    pub example: Option<Option<String>>,
}

/// Card joined with its owner's username, for the admin panel.
#[derive(Debug, Clone, FromRow)]
pub struct FlashcardWithOwner {
    #[sqlx(flatten)]
    pub card: Flashcard,
    pub owner_username: String,
}
