use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Flashcard;

#[derive(Debug, Deserialize)]
pub struct FlashcardCreate {
    pub foreign_word: String,
    pub native_word: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// Partial update; an explicit `"example": null` clears the example.
#[derive(Debug, Default, Deserialize)]
pub struct FlashcardUpdate {
    #[serde(default)]
    pub foreign_word: Option<String>,
    #[serde(default)]
    pub native_word: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub example: Option<Option<String>>,
}

fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

#[derive(Debug, Serialize)]
pub struct FlashcardOut {
    pub id: Uuid,
    pub foreign_word: String,
    pub native_word: String,
    pub example: Option<String>,
    pub is_learned: bool,
    pub repetitions: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_reviewed: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Flashcard> for FlashcardOut {
    fn from(c: Flashcard) -> Self {
        Self {
            id: c.id,
            foreign_word: c.foreign_word,
            native_word: c.native_word,
            example: c.example,
            is_learned: c.is_learned,
            repetitions: c.repetitions,
            last_reviewed: c.last_reviewed,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 100 }

pub const MAX_LIMIT: i64 = 500;

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_LIMIT), self.offset.max(0))
    }
}

/// HTML add/edit card form.
#[derive(Debug, Default, Deserialize)]
pub struct FlashcardForm {
    #[serde(default)]
    pub foreign_word: Option<String>,
    #[serde(default)]
    pub native_word: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
}
