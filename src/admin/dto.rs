use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, FieldError},
    flashcards::{repo_types::NewFlashcard, services::validate_new},
};

/// HTML checkboxes are absent when unchecked and `on` when checked.
fn checkbox(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("on" | "true" | "1"))
}

#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_superuser: Option<String>,
}

impl UserForm {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default().trim()
    }

    /// Blank means "keep the current password" on edit.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    pub fn is_superuser(&self) -> bool {
        checkbox(&self.is_superuser)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CardForm {
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub foreign_word: Option<String>,
    #[serde(default)]
    pub native_word: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub is_learned: Option<String>,
    #[serde(default)]
    pub repetitions: Option<String>,
}

/// Every column the admin can set on a flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCard {
    pub owner_id: Uuid,
    pub card: NewFlashcard,
    pub is_learned: bool,
    pub repetitions: i32,
}

impl CardForm {
    pub fn parse(&self) -> Result<AdminCard, AppError> {
        let mut errors = Vec::new();

        let owner_id = match self.owner_id.as_deref().map(str::trim).map(Uuid::parse_str) {
            Some(Ok(id)) => Some(id),
            _ => {
                errors.push(FieldError::new("owner_id", "uuid_parsing", "Select an owner"));
                None
            }
        };

        let repetitions = match self
            .repetitions
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
        {
            None => Some(0),
            Some(raw) => match raw.parse::<i32>() {
                Ok(n) if n >= 0 => Some(n),
                _ => {
                    errors.push(FieldError::new(
                        "repetitions",
                        "int_parsing",
                        "Repetitions must be a non-negative integer",
                    ));
                    None
                }
            },
        };

        let card = match validate_new(
            self.foreign_word.as_deref().unwrap_or_default(),
            self.native_word.as_deref().unwrap_or_default(),
            self.example.as_deref(),
        ) {
            Ok(card) => Some(card),
            Err(AppError::Validation(mut more)) => {
                errors.append(&mut more);
                None
            }
            Err(e) => return Err(e),
        };

        match (owner_id, repetitions, card) {
            (Some(owner_id), Some(repetitions), Some(card)) if errors.is_empty() => Ok(AdminCard {
                owner_id,
                card,
                is_learned: checkbox(&self.is_learned),
                repetitions,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}
