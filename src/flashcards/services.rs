use super::repo_types::{Flashcard, FlashcardChanges, NewFlashcard};
use crate::error::{AppError, FieldError};

pub const WORD_MAX: usize = 100;
pub const EXAMPLE_MAX: usize = 500;

fn check_word(field: &'static str, value: &str) -> Result<String, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::new(field, "missing", "Foreign word and translation are required"));
    }
    if value.chars().count() > WORD_MAX {
        return Err(FieldError::new(
            field,
            "string_too_long",
            format!("Words must not exceed {WORD_MAX} characters"),
        ));
    }
    Ok(value.to_owned())
}

/// Empty examples become `None`.
fn check_example(value: Option<&str>) -> Result<Option<String>, FieldError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > EXAMPLE_MAX {
        return Err(FieldError::new(
            "example",
            "string_too_long",
            format!("Example must not exceed {EXAMPLE_MAX} characters"),
        ));
    }
    Ok(Some(value.to_owned()))
}

pub fn validate_new(
    foreign_word: &str,
    native_word: &str,
    example: Option<&str>,
) -> Result<NewFlashcard, AppError> {
    let foreign = check_word("foreign_word", foreign_word);
    let native = check_word("native_word", native_word);
    let example = check_example(example);

    match (foreign, native, example) {
        (Ok(foreign_word), Ok(native_word), Ok(example)) => Ok(NewFlashcard {
            foreign_word,
            native_word,
            example,
        }),
        (f, n, e) => Err(AppError::Validation(
            [f.err(), n.err(), e.err()].into_iter().flatten().collect(),
        )),
    }
}

pub fn validate_changes(
    foreign_word: Option<&str>,
    native_word: Option<&str>,
    example: Option<Option<&str>>,
) -> Result<FlashcardChanges, AppError> {
    let mut errors = Vec::new();
    let mut changes = FlashcardChanges::default();

    if let Some(v) = foreign_word {
        match check_word("foreign_word", v) {
            Ok(v) => changes.foreign_word = Some(v),
            Err(e) => errors.push(e),
        }
    }
    if let Some(v) = native_word {
        match check_word("native_word", v) {
            Ok(v) => changes.native_word = Some(v),
            Err(e) => errors.push(e),
        }
    }
    if let Some(v) = example {
        match check_example(v) {
            Ok(v) => changes.example = Some(v),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Progress summary shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckStats {
    pub total: usize,
    pub learned: usize,
    pub in_progress: usize,
}

impl DeckStats {
    pub fn from_cards(cards: &[Flashcard]) -> Self {
        let learned = cards.iter().filter(|c| c.is_learned).count();
        Self {
            total: cards.len(),
            learned,
            in_progress: cards.len() - learned,
        }
    }
}
