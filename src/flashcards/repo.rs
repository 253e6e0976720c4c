use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Flashcard, FlashcardChanges, FlashcardWithOwner, NewFlashcard};

const CARD_COLUMNS: &str = "id, owner_id, foreign_word, native_word, example, is_learned, \
                            repetitions, last_reviewed, created_at";

// ---- owner-scoped ----

pub async fn create(db: &PgPool, owner_id: Uuid, card: &NewFlashcard) -> sqlx::Result<Flashcard> {
    sqlx::query_as::<_, Flashcard>(&format!(
        r#"
        INSERT INTO flashcards (owner_id, foreign_word, native_word, example)
        VALUES ($1, $2, $3, $4)
        RETURNING {CARD_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(&card.foreign_word)
    .bind(&card.native_word)
    .bind(&card.example)
    .fetch_one(db)
    .await
}

pub async fn list_by_owner(
    db: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(&format!(
        r#"
        SELECT {CARD_COLUMNS}
          FROM flashcards
         WHERE owner_id = $1
         ORDER BY created_at DESC, id
         LIMIT $2 OFFSET $3
        "#
    ))
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn list_all_by_owner(db: &PgPool, owner_id: Uuid) -> sqlx::Result<Vec<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(&format!(
        r#"
        SELECT {CARD_COLUMNS}
          FROM flashcards
         WHERE owner_id = $1
         ORDER BY created_at DESC, id
        "#
    ))
    .bind(owner_id)
    .fetch_all(db)
    .await
}

pub async fn get_owned(db: &PgPool, owner_id: Uuid, id: Uuid) -> sqlx::Result<Option<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(&format!(
        "SELECT {CARD_COLUMNS} FROM flashcards WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

pub async fn update_owned(
    db: &PgPool,
    owner_id: Uuid,
    id: Uuid,
    changes: &FlashcardChanges,
) -> sqlx::Result<Option<Flashcard>> {
    let (set_example, example) = match &changes.example {
        Some(value) => (true, value.clone()),
        None => (false, None),
    };
    sqlx::query_as::<_, Flashcard>(&format!(
        r#"
        UPDATE flashcards
           SET foreign_word = COALESCE($3, foreign_word),
               native_word  = COALESCE($4, native_word),
               example      = CASE WHEN $5 THEN $6 ELSE example END
         WHERE id = $1 AND owner_id = $2
        RETURNING {CARD_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(&changes.foreign_word)
    .bind(&changes.native_word)
    .bind(set_example)
    .bind(example)
    .fetch_optional(db)
    .await
}

/// Flips the learned flag, counts a repetition and stamps the review time.
pub async fn toggle_learned(
    db: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(&format!(
        r#"
        UPDATE flashcards
           SET is_learned    = NOT is_learned,
               repetitions   = repetitions + 1,
               last_reviewed = now()
         WHERE id = $1 AND owner_id = $2
        RETURNING {CARD_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

/// Returns the deleted card, if the caller owned it.
pub async fn delete_owned(
    db: &PgPool,
    owner_id: Uuid,
    id: Uuid,
) -> sqlx::Result<Option<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(&format!(
        "DELETE FROM flashcards WHERE id = $1 AND owner_id = $2 RETURNING {CARD_COLUMNS}"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

// ---- admin (unscoped) ----

fn with_owner_select() -> String {
    format!(
        "SELECT {cols}, u.username AS owner_username \
           FROM flashcards f JOIN users u ON u.id = f.owner_id",
        cols = CARD_COLUMNS
            .split(',')
            .map(|c| format!("f.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// All cards, optionally filtered by a case-insensitive substring of either word.
pub async fn admin_search(
    db: &PgPool,
    query: Option<&str>,
    limit: i64,
) -> sqlx::Result<Vec<FlashcardWithOwner>> {
    let pattern = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", escape_like(q)));
    sqlx::query_as::<_, FlashcardWithOwner>(&format!(
        r#"
        {select}
         WHERE $1::text IS NULL
            OR f.foreign_word ILIKE $1
            OR f.native_word ILIKE $1
         ORDER BY f.created_at DESC, f.id
         LIMIT $2
        "#,
        select = with_owner_select()
    ))
    .bind(pattern)
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn admin_get(db: &PgPool, id: Uuid) -> sqlx::Result<Option<FlashcardWithOwner>> {
    sqlx::query_as::<_, FlashcardWithOwner>(&format!(
        "{select} WHERE f.id = $1",
        select = with_owner_select()
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn admin_create(
    db: &PgPool,
    owner_id: Uuid,
    card: &NewFlashcard,
    is_learned: bool,
    repetitions: i32,
) -> sqlx::Result<Flashcard> {
    sqlx::query_as::<_, Flashcard>(&format!(
        r#"
        INSERT INTO flashcards (owner_id, foreign_word, native_word, example, is_learned, repetitions)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {CARD_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(&card.foreign_word)
    .bind(&card.native_word)
    .bind(&card.example)
    .bind(is_learned)
    .bind(repetitions)
    .fetch_one(db)
    .await
}

pub async fn admin_update(
    db: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    card: &NewFlashcard,
    is_learned: bool,
    repetitions: i32,
) -> sqlx::Result<Option<Flashcard>> {
    sqlx::query_as::<_, Flashcard>(&format!(
        r#"
        UPDATE flashcards
           SET owner_id = $2,
               foreign_word = $3,
               native_word = $4,
               example = $5,
               is_learned = $6,
               repetitions = $7
         WHERE id = $1
        RETURNING {CARD_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(&card.foreign_word)
    .bind(&card.native_word)
    .bind(&card.example)
    .bind(is_learned)
    .bind(repetitions)
    .fetch_optional(db)
    .await
}

pub async fn admin_delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM flashcards WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn count(db: &PgPool) -> sqlx::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM flashcards")
        .fetch_one(db)
        .await?;
    Ok(n)
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn owner_select_prefixes_columns() {
        let sql = with_owner_select();
        assert!(sql.contains("f.foreign_word"));
        assert!(sql.contains("f.last_reviewed"));
        assert!(sql.contains("u.username AS owner_username"));
        assert!(!sql.contains("f.f."));
    }

    use crate::auth::repo_types::User;

    async fn user(db: &PgPool, name: &str) -> User {
        User::create(db, name, "not-a-real-hash", false).await.unwrap()
    }

    fn card(foreign: &str, native: &str, example: Option<&str>) -> NewFlashcard {
        NewFlashcard {
            foreign_word: foreign.into(),
            native_word: native.into(),
            example: example.map(Into::into),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cards_are_invisible_to_other_owners(db: PgPool) {
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        let c = create(&db, alice.id, &card("Hund", "dog", None)).await.unwrap();

        assert!(get_owned(&db, bob.id, c.id).await.unwrap().is_none());
        let changes = FlashcardChanges {
            foreign_word: Some("Katze".into()),
            ..FlashcardChanges::default()
        };
        assert!(update_owned(&db, bob.id, c.id, &changes).await.unwrap().is_none());
        assert!(toggle_learned(&db, bob.id, c.id).await.unwrap().is_none());
        assert!(delete_owned(&db, bob.id, c.id).await.unwrap().is_none());
        assert!(list_by_owner(&db, bob.id, 100, 0).await.unwrap().is_empty());

        let still = get_owned(&db, alice.id, c.id).await.unwrap().unwrap();
        assert_eq!(still.foreign_word, "Hund");
        assert_eq!(still.repetitions, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn toggle_flips_flag_and_counts_reviews(db: PgPool) {
        let alice = user(&db, "alice").await;
        let c = create(&db, alice.id, &card("Hund", "dog", None)).await.unwrap();
        assert!(!c.is_learned);
        assert!(c.last_reviewed.is_none());

        let once = toggle_learned(&db, alice.id, c.id).await.unwrap().unwrap();
        assert!(once.is_learned);
        assert_eq!(once.repetitions, 1);
        assert!(once.last_reviewed.is_some());

        let twice = toggle_learned(&db, alice.id, c.id).await.unwrap().unwrap();
        assert!(!twice.is_learned);
        assert_eq!(twice.repetitions, 2);
        assert!(twice.last_reviewed >= once.last_reviewed);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn partial_update_keeps_or_clears_example(db: PgPool) {
        let alice = user(&db, "alice").await;
        let c = create(&db, alice.id, &card("Hund", "dog", Some("Der Hund bellt")))
            .await
            .unwrap();

        let untouched = FlashcardChanges {
            native_word: Some("hound".into()),
            ..FlashcardChanges::default()
        };
        let updated = update_owned(&db, alice.id, c.id, &untouched).await.unwrap().unwrap();
        assert_eq!(updated.native_word, "hound");
        assert_eq!(updated.foreign_word, "Hund");
        assert_eq!(updated.example.as_deref(), Some("Der Hund bellt"));

        let cleared = FlashcardChanges {
            example: Some(None),
            ..FlashcardChanges::default()
        };
        let updated = update_owned(&db, alice.id, c.id, &cleared).await.unwrap().unwrap();
        assert_eq!(updated.example, None);
        assert_eq!(updated.native_word, "hound");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn list_pages_newest_first(db: PgPool) {
        let alice = user(&db, "alice").await;
        for word in ["eins", "zwei", "drei"] {
            create(&db, alice.id, &card(word, "n", None)).await.unwrap();
        }

        let all = list_by_owner(&db, alice.id, 100, 0).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let page = list_by_owner(&db, alice.id, 2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, all[2].id);
        assert_eq!(list_all_by_owner(&db, alice.id).await.unwrap().len(), 3);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn deleting_owner_removes_their_cards(db: PgPool) {
        let alice = user(&db, "alice").await;
        let bob = user(&db, "bob").await;
        create(&db, alice.id, &card("Hund", "dog", None)).await.unwrap();
        create(&db, alice.id, &card("Katze", "cat", None)).await.unwrap();
        create(&db, bob.id, &card("Maus", "mouse", None)).await.unwrap();

        assert!(User::delete(&db, alice.id).await.unwrap());
        assert_eq!(count(&db).await.unwrap(), 1);
        assert!(list_all_by_owner(&db, alice.id).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn admin_search_matches_either_word_literally(db: PgPool) {
        let alice = user(&db, "alice").await;
        create(&db, alice.id, &card("Hund", "dog", None)).await.unwrap();
        create(&db, alice.id, &card("Rabatt", "50% off", None)).await.unwrap();
        create(&db, alice.id, &card("Preis", "500 off", None)).await.unwrap();

        let hits = admin_search(&db, Some("hUN"), 500).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].owner_username, "alice");

        let hits = admin_search(&db, Some("50%"), 500).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].card.foreign_word, "Rabatt");

        assert_eq!(admin_search(&db, Some("  "), 500).await.unwrap().len(), 3);
        assert_eq!(admin_search(&db, None, 2).await.unwrap().len(), 2);
    }
}
