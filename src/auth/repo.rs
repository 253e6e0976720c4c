use crate::auth::repo_types::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, password_hash, is_superuser, created_at";

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Create a new user with an already hashed password.
    pub async fn create(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        is_superuser: bool,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, password_hash, is_superuser)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(password_hash)
        .bind(is_superuser)
        .fetch_one(db)
        .await
    }

    pub async fn any_superuser(db: &PgPool) -> sqlx::Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE is_superuser)")
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username ASC"
        ))
        .fetch_all(db)
        .await
    }

    pub async fn count(db: &PgPool) -> sqlx::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;
        Ok(n)
    }

    /// Admin edit. `password_hash` of `None` keeps the current hash.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        username: &str,
        is_superuser: bool,
        password_hash: Option<&str>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET username = $2,
                   is_superuser = $3,
                   password_hash = COALESCE($4, password_hash)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(username)
        .bind(is_superuser)
        .bind(password_hash)
        .fetch_optional(db)
        .await
    }

    /// Deletes the user; their flashcards go with them via ON DELETE CASCADE.
    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
