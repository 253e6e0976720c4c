use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    auth::{password::hash_password, repo_types::User},
    config::{AdminBootstrap, DEFAULT_ADMIN_PASSWORD},
};

/// What [`ensure_superuser`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    AlreadyPresent,
    Created,
    UsernameTaken,
}

/// Creates the configured superuser if the database has none.
pub async fn ensure_superuser(db: &PgPool, admin: &AdminBootstrap) -> anyhow::Result<Outcome> {
    if User::any_superuser(db).await.context("check for superuser")? {
        return Ok(Outcome::AlreadyPresent);
    }

    if User::find_by_username(db, &admin.username)
        .await
        .context("look up bootstrap username")?
        .is_some()
    {
        warn!(
            username = %admin.username,
            "no superuser exists and the bootstrap username belongs to a regular user; skipping"
        );
        return Ok(Outcome::UsernameTaken);
    }

    let hash = hash_password(&admin.password)?;
    let user = User::create(db, &admin.username, &hash, true)
        .await
        .context("create bootstrap superuser")?;
    info!(user_id = %user.id, username = %user.username, "created superuser for the admin panel");

    if admin.password == DEFAULT_ADMIN_PASSWORD {
        warn!("superuser uses the default password; set ADMIN_PASSWORD and change it");
    }
    Ok(Outcome::Created)
}
