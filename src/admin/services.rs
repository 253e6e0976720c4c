use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::dto::UserForm;
use crate::{
    auth::{
        password::hash_password,
        repo_types::User,
        services::{is_unique_violation, register, validate_password, validate_username},
    },
    error::AppError,
};

pub async fn create_user(db: &PgPool, form: &UserForm) -> Result<User, AppError> {
    let password = form.password().unwrap_or_default();
    let user = register(db, form.username(), password, form.is_superuser()).await?;
    info!(user_id = %user.id, username = %user.username, is_superuser = user.is_superuser, "admin created user");
    Ok(user)
}

/// Applies an admin edit. Returns `Ok(None)` if the user no longer exists.
pub async fn update_user(
    db: &PgPool,
    acting: &User,
    id: Uuid,
    form: &UserForm,
) -> Result<Option<User>, AppError> {
    let mut errors: Vec<_> = validate_username(form.username()).into_iter().collect();
    if let Some(p) = form.password() {
        errors.extend(validate_password(p));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    if acting.id == id {
        if !form.is_superuser() {
            return Err(AppError::BadRequest(
                "You cannot remove your own superuser flag".into(),
            ));
        }
        // Session tokens carry the username, so a rename would end this session.
        if form.username() != acting.username {
            return Err(AppError::BadRequest(
                "You cannot rename your own account".into(),
            ));
        }
    }

    let hash = form.password().map(hash_password).transpose()?;
    let updated = User::update(db, id, form.username(), form.is_superuser(), hash.as_deref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest("Username already taken".into())
            } else {
                e.into()
            }
        })?;

    if let Some(u) = &updated {
        info!(user_id = %u.id, by = %acting.username, "admin updated user");
    }
    Ok(updated)
}

/// Deletes a user and, through the foreign key, their flashcards.
pub async fn delete_user(db: &PgPool, acting: &User, id: Uuid) -> Result<bool, AppError> {
    if acting.id == id {
        return Err(AppError::BadRequest("You cannot delete your own account".into()));
    }
    let deleted = User::delete(db, id).await?;
    if deleted {
        info!(user_id = %id, by = %acting.username, "admin deleted user");
    }
    Ok(deleted)
}
