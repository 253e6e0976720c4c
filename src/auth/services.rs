use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{debug, warn};

use super::{
    jwt::{strip_bearer, JwtKeys},
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::error::{AppError, FieldError};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;
/// Longest password accepted, in UTF-8 bytes.
pub const PASSWORD_MAX_BYTES: usize = 72;

pub(crate) fn validate_username(username: &str) -> Option<FieldError> {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
    }
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Some(FieldError::new(
            "username",
            "string_length",
            format!("Username must be {USERNAME_MIN}-{USERNAME_MAX} characters long"),
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Some(FieldError::new(
            "username",
            "string_pattern_mismatch",
            "Username may contain only letters, digits and underscores",
        ));
    }
    None
}

pub(crate) fn validate_password(password: &str) -> Option<FieldError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN {
        return Some(FieldError::new(
            "password",
            "string_too_short",
            format!("Password must be at least {PASSWORD_MIN} characters long"),
        ));
    }
    if len > PASSWORD_MAX || password.len() > PASSWORD_MAX_BYTES {
        return Some(FieldError::new(
            "password",
            "string_too_long",
            format!("Password is too long (at most {PASSWORD_MAX_BYTES} bytes)"),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some(FieldError::new(
            "password",
            "value_error",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some(FieldError::new(
            "password",
            "value_error",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some(FieldError::new(
            "password",
            "value_error",
            "Password must contain at least one digit",
        ));
    }
    None
}

pub(crate) fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    let errors: Vec<FieldError> = [validate_username(username), validate_password(password)]
        .into_iter()
        .flatten()
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == "23505")
}

/// Returns the user only if the password matches the stored hash.
pub async fn authenticate(
    db: &PgPool,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login unknown username");
        return Ok(None);
    };
    if !verify_password(password, &user.password_hash)? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Ok(None);
    }
    Ok(Some(user))
}

/// Validates, checks uniqueness, hashes and stores a new user.
pub async fn register(
    db: &PgPool,
    username: &str,
    password: &str,
    is_superuser: bool,
) -> Result<User, AppError> {
    validate_credentials(username, password)?;

    if User::find_by_username(db, username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::BadRequest("Username already taken".into()));
    }

    let hash = hash_password(password)?;
    User::create(db, username, &hash, is_superuser)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest("Username already taken".into())
            } else {
                e.into()
            }
        })
}

/// Verifies a (possibly `Bearer `-prefixed) token and loads its user.
pub async fn resolve_token(db: &PgPool, keys: &JwtKeys, token: &str) -> Result<User, AppError> {
    let claims = keys.verify(strip_bearer(token)).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::Unauthorized
    })?;

    match User::find_by_username(db, &claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            debug!(username = %claims.sub, "token for unknown user");
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("bob").is_none());
        assert!(validate_username("user_name_2024").is_none());
        assert_eq!(validate_username("ab").unwrap().kind, "string_length");
        assert_eq!(validate_username(&"a".repeat(21)).unwrap().kind, "string_length");
        assert_eq!(
            validate_username("bad name").unwrap().kind,
            "string_pattern_mismatch"
        );
        assert_eq!(
            validate_username("имя_юзера").unwrap().kind,
            "string_pattern_mismatch"
        );
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("Passw0rdOk").is_none());
        assert_eq!(validate_password("Sh0rt").unwrap().kind, "string_too_short");
        assert_eq!(validate_password("nouppercase1").unwrap().kind, "value_error");
        assert_eq!(validate_password("NOLOWERCASE1").unwrap().kind, "value_error");
        assert_eq!(validate_password("NoDigitsHere").unwrap().kind, "value_error");
    }

    #[test]
    fn password_byte_limit() {
        let ascii = format!("Aa1{}", "x".repeat(69));
        assert_eq!(ascii.len(), 72);
        assert!(validate_password(&ascii).is_none());

        // 40 chars but 2 bytes each for the Cyrillic part.
        let wide = format!("Aa1{}", "ж".repeat(37));
        assert_eq!(validate_password(&wide).unwrap().kind, "string_too_long");
    }

    #[test]
    fn credentials_collect_every_failure() {
        let Err(AppError::Validation(errors)) = validate_credentials("x", "short") else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "password"]);
        assert!(validate_credentials("valid_user", "GoodPass1").is_ok());
    }
}
