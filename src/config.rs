use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials for the superuser created on first boot.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminBootstrap,
    pub cookie_secure: bool,
    pub static_dir: String,
}

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

pub const DEFAULT_TTL_MINUTES: i64 = 30;
/// One year. Larger values would overflow the expiry arithmetic.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

/// `JWT_TTL_MINUTES`, falling back to the default when unset or out of range.
fn ttl_minutes(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|m| (1..=MAX_TTL_MINUTES).contains(m))
        .unwrap_or(DEFAULT_TTL_MINUTES)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "flashcards".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "flashcards-users".into()),
            ttl_minutes: ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref()),
        };
        let admin = AdminBootstrap {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into()),
        };
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());

        Ok(Self {
            database_url,
            jwt,
            admin,
            cookie_secure,
            static_dir,
        })
    }

    /// Lifetime of issued session tokens and cookies, in seconds.
    pub fn session_ttl_secs(&self) -> i64 {
        self.jwt.ttl_minutes.clamp(1, MAX_TTL_MINUTES) * 60
    }
}
