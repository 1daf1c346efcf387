use anyhow::Context;
use serde::Deserialize;

/// Used only when `JWT_SECRET` is unset. Anyone who knows it can mint sessions.
pub const INSECURE_DEFAULT_SECRET: &str = "fishcart-insecure-dev-secret";

/// One year. Longer sessions are almost certainly a typo.
pub const MAX_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    /// True when `secret` is the built-in fallback.
    pub insecure_secret: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    /// `None` keeps CORS permissive.
    pub frontend_url: Option<String>,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL").context("DATABASE_URL is not set")?;

        let (secret, insecure_secret) = match non_empty("JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (INSECURE_DEFAULT_SECRET.to_string(), true),
        };
        let ttl_minutes: i64 = parse_or("JWT_TTL_MINUTES", non_empty("JWT_TTL_MINUTES"), 15)?;
        if !(1..=MAX_TTL_MINUTES).contains(&ttl_minutes) {
            anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {ttl_minutes}");
        }
        let jwt = JwtConfig {
            secret,
            issuer: non_empty("JWT_ISSUER").unwrap_or_else(|| "fishcart".into()),
            audience: non_empty("JWT_AUDIENCE").unwrap_or_else(|| "fishcart-web".into()),
            ttl_minutes,
            insecure_secret,
        };

        let env = non_empty("APP_ENV")
            .or_else(|| non_empty("NODE_ENV"))
            .unwrap_or_else(|| "development".into());
        let cookie = CookieConfig {
            secure: env.eq_ignore_ascii_case("production"),
        };

        Ok(Self {
            database_url,
            max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                non_empty("DB_MAX_CONNECTIONS"),
                10,
            )?,
            host: non_empty("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("PORT", non_empty("PORT"), 3000)?,
            frontend_url: non_empty("FRONTEND_URL"),
            jwt,
            cookie,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {v:?}")),
        None => Ok(default),
    }
}
