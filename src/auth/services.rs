use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;
use tracing::{info, warn};

use super::{
    claims::Identity,
    jwt::JwtKeys,
    password::{hash_password, verify_password, DUMMY_HASH},
    repo::UserStore,
    repo_types::User,
};
use crate::{error::AppError, store::StoreError};

pub const SESSION_COOKIE: &str = "token";

/// Width of `users.username`, in characters.
pub const MAX_USERNAME_CHARS: usize = 255;

/// Trims both fields and rejects either being empty.
pub(crate) fn normalize_credentials<'a>(
    username: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), AppError> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Username and password required"));
    }
    Ok((username, password))
}

pub async fn register(users: &dyn UserStore, username: &str, password: &str) -> Result<User, AppError> {
    let (username, password) = normalize_credentials(username, password)?;
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(AppError::Validation("Username must be at most 255 characters"));
    }

    if users.find_by_username(username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::Conflict);
    }

    let hash = hash_password(password)?;

    // The UNIQUE constraint settles concurrent registrations the lookup above missed.
    let user = match users.create(username, &hash).await {
        Ok(u) => u,
        Err(StoreError::UniqueViolation) => {
            warn!(%username, "username registered concurrently");
            return Err(AppError::Conflict);
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, username = %user.username, created_at = %user.created_at, "user registered");
    Ok(user)
}

/// Returns the identity and a freshly signed session token.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    username: &str,
    password: &str,
) -> Result<(Identity, String), AppError> {
    let (username, password) = normalize_credentials(username, password)?;

    let Some(user) = users.find_by_username(username).await? else {
        // Burn one verification so unknown names cost the same as wrong passwords.
        verify_password(password, DUMMY_HASH)?;
        warn!(%username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let identity = Identity {
        user_id: user.id,
        username: user.username,
    };
    let token = keys.sign(&identity)?;

    info!(user_id = identity.user_id, "user logged in");
    Ok((identity, token))
}

pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(ttl)
        .build()
}

/// Expired, empty session cookie with the same attributes, so browsers match and drop it.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::JwtConfig, memory::MemoryStore};

    fn keys() -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: "svc-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 15,
            insecure_secret: false,
        })
    }

    #[tokio::test]
    async fn register_trims_and_hashes() {
        let store = MemoryStore::default();
        let user = register(&store, "  alice ", " secret1 ").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret1");
        assert!(verify_password("secret1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_blank_fields() {
        let store = MemoryStore::default();
        assert!(matches!(
            register(&store, "   ", "pw").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            register(&store, "alice", "  ").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_regardless_of_password() {
        let store = MemoryStore::default();
        register(&store, "alice", "secret1").await.unwrap();
        assert!(matches!(
            register(&store, "alice", "different").await,
            Err(AppError::Conflict)
        ));
        assert!(matches!(
            register(&store, " alice", "secret1").await,
            Err(AppError::Conflict)
        ));
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let store = MemoryStore::default();
        register(&store, "alice", "secret1").await.unwrap();
        assert!(register(&store, "Alice", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn store_level_unique_violation_maps_to_conflict() {
        let store = MemoryStore::default();
        store.hide_users_from_lookup();
        register(&store, "alice", "secret1").await.unwrap();
        assert!(matches!(
            register(&store, "alice", "secret1").await,
            Err(AppError::Conflict)
        ));
    }

    #[tokio::test]
    async fn overlong_username_is_rejected_before_the_store() {
        let store = MemoryStore::default();
        let longest = "a".repeat(MAX_USERNAME_CHARS);
        assert!(register(&store, &longest, "pw").await.is_ok());

        let too_long = "a".repeat(MAX_USERNAME_CHARS + 1);
        assert!(matches!(
            register(&store, &too_long, "pw").await,
            Err(AppError::Validation("Username must be at most 255 characters"))
        ));

        // Characters, not bytes, match VARCHAR(255).
        let wide = "é".repeat(MAX_USERNAME_CHARS);
        assert!(register(&store, &wide, "pw").await.is_ok());
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, "alice", "secret1").await.unwrap();
        let (identity, token) = login(&store, &keys, "alice", "secret1").await.unwrap();
        assert_eq!(identity.username, "alice");
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, identity.user_id);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, "alice", "secret1").await.unwrap();

        let wrong_pw = login(&store, &keys, "alice", "nope").await.unwrap_err();
        let no_user = login(&store, &keys, "mallory", "secret1").await.unwrap_err();
        assert!(matches!(wrong_pw, AppError::InvalidCredentials));
        assert!(matches!(no_user, AppError::InvalidCredentials));
        assert_eq!(wrong_pw.to_string(), no_user.to_string());
    }

    async fn time_failed_login(store: &MemoryStore, keys: &JwtKeys, username: &str) -> std::time::Duration {
        let start = std::time::Instant::now();
        let err = login(store, keys, username, "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        start.elapsed()
    }

    #[tokio::test]
    async fn unknown_user_login_still_runs_argon2() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, "alice", "secret1").await.unwrap();

        let known = time_failed_login(&store, &keys, "alice").await;
        let unknown = time_failed_login(&store, &keys, "mallory").await;

        // Skipping the hash would make the unknown path orders of magnitude faster.
        assert!(unknown * 5 > known, "unknown {unknown:?} vs known {known:?}");
    }

    #[test]
    fn session_cookie_attributes() {
        let c = session_cookie("abc".into(), Duration::minutes(15), true);
        assert_eq!(c.name(), SESSION_COOKIE);
        assert_eq!(c.value(), "abc");
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.same_site(), Some(SameSite::Strict));
        assert_eq!(c.secure(), Some(true));
        assert_eq!(c.path(), Some("/"));
        assert_eq!(c.max_age(), Some(Duration::minutes(15)));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let c = cleared_session_cookie(false);
        assert_eq!(c.name(), SESSION_COOKIE);
        assert_eq!(c.value(), "");
        assert_eq!(c.max_age(), Some(Duration::ZERO));
        assert_eq!(c.path(), Some("/"));
    }
}
