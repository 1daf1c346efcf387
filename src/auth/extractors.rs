use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use tracing::warn;

use super::{claims::Identity, jwt::JwtKeys, services::SESSION_COOKIE};
use crate::error::AppError;

/// Who the request is from, as far as the session cookie can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    pub fn from_jar(jar: &CookieJar, keys: &JwtKeys) -> Self {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Self::Anonymous;
        };
        match keys.verify(cookie.value()) {
            Ok(claims) => Self::Authenticated(claims.into()),
            Err(e) => {
                warn!(error = %e, "rejected session cookie");
                Self::Anonymous
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self::from_jar(&jar, &keys))
    }
}

/// Requires an authenticated session. Every failure cause becomes the same 401.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await {
            Ok(Session::Authenticated(identity)) => Ok(Self(identity)),
            Ok(Session::Anonymous) => Err(AppError::Unauthorized),
            Err(never) => match never {},
        }
    }
}
