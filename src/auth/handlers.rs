use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use super::{
    dto::{CredentialsRequest, LoginResponse, MeResponse, MessageResponse},
    extractors::Session,
    services::{self, cleared_session_cookie, session_cookie},
};
use crate::{error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    services::register(state.users.as_ref(), &payload.username, &payload.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let Json(payload) = payload?;
    let (identity, token) = services::login(
        state.users.as_ref(),
        &state.keys,
        &payload.username,
        &payload.password,
    )
    .await?;

    let cookie = session_cookie(token, state.keys.ttl(), state.config.cookie.secure);
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Logged in successfully",
            username: identity.username,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(cleared_session_cookie(state.config.cookie.secure)),
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

#[instrument(skip_all)]
pub async fn me(session: Session) -> Response {
    match session {
        Session::Authenticated(identity) => Json(MeResponse {
            authenticated: true,
            username: Some(identity.username),
            user_id: Some(identity.user_id),
        })
        .into_response(),
        Session::Anonymous => (
            StatusCode::UNAUTHORIZED,
            Json(MeResponse {
                authenticated: false,
                username: None,
                user_id: None,
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_me_body_has_only_flag() {
        let json = serde_json::to_value(MeResponse {
            authenticated: false,
            username: None,
            user_id: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "authenticated": false }));
    }

    #[test]
    fn authenticated_me_body_uses_camel_case_id() {
        let json = serde_json::to_value(MeResponse {
            authenticated: true,
            username: Some("alice".into()),
            user_id: Some(3),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "authenticated": true, "username": "alice", "userId": 3 })
        );
    }
}
