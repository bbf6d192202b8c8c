//! Session tokens and the `/auth` endpoints.
//!
//! A token has the `header.payload.signature` shape; the payload is
//! base64url JSON with `sub` (the user's email) and `exp` (unix seconds). A
//! session is valid while `exp` is in the future. Tokens are checked locally,
//! the signature is not verified.

use api_types::auth::{AuthResponse, LoginRequest, RegisterRequest, UserView};
use axum::{Json, extract::State, http::StatusCode};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const TOKEN_HEADER: &str = r#"{"alg":"none","typ":"JWT"}"#;

#[derive(Clone, Copy, Debug)]
pub struct AuthSettings {
    /// Lifetime of issued tokens.
    pub token_ttl_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
}

pub(crate) fn issue_token(email: &str, ttl_secs: u64, now: i64) -> Result<String, ServerError> {
    let claims = Claims {
        sub: email.to_string(),
        exp: now.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
    };
    let payload = serde_json::to_vec(&claims)
        .map_err(|err| ServerError::Generic(format!("cannot encode token: {err}")))?;

    Ok(format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(TOKEN_HEADER),
        URL_SAFE_NO_PAD.encode(payload),
        URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes()),
    ))
}

fn decode_claims(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Claims of `token` if it is well formed and not expired at `now`.
pub(crate) fn validate_token(token: &str, now: i64) -> Result<Claims, ServerError> {
    let Some(claims) = decode_claims(token) else {
        tracing::warn!("rejected malformed token");
        return Err(ServerError::Unauthorized("invalid token".to_string()));
    };
    if claims.exp <= now {
        tracing::warn!(sub = %claims.sub, "rejected expired token");
        return Err(ServerError::Unauthorized("token expired".to_string()));
    }
    Ok(claims)
}

pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn session(state: &ServerState, user: engine::User) -> Result<Json<AuthResponse>, ServerError> {
    let access_token = issue_token(&user.email, state.auth.token_ttl_secs, now())?;
    Ok(Json(AuthResponse {
        access_token,
        user: UserView {
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        },
    }))
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let user = state
        .engine
        .register_user(engine::Registration {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            confirm_password: payload.confirm_password,
        })
        .await?;

    Ok((StatusCode::CREATED, session(&state, user)?))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    let user = state
        .engine
        .verify_credentials(&payload.email, &payload.password)
        .await?;

    session(&state, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_claims() {
        let token = issue_token("ada@example.com", 60, 1_000).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = validate_token(&token, 1_059).unwrap();
        assert_eq!(claims.sub, "ada@example.com");
        assert_eq!(claims.exp, 1_060);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token("ada@example.com", 60, 1_000).unwrap();
        assert!(matches!(
            validate_token(&token, 1_060),
            Err(ServerError::Unauthorized(_))
        ));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for token in ["", "abc", "a.b", "a.!!!.c", "a.b.c.d"] {
            assert!(validate_token(token, 0).is_err(), "{token}");
        }
        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("nope"));
        assert!(validate_token(&not_json, 0).is_err());
    }

    #[test]
    fn foreign_token_with_exp_is_accepted() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"x@y.io","exp":4102444800,"iat":1}"#);
        let claims = validate_token(&format!("eyJ.{payload}.sig"), 1_700_000_000).unwrap();
        assert_eq!(claims.sub, "x@y.io");
    }
}
