use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, RegisterResponse};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo::{is_unique_violation, User};
use crate::error::ApiError;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = payload.username.trim().to_string();
    if username.is_empty() || payload.password.trim().is_empty() {
        warn!("register rejected: empty username or password");
        return Err(ApiError::Validation);
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("register rejected: password too short");
        return Err(ApiError::Validation);
    }

    let email = match payload.email.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            let normalized = raw.to_lowercase();
            if !is_valid_email(&normalized) {
                warn!("register rejected: invalid email");
                return Err(ApiError::Validation);
            }
            Some(normalized)
        }
        _ => None,
    };

    // Hashing is CPU-bound; keep it off the request executor.
    let password = payload.password.clone();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let user = User::create(&state.db, &username, email.as_deref(), &hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(username = %username, "register rejected: duplicate user");
                ApiError::DuplicateUser
            } else {
                ApiError::Internal(e.into())
            }
        })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            user: PublicUser {
                id: user.id,
                username: user.username,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.trim().to_string();
    if username.is_empty() || payload.password.trim().is_empty() {
        warn!("login rejected: empty username or password");
        return Err(ApiError::Validation);
    }

    // Unknown username and wrong password must be indistinguishable to the
    // caller.
    let Some(user) = User::find_by_username(&state.db, &username).await? else {
        warn!(username = %username, "login rejected: unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    let password = payload.password.clone();
    let stored_hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;
    if !ok {
        warn!(username = %username, user_id = %user.id, "login rejected: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        message: "Successfully logged in".into(),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_body(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    #[tokio::test]
    async fn register_rejects_empty_username_before_any_write() {
        let state = AppState::fake();
        let err = register(State(state), Json(register_body("   ", "Secret123")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation));
    }

    #[tokio::test]
    async fn register_rejects_empty_password() {
        let state = AppState::fake();
        let err = register(State(state), Json(register_body("bob", "")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let state = AppState::fake();
        let err = register(State(state), Json(register_body("bob", "short")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation));
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let state = AppState::fake();
        let payload = RegisterRequest {
            username: "bob".into(),
            password: "Secret123".into(),
            email: Some("not-an-address".into()),
        };
        let err = register(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation));
    }

    #[tokio::test]
    async fn login_rejects_empty_fields() {
        let state = AppState::fake();
        let payload = LoginRequest {
            username: "".into(),
            password: "whatever".into(),
        };
        let err = login(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation));
    }

    #[test]
    fn email_pattern_accepts_plain_addresses() {
        assert!(is_valid_email("bob@example.com"));
        assert!(!is_valid_email("bob@example"));
        assert!(!is_valid_email("bob example.com"));
        assert!(!is_valid_email("@example.com"));
    }
}
