use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        error::AuthError,
        extractors::AuthUser,
        jwt::JwtKeys,
        password::hash_password,
        repo::User,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
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
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AuthError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AuthError::InvalidInput("invalid email"));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AuthError::InvalidInput("password too short"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.email, &hash, payload.name.as_deref()).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(PublicUser {
            id: user.id,
            email: user.email,
            name: user.name,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AuthError::InvalidInput("invalid email"));
    }

    let user_id = User::login_check(&state.db, &payload.email, &payload.password)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login rejected");
            AuthError::AuthenticationFailed
        })?;

    // Signing failures are infrastructure errors, not a 401.
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&payload.email, user_id)?;

    info!(user_id = %user_id, "user logged in");
    Ok(Json(AuthResponse { access_token }))
}

#[instrument(skip(state, principal))]
pub async fn me(
    State(state): State<AppState>,
    principal: AuthUser,
) -> Result<Json<PublicUser>, AuthError> {
    let user = User::find_by_email(&state.db, &principal.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %principal.email, "no user behind verified principal");
            AuthError::AuthenticationFailed
        })?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
        name: user.name,
    }))
}
