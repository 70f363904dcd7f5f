//! Account endpoints: register, login, logout, me, profile, change-password

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::MessageResponse;
use crate::db::repos::{SessionRepo, User, UserRepo};
use crate::http::auth::{
    generate_token, hash_password, hash_token, session_expiry, verify_password, AuthUser,
};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::models::{Credentials, PasswordChange, ProfileInput, Registration};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// User as shown to clients (no password hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            company: u.company,
            phone: u.phone,
            avatar: u.avatar,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Register/login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Open a session for `user` and return the plain token once.
async fn open_session(state: &AppState, user: User) -> Result<SessionResponse, ApiError> {
    let token = generate_token();
    let expires_at = session_expiry(Utc::now(), state.config.auth.session_ttl_hours);

    SessionRepo::new(&state.pool)
        .create(&hash_token(&token), user.id, expires_at)
        .await?;

    Ok(SessionResponse {
        token,
        expires_at,
        user: UserResponse::from(user),
    })
}

/// POST /auth/register - create an account and sign in
async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<Registration>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let new_user = req.validate()?;
    let password_hash = hash_password(new_user.password.clone()).await?;

    let user = UserRepo::new(&state.pool)
        .create(&new_user, &password_hash)
        .await?;
    tracing::info!(user_id = %user.id, "user registered");

    let session = open_session(&state, user).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<Credentials>,
) -> Result<Json<SessionResponse>, ApiError> {
    let (email, password) = req.validate()?;

    let unauthorized = ApiError::Unauthorized {
        message: INVALID_CREDENTIALS,
    };
    let Some(user) = UserRepo::new(&state.pool).find_by_email(&email).await? else {
        return Err(unauthorized);
    };
    if !user.is_active || !verify_password(password, user.password_hash.clone()).await? {
        return Err(unauthorized);
    }

    // Opportunistic cleanup; a failure here must not block the login
    match SessionRepo::new(&state.pool).purge_expired().await {
        Ok(0) => {}
        Ok(n) => tracing::debug!(purged = n, "expired sessions removed"),
        Err(e) => tracing::warn!("failed to purge expired sessions: {}", e),
    }

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(open_session(&state, user).await?))
}

/// POST /auth/logout - end the current session
async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    SessionRepo::new(&state.pool).delete(&auth.token_hash).await?;
    Ok(MessageResponse::new("Logged out successfully"))
}

/// GET /auth/me
async fn me(auth: AuthUser) -> Json<UserEnvelope> {
    Json(UserEnvelope {
        user: UserResponse::from(auth.user),
    })
}

/// PUT /auth/profile
async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ProfileInput>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let profile = req.merge(auth.user.profile())?;
    let user = UserRepo::new(&state.pool)
        .update_profile(auth.user.id, &profile)
        .await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(user),
    }))
}

/// PUT /auth/change-password - other sessions are signed out
async fn change_password(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidJson(req): ValidJson<PasswordChange>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (current, new) = req.validate()?;

    if !verify_password(current, auth.user.password_hash.clone()).await? {
        return Err(ApiError::bad_request("Current password is incorrect"));
    }

    let password_hash = hash_password(new).await?;
    UserRepo::new(&state.pool)
        .update_password(auth.user.id, &password_hash)
        .await?;
    let revoked = SessionRepo::new(&state.pool)
        .delete_others(auth.user.id, &auth.token_hash)
        .await?;
    tracing::info!(user_id = %auth.user.id, revoked, "password changed");

    Ok(MessageResponse::new("Password updated successfully"))
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/profile", put(update_profile))
        .route("/auth/change-password", put(change_password))
}
