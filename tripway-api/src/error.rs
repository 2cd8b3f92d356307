use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use tripway_store::StoreError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    /// Anonymous caller on a route that needs a session. Carries the
    /// login URL with the original path so the client can come back.
    LoginRequired { return_to: String },
    /// Signed in, wrong role. Carries the role's own landing route.
    RoleRedirect { redirect_to: String },
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::AuthenticationError(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": msg }),
            ),
            AppError::LoginRequired { return_to } => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Authentication required",
                    "login_url": format!("/login?return_to={}", return_to),
                }),
            ),
            AppError::RoleRedirect { redirect_to } => (
                StatusCode::FORBIDDEN,
                json!({
                    "error": "Forbidden for this role",
                    "redirect_to": redirect_to,
                }),
            ),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFoundError(format!("Not found: {}", id)),
            StoreError::InvalidTransition(e) => AppError::ConflictError(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
