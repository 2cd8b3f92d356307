//! HTTP rendition of the route-guard decisions: the client-side redirects
//! become 401/403 responses carrying the route the client should go to.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::middleware::auth::CurrentSession;
use crate::state::AppState;
use tripway_domain::{Session, UserRole};
use tripway_policy::{decide, has_permission, GuardDecision, RouteRequirement};

/// Enforce a requirement for the current request, yielding the session on
/// success. Redirect-style decisions map to 401/403 with the target route
/// in the body.
pub fn enforce(
    current: &CurrentSession,
    route: &str,
    requirement: RouteRequirement,
) -> Result<Option<Session>, AppError> {
    match decide(current.0.as_ref(), route, requirement) {
        GuardDecision::Allow => Ok(current.0.clone()),
        GuardDecision::RedirectToLogin { return_to } => {
            debug!("Guard: login required for {}", return_to);
            Err(AppError::LoginRequired { return_to })
        }
        GuardDecision::RedirectTo { route } => {
            debug!("Guard: role mismatch, redirecting to {}", route);
            Err(AppError::RoleRedirect { redirect_to: route })
        }
    }
}

/// Any signed-in user.
pub fn require_session(current: &CurrentSession, route: &str) -> Result<Session, AppError> {
    enforce(current, route, RouteRequirement::Authenticated)?
        .ok_or_else(|| AppError::InternalServerError("Guard allowed an empty session".to_string()))
}

/// A signed-in user with this exact role.
pub fn require_role(
    current: &CurrentSession,
    route: &str,
    role: UserRole,
) -> Result<Session, AppError> {
    enforce(current, route, RouteRequirement::Role(role))?
        .ok_or_else(|| AppError::InternalServerError("Guard allowed an empty session".to_string()))
}

/// A session holding a specific permission string.
pub fn require_permission(session: &Session, permission: &str) -> Result<(), AppError> {
    if has_permission(session.role, permission) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(format!("Missing permission: {}", permission)))
    }
}

// ============================================================================
// Route-access check endpoint (consumed by the front end's guard)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub path: String,
    /// Role to check; defaults to the caller's session role.
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub path: String,
    pub allowed: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/access/route", get(check_route_access))
}

/// GET /v1/access/route?path=/admin&role=CLIENT
///
/// Pure table lookup: no side effects, safe to expose unauthenticated. An
/// unknown role holds no permissions, so gated routes answer false for it
/// while ungated routes follow the configured default.
async fn check_route_access(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessResponse>, AppError> {
    let role = match &query.role {
        Some(raw) => raw.parse::<UserRole>().ok(),
        None => current.0.as_ref().map(|s| s.role),
    };

    let allowed = match role {
        Some(role) => state.route_policy.can_access(role, &query.path),
        None => {
            state.route_policy.required_permissions(&query.path).is_none()
                && state.route_policy.default_allows()
        }
    };

    Ok(Json(AccessResponse { path: query.path, allowed }))
}
