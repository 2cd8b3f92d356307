use axum::{
    extract::{Path, State},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::guard::{require_permission, require_role};
use crate::middleware::auth::CurrentSession;
use crate::state::AppState;
use tripway_domain::UserRole;

#[derive(Debug, Serialize)]
struct DriverVerificationResponse {
    driver_id: Uuid,
    driver_verified: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/admin/drivers/{id}/verify", post(verify_driver))
}

/// POST /v1/admin/drivers/:id/verify
async fn verify_driver(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverVerificationResponse>, AppError> {
    let session = require_role(&current, "/admin/drivers", UserRole::Admin)?;
    require_permission(&session, "driver:verify")?;

    let target = state.users.get(id).await?;
    if target.role != UserRole::Driver {
        return Err(AppError::ValidationError(format!(
            "User {} is not a driver",
            id
        )));
    }

    let updated = state.users.set_driver_verified(id, true).await?;
    info!("Driver {} verified by admin {}", id, session.user_id);

    Ok(Json(DriverVerificationResponse {
        driver_id: updated.id,
        driver_verified: updated.driver_verified,
    }))
}
