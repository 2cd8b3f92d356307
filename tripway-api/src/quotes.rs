use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use tripway_domain::ProductKind;
use tripway_pricing::{ExtraCharge, PriceBreakdown};

#[derive(Debug, Deserialize)]
struct QuoteRequest {
    product_kind: ProductKind,
    /// Optional reference to the listing being quoted; echoed nowhere,
    /// kept for request logs.
    #[serde(default)]
    product_id: Option<Uuid>,
    base_price_cents: i64,
    units: i64,
    #[serde(default)]
    extras: Vec<ExtraCharge>,
    #[serde(default)]
    taxes_cents: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/quotes", post(create_quote))
}

/// Quotes are free to compute and carry no identity, so the endpoint is
/// public: the storefront prices carts before anyone signs in.
async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<PriceBreakdown>, AppError> {
    if req.units < 0 {
        return Err(AppError::ValidationError("units must not be negative".to_string()));
    }
    if req.base_price_cents < 0
        || req.taxes_cents < 0
        || req.extras.iter().any(|e| e.amount_cents < 0)
    {
        return Err(AppError::ValidationError("amounts must not be negative".to_string()));
    }
    if let Some(product_id) = req.product_id {
        tracing::debug!("Quote requested for product {}", product_id);
    }

    let breakdown = state
        .quotes
        .quote(
            req.product_kind,
            req.base_price_cents,
            req.units,
            &req.extras,
            req.taxes_cents,
        )
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    Ok(Json(breakdown))
}
