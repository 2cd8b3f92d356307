use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::guard::{require_permission, require_session};
use crate::middleware::auth::CurrentSession;
use crate::state::AppState;
use tripway_domain::{Booking, BookingStatus, CancellationPolicy, ProductKind};
use tripway_policy::cancellation;
use tripway_pricing::{ExtraCharge, PriceBreakdown};

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    product_kind: ProductKind,
    product_id: Uuid,
    starts_at: DateTime<Utc>,
    /// Nights for hotels, days for car rentals.
    units: i64,
    base_price_cents: i64,
    #[serde(default)]
    extras: Vec<ExtraCharge>,
    #[serde(default)]
    taxes_cents: i64,
    cancellation_policy: CancellationPolicy,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    booking: Booking,
    breakdown: Option<PriceBreakdown>,
}

#[derive(Debug, Serialize)]
struct CancellationResponse {
    booking_id: Uuid,
    status: BookingStatus,
    refund_percent: i64,
    refund_cents: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/confirm", post(confirm_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let session = require_session(&current, "/v1/bookings")?;
    require_permission(&session, "booking:create")?;

    if req.units <= 0 {
        return Err(AppError::ValidationError("units must be positive".to_string()));
    }
    if req.base_price_cents < 0
        || req.taxes_cents < 0
        || req.extras.iter().any(|e| e.amount_cents < 0)
    {
        return Err(AppError::ValidationError("amounts must not be negative".to_string()));
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

    let booking = Booking::new(
        req.product_kind,
        req.product_id,
        session.user_id,
        req.starts_at,
        req.units,
        breakdown.total_cents,
        req.cancellation_policy,
    );

    let booking = state.bookings.create(booking).await?;
    info!("Booking {} created for {}", booking.id, session.user_id);

    Ok(Json(BookingResponse { booking, breakdown: Some(breakdown) }))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let session = require_session(&current, "/v1/bookings")?;
    require_permission(&session, "booking:view:own")?;

    let bookings = state.bookings.list_by_customer(session.user_id).await?;
    Ok(Json(bookings))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let session = require_session(&current, "/v1/bookings")?;

    let booking = state.bookings.get(id).await?;
    if !booking.visible_to(session.user_id, session.role) {
        return Err(AppError::AuthorizationError(
            "Booking does not belong to you".to_string(),
        ));
    }

    Ok(Json(BookingResponse { booking, breakdown: None }))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let session = require_session(&current, "/v1/bookings")?;

    let booking = state.bookings.get(id).await?;
    if booking.customer_id != session.user_id {
        // confirming on someone else's behalf is a write, so it takes the
        // admin management permission, not a view one
        require_permission(&session, "booking:manage")?;
    }

    let booking = state.bookings.update_status(id, BookingStatus::Confirmed).await?;
    info!("Booking confirmed: {}", id);

    Ok(Json(BookingResponse { booking, breakdown: None }))
}

/// Cancellation runs the policy rules, then the status table: the window
/// must still be open, CONFIRMED/PENDING moves to CANCELLED, and a non-zero
/// refund moves it straight on to REFUNDED.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancellationResponse>, AppError> {
    let session = require_session(&current, "/v1/bookings")?;

    let booking = state.bookings.get(id).await?;
    if booking.customer_id == session.user_id {
        require_permission(&session, "booking:cancel:own")?;
    } else {
        require_permission(&session, "booking:cancel:any")?;
    }

    let policy = booking.cancellation_policy;
    if !cancellation::can_cancel(booking.starts_at, policy, Utc::now()) {
        return Err(AppError::ConflictError(
            "Cancellation window has closed for this booking".to_string(),
        ));
    }

    let refund_cents = cancellation::refund_amount(booking.total_cents, policy);

    let mut booking = state.bookings.update_status(id, BookingStatus::Cancelled).await?;
    if refund_cents > 0 {
        booking = state.bookings.update_status(id, BookingStatus::Refunded).await?;
    }

    info!(
        "Booking {} cancelled by {}, refunding {} cents",
        id, session.user_id, refund_cents
    );

    Ok(Json(CancellationResponse {
        booking_id: id,
        status: booking.status,
        refund_percent: cancellation::refund_percent(policy),
        refund_cents,
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_util::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn register(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app.clone(),
            "POST",
            "/v1/auth/register",
            None,
            Some(serde_json::json!({ "email": email, "display_name": "Test" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    fn booking_payload(policy: &str, starts_in: Duration) -> serde_json::Value {
        serde_json::json!({
            "product_kind": "CAR_RENTAL",
            "product_id": uuid::Uuid::new_v4(),
            "starts_at": (Utc::now() + starts_in).to_rfc3339(),
            "units": 3,
            "base_price_cents": 1000,
            "extras": [{ "name": "gps", "amount_cents": 500 }],
            "cancellation_policy": policy,
        })
    }

    #[tokio::test]
    async fn test_create_confirm_cancel_refund_flow() {
        let app = crate::app(test_state());
        let token = register(&app, "client@example.com").await;

        let (status, created) = send(
            app.clone(),
            "POST",
            "/v1/bookings",
            Some(&token),
            Some(booking_payload("FREE_CANCELLATION", Duration::days(10))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["booking"]["status"], "PENDING");
        assert_eq!(created["breakdown"]["total_cents"], 3675);
        let id = created["booking"]["id"].as_str().unwrap().to_string();

        let (status, confirmed) = send(
            app.clone(),
            "POST",
            &format!("/v1/bookings/{}/confirm", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmed["booking"]["status"], "CONFIRMED");

        let (status, cancelled) = send(
            app,
            "POST",
            &format!("/v1/bookings/{}/cancel", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["refund_percent"], 100);
        assert_eq!(cancelled["refund_cents"], 3675);
        assert_eq!(cancelled["status"], "REFUNDED");
    }

    #[tokio::test]
    async fn test_non_refundable_cannot_cancel() {
        let app = crate::app(test_state());
        let token = register(&app, "client@example.com").await;

        let (_, created) = send(
            app.clone(),
            "POST",
            "/v1/bookings",
            Some(&token),
            Some(booking_payload("NON_REFUNDABLE", Duration::days(30))),
        )
        .await;
        let id = created["booking"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            app,
            "POST",
            &format!("/v1/bookings/{}/cancel", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("window"));
    }

    #[tokio::test]
    async fn test_strict_policy_inside_window_cannot_cancel() {
        let app = crate::app(test_state());
        let token = register(&app, "client@example.com").await;

        // 6 days out is inside STRICT's 168-hour window
        let (_, created) = send(
            app.clone(),
            "POST",
            "/v1/bookings",
            Some(&token),
            Some(booking_payload("STRICT", Duration::days(6))),
        )
        .await;
        let id = created["booking"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            app,
            "POST",
            &format!("/v1/bookings/{}/cancel", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_moderate_refund_is_half() {
        let app = crate::app(test_state());
        let token = register(&app, "client@example.com").await;

        let (_, created) = send(
            app.clone(),
            "POST",
            "/v1/bookings",
            Some(&token),
            Some(booking_payload("MODERATE", Duration::days(10))),
        )
        .await;
        let id = created["booking"]["id"].as_str().unwrap().to_string();

        let (status, cancelled) = send(
            app,
            "POST",
            &format!("/v1/bookings/{}/cancel", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["refund_percent"], 50);
        assert_eq!(cancelled["refund_cents"], 1838); // half of 3675, rounded half up
        assert_eq!(cancelled["status"], "REFUNDED");
    }

    #[tokio::test]
    async fn test_strict_outside_window_cancels_with_no_refund() {
        let app = crate::app(test_state());
        let token = register(&app, "client@example.com").await;

        // 10 days out clears STRICT's 168-hour window, but the tier pays nothing back
        let (_, created) = send(
            app.clone(),
            "POST",
            "/v1/bookings",
            Some(&token),
            Some(booking_payload("STRICT", Duration::days(10))),
        )
        .await;
        let id = created["booking"]["id"].as_str().unwrap().to_string();

        let (status, cancelled) = send(
            app,
            "POST",
            &format!("/v1/bookings/{}/cancel", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["refund_cents"], 0);
        // no refund to process, so the booking stays CANCELLED
        assert_eq!(cancelled["status"], "CANCELLED");
    }

    #[tokio::test]
    async fn test_strangers_cannot_see_or_cancel() {
        let app = crate::app(test_state());
        let owner = register(&app, "owner@example.com").await;
        let stranger = register(&app, "stranger@example.com").await;

        let (_, created) = send(
            app.clone(),
            "POST",
            "/v1/bookings",
            Some(&owner),
            Some(booking_payload("FREE_CANCELLATION", Duration::days(10))),
        )
        .await;
        let id = created["booking"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            app.clone(),
            "GET",
            &format!("/v1/bookings/{}", id),
            Some(&stranger),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // a plain client lacks booking:cancel:any
        let (status, _) = send(
            app,
            "POST",
            &format!("/v1/bookings/{}/cancel", id),
            Some(&stranger),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_confirming_for_others_needs_management_permission() {
        use crate::test_util::{provision_user, token_for};
        use tripway_domain::UserRole;

        let state = test_state();
        let app = crate::app(state.clone());
        let owner = register(&app, "owner@example.com").await;
        let stranger = register(&app, "stranger@example.com").await;
        let admin = provision_user(&state, "admin@example.com", UserRole::Admin).await;

        let (_, created) = send(
            app.clone(),
            "POST",
            "/v1/bookings",
            Some(&owner),
            Some(booking_payload("MODERATE", Duration::days(10))),
        )
        .await;
        let id = created["booking"]["id"].as_str().unwrap().to_string();

        // another client holds no booking:manage, so the write is refused
        let (status, _) = send(
            app.clone(),
            "POST",
            &format!("/v1/bookings/{}/confirm", id),
            Some(&stranger),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, confirmed) = send(
            app,
            "POST",
            &format!("/v1/bookings/{}/confirm", id),
            Some(&token_for(&admin)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmed["booking"]["status"], "CONFIRMED");
    }

    #[tokio::test]
    async fn test_negative_extra_rejected_on_create() {
        let app = crate::app(test_state());
        let token = register(&app, "client@example.com").await;

        let mut payload = booking_payload("MODERATE", Duration::days(10));
        payload["extras"] = serde_json::json!([{ "name": "discount", "amount_cents": -500 }]);

        let (status, _) = send(app, "POST", "/v1/bookings", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_create_redirects_to_login() {
        let app = crate::app(test_state());

        let (status, body) = send(
            app,
            "POST",
            "/v1/bookings",
            None,
            Some(booking_payload("MODERATE", Duration::days(10))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["login_url"], "/login?return_to=/v1/bookings");
    }
}
