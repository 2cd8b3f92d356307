use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::user::UserRole;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Refunded,
}

impl BookingStatus {
    /// Allowed status transitions. The table is the single source of truth;
    /// repositories reject anything not listed here.
    pub fn can_transition(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, Completed)
                | (Cancelled, Refunded)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Refunded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Refunded => "REFUNDED",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid status transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

/// Cancellation tier attached to a booking at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationPolicy {
    FreeCancellation,
    Moderate,
    Strict,
    NonRefundable,
}

/// What kind of product a booking is for. Featured hotels carry a higher
/// platform commission than standard listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductKind {
    Hotel,
    HotelFeatured,
    CarRental,
}

/// The single source of truth for a customer's reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub product_kind: ProductKind,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    /// Supplier-side owner (the driver for car rentals, the hotelier for stays).
    pub supplier_id: Option<Uuid>,
    /// When the stay or rental begins. Eligibility windows count down to this.
    pub starts_at: DateTime<Utc>,
    /// Nights for hotels, days for car rentals.
    pub units: i64,
    pub total_cents: i64,
    pub currency: String,
    pub cancellation_policy: CancellationPolicy,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        product_kind: ProductKind,
        product_id: Uuid,
        customer_id: Uuid,
        starts_at: DateTime<Utc>,
        units: i64,
        total_cents: i64,
        cancellation_policy: CancellationPolicy,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            product_kind,
            product_id,
            customer_id,
            supplier_id: None,
            starts_at,
            units,
            total_cents,
            currency: "USD".to_string(),
            cancellation_policy,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the booking to `next`, enforcing the transition table.
    pub fn update_status(&mut self, next: BookingStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition(next) {
            return Err(TransitionError { from: self.status, to: next });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether `viewer` may see this booking: customers see their own,
    /// suppliers see bookings assigned to them, admins see everything.
    pub fn visible_to(&self, viewer_id: Uuid, viewer_role: UserRole) -> bool {
        match viewer_role {
            UserRole::Admin => true,
            UserRole::Driver => {
                self.customer_id == viewer_id || self.supplier_id == Some(viewer_id)
            }
            UserRole::Client => self.customer_id == viewer_id,
        }
    }
}
