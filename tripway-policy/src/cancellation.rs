//! Cancellation-policy rules: how long before the start date a booking can
//! still be cancelled, and how much of it comes back.

use chrono::{DateTime, Duration, Utc};
use tripway_domain::{money, CancellationPolicy};
use tracing::debug;

/// Minimum time remaining before `starts_at` for cancellation to stay open,
/// or `None` when the tier never allows it.
pub fn cancellation_window(policy: CancellationPolicy) -> Option<Duration> {
    match policy {
        CancellationPolicy::FreeCancellation => Some(Duration::hours(24)),
        CancellationPolicy::Moderate => Some(Duration::hours(72)),
        CancellationPolicy::Strict => Some(Duration::hours(168)),
        CancellationPolicy::NonRefundable => None,
    }
}

/// Percentage of the booking total returned on cancellation.
pub fn refund_percent(policy: CancellationPolicy) -> i64 {
    match policy {
        CancellationPolicy::FreeCancellation => 100,
        CancellationPolicy::Moderate => 50,
        CancellationPolicy::Strict => 0,
        CancellationPolicy::NonRefundable => 0,
    }
}

/// Whether a booking starting at `starts_at` may still be cancelled at `now`.
/// The remaining time must strictly exceed the tier's window.
pub fn can_cancel(starts_at: DateTime<Utc>, policy: CancellationPolicy, now: DateTime<Utc>) -> bool {
    match cancellation_window(policy) {
        Some(window) => starts_at - now > window,
        None => false,
    }
}

/// String-input variant for callers holding an unvalidated date. An
/// unparseable date fails closed: the booking is treated as not cancellable.
pub fn can_cancel_str(starts_at: &str, policy: CancellationPolicy) -> bool {
    match DateTime::parse_from_rfc3339(starts_at) {
        Ok(dt) => can_cancel(dt.with_timezone(&Utc), policy, Utc::now()),
        Err(e) => {
            debug!("Unparseable booking date {:?}, refusing cancellation: {}", starts_at, e);
            false
        }
    }
}

/// Refund in cents for a cancelled booking, rounded half up.
pub fn refund_amount(total_cents: i64, policy: CancellationPolicy) -> i64 {
    money::apply_percent(total_cents, refund_percent(policy))
}
