//! Money helpers. All amounts are i64 minor units (cents); percentage rates
//! are basis points (1% = 100 bps). Rounding is half-up at every rate
//! application so a breakdown's parts always reproduce exactly.

/// Apply a basis-point rate to an amount in cents, rounding half up.
///
/// Amounts are expected to be non-negative; rates between 0 and 10_000.
/// The intermediate product is widened to i128, so the full i64 amount
/// range is safe: for rates up to 10_000 bps the result fits back in i64.
pub fn apply_bps(amount_cents: i64, rate_bps: i64) -> i64 {
    ((amount_cents as i128 * rate_bps as i128 + 5_000) / 10_000) as i64
}

/// Apply a whole-percentage rate to an amount in cents, rounding half up.
pub fn apply_percent(amount_cents: i64, percent: i64) -> i64 {
    apply_bps(amount_cents, percent * 100)
}
