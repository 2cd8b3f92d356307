use serde::{Deserialize, Serialize};
use tracing::debug;
use tripway_domain::{money, ProductKind};

use crate::commission::CommissionRates;

/// A flat-fee add-on attached to a quote (GPS unit, child seat, breakfast).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraCharge {
    pub name: String,
    pub amount_cents: i64,
}

/// Fully itemized price for a prospective booking. All amounts in cents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// base price x units (nights or days)
    pub subtotal_cents: i64,
    pub extras_total_cents: i64,
    pub taxes_cents: i64,
    /// Platform cut, taken on subtotal plus extras.
    pub commission_cents: i64,
    /// What the customer pays.
    pub total_cents: i64,
    /// What the supplier keeps: the subtotal less the platform's share of it.
    pub supplier_payout_cents: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Amounts too large to price")]
    Overflow,
}

/// Computes price breakdowns from a commission-rate table.
#[derive(Debug, Clone, Default)]
pub struct QuoteEngine {
    rates: CommissionRates,
}

impl QuoteEngine {
    pub fn new(rates: CommissionRates) -> Self {
        Self { rates }
    }

    /// Itemize a price. Every multiplication and sum is checked, so inputs
    /// anywhere in the i64 range come back as `QuoteError::Overflow`
    /// instead of a wrapped total.
    pub fn quote(
        &self,
        kind: ProductKind,
        base_price_cents: i64,
        units: i64,
        extras: &[ExtraCharge],
        taxes_cents: i64,
    ) -> Result<PriceBreakdown, QuoteError> {
        let rate_bps = self.rates.rate_bps(kind);

        let subtotal_cents = base_price_cents
            .checked_mul(units)
            .ok_or(QuoteError::Overflow)?;
        let extras_total_cents = extras
            .iter()
            .try_fold(0i64, |acc, e| acc.checked_add(e.amount_cents))
            .ok_or(QuoteError::Overflow)?;
        let commissionable = subtotal_cents
            .checked_add(extras_total_cents)
            .ok_or(QuoteError::Overflow)?;
        let commission_cents = money::apply_bps(commissionable, rate_bps);
        let total_cents = commissionable
            .checked_add(taxes_cents)
            .and_then(|n| n.checked_add(commission_cents))
            .ok_or(QuoteError::Overflow)?;
        let supplier_payout_cents = subtotal_cents - money::apply_bps(subtotal_cents, rate_bps);

        debug!(
            ?kind,
            subtotal_cents, extras_total_cents, commission_cents, total_cents,
            "Quote computed"
        );

        Ok(PriceBreakdown {
            subtotal_cents,
            extras_total_cents,
            taxes_cents,
            commission_cents,
            total_cents,
            supplier_payout_cents,
        })
    }
}
