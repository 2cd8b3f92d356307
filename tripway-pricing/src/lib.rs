pub mod breakdown;
pub mod commission;

pub use breakdown::{ExtraCharge, PriceBreakdown, QuoteEngine, QuoteError};
pub use commission::CommissionRates;
