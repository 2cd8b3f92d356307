use serde::{Deserialize, Serialize};
use tripway_domain::ProductKind;

/// Platform commission rates in basis points, by product kind.
///
/// Car rentals run at a flat 5%; hotel listings pay 10%, or 15% when the
/// property buys featured placement. Overridable from config per deploy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionRates {
    pub car_rental_bps: i64,
    pub hotel_bps: i64,
    pub hotel_featured_bps: i64,
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self {
            car_rental_bps: 500,
            hotel_bps: 1000,
            hotel_featured_bps: 1500,
        }
    }
}

impl CommissionRates {
    pub fn rate_bps(&self, kind: ProductKind) -> i64 {
        match kind {
            ProductKind::CarRental => self.car_rental_bps,
            ProductKind::Hotel => self.hotel_bps,
            ProductKind::HotelFeatured => self.hotel_featured_bps,
        }
    }
}
