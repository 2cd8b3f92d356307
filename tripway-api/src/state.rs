use std::sync::Arc;

use tripway_policy::RoutePolicy;
use tripway_pricing::QuoteEngine;
use tripway_store::{BookingRepository, UserRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingRepository>,
    pub users: Arc<dyn UserRepository>,
    pub quotes: QuoteEngine,
    pub route_policy: Arc<RoutePolicy>,
    pub auth: AuthConfig,
}
