pub mod app_config;
pub mod booking_repo;
pub mod user_repo;

pub use booking_repo::{BookingRepository, InMemoryBookingRepo, StoreError};
pub use user_repo::{InMemoryUserRepo, UserRepository};
