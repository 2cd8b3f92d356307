use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use tripway_domain::{Booking, BookingStatus, TransitionError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: Booking) -> Result<Booking, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Booking, StoreError>;

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Booking>, StoreError>;

    /// Apply a status transition. The transition table is enforced here,
    /// on the stored copy, so a stale client cannot skip states.
    async fn update_status(&self, id: Uuid, next: BookingStatus) -> Result<Booking, StoreError>;
}

/// Map-backed repository. The platform keeps no persistence layer of its
/// own; anything durable lives behind the upstream booking providers.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepo {
    inner: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepo {
    async fn create(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut map = self.inner.write().await;
        map.insert(booking.id, booking.clone());
        info!("Booking created: {}", booking.id);
        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> Result<Booking, StoreError> {
        let map = self.inner.read().await;
        map.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let map = self.inner.read().await;
        let mut bookings: Vec<Booking> = map
            .values()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.created_at);
        Ok(bookings)
    }

    async fn update_status(&self, id: Uuid, next: BookingStatus) -> Result<Booking, StoreError> {
        let mut map = self.inner.write().await;
        let booking = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        booking.update_status(next)?;
        info!("Booking {} -> {}", id, next.as_str());
        Ok(booking.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tripway_domain::{CancellationPolicy, ProductKind};

    fn sample_booking(customer_id: Uuid) -> Booking {
        Booking::new(
            ProductKind::CarRental,
            Uuid::new_v4(),
            customer_id,
            Utc::now() + Duration::days(5),
            3,
            3675,
            CancellationPolicy::FreeCancellation,
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryBookingRepo::new();
        let booking = sample_booking(Uuid::new_v4());
        let id = booking.id;

        repo.create(booking).await.unwrap();
        let fetched = repo.get(id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_missing_booking() {
        let repo = InMemoryBookingRepo::new();
        let err = repo.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_status_enforces_table() {
        let repo = InMemoryBookingRepo::new();
        let booking = sample_booking(Uuid::new_v4());
        let id = booking.id;
        repo.create(booking).await.unwrap();

        repo.update_status(id, BookingStatus::Confirmed).await.unwrap();
        let err = repo.update_status(id, BookingStatus::Refunded).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition(_)));

        // stored copy untouched by the rejected transition
        assert_eq!(repo.get(id).await.unwrap().status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_list_by_customer() {
        let repo = InMemoryBookingRepo::new();
        let customer = Uuid::new_v4();

        repo.create(sample_booking(customer)).await.unwrap();
        repo.create(sample_booking(customer)).await.unwrap();
        repo.create(sample_booking(Uuid::new_v4())).await.unwrap();

        let bookings = repo.list_by_customer(customer).await.unwrap();
        assert_eq!(bookings.len(), 2);
    }
}
