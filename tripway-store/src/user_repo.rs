use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::booking_repo::StoreError;
use tripway_domain::{User, UserRole};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, email: &str, display_name: &str, role: UserRole) -> Result<User, StoreError>;

    async fn get(&self, id: Uuid) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Flip the driver-verified flag; admin-only at the API layer.
    async fn set_driver_verified(&self, id: Uuid, verified: bool) -> Result<User, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    inner: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn create(&self, email: &str, display_name: &str, role: UserRole) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            role,
            driver_verified: false,
            created_at: Utc::now(),
        };
        let mut map = self.inner.write().await;
        map.insert(user.id, user.clone());
        info!("User created: {} ({})", user.id, user.role.as_str());
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> Result<User, StoreError> {
        let map = self.inner.read().await;
        map.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.values().find(|u| u.email == email).cloned())
    }

    async fn set_driver_verified(&self, id: Uuid, verified: bool) -> Result<User, StoreError> {
        let mut map = self.inner.write().await;
        let user = map.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        user.driver_verified = verified;
        info!("Driver {} verified={}", id, verified);
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repo = InMemoryUserRepo::new();
        let user = repo.create("amy@example.com", "Amy", UserRole::Client).await.unwrap();

        let found = repo.find_by_email("amy@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_driver_verification_flag() {
        let repo = InMemoryUserRepo::new();
        let driver = repo.create("d@example.com", "Dee", UserRole::Driver).await.unwrap();
        assert!(!driver.driver_verified);

        let updated = repo.set_driver_verified(driver.id, true).await.unwrap();
        assert!(updated.driver_verified);
        assert!(repo.get(driver.id).await.unwrap().driver_verified);
    }
}
