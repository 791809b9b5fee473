//! CRUD service for users. No business rules live here.

use std::sync::Arc;

use crate::domain::error::{DomainError, EntityKind};
use crate::domain::model::User;
use crate::domain::ports::UserStore;

pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn upsert(&self, user: User) -> Result<User, DomainError> {
        Ok(self.store.upsert(user).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, DomainError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(DomainError::not_found(EntityKind::User, id))
    }

    pub async fn get_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.store.get_all().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.store
            .delete(id)
            .await?
            .ok_or(DomainError::not_found(EntityKind::User, id))?;
        Ok(())
    }
}
