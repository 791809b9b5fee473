//! CRUD service for points of sale. No business rules live here.

use std::sync::Arc;

use crate::domain::error::{DomainError, EntityKind};
use crate::domain::model::Pos;
use crate::domain::ports::PosStore;

pub struct PosService {
    store: Arc<dyn PosStore>,
}

impl PosService {
    pub fn new(store: Arc<dyn PosStore>) -> Self {
        Self { store }
    }

    pub async fn upsert(&self, pos: Pos) -> Result<Pos, DomainError> {
        Ok(self.store.upsert(pos).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Pos, DomainError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(DomainError::not_found(EntityKind::Pos, id))
    }

    pub async fn get_all(&self) -> Result<Vec<Pos>, DomainError> {
        Ok(self.store.get_all().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.store
            .delete(id)
            .await?
            .ok_or(DomainError::not_found(EntityKind::Pos, id))?;
        Ok(())
    }
}
