// src/services/catalog_service.rs

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{to_fields, EntityStore, Fields, SortKey, MAX_LIST_LIMIT},
    models::catalog::{Service, ServicePayload},
};

// Catálogo de serviços do profissional
#[derive(Clone)]
pub struct CatalogService {
    services: Arc<dyn EntityStore<Service>>,
}

impl CatalogService {
    pub fn new(services: Arc<dyn EntityStore<Service>>) -> Self {
        Self { services }
    }

    pub async fn list(&self, owner: Uuid, search: Option<&str>) -> Result<Vec<Service>, AppError> {
        let services = self.services.list(owner, &SortKey::asc("name"), MAX_LIST_LIMIT).await?;
        Ok(match search {
            Some(query) => services.into_iter().filter(|s| s.matches(query)).collect(),
            None => services,
        })
    }

    /// Serviços que podem ser escolhidos em um novo agendamento.
    pub async fn list_active(&self, owner: Uuid) -> Result<Vec<Service>, AppError> {
        let mut predicate = Fields::new();
        predicate.insert("active".into(), json!(true));
        let mut active = self.services.filter(owner, &predicate).await?;
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Service, AppError> {
        self.services
            .get(owner, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Serviço {}", id)))
    }

    pub async fn create(&self, owner: Uuid, payload: ServicePayload) -> Result<Service, AppError> {
        self.services.create(owner, to_fields(&payload.normalized())?).await
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: ServicePayload,
    ) -> Result<Service, AppError> {
        self.services.update(owner, id, to_fields(&payload.normalized())?).await
    }

    /// Inativar não apaga: o serviço segue no histórico, só sai da seleção.
    pub async fn set_active(&self, owner: Uuid, id: Uuid, active: bool) -> Result<Service, AppError> {
        let mut fields = Fields::new();
        fields.insert("active".into(), json!(active));
        self.services.update(owner, id, fields).await
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        self.services.delete(owner, id).await
    }
}
