// src/services/client_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{to_fields, EntityStore, SortKey, MAX_LIST_LIMIT},
    models::client::{Client, ClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    clients: Arc<dyn EntityStore<Client>>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn EntityStore<Client>>) -> Self {
        Self { clients }
    }

    /// Clientes em ordem alfabética, opcionalmente filtrados pela busca.
    pub async fn list(&self, owner: Uuid, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        let clients = self.clients.list(owner, &SortKey::asc("name"), MAX_LIST_LIMIT).await?;
        Ok(match search {
            Some(query) => clients.into_iter().filter(|c| c.matches(query)).collect(),
            None => clients,
        })
    }

    pub async fn count(&self, owner: Uuid) -> Result<usize, AppError> {
        Ok(self.clients.list(owner, &SortKey::asc("name"), MAX_LIST_LIMIT).await?.len())
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Client, AppError> {
        self.clients
            .get(owner, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Cliente {}", id)))
    }

    pub async fn create(&self, owner: Uuid, payload: ClientPayload) -> Result<Client, AppError> {
        let fields = to_fields(&payload.normalized())?;
        self.clients.create(owner, fields).await
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: ClientPayload,
    ) -> Result<Client, AppError> {
        let fields = to_fields(&payload.normalized())?;
        self.clients.update(owner, id, fields).await
    }

    /// Os agendamentos do cliente continuam com o nome copiado.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        self.clients.delete(owner, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryEntityStore;

    fn payload(name: &str, email: Option<&str>) -> ClientPayload {
        ClientPayload {
            name: name.into(),
            email: email.map(str::to_string),
            phone: None,
            tax_id: None,
            address: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn crud_and_search() {
        let service = ClientService::new(Arc::new(MemoryEntityStore::new()));
        let owner = Uuid::new_v4();

        let carla = service.create(owner, payload("  Carla Dias ", None)).await.unwrap();
        assert_eq!(carla.name, "Carla Dias");
        service.create(owner, payload("Ana", Some("ana@mail.com"))).await.unwrap();

        let all = service.list(owner, None).await.unwrap();
        assert_eq!(all.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Ana", "Carla Dias"]);

        let hits = service.list(owner, Some("MAIL")).await.unwrap();
        assert_eq!(hits.len(), 1);

        let renamed = service
            .update(owner, carla.id, payload("Carla Souza", Some("c@x.com")))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Carla Souza");

        service.delete(owner, carla.id).await.unwrap();
        assert!(matches!(
            service.get(owner, carla.id).await,
            Err(AppError::ResourceNotFound(_))
        ));
        assert_eq!(service.count(owner).await.unwrap(), 1);
    }
}
