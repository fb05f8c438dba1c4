// src/db/pg_store.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{
        clamp_limit, resolve_sort, sanitize_fields, Entity, EntityStore, Fields, RecordRow,
        SortColumn, SortKey,
    },
};

const RECORD_COLUMNS: &str = "id, owner_id, data, created_at, updated_at";

// O armazenamento de documentos em Postgres: uma tabela, um JSONB por registro
#[derive(Clone)]
pub struct PgEntityStore {
    pool: PgPool,
}

impl PgEntityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_clause<T: Entity>(sort: &SortKey) -> Result<String, AppError> {
    let direction = if sort.is_descending() { "DESC" } else { "ASC" };
    // O nome do campo vem de T::FIELDS (lista estática), nunca da requisição
    let column = match resolve_sort::<T>(sort)? {
        SortColumn::CreatedAt => "created_at".to_string(),
        SortColumn::UpdatedAt => "updated_at".to_string(),
        SortColumn::Data(field) => format!("data ->> '{field}'"),
    };
    Ok(format!("{column} {direction} NULLS LAST, created_at DESC"))
}

#[async_trait]
impl<T: Entity> EntityStore<T> for PgEntityStore {
    async fn list(&self, owner: Uuid, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM entity_records \
             WHERE owner_id = $1 AND kind = $2 ORDER BY {} LIMIT $3",
            order_clause::<T>(sort)?
        );

        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(owner)
            .bind(T::KIND)
            .bind(clamp_limit(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|row| row.into_entity::<T>()).collect()
    }

    async fn list_all(&self, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM entity_records \
             WHERE kind = $1 ORDER BY {} LIMIT $2",
            order_clause::<T>(sort)?
        );

        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(T::KIND)
            .bind(clamp_limit(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|row| row.into_entity::<T>()).collect()
    }

    async fn filter(&self, owner: Uuid, fields: &Fields) -> Result<Vec<T>, AppError> {
        let fields = sanitize_fields::<T>(fields.clone())?;

        // Containment do JSONB = igualdade exata nos campos de topo informados
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM entity_records \
             WHERE owner_id = $1 AND kind = $2 AND data @> $3 \
             ORDER BY created_at DESC LIMIT $4"
        );

        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(owner)
            .bind(T::KIND)
            .bind(sqlx::types::Json(fields))
            .bind(crate::db::store::MAX_LIST_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|row| row.into_entity::<T>()).collect()
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<T>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM entity_records \
             WHERE id = $1 AND owner_id = $2 AND kind = $3"
        );

        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .bind(owner)
            .bind(T::KIND)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_entity::<T>()).transpose()
    }

    async fn create(&self, owner: Uuid, fields: Fields) -> Result<T, AppError> {
        let fields = sanitize_fields::<T>(fields)?;

        let sql = format!(
            "INSERT INTO entity_records (id, owner_id, kind, data) \
             VALUES ($1, $2, $3, $4) RETURNING {RECORD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(T::KIND)
            .bind(sqlx::types::Json(fields))
            .fetch_one(&self.pool)
            .await?;

        row.into_entity()
    }

    async fn update(&self, owner: Uuid, id: Uuid, fields: Fields) -> Result<T, AppError> {
        let fields = sanitize_fields::<T>(fields)?;

        // `||` mescla o patch sobre o documento existente
        let sql = format!(
            "UPDATE entity_records SET data = data || $4, updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND kind = $3 RETURNING {RECORD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .bind(owner)
            .bind(T::KIND)
            .bind(sqlx::types::Json(fields))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("{} {}", T::KIND, id)))?;

        row.into_entity()
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM entity_records WHERE id = $1 AND owner_id = $2 AND kind = $3",
        )
            .bind(id)
            .bind(owner)
            .bind(T::KIND)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("{} {}", T::KIND, id)));
        }
        Ok(())
    }
}
