// src/db/store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::error::AppError;

/// Campos de um registro (o "documento" JSON sem os metadados).
pub type Fields = Map<String, Value>;

/// Teto de registros por consulta. Não há paginação: agregações acima
/// desse volume são subcontagens conhecidas.
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Metadados que o armazenamento controla e que nunca são gravados no documento.
const META_FIELDS: [&str; 4] = ["id", "ownerId", "createdDate", "updatedDate"];

// ---
// O contrato de uma entidade persistida
// ---
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Discriminador do tipo no armazenamento ("client", "appointment", ...)
    const KIND: &'static str;

    /// Campos do documento aceitos em ordenação, filtro e escrita.
    const FIELDS: &'static [&'static str];

    fn id(&self) -> Uuid;
}

// ---
// Chave de ordenação ("-date" = decrescente por date)
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    field: String,
    descending: bool,
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().strip_prefix('-') {
            Some(field) => Self { field: field.to_string(), descending: true },
            None => Self { field: raw.trim().to_string(), descending: false },
        }
    }

    pub fn asc(field: &str) -> Self {
        Self { field: field.to_string(), descending: false }
    }

    pub fn desc(field: &str) -> Self {
        Self { field: field.to_string(), descending: true }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }
}

/// Coluna efetiva de ordenação, já validada contra a entidade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SortColumn {
    CreatedAt,
    UpdatedAt,
    Data(&'static str),
}

pub(crate) fn resolve_sort<T: Entity>(sort: &SortKey) -> Result<SortColumn, AppError> {
    match sort.field() {
        "createdDate" => Ok(SortColumn::CreatedAt),
        "updatedDate" => Ok(SortColumn::UpdatedAt),
        other => T::FIELDS
            .iter()
            .find(|f| **f == other)
            .map(|f| SortColumn::Data(f))
            .ok_or_else(|| AppError::InvalidSortKey(other.to_string())),
    }
}

pub(crate) fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIST_LIMIT)
}

/// Remove metadados e recusa campos que a entidade não declara.
pub(crate) fn sanitize_fields<T: Entity>(mut fields: Fields) -> Result<Fields, AppError> {
    for meta in META_FIELDS {
        fields.remove(meta);
    }
    if let Some(unknown) = fields.keys().find(|k| !T::FIELDS.contains(&k.as_str())) {
        return Err(AppError::UnknownField(unknown.clone()));
    }
    Ok(fields)
}

/// Serializa um payload (struct com `#[serde(rename_all = "camelCase")]`) em campos.
pub fn to_fields<S: Serialize>(value: &S) -> Result<Fields, AppError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::InternalServerError(anyhow::anyhow!(
            "payload não é um objeto JSON: {other}"
        ))),
    }
}

// ---
// Linha genérica do armazenamento (Postgres e memória usam a mesma forma)
// ---
#[derive(Debug, Clone, FromRow)]
pub struct RecordRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub data: sqlx::types::Json<Fields>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordRow {
    pub fn into_entity<T: Entity>(self) -> Result<T, AppError> {
        let mut doc = self.data.0;
        doc.insert("id".into(), json!(self.id));
        doc.insert("ownerId".into(), json!(self.owner_id));
        doc.insert("createdDate".into(), json!(self.created_at));
        doc.insert("updatedDate".into(), json!(self.updated_at));
        Ok(serde_json::from_value(Value::Object(doc))?)
    }
}

// ---
// O contrato do armazenamento de entidades
// ---
// Todas as operações são isoladas por conta (`owner`), exceto `list_all`,
// usada apenas pelo painel administrativo. Última escrita vence.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Até `limit` registros da conta, ordenados por `sort`.
    async fn list(&self, owner: Uuid, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError>;

    /// Até `limit` registros de todas as contas.
    async fn list_all(&self, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError>;

    /// Igualdade exata em cada campo informado.
    async fn filter(&self, owner: Uuid, fields: &Fields) -> Result<Vec<T>, AppError>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<T>, AppError>;

    async fn create(&self, owner: Uuid, fields: Fields) -> Result<T, AppError>;

    /// Mescla os campos no registro existente.
    async fn update(&self, owner: Uuid, id: Uuid, fields: Fields) -> Result<T, AppError>;

    /// Exclusão definitiva (não há soft-delete).
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::Appointment;
    use crate::models::client::Client;

    #[test]
    fn parses_sort_direction() {
        assert_eq!(SortKey::parse("-date"), SortKey::desc("date"));
        assert_eq!(SortKey::parse("name"), SortKey::asc("name"));
    }

    #[test]
    fn sort_field_must_be_declared() {
        assert_eq!(
            resolve_sort::<Appointment>(&SortKey::desc("date")).unwrap(),
            SortColumn::Data("date")
        );
        assert_eq!(
            resolve_sort::<Client>(&SortKey::desc("createdDate")).unwrap(),
            SortColumn::CreatedAt
        );
        assert!(matches!(
            resolve_sort::<Client>(&SortKey::asc("name; DROP TABLE x")),
            Err(AppError::InvalidSortKey(_))
        ));
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(clamp_limit(5000), MAX_LIST_LIMIT);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(500), 500);
    }

    #[test]
    fn sanitize_strips_meta_and_rejects_unknown() {
        let mut fields = Fields::new();
        fields.insert("id".into(), json!("x"));
        fields.insert("name".into(), json!("Ana"));
        let clean = sanitize_fields::<Client>(fields).unwrap();
        assert!(!clean.contains_key("id"));

        let mut bogus = Fields::new();
        bogus.insert("salary".into(), json!(1));
        assert!(matches!(sanitize_fields::<Client>(bogus), Err(AppError::UnknownField(_))));
    }
}
