// src/db/memory_store.rs

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::account_repo::AccountStore,
    db::store::{
        clamp_limit, resolve_sort, sanitize_fields, Entity, EntityStore, Fields, RecordRow,
        SortColumn, SortKey, MAX_LIST_LIMIT,
    },
    models::account::{Account, AccountPatch, NewAccount},
    models::plan::{Plan, Role},
};

fn poisoned() -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("lock do armazenamento em memória envenenado"))
}

// Relógio estritamente crescente: dois registros criados no mesmo instante
// ainda assim têm ordem de criação definida.
fn tick(clock: &mut DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    *clock = if now > *clock { now } else { *clock + Duration::microseconds(1) };
    *clock
}

// =============================================================================
//  ENTIDADES
// =============================================================================

#[derive(Default)]
struct Records {
    by_kind: HashMap<&'static str, Vec<RecordRow>>,
    clock: DateTime<Utc>,
}

/// Mesma semântica do `PgEntityStore`, sem banco. Usado nos testes.
#[derive(Default)]
pub struct MemoryEntityStore {
    inner: RwLock<Records>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Representação textual usada na ordenação (equivalente ao `->>` do Postgres).
fn sort_text(row: &RecordRow, column: &SortColumn) -> Option<String> {
    match column {
        SortColumn::CreatedAt => Some(row.created_at.to_rfc3339()),
        SortColumn::UpdatedAt => Some(row.updated_at.to_rfc3339()),
        SortColumn::Data(field) => match row.data.0.get(*field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        },
    }
}

fn sorted_rows(mut rows: Vec<RecordRow>, column: &SortColumn, descending: bool) -> Vec<RecordRow> {
    rows.sort_by(|a, b| {
        let primary = match (sort_text(a, column), sort_text(b, column)) {
            (Some(x), Some(y)) if descending => y.cmp(&x),
            (Some(x), Some(y)) => x.cmp(&y),
            // Valores ausentes sempre por último
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        primary.then_with(|| b.created_at.cmp(&a.created_at))
    });
    rows
}

#[async_trait]
impl<T: Entity> EntityStore<T> for MemoryEntityStore {
    async fn list(&self, owner: Uuid, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError> {
        let column = resolve_sort::<T>(sort)?;
        let rows: Vec<RecordRow> = {
            let guard = self.inner.read().map_err(|_| poisoned())?;
            guard
                .by_kind
                .get(T::KIND)
                .map(|rows| rows.iter().filter(|r| r.owner_id == owner).cloned().collect())
                .unwrap_or_default()
        };

        sorted_rows(rows, &column, sort.is_descending())
            .into_iter()
            .take(clamp_limit(limit) as usize)
            .map(|row| row.into_entity::<T>())
            .collect()
    }

    async fn list_all(&self, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError> {
        let column = resolve_sort::<T>(sort)?;
        let rows: Vec<RecordRow> = {
            let guard = self.inner.read().map_err(|_| poisoned())?;
            guard.by_kind.get(T::KIND).cloned().unwrap_or_default()
        };

        sorted_rows(rows, &column, sort.is_descending())
            .into_iter()
            .take(clamp_limit(limit) as usize)
            .map(|row| row.into_entity::<T>())
            .collect()
    }

    async fn filter(&self, owner: Uuid, fields: &Fields) -> Result<Vec<T>, AppError> {
        let fields = sanitize_fields::<T>(fields.clone())?;
        let rows: Vec<RecordRow> = {
            let guard = self.inner.read().map_err(|_| poisoned())?;
            guard
                .by_kind
                .get(T::KIND)
                .map(|rows| {
                    rows.iter()
                        .filter(|r| r.owner_id == owner)
                        .filter(|r| fields.iter().all(|(k, v)| r.data.0.get(k) == Some(v)))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        sorted_rows(rows, &SortColumn::CreatedAt, true)
            .into_iter()
            .take(MAX_LIST_LIMIT as usize)
            .map(|row| row.into_entity::<T>())
            .collect()
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<T>, AppError> {
        let row = {
            let guard = self.inner.read().map_err(|_| poisoned())?;
            guard
                .by_kind
                .get(T::KIND)
                .and_then(|rows| rows.iter().find(|r| r.id == id && r.owner_id == owner).cloned())
        };
        row.map(|r| r.into_entity::<T>()).transpose()
    }

    async fn create(&self, owner: Uuid, fields: Fields) -> Result<T, AppError> {
        let fields = sanitize_fields::<T>(fields)?;
        let row = {
            let mut guard = self.inner.write().map_err(|_| poisoned())?;
            let stamp = tick(&mut guard.clock);
            let row = RecordRow {
                id: Uuid::new_v4(),
                owner_id: owner,
                data: sqlx::types::Json(fields),
                created_at: stamp,
                updated_at: stamp,
            };
            guard.by_kind.entry(T::KIND).or_default().push(row.clone());
            row
        };
        row.into_entity()
    }

    async fn update(&self, owner: Uuid, id: Uuid, fields: Fields) -> Result<T, AppError> {
        let fields = sanitize_fields::<T>(fields)?;
        let row = {
            let mut guard = self.inner.write().map_err(|_| poisoned())?;
            let stamp = tick(&mut guard.clock);
            let row = guard
                .by_kind
                .get_mut(T::KIND)
                .and_then(|rows| rows.iter_mut().find(|r| r.id == id && r.owner_id == owner))
                .ok_or_else(|| AppError::ResourceNotFound(format!("{} {}", T::KIND, id)))?;
            row.data.0.extend(fields);
            row.updated_at = stamp;
            row.clone()
        };
        row.into_entity()
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        let rows = guard.by_kind.entry(T::KIND).or_default();
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.owner_id == owner));
        if rows.len() == before {
            return Err(AppError::ResourceNotFound(format!("{} {}", T::KIND, id)));
        }
        Ok(())
    }
}

// =============================================================================
//  CONTAS
// =============================================================================

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere uma conta pronta (papel e plano já definidos). Usado para semear testes.
    pub fn insert(&self, account: Account) -> Result<(), AppError> {
        self.accounts.write().map_err(|_| poisoned())?.push(account);
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let guard = self.accounts.read().map_err(|_| poisoned())?;
        Ok(guard.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let guard = self.accounts.read().map_err(|_| poisoned())?;
        Ok(guard.iter().find(|a| a.email == email).cloned())
    }

    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        let mut guard = self.accounts.write().map_err(|_| poisoned())?;
        if guard.iter().any(|a| a.email == new_account.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: new_account.email,
            full_name: new_account.full_name,
            password_hash: new_account.password_hash,
            role: Role::User,
            plan: Plan::Free,
            appointments_this_month: None,
            reference_month: None,
            created_at: now,
            updated_at: now,
        };
        guard.push(account.clone());
        Ok(account)
    }

    async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<Account, AppError> {
        let mut guard = self.accounts.write().map_err(|_| poisoned())?;
        let account = guard
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::UserNotFound)?;

        if let Some(full_name) = patch.full_name {
            account.full_name = Some(full_name);
        }
        if let Some(plan) = patch.plan {
            account.plan = plan;
        }
        if let Some(count) = patch.appointments_this_month {
            account.appointments_this_month = Some(count);
        }
        if let Some(month) = patch.reference_month {
            account.reference_month = Some(month);
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn list(&self, limit: i64) -> Result<Vec<Account>, AppError> {
        let mut accounts = self.accounts.read().map_err(|_| poisoned())?.clone();
        accounts.sort_by(|a, b| match (&a.full_name, &b.full_name) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        accounts.truncate(clamp_limit(limit) as usize);
        Ok(accounts)
    }
}
