// src/db/account_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::clamp_limit,
    models::account::{Account, AccountPatch, NewAccount},
    models::plan::{Plan, Role},
};

// Acesso às contas (tabela tipada, fora do armazenamento de documentos)
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;

    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError>;

    /// Grava apenas os campos `Some` do patch.
    async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<Account, AppError>;

    /// Contas ordenadas por nome (painel administrativo).
    async fn list(&self, limit: i64) -> Result<Vec<Account>, AppError>;
}

// Linha crua do banco. Plano, papel e mês são texto livre e passam pela
// leitura tolerante dos modelos (ausente/desconhecido = free/user).
#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    full_name: Option<String>,
    password_hash: String,
    role: Option<String>,
    plan: Option<String>,
    appointments_this_month: Option<i32>,
    reference_month: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            password_hash: row.password_hash,
            role: Role::from_stored(row.role.as_deref()),
            plan: Plan::from_stored(row.plan.as_deref()),
            appointments_this_month: row
                .appointments_this_month
                .and_then(|n| u32::try_from(n).ok()),
            reference_month: row.reference_month.and_then(|m| m.parse().ok()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, full_name, password_hash, role, plan, \
     appointments_this_month, reference_month, created_at, updated_at";

#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Account::from))
    }

    // Com tratamento específico para e-mails duplicados
    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        let sql = format!(
            "INSERT INTO accounts (id, email, full_name, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {ACCOUNT_COLUMNS}"
        );
        let result = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_account.email)
            .bind(&new_account.full_name)
            .bind(&new_account.password_hash)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::EmailAlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<Account, AppError> {
        let sql = format!(
            "UPDATE accounts SET \
                full_name = COALESCE($2, full_name), \
                plan = COALESCE($3, plan), \
                appointments_this_month = COALESCE($4, appointments_this_month), \
                reference_month = COALESCE($5, reference_month), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(patch.full_name)
            .bind(patch.plan.map(|p| p.as_str()))
            .bind(patch.appointments_this_month.map(|n| n as i32))
            .bind(patch.reference_month.map(|m| m.to_string()))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(row.into())
    }

    async fn list(&self, limit: i64) -> Result<Vec<Account>, AppError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             ORDER BY full_name ASC NULLS LAST, created_at ASC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(clamp_limit(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }
}
