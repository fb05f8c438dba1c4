// src/models/account.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::calendar::YearMonth;
use crate::models::plan::{Plan, Role};

// Representa a conta do profissional (também é o "dono" de todos os registros)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    #[schema(example = "ana@salao.com.br")]
    pub email: String,
    #[schema(example = "Ana Souza")]
    pub full_name: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub plan: Plan,

    // Contador desnormalizado da cota. Só vale quando `reference_month`
    // é o mês corrente; caso contrário é recalculado a partir dos agendamentos.
    pub appointments_this_month: Option<u32>,
    #[schema(value_type = Option<String>, example = "2024-05")]
    pub reference_month: Option<YearMonth>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Primeiro nome para a saudação do dashboard.
    pub fn first_name(&self) -> &str {
        self.full_name
            .as_deref()
            .and_then(|n| n.split_whitespace().next())
            .unwrap_or("Profissional")
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
}

/// Alteração parcial da conta: só os campos `Some` são gravados.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub full_name: Option<String>,
    pub plan: Option<Plan>,
    pub appointments_this_month: Option<u32>,
    pub reference_month: Option<YearMonth>,
}

// Dados para registro de uma nova conta
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    pub full_name: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID da conta)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}
