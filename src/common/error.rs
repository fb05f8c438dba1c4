// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::{appointment::AppointmentStatus, plan::{Feature, Plan}},
};

// Erros de domínio. Cada variante tem um código estável (`code`) que é
// também a chave de tradução da mensagem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Referência inválida dentro de um payload válido (cliente/serviço)
    #[error("Campo '{field}' inválido: {code}")]
    InvalidReference { field: &'static str, code: &'static str },

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Campo de ordenação inválido: {0}")]
    InvalidSortKey(String),

    #[error("Campo desconhecido: {0}")]
    UnknownField(String),

    #[error("Mês inválido: {0}")]
    InvalidMonth(String),

    #[error("Período inválido")]
    InvalidPeriod,

    #[error("Recurso '{}' exige upgrade de plano", .0.as_str())]
    PlanUpgradeRequired(Feature),

    #[error("Acesso restrito a administradores")]
    AdminRequired,

    #[error("Cota mensal de {limit} agendamentos atingida")]
    MonthlyQuotaReached { limit: u32 },

    #[error("Transição de status inválida: {} -> {}", .from.as_str(), .to.as_str())]
    InvalidStatusTransition { from: AppointmentStatus, to: AppointmentStatus },

    #[error("Plano '{}' já está ativo", .0.as_str())]
    PlanAlreadyActive(Plan),

    #[error("Confirmação por redirecionamento desativada")]
    PaymentRedirectNotTrusted,

    #[error("Token do gateway de pagamento não configurado")]
    PaymentGatewayNotConfigured,

    #[error("Gateway de pagamento respondeu com erro: {0}")]
    PaymentGateway(String),

    #[error("Falha HTTP no gateway de pagamento: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::InvalidReference { .. } => "validation_error",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::ResourceNotFound(_) => "resource_not_found",
            AppError::InvalidSortKey(_) => "invalid_sort_key",
            AppError::UnknownField(_) => "unknown_field",
            AppError::InvalidMonth(_) => "invalid_month",
            AppError::InvalidPeriod => "invalid_period",
            AppError::PlanUpgradeRequired(_) => "plan_upgrade_required",
            AppError::AdminRequired => "admin_required",
            AppError::MonthlyQuotaReached { .. } => "monthly_quota_reached",
            AppError::InvalidStatusTransition { .. } => "invalid_status_transition",
            AppError::PlanAlreadyActive(_) => "plan_already_active",
            AppError::PaymentRedirectNotTrusted => "payment_redirect_not_trusted",
            AppError::PaymentGatewayNotConfigured => "payment_gateway_not_configured",
            AppError::PaymentGateway(_) | AppError::HttpClientError(_) => "payment_gateway_error",
            AppError::DatabaseError(_)
            | AppError::SerializationError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidReference { .. }
            | AppError::InvalidSortKey(_)
            | AppError::UnknownField(_)
            | AppError::InvalidMonth(_)
            | AppError::InvalidPeriod => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::PaymentRedirectNotTrusted
            | AppError::PlanUpgradeRequired(_)
            | AppError::AdminRequired => StatusCode::FORBIDDEN,
            AppError::MonthlyQuotaReached { .. } => StatusCode::PAYMENT_REQUIRED,
            AppError::UserNotFound | AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::InvalidStatusTransition { .. }
            | AppError::PlanAlreadyActive(_) => StatusCode::CONFLICT,
            AppError::PaymentGatewayNotConfigured
            | AppError::PaymentGateway(_)
            | AppError::HttpClientError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::ResourceNotFound(resource) => vec![("resource", resource.clone())],
            AppError::InvalidSortKey(field) | AppError::UnknownField(field) => {
                vec![("field", field.clone())]
            }
            AppError::InvalidMonth(value) => vec![("value", value.clone())],
            AppError::MonthlyQuotaReached { limit } => vec![("limit", limit.to_string())],
            AppError::InvalidStatusTransition { from, to } => {
                vec![("from", from.label().to_string()), ("to", to.label().to_string())]
            }
            AppError::PlanAlreadyActive(plan) => vec![("plan", plan.label().to_string())],
            _ => Vec::new(),
        }
    }

    /// Converte para a resposta HTTP no idioma da requisição.
    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();
        let code = self.code();
        let lang = locale.0.as_str();

        if status.is_server_error() {
            // O detalhe só vai para o log
            tracing::error!(code, "{}", error_chain(&self));
        }

        let details = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(&e.code);
                            i18n.translate(lang, key)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::InvalidReference { field, code } => {
                let mut details = serde_json::Map::new();
                details.insert(field.to_string(), json!([i18n.translate(lang, code)]));
                Some(Value::Object(details))
            }
            AppError::PlanUpgradeRequired(feature) => {
                Some(json!({ "feature": feature, "requiredPlan": Plan::Premium }))
            }
            AppError::MonthlyQuotaReached { limit } => Some(json!({ "limit": limit })),
            _ => None,
        };

        ApiError {
            status,
            code,
            error: i18n.format(lang, code, &self.message_args()),
            details,
        }
    }
}

fn error_chain(err: &AppError) -> String {
    let mut out = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}

// Resposta de erro já traduzida
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "code": self.code, "error": self.error });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}
