// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        calendar::{today, YearMonth},
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedAccount,
        i18n::Locale,
        plan_gate::{FinanceFeature, RequireFeature},
    },
    models::{
        reports::FinanceOverview,
        transaction::{Transaction, TransactionPayload, TransactionType},
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OverviewQuery {
    /// Mês no formato YYYY-MM (padrão: mês corrente)
    pub month: Option<String>,
    /// Filtra a lista por tipo (`income` / `expense`)
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: Option<TransactionType>,
}

// GET /api/finance/transactions
#[utoipa::path(
    get,
    path = "/api/finance/transactions",
    tag = "Finance",
    responses(
        (status = 200, description = "Lançamentos", body = Vec<Transaction>),
        (status = 403, description = "Recurso do plano Premium")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFeature<FinanceFeature>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = app_state
        .finance_service
        .list(account.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transactions))
}

// POST /api/finance/transactions
#[utoipa::path(
    post,
    path = "/api/finance/transactions",
    tag = "Finance",
    request_body = TransactionPayload,
    responses(
        (status = 201, description = "Lançamento criado", body = Transaction),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Recurso do plano Premium")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFeature<FinanceFeature>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .finance_service
        .create(account.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// GET /api/finance/transactions/{id}
#[utoipa::path(
    get,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 200, description = "Lançamento", body = Transaction),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFeature<FinanceFeature>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = app_state
        .finance_service
        .get(account.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transaction))
}

// PUT /api/finance/transactions/{id}
#[utoipa::path(
    put,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    request_body = TransactionPayload,
    responses((status = 200, description = "Lançamento atualizado", body = Transaction)),
    security(("api_jwt" = []))
)]
pub async fn update_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFeature<FinanceFeature>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .finance_service
        .update(account.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transaction))
}

// DELETE /api/finance/transactions/{id}
#[utoipa::path(
    delete,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses((status = 204, description = "Lançamento excluído")),
    security(("api_jwt" = []))
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFeature<FinanceFeature>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_service
        .delete(account.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/finance/overview
#[utoipa::path(
    get,
    path = "/api/finance/overview",
    tag = "Finance",
    params(OverviewQuery),
    responses(
        (status = 200, description = "Resumo financeiro do mês", body = FinanceOverview),
        (status = 400, description = "Mês inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFeature<FinanceFeature>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(query): Query<OverviewQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let month = match query.month.as_deref() {
        Some(raw) => raw.parse::<YearMonth>().map_err(|_| {
            AppError::InvalidMonth(raw.to_string()).to_api_error(&locale, &app_state.i18n_store)
        })?,
        None => YearMonth::of(today()),
    };

    let overview = app_state
        .finance_service
        .overview(account.id, month, query.kind)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(overview))
}
