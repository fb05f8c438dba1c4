// src/handlers/services.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::clients::SearchQuery,
    middleware::{auth::AuthenticatedAccount, i18n::Locale},
    models::catalog::{ActivePayload, Service, ServicePayload},
};

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    params(SearchQuery),
    responses((status = 200, description = "Catálogo de serviços", body = Vec<Service>)),
    security(("api_jwt" = []))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .catalog_service
        .list(account.id, query.search.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(services))
}

// GET /api/services/active
#[utoipa::path(
    get,
    path = "/api/services/active",
    tag = "Services",
    responses((status = 200, description = "Serviços disponíveis para agendamento", body = Vec<Service>)),
    security(("api_jwt" = []))
)]
pub async fn list_active_services(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .catalog_service
        .list_active(account.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(services))
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Services",
    request_body = ServicePayload,
    responses(
        (status = 201, description = "Serviço criado", body = Service),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<ServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let service = app_state
        .catalog_service
        .create(account.id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /api/services/{id}
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses(
        (status = 200, description = "Serviço", body = Service),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_service(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let service = app_state
        .catalog_service
        .get(account.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(service))
}

// PUT /api/services/{id}
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    request_body = ServicePayload,
    responses((status = 200, description = "Serviço atualizado", body = Service)),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let service = app_state
        .catalog_service
        .update(account.id, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(service))
}

// PATCH /api/services/{id}/active
#[utoipa::path(
    patch,
    path = "/api/services/{id}/active",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    request_body = ActivePayload,
    responses((status = 200, description = "Serviço ativado/inativado", body = Service)),
    security(("api_jwt" = []))
)]
pub async fn set_service_active(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActivePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let service = app_state
        .catalog_service
        .set_active(account.id, id, payload.active)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(service))
}

// DELETE /api/services/{id}
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses((status = 204, description = "Serviço excluído")),
    security(("api_jwt" = []))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete(account.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
