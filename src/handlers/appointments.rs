// src/handlers/appointments.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        calendar::today,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedAccount, i18n::Locale},
    models::{
        appointment::{Appointment, AppointmentPayload, StatusPayload},
        reports::AgendaView,
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Campo de ordenação; prefixo `-` para decrescente (padrão `-date`)
    pub sort: Option<String>,
    /// Máximo de registros (até 1000)
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AgendaQuery {
    /// Dia selecionado (padrão: hoje)
    #[param(value_type = Option<String>, example = "2024-05-10")]
    pub date: Option<NaiveDate>,
}

// =============================================================================
//  ÁREA 1: AGENDAMENTOS
// =============================================================================

// GET /api/appointments
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Appointments",
    params(ListQuery),
    responses(
        (status = 200, description = "Agendamentos", body = Vec<Appointment>),
        (status = 400, description = "Ordenação inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_appointments(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let appointments = app_state
        .appointment_service
        .list(account.id, query.sort.as_deref(), query.limit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(appointments))
}

// POST /api/appointments
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    request_body = AppointmentPayload,
    responses(
        (status = 201, description = "Agendamento criado", body = Appointment),
        (status = 400, description = "Dados inválidos"),
        (status = 402, description = "Cota mensal do plano gratuito atingida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<AppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let appointment = app_state
        .appointment_service
        .create(&account, payload, today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

// GET /api/appointments/{id}
#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento", body = Appointment),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = app_state
        .appointment_service
        .get(account.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(appointment))
}

// PUT /api/appointments/{id}
#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    request_body = AppointmentPayload,
    responses(
        (status = 200, description = "Agendamento atualizado", body = Appointment),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let appointment = app_state
        .appointment_service
        .update(&account, id, payload, today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(appointment))
}

// DELETE /api/appointments/{id}
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 204, description = "Agendamento excluído"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .appointment_service
        .delete(&account, id, today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: STATUS
// =============================================================================

// PATCH /api/appointments/{id}/status
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Appointment),
        (status = 409, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = app_state
        .appointment_service
        .change_status(account.id, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(appointment))
}

// POST /api/appointments/{id}/advance
#[utoipa::path(
    post,
    path = "/api/appointments/{id}/advance",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Avançou uma etapa", body = Appointment),
        (status = 409, description = "Agendamento já finalizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn advance_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = app_state
        .appointment_service
        .advance(account.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(appointment))
}

// =============================================================================
//  ÁREA 3: AGENDA
// =============================================================================

// GET /api/agenda
#[utoipa::path(
    get,
    path = "/api/agenda",
    tag = "Appointments",
    params(AgendaQuery),
    responses((status = 200, description = "Semana, dia selecionado e horários", body = AgendaView)),
    security(("api_jwt" = []))
)]
pub async fn get_agenda(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(query): Query<AgendaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let current = today();
    let view = app_state
        .appointment_service
        .agenda(&account, query.date.unwrap_or(current), current)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}
