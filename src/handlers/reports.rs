// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{calendar::today, error::ApiError},
    config::AppState,
    middleware::{
        auth::AuthenticatedAccount,
        i18n::Locale,
        plan_gate::{ReportsFeature, RequireFeature},
    },
    models::reports::{PeriodReport, ReportPeriod},
    services::report_service::resolve_range,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// week, month, quarter, year ou custom (padrão: month)
    #[param(value_type = Option<String>)]
    pub period: Option<ReportPeriod>,
    /// Início do período personalizado
    #[param(value_type = Option<String>, example = "2024-01-01")]
    pub start: Option<NaiveDate>,
    /// Fim do período personalizado
    #[param(value_type = Option<String>, example = "2024-01-31")]
    pub end: Option<NaiveDate>,
}

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Relatório do período", body = PeriodReport),
        (status = 400, description = "Período inválido"),
        (status = 403, description = "Recurso do plano Premium")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireFeature<ReportsFeature>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let current = today();
    let period = query.period.unwrap_or(ReportPeriod::Month);
    let range = resolve_range(period, query.start, query.end, current)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .report_service
        .period_report(account.id, period, range, current)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}
