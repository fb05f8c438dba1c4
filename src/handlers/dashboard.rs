// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::{calendar::today, error::ApiError},
    config::AppState,
    middleware::{auth::AuthenticatedAccount, i18n::Locale},
    models::reports::DashboardView,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do dia e do mês", body = DashboardView)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .dashboard_service
        .view(&account, today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}
