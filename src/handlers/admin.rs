// src/handlers/admin.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::{calendar::today, error::ApiError},
    config::AppState,
    middleware::{i18n::Locale, plan_gate::RequireAdmin},
    models::reports::AdminOverview,
};

// GET /api/admin/overview
#[utoipa::path(
    get,
    path = "/api/admin/overview",
    tag = "Admin",
    responses(
        (status = 200, description = "Indicadores da plataforma", body = AdminOverview),
        (status = 403, description = "Acesso restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let overview = app_state
        .admin_service
        .overview(today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(overview))
}
