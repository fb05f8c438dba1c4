// src/handlers/plans.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedAccount, i18n::Locale},
    models::{
        account::Account,
        plan::{PaymentReturnQuery, SelectPlanPayload},
        reports::{PlanOffer, PlanSelection},
    },
};

// GET /api/plans
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Plans",
    responses((status = 200, description = "Planos com a ação de cada um", body = Vec<PlanOffer>)),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Json<Vec<PlanOffer>> {
    Json(app_state.billing_service.catalog(&account))
}

// POST /api/plans/select
#[utoipa::path(
    post,
    path = "/api/plans/select",
    tag = "Plans",
    request_body = SelectPlanPayload,
    responses(
        (status = 200, description = "Plano alterado ou sessão de checkout criada", body = PlanSelection),
        (status = 409, description = "Plano já ativo"),
        (status = 502, description = "Falha no gateway de pagamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn select_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<SelectPlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let selection = app_state
        .billing_service
        .select_plan(&account, payload.plan)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(selection))
}

// POST /api/plans/confirm?payment=success&plan=premium
#[utoipa::path(
    post,
    path = "/api/plans/confirm",
    tag = "Plans",
    params(PaymentReturnQuery),
    responses(
        (status = 200, description = "Conta após o retorno do checkout", body = Account),
        (status = 403, description = "Confirmação por redirecionamento desativada")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Query(query): Query<PaymentReturnQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .billing_service
        .confirm_redirect(&account, &query.payment, query.plan)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(account))
}
