// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedAccount, i18n::Locale},
    models::{
        account::{Account, AuthResponse, LoginPayload, RegisterAccountPayload},
        reports::NavigationView,
    },
    services::plan_policy::navigation,
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterAccountPayload,
    responses(
        (status = 201, description = "Conta criada", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .register(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    responses((status = 200, description = "Conta autenticada", body = Account)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedAccount(account): AuthenticatedAccount) -> Json<Account> {
    Json(account)
}

// GET /api/me/navigation
#[utoipa::path(
    get,
    path = "/api/me/navigation",
    tag = "Users",
    responses((status = 200, description = "Menu e selo do plano", body = NavigationView)),
    security(("api_jwt" = []))
)]
pub async fn get_navigation(AuthenticatedAccount(account): AuthenticatedAccount) -> Json<NavigationView> {
    Json(navigation(&account))
}
