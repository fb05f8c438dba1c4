// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::account::Account,
};

// Conta autenticada, carregada uma vez por requisição pelo `auth_guard`
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub Account);

/// Valida o Bearer token, carrega a conta e a coloca nas extensions.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
        .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::debug!(account_id = %account.id, "Requisição autenticada");
    request.extensions_mut().insert(AuthenticatedAccount(account));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedAccount>() {
            Some(account) => Ok(account.clone()),
            None => {
                let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
                Err(AppError::InvalidToken.to_api_error(&locale, &Default::default()))
            }
        }
    }
}
