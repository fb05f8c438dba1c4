// src/middleware/plan_gate.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedAccount, i18n::Locale},
    models::plan::Feature,
    services::plan_policy::has_feature,
};

/// Recurso de plano exigido por uma rota.
pub trait FeatureDef: Send + Sync + 'static {
    fn feature() -> Feature;
}

/// Guardião de rota: só passa se o plano da conta libera `F`.
pub struct RequireFeature<F>(pub PhantomData<F>);

impl<F, S> FromRequestParts<S> for RequireFeature<F>
where
    F: FeatureDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();

        let AuthenticatedAccount(account) = AuthenticatedAccount::from_request_parts(parts, state).await?;

        let feature = F::feature();
        if !has_feature(account.plan, feature) {
            tracing::info!(account_id = %account.id, feature = feature.as_str(), "Recurso bloqueado pelo plano");
            return Err(AppError::PlanUpgradeRequired(feature).to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireFeature(PhantomData))
    }
}

/// Rotas da área administrativa.
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();

        let AuthenticatedAccount(account) = AuthenticatedAccount::from_request_parts(parts, state).await?;
        if !account.is_admin() {
            return Err(AppError::AdminRequired.to_api_error(&locale, &app_state.i18n_store));
        }
        Ok(RequireAdmin)
    }
}

// ---
// RECURSOS (TIPOS)
// ---

pub struct FinanceFeature;
impl FeatureDef for FinanceFeature {
    fn feature() -> Feature { Feature::Finance }
}

pub struct ReportsFeature;
impl FeatureDef for ReportsFeature {
    fn feature() -> Feature { Feature::Reports }
}
