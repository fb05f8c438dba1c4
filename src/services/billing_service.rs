// src/services/billing_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::AccountStore,
    models::{
        account::{Account, AccountPatch},
        plan::Plan,
        reports::{PlanOffer, PlanSelection},
    },
    services::{
        payment_gateway::{PaymentGateway, PreferenceRequest},
        plan_policy::catalog,
    },
};

#[derive(Clone)]
pub struct BillingService {
    accounts: Arc<dyn AccountStore>,
    gateway: Arc<dyn PaymentGateway>,
    // Retorno do checkout confiável sem consultar o provedor
    trust_redirect: bool,
}

impl BillingService {
    pub fn new(accounts: Arc<dyn AccountStore>, gateway: Arc<dyn PaymentGateway>, trust_redirect: bool) -> Self {
        Self { accounts, gateway, trust_redirect }
    }

    pub fn catalog(&self, account: &Account) -> Vec<PlanOffer> {
        catalog(account.plan)
    }

    /// Gratuito: troca direta. Pago: cria a preferência de pagamento e
    /// devolve a URL de checkout; o plano só muda no retorno.
    pub async fn select_plan(&self, account: &Account, target: Plan) -> Result<PlanSelection, AppError> {
        if account.plan == target {
            return Err(AppError::PlanAlreadyActive(target));
        }

        if target == Plan::Free {
            let patch = AccountPatch { plan: Some(Plan::Free), ..Default::default() };
            self.accounts.update(account.id, patch).await?;
            tracing::info!(account_id = %account.id, "Conta voltou para o plano gratuito");
            return Ok(PlanSelection::Changed { plan: Plan::Free });
        }

        let request = PreferenceRequest {
            plan: target,
            payer_email: account.email.clone(),
            payer_name: account.full_name.clone().unwrap_or_default(),
        };
        let session = self.gateway.create_preference(&request).await?;
        Ok(PlanSelection::Checkout(session))
    }

    /// Retorno do checkout. Só `success` com plano altera a conta; os demais
    /// estados não mudam nada.
    pub async fn confirm_redirect(
        &self,
        account: &Account,
        payment: &str,
        plan: Option<Plan>,
    ) -> Result<Account, AppError> {
        if !self.trust_redirect {
            return Err(AppError::PaymentRedirectNotTrusted);
        }

        match (payment, plan) {
            ("success", Some(plan)) if plan != account.plan => {
                tracing::warn!(
                    account_id = %account.id,
                    plan = plan.as_str(),
                    "Plano alterado pelo retorno do checkout, sem verificação no provedor"
                );
                let patch = AccountPatch { plan: Some(plan), ..Default::default() };
                self.accounts.update(account.id, patch).await
            }
            _ => Ok(account.clone()),
        }
    }
}
