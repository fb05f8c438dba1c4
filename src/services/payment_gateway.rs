// src/services/payment_gateway.rs

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    models::{plan::Plan, reports::CheckoutSession},
    services::plan_policy::{checkout_offer, CheckoutOffer},
};

pub const DEFAULT_MERCADO_PAGO_API_URL: &str = "https://api.mercadopago.com";

/// Dados do pagador enviados ao gateway.
#[derive(Debug, Clone)]
pub struct PreferenceRequest {
    pub plan: Plan,
    pub payer_email: String,
    pub payer_name: String,
}

// Criação de preferência de pagamento (checkout hospedado no provedor)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_preference(&self, request: &PreferenceRequest) -> Result<CheckoutSession, AppError>;
}

// ---
// Mercado Pago
// ---
#[derive(Clone)]
pub struct MercadoPagoGateway {
    client: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
    app_url: String,
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    id: String,
    init_point: String,
}

impl MercadoPagoGateway {
    pub fn new(api_url: String, access_token: Option<String>, app_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token,
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Corpo da preferência. Um item, moeda BRL, URLs de retorno apontando para
/// a aplicação e a referência externa com plano e e-mail.
pub fn build_preference(offer: &CheckoutOffer, request: &PreferenceRequest, app_url: &str) -> Value {
    let plan = offer.plan.as_str();
    let external_reference = json!({
        "plan": plan,
        "user_email": request.payer_email,
    })
    .to_string();

    json!({
        "items": [{
            "title": offer.title,
            "quantity": 1,
            "unit_price": offer.price,
            "currency_id": "BRL",
        }],
        "payer": {
            "email": request.payer_email,
            "name": request.payer_name,
        },
        "back_urls": {
            "success": format!("{app_url}/?payment=success&plan={plan}"),
            "failure": format!("{app_url}/?payment=failure"),
            "pending": format!("{app_url}/?payment=pending"),
        },
        "auto_return": "approved",
        "external_reference": external_reference,
        "notification_url": format!("{app_url}/webhook/mercadopago"),
    })
}

#[async_trait]
impl PaymentGateway for MercadoPagoGateway {
    async fn create_preference(&self, request: &PreferenceRequest) -> Result<CheckoutSession, AppError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(AppError::PaymentGatewayNotConfigured)?;
        let offer = checkout_offer(request.plan).ok_or(AppError::PlanAlreadyActive(request.plan))?;

        let body = build_preference(&offer, request, &self.app_url);
        let response = self
            .client
            .post(format!("{}/checkout/preferences", self.api_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Erro desconhecido".to_string());
            tracing::error!(%status, "Mercado Pago recusou a preferência: {}", error_body);
            return Err(AppError::PaymentGateway(error_body));
        }

        let preference: PreferenceResponse = response.json().await?;
        tracing::info!(preference_id = %preference.id, plan = %offer.plan.as_str(), "Preferência criada");

        Ok(CheckoutSession {
            checkout_url: preference.init_point,
            preference_id: preference.id,
        })
    }
}
