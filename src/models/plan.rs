// src/models/plan.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// Plano de assinatura
// ---
// Aceita também a grafia original em português ("gratuito", "basico").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    #[serde(alias = "gratuito")]
    Free,
    #[serde(alias = "basico", alias = "básico")]
    Basic,
    Premium,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Basic, Plan::Premium];

    /// Leitura tolerante do valor armazenado: ausente ou desconhecido é `Free`.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("basic") | Some("basico") | Some("básico") => Plan::Basic,
            Some("premium") => Plan::Premium,
            _ => Plan::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Basic => "basic",
            Plan::Premium => "premium",
        }
    }

    /// Nome exibido no selo do menu e nos cartões de planos.
    pub fn label(&self) -> &'static str {
        match self {
            Plan::Free => "Gratuito",
            Plan::Basic => "Básico",
            Plan::Premium => "Premium",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Plan::Free => 0,
            Plan::Basic => 1,
            Plan::Premium => 2,
        }
    }

    pub(crate) fn is_below(&self, other: Plan) -> bool {
        self.rank() < other.rank()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some(r) if r.eq_ignore_ascii_case("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

// ---
// Páginas / recursos liberados por plano
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    Dashboard,
    Agenda,
    Clients,
    Services,
    Finance,
    Reports,
    Plans,
}

impl Feature {
    /// Ordem do menu lateral.
    pub const MENU_ORDER: [Feature; 7] = [
        Feature::Dashboard,
        Feature::Agenda,
        Feature::Clients,
        Feature::Services,
        Feature::Finance,
        Feature::Reports,
        Feature::Plans,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Feature::Dashboard => "Dashboard",
            Feature::Agenda => "Agenda",
            Feature::Clients => "Clientes",
            Feature::Services => "Serviços",
            Feature::Finance => "Financeiro",
            Feature::Reports => "Relatórios",
            Feature::Plans => "Planos",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Dashboard => "dashboard",
            Feature::Agenda => "agenda",
            Feature::Clients => "clients",
            Feature::Services => "services",
            Feature::Finance => "finance",
            Feature::Reports => "reports",
            Feature::Plans => "plans",
        }
    }
}

// Escolha de plano na página de planos
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectPlanPayload {
    pub plan: Plan,
}

/// Parâmetros do retorno do checkout (`?payment=success&plan=premium`).
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentReturnQuery {
    pub payment: String,
    #[serde(alias = "plano")]
    pub plan: Option<Plan>,
}
