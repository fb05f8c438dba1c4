// src/services/plan_policy.rs

// Política de planos: funções puras, totais sobre os três planos.

use rust_decimal::Decimal;

use crate::{
    common::money::format_brl,
    models::{
        account::Account,
        plan::{Feature, Plan},
        reports::{MenuEntry, NavigationView, PlanAction, PlanOffer},
    },
};

/// Teto mensal de agendamentos no plano gratuito.
pub const FREE_MONTHLY_QUOTA: u32 = 10;

const STANDARD_FEATURES: &[Feature] = &[
    Feature::Dashboard,
    Feature::Agenda,
    Feature::Clients,
    Feature::Services,
    Feature::Plans,
];

const PREMIUM_FEATURES: &[Feature] = &[
    Feature::Dashboard,
    Feature::Agenda,
    Feature::Clients,
    Feature::Services,
    Feature::Finance,
    Feature::Reports,
    Feature::Plans,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyQuota {
    Limited(u32),
    Unlimited,
}

impl MonthlyQuota {
    pub fn limit(&self) -> Option<u32> {
        match self {
            MonthlyQuota::Limited(n) => Some(*n),
            MonthlyQuota::Unlimited => None,
        }
    }
}

pub fn feature_set(plan: Plan) -> &'static [Feature] {
    match plan {
        Plan::Free | Plan::Basic => STANDARD_FEATURES,
        Plan::Premium => PREMIUM_FEATURES,
    }
}

pub fn has_feature(plan: Plan, feature: Feature) -> bool {
    feature_set(plan).contains(&feature)
}

pub fn monthly_quota(plan: Plan) -> MonthlyQuota {
    match plan {
        Plan::Free => MonthlyQuota::Limited(FREE_MONTHLY_QUOTA),
        Plan::Basic | Plan::Premium => MonthlyQuota::Unlimited,
    }
}

/// Só decide o rótulo do botão; não impede a troca.
pub fn is_downgrade(current: Plan, target: Plan) -> bool {
    target.is_below(current)
}

pub fn plan_action(current: Plan, target: Plan) -> PlanAction {
    if current == target {
        PlanAction::Current
    } else if is_downgrade(current, target) {
        PlanAction::Downgrade
    } else {
        PlanAction::Subscribe
    }
}

pub fn monthly_price(plan: Plan) -> Decimal {
    match plan {
        Plan::Free => Decimal::ZERO,
        Plan::Basic => Decimal::new(2990, 2),
        Plan::Premium => Decimal::new(4990, 2),
    }
}

/// Item cobrado no checkout. O plano gratuito não passa pelo gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOffer {
    pub plan: Plan,
    pub title: &'static str,
    pub price: Decimal,
}

pub fn checkout_offer(plan: Plan) -> Option<CheckoutOffer> {
    let title = match plan {
        Plan::Free => return None,
        Plan::Basic => "Plano Básico - ProServ",
        Plan::Premium => "Plano Premium - ProServ",
    };
    Some(CheckoutOffer { plan, title, price: monthly_price(plan) })
}

fn headline(plan: Plan) -> &'static str {
    match plan {
        Plan::Free => "Até 10 agendamentos/mês",
        Plan::Basic => "Agendamentos ilimitados",
        Plan::Premium => "Todos os recursos avançados",
    }
}

fn selling_points(plan: Plan) -> &'static [&'static str] {
    match plan {
        Plan::Free => &[
            "Agenda básica",
            "Cadastro de clientes",
            "Cadastro de serviços",
            "Limite de 10 agendamentos",
        ],
        Plan::Basic => &[
            "Agendamentos ilimitados",
            "Dashboard completo",
            "Notificações",
            "Histórico de atendimentos",
        ],
        Plan::Premium => &[
            "Todos os recursos do Básico",
            "Integração com pagamentos",
            "Relatórios detalhados",
            "Controle financeiro",
            "Suporte prioritário",
        ],
    }
}

/// Cartões da página de planos, com a ação de cada um para a conta atual.
pub fn catalog(current: Plan) -> Vec<PlanOffer> {
    Plan::ALL
        .iter()
        .map(|&plan| PlanOffer {
            plan,
            name: plan.label().to_string(),
            price: monthly_price(plan),
            price_formatted: format_brl(monthly_price(plan)),
            headline: headline(plan).to_string(),
            features: selling_points(plan).iter().map(|s| s.to_string()).collect(),
            highlighted: plan == Plan::Premium,
            action: plan_action(current, plan),
        })
        .collect()
}

pub fn navigation(account: &Account) -> NavigationView {
    let plan = account.plan;
    let menu = Feature::MENU_ORDER
        .iter()
        .filter(|f| has_feature(plan, **f))
        .map(|&feature| MenuEntry {
            feature,
            label: feature.label().to_string(),
            // Convite ao upgrade no menu do plano gratuito
            highlighted: feature == Feature::Plans && plan == Plan::Free,
        })
        .collect();

    NavigationView {
        plan,
        plan_label: plan.label().to_string(),
        menu,
        monthly_quota: monthly_quota(plan).limit(),
        is_admin: account.is_admin(),
    }
}
