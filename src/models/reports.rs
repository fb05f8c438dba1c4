// src/models/reports.rs

// DTOs de saída das telas agregadas (dashboard, agenda, financeiro, relatórios, admin, planos)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::calendar::DateRange;
use crate::models::{
    appointment::{Appointment, AppointmentStatus},
    plan::{Feature, Plan},
    transaction::{Transaction, TransactionCategory},
};

// =============================================================================
//  COTA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub used: u32,
    /// `None` = ilimitado
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    #[schema(value_type = f64)]
    pub progress_percent: Decimal,
    /// Aviso a partir de 80% da cota
    pub alert: bool,
    pub reached: bool,
}

// =============================================================================
//  DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RevenueSource {
    Transactions,
    CompletedAppointments,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub greeting_name: String,
    pub plan: Plan,
    pub plan_label: String,
    #[schema(value_type = String)]
    pub today: NaiveDate,
    pub todays_appointments: Vec<Appointment>,
    pub month_appointments: usize,
    pub quota: QuotaStatus,
    pub client_count: usize,
    #[schema(value_type = f64)]
    pub month_revenue: Decimal,
    pub month_revenue_formatted: String,
    pub revenue_source: RevenueSource,
    pub show_upgrade: bool,
}

// =============================================================================
//  AGENDA
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgendaView {
    #[schema(value_type = String)]
    pub selected_date: NaiveDate,
    #[schema(value_type = Vec<String>)]
    pub week_days: Vec<NaiveDate>,
    pub appointments: Vec<Appointment>,
    pub time_slots: Vec<String>,
    pub quota: QuotaStatus,
}

// =============================================================================
//  FINANCEIRO
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: TransactionCategory,
    pub label: String,
    #[schema(value_type = f64)]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceChartEntry {
    /// YYYY-MM
    pub month: String,
    pub label: String,
    #[schema(value_type = f64)]
    pub income: Decimal,
    #[schema(value_type = f64)]
    pub expense: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceOverview {
    pub month: String,
    #[schema(value_type = f64)]
    pub income: Decimal,
    #[schema(value_type = f64)]
    pub expense: Decimal,
    #[schema(value_type = f64)]
    pub balance: Decimal,
    pub transactions: Vec<Transaction>,
    pub chart: Vec<FinanceChartEntry>,
    pub expense_by_category: Vec<CategoryTotal>,
}

// =============================================================================
//  RELATÓRIOS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[serde(alias = "semana")]
    Week,
    #[serde(alias = "mes", alias = "mês")]
    Month,
    #[serde(alias = "trimestre")]
    Quarter,
    #[serde(alias = "ano")]
    Year,
    #[serde(alias = "personalizado")]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRanking {
    pub service_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendEntry {
    /// YYYY-MM
    pub month: String,
    pub label: String,
    pub appointments: usize,
    #[schema(value_type = f64)]
    pub income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: AppointmentStatus,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub period: ReportPeriod,
    #[schema(value_type = Object)]
    pub range: DateRange,
    pub total_appointments: usize,
    pub completed_appointments: usize,
    #[schema(value_type = f64)]
    pub completion_rate: Decimal,
    #[schema(value_type = f64)]
    pub income: Decimal,
    #[schema(value_type = f64)]
    pub expense: Decimal,
    #[schema(value_type = f64)]
    pub average_ticket: Decimal,
    pub by_weekday: Vec<WeekdayCount>,
    pub top_services: Vec<ServiceRanking>,
    pub trend: Vec<TrendEntry>,
    pub status_breakdown: Vec<StatusCount>,
}

// =============================================================================
//  ADMIN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanCount {
    pub plan: Plan,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub total_users: usize,
    pub users_by_plan: Vec<PlanCount>,
    pub total_appointments: usize,
    pub appointments_today: usize,
    #[schema(value_type = f64)]
    pub total_income: Decimal,
    #[schema(value_type = f64)]
    pub income_this_month: Decimal,
    pub total_clients: usize,
    pub recent_appointments: Vec<Appointment>,
}

// =============================================================================
//  PLANOS / NAVEGAÇÃO
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub feature: Feature,
    pub label: String,
    pub highlighted: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationView {
    pub plan: Plan,
    pub plan_label: String,
    pub menu: Vec<MenuEntry>,
    /// `None` = ilimitado
    pub monthly_quota: Option<u32>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Current,
    Downgrade,
    Subscribe,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanOffer {
    pub plan: Plan,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub price_formatted: String,
    pub headline: String,
    pub features: Vec<String>,
    pub highlighted: bool,
    pub action: PlanAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub preference_id: String,
}

/// Resultado da escolha de plano: troca direta (downgrade para o gratuito)
/// ou sessão de pagamento para um plano pago.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum PlanSelection {
    Changed { plan: Plan },
    Checkout(CheckoutSession),
}
