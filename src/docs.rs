// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_navigation,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Services ---
        handlers::services::list_services,
        handlers::services::list_active_services,
        handlers::services::create_service,
        handlers::services::get_service,
        handlers::services::update_service,
        handlers::services::set_service_active,
        handlers::services::delete_service,

        // --- Appointments ---
        handlers::appointments::list_appointments,
        handlers::appointments::create_appointment,
        handlers::appointments::get_appointment,
        handlers::appointments::update_appointment,
        handlers::appointments::delete_appointment,
        handlers::appointments::change_status,
        handlers::appointments::advance_status,
        handlers::appointments::get_agenda,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,

        // --- Finance ---
        handlers::finance::list_transactions,
        handlers::finance::create_transaction,
        handlers::finance::get_transaction,
        handlers::finance::update_transaction,
        handlers::finance::delete_transaction,
        handlers::finance::get_overview,

        // --- Reports ---
        handlers::reports::get_report,

        // --- Plans ---
        handlers::plans::list_plans,
        handlers::plans::select_plan,
        handlers::plans::confirm_payment,

        // --- Admin ---
        handlers::admin::get_overview,
    ),
    components(
        schemas(
            // --- Auth ---
            models::account::Account,
            models::account::RegisterAccountPayload,
            models::account::LoginPayload,
            models::account::AuthResponse,

            // --- Plans ---
            models::plan::Plan,
            models::plan::Role,
            models::plan::Feature,
            models::plan::SelectPlanPayload,
            models::reports::PlanAction,
            models::reports::PlanOffer,
            models::reports::CheckoutSession,
            models::reports::PlanSelection,
            models::reports::MenuEntry,
            models::reports::NavigationView,

            // --- Cadastros ---
            models::client::Client,
            models::client::ClientPayload,
            models::catalog::Service,
            models::catalog::ServicePayload,
            models::catalog::ActivePayload,

            // --- Appointments ---
            models::appointment::AppointmentStatus,
            models::appointment::Appointment,
            models::appointment::AppointmentPayload,
            models::appointment::StatusPayload,
            models::reports::AgendaView,
            models::reports::QuotaStatus,

            // --- Finance ---
            models::transaction::TransactionType,
            models::transaction::TransactionCategory,
            models::transaction::Transaction,
            models::transaction::TransactionPayload,
            models::reports::CategoryTotal,
            models::reports::FinanceChartEntry,
            models::reports::FinanceOverview,

            // --- Dashboard / Reports / Admin ---
            models::reports::RevenueSource,
            models::reports::DashboardView,
            models::reports::ReportPeriod,
            models::reports::WeekdayCount,
            models::reports::ServiceRanking,
            models::reports::TrendEntry,
            models::reports::StatusCount,
            models::reports::PeriodReport,
            models::reports::PlanCount,
            models::reports::AdminOverview,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Conta e navegação por plano"),
        (name = "Clients", description = "Cadastro de Clientes"),
        (name = "Services", description = "Catálogo de Serviços"),
        (name = "Appointments", description = "Agendamentos e Agenda"),
        (name = "Dashboard", description = "Indicadores do dia e do mês"),
        (name = "Finance", description = "Livro-caixa (Premium)"),
        (name = "Reports", description = "Relatórios por período (Premium)"),
        (name = "Plans", description = "Planos e Pagamento"),
        (name = "Admin", description = "Visão geral da plataforma")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
