// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

/// Monta o router completo da API sobre o estado dado.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas protegidas pelo auth_guard
    let protected_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/navigation", get(handlers::auth::get_navigation))
        // Clientes
        .route(
            "/clients",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/clients/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        // Serviços
        .route(
            "/services",
            post(handlers::services::create_service).get(handlers::services::list_services),
        )
        .route("/services/active", get(handlers::services::list_active_services))
        .route(
            "/services/{id}",
            get(handlers::services::get_service)
                .put(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        .route("/services/{id}/active", patch(handlers::services::set_service_active))
        // Agendamentos
        .route(
            "/appointments",
            post(handlers::appointments::create_appointment)
                .get(handlers::appointments::list_appointments),
        )
        .route(
            "/appointments/{id}",
            get(handlers::appointments::get_appointment)
                .put(handlers::appointments::update_appointment)
                .delete(handlers::appointments::delete_appointment),
        )
        .route("/appointments/{id}/status", patch(handlers::appointments::change_status))
        .route("/appointments/{id}/advance", post(handlers::appointments::advance_status))
        .route("/agenda", get(handlers::appointments::get_agenda))
        // Dashboard
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        // Financeiro (premium)
        .route(
            "/finance/transactions",
            post(handlers::finance::create_transaction).get(handlers::finance::list_transactions),
        )
        .route(
            "/finance/transactions/{id}",
            get(handlers::finance::get_transaction)
                .put(handlers::finance::update_transaction)
                .delete(handlers::finance::delete_transaction),
        )
        .route("/finance/overview", get(handlers::finance::get_overview))
        // Relatórios (premium)
        .route("/reports", get(handlers::reports::get_report))
        // Planos
        .route("/plans", get(handlers::plans::list_plans))
        .route("/plans/select", post(handlers::plans::select_plan))
        .route("/plans/confirm", post(handlers::plans::confirm_payment))
        // Admin
        .route("/admin/overview", get(handlers::admin::get_overview))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .with_state(app_state)
}
