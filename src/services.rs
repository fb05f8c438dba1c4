// Regras puras (sem I/O)
pub mod plan_policy;
pub mod quota;
pub mod aggregation;
pub mod agenda;

// Serviços com acesso ao armazenamento
pub mod auth;
pub mod client_service;
pub mod catalog_service;
pub mod appointment_service;
pub mod finance_service;
pub mod dashboard_service;
pub mod report_service;
pub mod payment_gateway;
pub mod billing_service;
pub mod admin_service;
