pub mod auth;
pub mod clients;
pub mod services;
pub mod appointments;
pub mod dashboard;
pub mod finance;
pub mod reports;
pub mod plans;
pub mod admin;
