pub mod account;
pub mod plan;
pub mod client;
pub mod catalog;
pub mod appointment;
pub mod transaction;
pub mod reports;
