pub mod calendar;
pub mod error;
pub mod i18n;
pub mod money;
pub mod validation;
