// src/common/validation.rs

// Validadores customizados usados pelos payloads (`#[validate(custom(...))]`).
// O `code` do erro é a chave de tradução exibida em `details`.

use rust_decimal::Decimal;
use validator::ValidationError;

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Horário no formato `HH:MM` (24h, com zero à esquerda).
pub fn time_of_day(value: &str) -> Result<(), ValidationError> {
    if crate::services::agenda::is_valid_time(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_time"))
    }
}
