// src/models/transaction.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::calendar::lenient_date;
use crate::db::store::Entity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    #[serde(alias = "receita")]
    Income,
    #[serde(alias = "despesa")]
    Expense,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    #[serde(alias = "servico")]
    Service,
    #[serde(alias = "produto")]
    Product,
    #[serde(alias = "aluguel")]
    Rent,
    Material,
    #[serde(alias = "equipamento")]
    Equipment,
    Marketing,
    #[default]
    #[serde(alias = "outros")]
    Other,
}

impl TransactionCategory {
    /// Categorias oferecidas para cada tipo de lançamento.
    pub fn allowed_for(kind: TransactionType) -> &'static [TransactionCategory] {
        use TransactionCategory::*;
        match kind {
            TransactionType::Income => &[Service, Product, Other],
            TransactionType::Expense => &[Rent, Material, Equipment, Marketing, Other],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionCategory::Service => "Serviço",
            TransactionCategory::Product => "Produto",
            TransactionCategory::Rent => "Aluguel",
            TransactionCategory::Material => "Material",
            TransactionCategory::Equipment => "Equipamento",
            TransactionCategory::Marketing => "Marketing",
            TransactionCategory::Other => "Outros",
        }
    }
}

// Lançamento do livro-caixa (somente plano premium)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: Option<TransactionCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = f64, example = 200.0)]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "lenient_date")]
    #[schema(value_type = Option<String>, example = "2024-05-01")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub client_name: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Entity for Transaction {
    const KIND: &'static str = "transaction";
    const FIELDS: &'static [&'static str] =
        &["type", "category", "description", "amount", "date", "clientName"];

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Transaction {
    pub fn category_or_other(&self) -> TransactionCategory {
        self.category.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "category_matches_type", skip_on_field_errors = false))]
pub struct TransactionPayload {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: TransactionCategory,
    pub description: Option<String>,
    #[validate(
        required(message = "required"),
        custom(function = "crate::common::validation::non_negative")
    )]
    #[schema(value_type = Option<f64>, example = 200.0)]
    pub amount: Option<Decimal>,
    #[validate(required(message = "required"))]
    #[schema(value_type = String, example = "2024-05-01")]
    pub date: Option<NaiveDate>,
    pub client_name: Option<String>,
}

fn category_matches_type(payload: &TransactionPayload) -> Result<(), ValidationError> {
    if TransactionCategory::allowed_for(payload.kind).contains(&payload.category) {
        Ok(())
    } else {
        Err(ValidationError::new("category_mismatch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_depend_on_type() {
        assert!(TransactionCategory::allowed_for(TransactionType::Income)
            .contains(&TransactionCategory::Product));
        assert!(!TransactionCategory::allowed_for(TransactionType::Income)
            .contains(&TransactionCategory::Rent));
        assert!(TransactionCategory::allowed_for(TransactionType::Expense)
            .contains(&TransactionCategory::Other));
    }

    #[test]
    fn payload_rejects_category_of_the_other_type() {
        let payload: TransactionPayload = serde_json::from_str(
            r#"{"type":"receita","category":"aluguel","amount":10,"date":"2024-05-01"}"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());

        let payload: TransactionPayload = serde_json::from_str(
            r#"{"type":"expense","category":"rent","amount":10,"date":"2024-05-01"}"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn amount_is_required() {
        let payload: TransactionPayload =
            serde_json::from_str(r#"{"type":"income","date":"2024-05-01"}"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
