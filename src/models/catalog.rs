// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::store::Entity;

// Serviço oferecido pelo profissional (corte, consulta, sessão...)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(default)]
    #[schema(example = "Corte de cabelo")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = f64, example = 50.0)]
    pub price: Decimal,
    /// Duração em minutos
    #[serde(default)]
    #[schema(example = 45)]
    pub duration: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Entity for Service {
    const KIND: &'static str = "service";
    const FIELDS: &'static [&'static str] = &["name", "description", "price", "duration", "active"];

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Service {
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.duration.unwrap_or(0))
    }
}

/// `90` -> `1h 30min`, `120` -> `2h`, `45` -> `45min`, `0` -> vazio.
pub fn format_duration(minutes: u32) -> String {
    let (hours, mins) = (minutes / 60, minutes % 60);
    match (hours, mins) {
        (0, 0) => String::new(),
        (0, m) => format!("{m}min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}min"),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    #[schema(example = "Corte de cabelo")]
    pub name: String,
    pub description: Option<String>,
    #[validate(
        required(message = "required"),
        custom(function = "crate::common::validation::non_negative")
    )]
    #[schema(value_type = Option<f64>, example = 50.0)]
    pub price: Option<Decimal>,
    #[schema(example = 45)]
    pub duration: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ServicePayload {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivePayload {
    pub active: bool,
}
