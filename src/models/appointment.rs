// src/models/appointment.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::calendar::lenient_date;
use crate::db::store::Entity;

// ---
// Ciclo de vida do agendamento
// ---
// scheduled -> confirmed -> completed; canceled a partir de qualquer estado não terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    #[serde(alias = "agendado")]
    Scheduled,
    #[serde(alias = "confirmado")]
    Confirmed,
    #[serde(alias = "concluido", alias = "concluído")]
    Completed,
    #[serde(alias = "cancelado")]
    Canceled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Canceled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Canceled)
    }

    /// Próximo passo do fluxo normal (o botão "avançar").
    pub fn next(&self) -> Option<AppointmentStatus> {
        match self {
            AppointmentStatus::Scheduled => Some(AppointmentStatus::Confirmed),
            AppointmentStatus::Confirmed => Some(AppointmentStatus::Completed),
            _ => None,
        }
    }

    fn step(&self) -> u8 {
        match self {
            AppointmentStatus::Scheduled => 0,
            AppointmentStatus::Confirmed => 1,
            AppointmentStatus::Completed => 2,
            AppointmentStatus::Canceled => 3,
        }
    }

    /// Transições monotônicas para frente (pode pular etapas) ou cancelamento
    /// de um estado não terminal. Repetir o estado atual não é transição.
    pub fn can_transition_to(&self, target: AppointmentStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match target {
            AppointmentStatus::Canceled => true,
            other => other.step() > self.step(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Agendado",
            AppointmentStatus::Confirmed => "Confirmado",
            AppointmentStatus::Completed => "Concluído",
            AppointmentStatus::Canceled => "Cancelado",
        }
    }
}

// Cliente, serviço e valor são copiados no momento da criação/edição:
// renomear ou reprecificar depois não altera o histórico.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub service_id: Option<Uuid>,
    #[serde(default)]
    #[schema(example = "Maria Oliveira")]
    pub client_name: String,
    #[serde(default)]
    #[schema(example = "Corte de cabelo")]
    pub service_name: String,
    #[serde(default)]
    #[schema(value_type = f64, example = 50.0)]
    pub value: Decimal,
    #[serde(default, deserialize_with = "lenient_date")]
    #[schema(value_type = Option<String>, example = "2024-05-10")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    #[schema(example = "09:30")]
    pub time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Entity for Appointment {
    const KIND: &'static str = "appointment";
    const FIELDS: &'static [&'static str] = &[
        "clientId",
        "serviceId",
        "clientName",
        "serviceName",
        "value",
        "date",
        "time",
        "notes",
        "status",
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}

// Dados para criar / editar um agendamento
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    #[validate(required(message = "select_client"))]
    pub client_id: Option<Uuid>,
    #[validate(required(message = "select_service"))]
    pub service_id: Option<Uuid>,
    #[validate(required(message = "required"))]
    #[schema(value_type = String, example = "2024-05-10")]
    pub date: Option<NaiveDate>,
    #[validate(
        required(message = "required"),
        custom(function = "crate::common::validation::time_of_day")
    )]
    #[schema(example = "09:30")]
    pub time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusPayload {
    pub status: AppointmentStatus,
}

/// Documento gravado no armazenamento (payload + cópias de cliente/serviço).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppointmentRecord<'a> {
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub client_name: &'a str,
    pub service_name: &'a str,
    pub value: Decimal,
    pub date: NaiveDate,
    pub time: &'a str,
    pub notes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}
