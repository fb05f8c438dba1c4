// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::store::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(default)]
    #[schema(example = "Maria Oliveira")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(example = "(11) 98888-7777")]
    pub phone: Option<String>,
    // CPF / CNPJ
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Entity for Client {
    const KIND: &'static str = "client";
    const FIELDS: &'static [&'static str] = &["name", "email", "phone", "taxId", "address", "notes"];

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Client {
    /// Iniciais do avatar: primeira letra de até duas palavras, em maiúsculas.
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    /// Busca da listagem: nome e e-mail sem diferenciar maiúsculas, telefone literal.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&needle))
            || self.phone.as_deref().is_some_and(|p| p.contains(query.trim()))
    }
}

pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() { "?".to_string() } else { letters }
}

// Dados para criar / editar um cliente (edição substitui todos os campos)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(custom(function = "crate::common::validation::not_blank"))]
    #[schema(example = "Maria Oliveira")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ClientPayload {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, email: Option<&str>, phone: Option<&str>) -> Client {
        Client {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: name.into(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            tax_id: None,
            address: None,
            notes: None,
            created_date: Utc::now(),
            updated_date: Utc::now(),
        }
    }

    #[test]
    fn initials_use_up_to_two_words() {
        assert_eq!(initials("maria da silva"), "MD");
        assert_eq!(initials("Ana"), "A");
        assert_eq!(initials("   "), "?");
        assert_eq!(initials("élio souza"), "ÉS");
    }

    #[test]
    fn search_matches_name_email_and_phone() {
        let c = client("Maria Oliveira", Some("Maria@Mail.com"), Some("11 9999-0000"));
        assert!(c.matches("oliv"));
        assert!(c.matches("mail.COM"));
        assert!(c.matches("9999"));
        assert!(c.matches(""));
        assert!(!c.matches("joão"));
    }

    #[test]
    fn payload_requires_a_name() {
        let payload = ClientPayload {
            name: "  ".into(),
            email: None,
            phone: None,
            tax_id: None,
            address: None,
            notes: None,
        };
        assert!(payload.validate().is_err());
    }
}
