// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AccountStore,
    models::account::{Account, Claims, NewAccount, RegisterAccountPayload},
};

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    jwt_secret: String,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountStore>, jwt_secret: String, bcrypt_cost: u32) -> Self {
        Self { accounts, jwt_secret, bcrypt_cost }
    }

    pub async fn register(&self, payload: RegisterAccountPayload) -> Result<String, AppError> {
        let email = normalize_email(&payload.email);

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        // Hashing fora do runtime assíncrono
        let password = payload.password;
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let account = self
            .accounts
            .create(NewAccount {
                email,
                full_name: Some(payload.full_name.trim().to_string()),
                password_hash,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Nova conta registrada");
        self.create_token(account.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let account = self
            .accounts
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = account.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(account.id)
    }

    /// Valida o JWT e carrega a conta (uma vez por requisição, no auth guard).
    pub async fn validate_token(&self, token: &str) -> Result<Account, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.accounts
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, account_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: account_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
