// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        store::EntityStore, AccountStore, MemoryAccountStore, MemoryEntityStore, PgAccountRepository,
        PgEntityStore,
    },
    models::{appointment::Appointment, catalog::Service, client::Client, transaction::Transaction},
    services::{
        admin_service::AdminService,
        appointment_service::AppointmentService,
        auth::AuthService,
        billing_service::BillingService,
        catalog_service::CatalogService,
        client_service::ClientService,
        dashboard_service::DashboardService,
        finance_service::FinanceService,
        payment_gateway::{MercadoPagoGateway, PaymentGateway, DEFAULT_MERCADO_PAGO_API_URL},
        report_service::ReportService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_APP_URL: &str = "http://localhost:3000";

// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    /// Sem `DATABASE_URL` a aplicação sobe com armazenamento em memória.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub app_url: String,
    pub mercado_pago_access_token: Option<String>,
    pub mercado_pago_api_url: String,
    pub bcrypt_cost: u32,
    pub trust_payment_redirect: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw.parse().context("BCRYPT_COST inválido")?,
            Err(_) => bcrypt::DEFAULT_COST,
        };
        let trust_payment_redirect = match env::var("TRUST_PAYMENT_REDIRECT") {
            Ok(raw) => raw.parse().context("TRUST_PAYMENT_REDIRECT deve ser true ou false")?,
            Err(_) => true,
        };

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL"),
            jwt_secret,
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            app_url: non_empty_var("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.into()),
            mercado_pago_access_token: non_empty_var("MERCADO_PAGO_ACCESS_TOKEN"),
            mercado_pago_api_url: non_empty_var("MERCADO_PAGO_API_URL")
                .unwrap_or_else(|| DEFAULT_MERCADO_PAGO_API_URL.into()),
            bcrypt_cost,
            trust_payment_redirect,
        })
    }

    /// Configuração mínima para testes.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt_secret: "segredo-de-teste".into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            app_url: DEFAULT_APP_URL.into(),
            mercado_pago_access_token: None,
            mercado_pago_api_url: DEFAULT_MERCADO_PAGO_API_URL.into(),
            bcrypt_cost: 4,
            trust_payment_redirect: true,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub async fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(pool)
}

// ---
// Armazenamentos (um por tipo de registro, todos sobre o mesmo backend)
// ---
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub clients: Arc<dyn EntityStore<Client>>,
    pub services: Arc<dyn EntityStore<Service>>,
    pub appointments: Arc<dyn EntityStore<Appointment>>,
    pub transactions: Arc<dyn EntityStore<Transaction>>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let records = Arc::new(PgEntityStore::new(pool.clone()));
        Self {
            accounts: Arc::new(PgAccountRepository::new(pool)),
            clients: records.clone(),
            services: records.clone(),
            appointments: records.clone(),
            transactions: records,
        }
    }

    pub fn in_memory() -> Self {
        Self::with_accounts(Arc::new(MemoryAccountStore::new()))
    }

    /// Memória, com um armazenamento de contas já criado (testes semeiam contas nele).
    pub fn with_accounts(accounts: Arc<MemoryAccountStore>) -> Self {
        let records = Arc::new(MemoryEntityStore::new());
        Self {
            accounts,
            clients: records.clone(),
            services: records.clone(),
            appointments: records.clone(),
            transactions: records,
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub catalog_service: CatalogService,
    pub appointment_service: AppointmentService,
    pub finance_service: FinanceService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub billing_service: BillingService,
    pub admin_service: AdminService,
}

impl AppState {
    /// Monta o gráfico de dependências sobre os armazenamentos e o gateway dados.
    pub fn from_parts(config: Config, stores: Stores, gateway: Arc<dyn PaymentGateway>) -> Self {
        let auth_service = AuthService::new(
            stores.accounts.clone(),
            config.jwt_secret.clone(),
            config.bcrypt_cost,
        );
        let appointment_service = AppointmentService::new(
            stores.accounts.clone(),
            stores.appointments.clone(),
            stores.clients.clone(),
            stores.services.clone(),
        );
        let billing_service = BillingService::new(
            stores.accounts.clone(),
            gateway,
            config.trust_payment_redirect,
        );
        let admin_service = AdminService::new(
            stores.accounts.clone(),
            stores.appointments.clone(),
            stores.clients.clone(),
            stores.transactions.clone(),
        );

        Self {
            i18n_store: I18nStore::new(),
            auth_service,
            client_service: ClientService::new(stores.clients.clone()),
            catalog_service: CatalogService::new(stores.services.clone()),
            appointment_service,
            finance_service: FinanceService::new(stores.transactions.clone()),
            dashboard_service: DashboardService::new(
                stores.appointments.clone(),
                stores.clients.clone(),
                stores.transactions.clone(),
            ),
            report_service: ReportService::new(stores.appointments, stores.transactions),
            billing_service,
            admin_service,
            config: Arc::new(config),
        }
    }

    /// Estado de produção: Postgres (com migrações) ou memória, e o Mercado Pago.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let stores = match config.database_url.as_deref() {
            Some(url) => {
                let pool = connect_pool(url).await?;
                sqlx::migrate!()
                    .run(&pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
                Stores::postgres(pool)
            }
            None => {
                tracing::warn!("DATABASE_URL não definida: usando armazenamento em memória");
                Stores::in_memory()
            }
        };

        if config.mercado_pago_access_token.is_none() {
            tracing::warn!("MERCADO_PAGO_ACCESS_TOKEN não definido: checkout de planos pagos indisponível");
        }
        let gateway = Arc::new(MercadoPagoGateway::new(
            config.mercado_pago_api_url.clone(),
            config.mercado_pago_access_token.clone(),
            config.app_url.clone(),
        ));

        Ok(Self::from_parts(config, stores, gateway))
    }
}
