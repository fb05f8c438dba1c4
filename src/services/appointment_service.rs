// src/services/appointment_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{calendar::YearMonth, error::AppError},
    db::{
        store::{to_fields, EntityStore, Fields, SortKey, MAX_LIST_LIMIT},
        AccountStore,
    },
    models::{
        account::{Account, AccountPatch},
        appointment::{Appointment, AppointmentPayload, AppointmentRecord, AppointmentStatus},
        catalog::Service,
        client::Client,
        reports::AgendaView,
    },
    services::{
        agenda::{appointments_on, time_slots, week_window},
        plan_policy::{monthly_quota, MonthlyQuota},
        quota::{count_in_month, effective_monthly_count, quota_reached, quota_status},
    },
};

/// Ordenação padrão da listagem: data mais recente primeiro.
const DEFAULT_SORT: &str = "-date";

#[derive(Clone)]
pub struct AppointmentService {
    accounts: Arc<dyn AccountStore>,
    appointments: Arc<dyn EntityStore<Appointment>>,
    clients: Arc<dyn EntityStore<Client>>,
    services: Arc<dyn EntityStore<Service>>,
}

// Cliente e serviço resolvidos para a cópia no agendamento
struct Resolved {
    client: Client,
    service: Service,
}

impl AppointmentService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        appointments: Arc<dyn EntityStore<Appointment>>,
        clients: Arc<dyn EntityStore<Client>>,
        services: Arc<dyn EntityStore<Service>>,
    ) -> Self {
        Self { accounts, appointments, clients, services }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list(
        &self,
        owner: Uuid,
        sort: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<Appointment>, AppError> {
        let sort = SortKey::parse(sort.unwrap_or(DEFAULT_SORT));
        self.appointments
            .list(owner, &sort, limit.unwrap_or(MAX_LIST_LIMIT))
            .await
    }

    /// Snapshot limitado usado pelas agregações.
    pub async fn snapshot(&self, owner: Uuid) -> Result<Vec<Appointment>, AppError> {
        self.list(owner, None, None).await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Appointment, AppError> {
        self.appointments
            .get(owner, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Agendamento {}", id)))
    }

    pub async fn agenda(
        &self,
        account: &Account,
        selected: NaiveDate,
        today: NaiveDate,
    ) -> Result<AgendaView, AppError> {
        let appointments = self.snapshot(account.id).await?;
        let used = effective_monthly_count(account, &appointments, YearMonth::of(today));

        Ok(AgendaView {
            selected_date: selected,
            week_days: week_window(selected),
            appointments: appointments_on(&appointments, selected),
            time_slots: time_slots(),
            quota: quota_status(account.plan, used),
        })
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create(
        &self,
        account: &Account,
        payload: AppointmentPayload,
        today: NaiveDate,
    ) -> Result<Appointment, AppError> {
        // 1. Validação antes de qualquer chamada ao armazenamento
        payload.validate()?;

        // 2. Cota do mês corrente
        self.ensure_quota(account, today).await?;

        // 3. Cópia de cliente/serviço
        let resolved = self.resolve(account.id, &payload, true).await?;
        let fields = snapshot_fields(&payload, &resolved, Some(AppointmentStatus::Scheduled))?;

        let created = self.appointments.create(account.id, fields).await?;
        self.refresh_monthly_counter(account.id, today).await;
        Ok(created)
    }

    /// Edição completa: refaz a cópia de nomes e valor. O status não muda.
    pub async fn update(
        &self,
        account: &Account,
        id: Uuid,
        payload: AppointmentPayload,
        today: NaiveDate,
    ) -> Result<Appointment, AppError> {
        payload.validate()?;
        self.get(account.id, id).await?;

        // Serviço desativado depois do agendamento continua editável
        let resolved = self.resolve(account.id, &payload, false).await?;
        let fields = snapshot_fields(&payload, &resolved, None)?;

        let updated = self.appointments.update(account.id, id, fields).await?;
        self.refresh_monthly_counter(account.id, today).await;
        Ok(updated)
    }

    pub async fn change_status(
        &self,
        owner: Uuid,
        id: Uuid,
        target: AppointmentStatus,
    ) -> Result<Appointment, AppError> {
        let current = self.get(owner, id).await?;
        if !current.status.can_transition_to(target) {
            return Err(AppError::InvalidStatusTransition { from: current.status, to: target });
        }

        let mut fields = Fields::new();
        fields.insert("status".into(), json!(target));
        self.appointments.update(owner, id, fields).await
    }

    /// Um passo à frente: agendado -> confirmado -> concluído.
    pub async fn advance(&self, owner: Uuid, id: Uuid) -> Result<Appointment, AppError> {
        let current = self.get(owner, id).await?;
        let next = current.status.next().ok_or(AppError::InvalidStatusTransition {
            from: current.status,
            to: current.status,
        })?;

        let mut fields = Fields::new();
        fields.insert("status".into(), json!(next));
        self.appointments.update(owner, id, fields).await
    }

    /// Exclusão definitiva, de qualquer status.
    pub async fn delete(&self, account: &Account, id: Uuid, today: NaiveDate) -> Result<(), AppError> {
        self.appointments.delete(account.id, id).await?;
        self.refresh_monthly_counter(account.id, today).await;
        Ok(())
    }

    // =========================================================================
    //  INTERNOS
    // =========================================================================

    async fn ensure_quota(&self, account: &Account, today: NaiveDate) -> Result<(), AppError> {
        let limit = match monthly_quota(account.plan) {
            MonthlyQuota::Unlimited => return Ok(()),
            MonthlyQuota::Limited(limit) => limit,
        };

        // Decide sempre pelos registros; o contador em cache é só para exibição
        let appointments = self.snapshot(account.id).await?;
        let used = count_in_month(&appointments, YearMonth::of(today));

        if quota_reached(account.plan, used) {
            tracing::warn!(account_id = %account.id, used, limit, "Cota mensal atingida");
            return Err(AppError::MonthlyQuotaReached { limit });
        }
        Ok(())
    }

    async fn resolve(
        &self,
        owner: Uuid,
        payload: &AppointmentPayload,
        require_active: bool,
    ) -> Result<Resolved, AppError> {
        let (Some(client_id), Some(service_id)) = (payload.client_id, payload.service_id) else {
            return Err(AppError::InvalidReference { field: "clientId", code: "required" });
        };

        let client = self.clients.get(owner, client_id).await?.ok_or(AppError::InvalidReference {
            field: "clientId",
            code: "client_not_found",
        })?;

        let service = self
            .services
            .get(owner, service_id)
            .await?
            .filter(|s| s.active || !require_active)
            .ok_or(AppError::InvalidReference {
                field: "serviceId",
                code: "service_unavailable",
            })?;

        Ok(Resolved { client, service })
    }

    /// Atualiza o contador em cache da conta. Falhas aqui não desfazem a
    /// operação principal; o contador volta a ser recalculado na leitura.
    async fn refresh_monthly_counter(&self, owner: Uuid, today: NaiveDate) {
        let month = YearMonth::of(today);
        let result = async {
            let appointments = self.snapshot(owner).await?;
            let patch = AccountPatch {
                appointments_this_month: Some(count_in_month(&appointments, month) as u32),
                reference_month: Some(month),
                ..Default::default()
            };
            self.accounts.update(owner, patch).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(account_id = %owner, "Falha ao atualizar o contador mensal: {}", e);
        }
    }
}

fn snapshot_fields(
    payload: &AppointmentPayload,
    resolved: &Resolved,
    status: Option<AppointmentStatus>,
) -> Result<Fields, AppError> {
    let (Some(date), Some(time)) = (payload.date, payload.time.as_deref()) else {
        return Err(AppError::InvalidReference { field: "date", code: "required" });
    };

    to_fields(&AppointmentRecord {
        client_id: resolved.client.id,
        service_id: resolved.service.id,
        client_name: &resolved.client.name,
        service_name: &resolved.service.name,
        value: resolved.service.price,
        date,
        time,
        notes: payload.notes.as_deref(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{store::Entity, MemoryAccountStore, MemoryEntityStore};
    use crate::models::{
        account::NewAccount,
        catalog::ServicePayload,
        client::ClientPayload,
        plan::{Plan, Role},
    };
    use crate::services::{catalog_service::CatalogService, client_service::ClientService};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Conta quantas vezes `create` chega ao armazenamento
    struct CountingStore {
        inner: MemoryEntityStore,
        creates: AtomicUsize,
    }

    #[async_trait]
    impl<T: Entity> EntityStore<T> for CountingStore {
        async fn list(&self, owner: Uuid, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError> {
            EntityStore::<T>::list(&self.inner, owner, sort, limit).await
        }
        async fn list_all(&self, sort: &SortKey, limit: i64) -> Result<Vec<T>, AppError> {
            EntityStore::<T>::list_all(&self.inner, sort, limit).await
        }
        async fn filter(&self, owner: Uuid, fields: &Fields) -> Result<Vec<T>, AppError> {
            EntityStore::<T>::filter(&self.inner, owner, fields).await
        }
        async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<T>, AppError> {
            EntityStore::<T>::get(&self.inner, owner, id).await
        }
        async fn create(&self, owner: Uuid, fields: Fields) -> Result<T, AppError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            EntityStore::<T>::create(&self.inner, owner, fields).await
        }
        async fn update(&self, owner: Uuid, id: Uuid, fields: Fields) -> Result<T, AppError> {
            EntityStore::<T>::update(&self.inner, owner, id, fields).await
        }
        async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
            EntityStore::<T>::delete(&self.inner, owner, id).await
        }
    }

    // Só a primeira gravação de conta funciona; as seguintes falham
    struct FailingUpdates {
        inner: Arc<MemoryAccountStore>,
        updates: AtomicUsize,
    }

    #[async_trait]
    impl AccountStore for FailingUpdates {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
            self.inner.find_by_email(email).await
        }
        async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
            self.inner.create(new_account).await
        }
        async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<Account, AppError> {
            if self.updates.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(AppError::InternalServerError(anyhow::anyhow!("conexão perdida")));
            }
            self.inner.update(id, patch).await
        }
        async fn list(&self, limit: i64) -> Result<Vec<Account>, AppError> {
            self.inner.list(limit).await
        }
    }

    struct Fixture {
        accounts: Arc<MemoryAccountStore>,
        store: Arc<CountingStore>,
        appointments: AppointmentService,
        clients: ClientService,
        catalog: CatalogService,
        account: Account,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn fixture(plan: Plan) -> Fixture {
        let accounts = Arc::new(MemoryAccountStore::new());
        let store = Arc::new(CountingStore {
            inner: MemoryEntityStore::new(),
            creates: AtomicUsize::new(0),
        });
        let account = Account {
            id: Uuid::new_v4(),
            email: "ana@salao.com".into(),
            full_name: Some("Ana Souza".into()),
            password_hash: String::new(),
            role: Role::User,
            plan,
            appointments_this_month: None,
            reference_month: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        accounts.insert(account.clone()).unwrap();

        Fixture {
            appointments: AppointmentService::new(
                accounts.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            ),
            clients: ClientService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            accounts,
            store,
            account,
        }
    }

    impl Fixture {
        async fn client_and_service(&self, price: i64) -> (Client, Service) {
            let client = self
                .clients
                .create(
                    self.account.id,
                    ClientPayload {
                        name: "Maria".into(),
                        email: None,
                        phone: None,
                        tax_id: None,
                        address: None,
                        notes: None,
                    },
                )
                .await
                .unwrap();
            let service = self
                .catalog
                .create(
                    self.account.id,
                    ServicePayload {
                        name: "Corte".into(),
                        description: None,
                        price: Some(Decimal::from(price)),
                        duration: Some(30),
                        active: true,
                    },
                )
                .await
                .unwrap();
            (client, service)
        }

        fn creates(&self) -> usize {
            self.store.creates.load(Ordering::SeqCst)
        }

        async fn fresh_account(&self) -> Account {
            self.accounts.find_by_id(self.account.id).await.unwrap().unwrap()
        }
    }

    fn payload(client: &Client, service: &Service, date: &str) -> AppointmentPayload {
        AppointmentPayload {
            client_id: Some(client.id),
            service_id: Some(service.id),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            time: Some("09:00".into()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_snapshots_names_and_price() {
        let fx = fixture(Plan::Free);
        let (client, service) = fx.client_and_service(50).await;

        let created = fx
            .appointments
            .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
            .await
            .unwrap();
        assert_eq!(created.client_name, "Maria");
        assert_eq!(created.service_name, "Corte");
        assert_eq!(created.value, Decimal::from(50));
        assert_eq!(created.status, AppointmentStatus::Scheduled);

        // Reprecificar o serviço não altera o histórico
        fx.catalog
            .update(
                fx.account.id,
                service.id,
                ServicePayload {
                    name: "Corte premium".into(),
                    description: None,
                    price: Some(Decimal::from(80)),
                    duration: Some(30),
                    active: true,
                },
            )
            .await
            .unwrap();
        let stored = fx.appointments.get(fx.account.id, created.id).await.unwrap();
        assert_eq!(stored.value, Decimal::from(50));
        assert_eq!(stored.service_name, "Corte");

        // O contador em cache foi atualizado
        let account = fx.fresh_account().await;
        assert_eq!(account.appointments_this_month, Some(1));
        assert_eq!(account.reference_month, Some(YearMonth::of(today())));
    }

    #[tokio::test]
    async fn free_plan_quota_blocks_before_any_create() {
        let fx = fixture(Plan::Free);
        let (client, service) = fx.client_and_service(50).await;
        let setup_creates = fx.creates();

        for day in 1..=10 {
            let date = format!("2024-05-{day:02}");
            fx.appointments
                .create(&fx.account, payload(&client, &service, &date), today())
                .await
                .unwrap();
        }
        assert_eq!(fx.creates(), setup_creates + 10);

        let account = fx.fresh_account().await;
        let blocked = fx
            .appointments
            .create(&account, payload(&client, &service, "2024-05-20"), today())
            .await;
        assert!(matches!(blocked, Err(AppError::MonthlyQuotaReached { limit: 10 })));
        assert_eq!(fx.creates(), setup_creates + 10);
    }

    #[tokio::test]
    async fn quota_counts_records_when_cached_counter_is_stale() {
        let fx = fixture(Plan::Free);
        let (client, service) = fx.client_and_service(50).await;
        let accounts = Arc::new(FailingUpdates {
            inner: fx.accounts.clone(),
            updates: AtomicUsize::new(0),
        });
        let appointments =
            AppointmentService::new(accounts, fx.store.clone(), fx.store.clone(), fx.store.clone());

        let mut created = 0;
        for day in 1..=15 {
            let account = fx.fresh_account().await;
            let date = format!("2024-05-{day:02}");
            match appointments.create(&account, payload(&client, &service, &date), today()).await {
                Ok(_) => created += 1,
                Err(AppError::MonthlyQuotaReached { limit }) => assert_eq!(limit, 10),
                Err(other) => panic!("erro inesperado: {other:?}"),
            }
        }

        // O contador ficou parado em 1, mas a cota usa os agendamentos gravados
        assert_eq!(fx.fresh_account().await.appointments_this_month, Some(1));
        assert_eq!(created, 10);
        let stored = appointments.snapshot(fx.account.id).await.unwrap();
        assert_eq!(count_in_month(&stored, YearMonth::of(today())), 10);
    }

    #[tokio::test]
    async fn paid_plans_have_no_quota() {
        let fx = fixture(Plan::Basic);
        let (client, service) = fx.client_and_service(50).await;
        for _ in 0..12 {
            fx.appointments
                .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
                .await
                .unwrap();
        }
        assert_eq!(fx.appointments.snapshot(fx.account.id).await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn missing_selection_fails_without_touching_the_store() {
        let fx = fixture(Plan::Free);
        let result = fx
            .appointments
            .create(
                &fx.account,
                AppointmentPayload {
                    client_id: None,
                    service_id: None,
                    date: Some(today()),
                    time: Some("09:00".into()),
                    notes: None,
                },
                today(),
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_eq!(fx.creates(), 0);
    }

    #[tokio::test]
    async fn inactive_service_cannot_be_booked() {
        let fx = fixture(Plan::Premium);
        let (client, service) = fx.client_and_service(50).await;
        fx.catalog.set_active(fx.account.id, service.id, false).await.unwrap();

        let result = fx
            .appointments
            .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
            .await;
        assert!(matches!(
            result,
            Err(AppError::InvalidReference { field: "serviceId", .. })
        ));
    }

    #[tokio::test]
    async fn status_machine_is_enforced() {
        let fx = fixture(Plan::Premium);
        let (client, service) = fx.client_and_service(50).await;
        let created = fx
            .appointments
            .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
            .await
            .unwrap();
        let owner = fx.account.id;

        let confirmed = fx.appointments.advance(owner, created.id).await.unwrap();
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

        let back = fx
            .appointments
            .change_status(owner, created.id, AppointmentStatus::Scheduled)
            .await;
        assert!(matches!(back, Err(AppError::InvalidStatusTransition { .. })));
        let unchanged = fx.appointments.get(owner, created.id).await.unwrap();
        assert_eq!(unchanged.status, AppointmentStatus::Confirmed);

        let completed = fx.appointments.advance(owner, created.id).await.unwrap();
        assert_eq!(completed.status, AppointmentStatus::Completed);
        assert!(fx.appointments.advance(owner, created.id).await.is_err());
        assert!(fx
            .appointments
            .change_status(owner, created.id, AppointmentStatus::Canceled)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn edit_resnapshots_and_keeps_status() {
        let fx = fixture(Plan::Premium);
        let (client, service) = fx.client_and_service(50).await;
        let owner = fx.account.id;
        let created = fx
            .appointments
            .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
            .await
            .unwrap();
        fx.appointments.advance(owner, created.id).await.unwrap();

        let other = fx
            .catalog
            .create(
                owner,
                ServicePayload {
                    name: "Escova".into(),
                    description: None,
                    price: Some(Decimal::from(70)),
                    duration: None,
                    active: true,
                },
            )
            .await
            .unwrap();

        let edited = fx
            .appointments
            .update(&fx.account, created.id, payload(&client, &other, "2024-05-11"), today())
            .await
            .unwrap();
        assert_eq!(edited.service_name, "Escova");
        assert_eq!(edited.value, Decimal::from(70));
        assert_eq!(edited.status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn edit_keeps_working_after_service_is_deactivated() {
        let fx = fixture(Plan::Premium);
        let (client, service) = fx.client_and_service(50).await;
        let created = fx
            .appointments
            .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
            .await
            .unwrap();
        fx.catalog.set_active(fx.account.id, service.id, false).await.unwrap();

        let mut moved = payload(&client, &service, "2024-05-10");
        moved.time = Some("15:00".into());
        let edited = fx
            .appointments
            .update(&fx.account, created.id, moved, today())
            .await
            .unwrap();
        assert_eq!(edited.time.as_deref(), Some("15:00"));
        assert_eq!(edited.service_name, "Corte");
        assert_eq!(edited.value, Decimal::from(50));

        // Novos agendamentos continuam sem acesso ao serviço inativo
        let blocked = fx
            .appointments
            .create(&fx.account, payload(&client, &service, "2024-05-11"), today())
            .await;
        assert!(matches!(
            blocked,
            Err(AppError::InvalidReference { field: "serviceId", .. })
        ));
    }

    #[tokio::test]
    async fn delete_refreshes_the_counter() {
        let fx = fixture(Plan::Free);
        let (client, service) = fx.client_and_service(50).await;
        let created = fx
            .appointments
            .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
            .await
            .unwrap();

        fx.appointments.delete(&fx.account, created.id, today()).await.unwrap();
        assert_eq!(fx.fresh_account().await.appointments_this_month, Some(0));
        assert!(matches!(
            fx.appointments.delete(&fx.account, created.id, today()).await,
            Err(AppError::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn agenda_shows_the_selected_day() {
        let fx = fixture(Plan::Free);
        let (client, service) = fx.client_and_service(50).await;
        let mut late = payload(&client, &service, "2024-05-10");
        late.time = Some("15:00".into());
        fx.appointments.create(&fx.account, late, today()).await.unwrap();
        fx.appointments
            .create(&fx.account, payload(&client, &service, "2024-05-10"), today())
            .await
            .unwrap();

        let account = fx.fresh_account().await;
        let view = fx.appointments.agenda(&account, today(), today()).await.unwrap();
        assert_eq!(view.week_days[0], NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
        assert_eq!(view.appointments.len(), 2);
        assert_eq!(view.appointments[0].time.as_deref(), Some("09:00"));
        assert_eq!(view.quota.used, 2);
        assert_eq!(view.time_slots.len(), 30);
    }
}
