// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    common::{calendar::YearMonth, error::AppError, money::format_brl},
    db::store::{EntityStore, SortKey, MAX_LIST_LIMIT},
    models::{
        account::Account,
        appointment::Appointment,
        client::Client,
        plan::Plan,
        reports::DashboardView,
        transaction::Transaction,
    },
    services::{
        aggregation::{appointments_in_month, revenue_for_month, todays_appointments},
        quota::{effective_monthly_count, quota_status},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    appointments: Arc<dyn EntityStore<Appointment>>,
    clients: Arc<dyn EntityStore<Client>>,
    transactions: Arc<dyn EntityStore<Transaction>>,
}

impl DashboardService {
    pub fn new(
        appointments: Arc<dyn EntityStore<Appointment>>,
        clients: Arc<dyn EntityStore<Client>>,
        transactions: Arc<dyn EntityStore<Transaction>>,
    ) -> Self {
        Self { appointments, clients, transactions }
    }

    pub async fn view(&self, account: &Account, today: NaiveDate) -> Result<DashboardView, AppError> {
        let owner = account.id;
        let month = YearMonth::of(today);

        let appointments = self
            .appointments
            .list(owner, &SortKey::desc("date"), MAX_LIST_LIMIT)
            .await?;
        let client_count = self
            .clients
            .list(owner, &SortKey::asc("name"), MAX_LIST_LIMIT)
            .await?
            .len();

        // O livro-caixa só é lido quando a receita vem dele
        let transactions = if account.plan == Plan::Premium {
            self.transactions
                .list(owner, &SortKey::desc("date"), MAX_LIST_LIMIT)
                .await?
        } else {
            Vec::new()
        };

        let (month_revenue, revenue_source) =
            revenue_for_month(account.plan, &appointments, &transactions, month);
        let used = effective_monthly_count(account, &appointments, month);

        Ok(DashboardView {
            greeting_name: account.first_name().to_string(),
            plan: account.plan,
            plan_label: account.plan.label().to_string(),
            today,
            todays_appointments: todays_appointments(&appointments, today),
            month_appointments: appointments_in_month(&appointments, month).len(),
            quota: quota_status(account.plan, used),
            client_count,
            month_revenue,
            month_revenue_formatted: format_brl(month_revenue),
            revenue_source,
            show_upgrade: account.plan != Plan::Premium,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{store::to_fields, MemoryEntityStore};
    use crate::models::{appointment::AppointmentStatus, plan::Role, reports::RevenueSource};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;
    use uuid::Uuid;

    fn account(plan: Plan) -> Account {
        Account {
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
        }
    }

    async fn seed(store: &MemoryEntityStore, owner: Uuid) {
        let appointments = [
            ("2024-05-10", AppointmentStatus::Completed, 80),
            ("2024-05-10", AppointmentStatus::Canceled, 40),
            ("2024-05-02", AppointmentStatus::Scheduled, 30),
            ("2024-04-30", AppointmentStatus::Completed, 500),
        ];
        for (date, status, value) in appointments {
            let fields = to_fields(&json!({
                "clientName": "Maria",
                "serviceName": "Corte",
                "value": value,
                "date": date,
                "time": "09:00",
                "status": status,
            }))
            .unwrap();
            EntityStore::<Appointment>::create(store, owner, fields).await.unwrap();
        }
        let income = to_fields(&json!({
            "type": "income", "category": "service", "amount": 200, "date": "2024-05-03"
        }))
        .unwrap();
        EntityStore::<Transaction>::create(store, owner, income).await.unwrap();
    }

    fn service(store: Arc<MemoryEntityStore>) -> DashboardService {
        DashboardService::new(store.clone(), store.clone(), store)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[tokio::test]
    async fn free_plan_revenue_comes_from_completed_appointments() {
        let store = Arc::new(MemoryEntityStore::new());
        let account = account(Plan::Free);
        seed(&store, account.id).await;

        let view = service(store).view(&account, today()).await.unwrap();
        assert_eq!(view.greeting_name, "Ana");
        assert_eq!(view.todays_appointments.len(), 1);
        assert_eq!(view.month_appointments, 3);
        assert_eq!(view.quota.used, 3);
        assert_eq!(view.month_revenue, Decimal::from(80));
        assert_eq!(view.revenue_source, RevenueSource::CompletedAppointments);
        assert_eq!(view.month_revenue_formatted, "R$ 80,00");
        assert!(view.show_upgrade);
    }

    #[tokio::test]
    async fn premium_revenue_comes_from_the_ledger() {
        let store = Arc::new(MemoryEntityStore::new());
        let account = account(Plan::Premium);
        seed(&store, account.id).await;

        let view = service(store).view(&account, today()).await.unwrap();
        assert_eq!(view.month_revenue, Decimal::from(200));
        assert_eq!(view.revenue_source, RevenueSource::Transactions);
        assert_eq!(view.quota.limit, None);
        assert!(!view.show_upgrade);
    }
}
