// src/services/admin_service.rs

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    common::{calendar::YearMonth, error::AppError},
    db::{
        store::{EntityStore, SortKey, MAX_LIST_LIMIT},
        AccountStore,
    },
    models::{
        appointment::Appointment,
        client::Client,
        plan::Plan,
        reports::{AdminOverview, PlanCount},
        transaction::{Transaction, TransactionType},
    },
    services::aggregation::{sum_transactions, transactions_in_month},
};

const RECENT_APPOINTMENTS: usize = 10;

// Visão geral da plataforma (todas as contas)
#[derive(Clone)]
pub struct AdminService {
    accounts: Arc<dyn AccountStore>,
    appointments: Arc<dyn EntityStore<Appointment>>,
    clients: Arc<dyn EntityStore<Client>>,
    transactions: Arc<dyn EntityStore<Transaction>>,
}

impl AdminService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        appointments: Arc<dyn EntityStore<Appointment>>,
        clients: Arc<dyn EntityStore<Client>>,
        transactions: Arc<dyn EntityStore<Transaction>>,
    ) -> Self {
        Self { accounts, appointments, clients, transactions }
    }

    pub async fn overview(&self, today: NaiveDate) -> Result<AdminOverview, AppError> {
        let accounts = self.accounts.list(MAX_LIST_LIMIT).await?;
        // Mais recentes primeiro, pela data de criação
        let appointments = self
            .appointments
            .list_all(&SortKey::desc("createdDate"), MAX_LIST_LIMIT)
            .await?;
        let clients = self.clients.list_all(&SortKey::asc("name"), MAX_LIST_LIMIT).await?;
        let transactions = self
            .transactions
            .list_all(&SortKey::desc("date"), MAX_LIST_LIMIT)
            .await?;

        let users_by_plan = Plan::ALL
            .iter()
            .map(|&plan| PlanCount {
                plan,
                count: accounts.iter().filter(|a| a.plan == plan).count(),
            })
            .collect();

        Ok(AdminOverview {
            total_users: accounts.len(),
            users_by_plan,
            total_appointments: appointments.len(),
            appointments_today: appointments.iter().filter(|a| a.date == Some(today)).count(),
            total_income: sum_transactions(&transactions, TransactionType::Income),
            income_this_month: sum_transactions(
                &transactions_in_month(&transactions, YearMonth::of(today)),
                TransactionType::Income,
            ),
            total_clients: clients.len(),
            recent_appointments: appointments.into_iter().take(RECENT_APPOINTMENTS).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{store::to_fields, MemoryAccountStore, MemoryEntityStore};
    use crate::models::{account::Account, plan::Role};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;
    use uuid::Uuid;

    fn account(plan: Plan) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: format!("{}@mail.com", Uuid::new_v4()),
            full_name: None,
            password_hash: String::new(),
            role: Role::User,
            plan,
            appointments_this_month: None,
            reference_month: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn aggregates_across_accounts() {
        let accounts = Arc::new(MemoryAccountStore::new());
        let store = Arc::new(MemoryEntityStore::new());
        let first = account(Plan::Free);
        let second = account(Plan::Premium);
        accounts.insert(first.clone()).unwrap();
        accounts.insert(second.clone()).unwrap();

        for (owner, date) in [(first.id, "2024-05-10"), (second.id, "2024-05-09"), (second.id, "2024-05-10")] {
            let fields = to_fields(&json!({
                "clientName": "Maria", "serviceName": "Corte", "value": 50,
                "date": date, "time": "09:00", "status": "canceled"
            }))
            .unwrap();
            EntityStore::<Appointment>::create(store.as_ref(), owner, fields).await.unwrap();
        }
        for (amount, date) in [(100, "2024-05-02"), (40, "2024-04-02")] {
            let fields = to_fields(&json!({
                "type": "income", "category": "service", "amount": amount, "date": date
            }))
            .unwrap();
            EntityStore::<Transaction>::create(store.as_ref(), second.id, fields).await.unwrap();
        }

        let admin = AdminService::new(accounts, store.clone(), store.clone(), store);
        let overview = admin
            .overview(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(overview.total_users, 2);
        assert_eq!(overview.users_by_plan[0].count, 1);
        assert_eq!(overview.users_by_plan[1].count, 0);
        assert_eq!(overview.total_appointments, 3);
        // Qualquer status conta para "hoje"
        assert_eq!(overview.appointments_today, 2);
        assert_eq!(overview.total_income, Decimal::from(140));
        assert_eq!(overview.income_this_month, Decimal::from(100));
        assert_eq!(overview.total_clients, 0);
        assert_eq!(overview.recent_appointments[0].date, NaiveDate::from_ymd_opt(2024, 5, 10));
    }
}
