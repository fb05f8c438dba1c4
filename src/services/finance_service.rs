// src/services/finance_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{calendar::YearMonth, error::AppError},
    db::store::{to_fields, EntityStore, SortKey, MAX_LIST_LIMIT},
    models::{
        reports::FinanceOverview,
        transaction::{Transaction, TransactionPayload, TransactionType},
    },
    services::aggregation::{finance_chart, group_by_category, sum_transactions, transactions_in_month},
};

/// Meses anteriores exibidos no gráfico, além do mês corrente.
const CHART_MONTHS_BACK: u32 = 5;

// Livro-caixa (receitas e despesas), exclusivo do premium
#[derive(Clone)]
pub struct FinanceService {
    transactions: Arc<dyn EntityStore<Transaction>>,
}

impl FinanceService {
    pub fn new(transactions: Arc<dyn EntityStore<Transaction>>) -> Self {
        Self { transactions }
    }

    /// Lançamentos do mais recente para o mais antigo.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.transactions
            .list(owner, &SortKey::desc("date"), MAX_LIST_LIMIT)
            .await
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Transaction, AppError> {
        self.transactions
            .get(owner, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Transação {}", id)))
    }

    pub async fn create(
        &self,
        owner: Uuid,
        payload: TransactionPayload,
    ) -> Result<Transaction, AppError> {
        payload.validate()?;
        self.transactions.create(owner, to_fields(&payload)?).await
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        payload: TransactionPayload,
    ) -> Result<Transaction, AppError> {
        payload.validate()?;
        self.transactions.update(owner, id, to_fields(&payload)?).await
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        self.transactions.delete(owner, id).await
    }

    /// Resumo do mês: totais, lista (opcionalmente por tipo), gráfico de
    /// seis meses e despesas por categoria.
    pub async fn overview(
        &self,
        owner: Uuid,
        month: YearMonth,
        type_filter: Option<TransactionType>,
    ) -> Result<FinanceOverview, AppError> {
        let all = self.list(owner).await?;
        let in_month = transactions_in_month(&all, month);

        let income = sum_transactions(&in_month, TransactionType::Income);
        let expense = sum_transactions(&in_month, TransactionType::Expense);

        let expense_by_category = group_by_category(&in_month, TransactionType::Expense);
        let transactions = match type_filter {
            Some(kind) => in_month.into_iter().filter(|t| t.kind == kind).collect(),
            None => in_month,
        };

        Ok(FinanceOverview {
            month: month.to_string(),
            income,
            expense,
            balance: income - expense,
            transactions,
            chart: finance_chart(&all, month, CHART_MONTHS_BACK),
            expense_by_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryEntityStore;
    use crate::models::transaction::TransactionCategory;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn payload(
        kind: TransactionType,
        category: TransactionCategory,
        amount: i64,
        date: &str,
    ) -> TransactionPayload {
        TransactionPayload {
            kind,
            category,
            description: None,
            amount: Some(Decimal::from(amount)),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            client_name: None,
        }
    }

    #[tokio::test]
    async fn monthly_overview_totals_and_filters() {
        let finance = FinanceService::new(Arc::new(MemoryEntityStore::new()));
        let owner = Uuid::new_v4();

        finance
            .create(owner, payload(TransactionType::Income, TransactionCategory::Service, 200, "2024-05-03"))
            .await
            .unwrap();
        finance
            .create(owner, payload(TransactionType::Expense, TransactionCategory::Rent, 50, "2024-05-05"))
            .await
            .unwrap();
        finance
            .create(owner, payload(TransactionType::Income, TransactionCategory::Product, 999, "2024-04-20"))
            .await
            .unwrap();

        let may: YearMonth = "2024-05".parse().unwrap();
        let overview = finance.overview(owner, may, None).await.unwrap();
        assert_eq!(overview.income, Decimal::from(200));
        assert_eq!(overview.expense, Decimal::from(50));
        assert_eq!(overview.balance, Decimal::from(150));
        assert_eq!(overview.transactions.len(), 2);
        assert_eq!(overview.chart.len(), 6);
        assert_eq!(overview.chart[4].income, Decimal::from(999));
        assert_eq!(overview.expense_by_category.len(), 1);
        assert_eq!(overview.expense_by_category[0].category, TransactionCategory::Rent);

        let expenses = finance
            .overview(owner, may, Some(TransactionType::Expense))
            .await
            .unwrap();
        assert_eq!(expenses.transactions.len(), 1);
        // Os totais não dependem do filtro da lista
        assert_eq!(expenses.income, Decimal::from(200));
    }

    #[tokio::test]
    async fn category_must_match_type() {
        let finance = FinanceService::new(Arc::new(MemoryEntityStore::new()));
        let result = finance
            .create(
                Uuid::new_v4(),
                payload(TransactionType::Income, TransactionCategory::Rent, 10, "2024-05-01"),
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
