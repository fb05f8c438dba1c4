// src/services/report_service.rs

use std::sync::Arc;

use chrono::{Days, Months, NaiveDate};
use uuid::Uuid;

use crate::{
    common::{
        calendar::{DateRange, YearMonth},
        error::AppError,
    },
    db::store::{EntityStore, SortKey, MAX_LIST_LIMIT},
    models::{
        appointment::{Appointment, AppointmentStatus},
        reports::{PeriodReport, ReportPeriod},
        transaction::{Transaction, TransactionType},
    },
    services::aggregation::{
        appointments_in_range, average_ticket, completion_rate, monthly_trend, status_breakdown,
        sum_transactions, top_n, transactions_in_range, weekday_chart,
    },
};

const TOP_SERVICES: usize = 5;
const TREND_MONTHS_BACK: u32 = 5;

/// Intervalo fechado de um período de relatório, relativo a `today`.
/// `custom` exige início e fim, com início <= fim.
pub fn resolve_range(
    period: ReportPeriod,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, AppError> {
    let back = |months: u32| today.checked_sub_months(Months::new(months)).unwrap_or(today);

    let range = match period {
        ReportPeriod::Week => DateRange::new(today.checked_sub_days(Days::new(6)).unwrap_or(today), today),
        ReportPeriod::Month => {
            let month = YearMonth::of(today);
            match (month.first_day(), month.last_day()) {
                (Some(first), Some(last)) => DateRange::new(first, last),
                _ => return Err(AppError::InvalidPeriod),
            }
        }
        ReportPeriod::Quarter => DateRange::new(back(3), today),
        ReportPeriod::Year => DateRange::new(back(12), today),
        ReportPeriod::Custom => match (start, end) {
            (Some(start), Some(end)) if start <= end => DateRange::new(start, end),
            _ => return Err(AppError::InvalidPeriod),
        },
    };
    Ok(range)
}

#[derive(Clone)]
pub struct ReportService {
    appointments: Arc<dyn EntityStore<Appointment>>,
    transactions: Arc<dyn EntityStore<Transaction>>,
}

impl ReportService {
    pub fn new(
        appointments: Arc<dyn EntityStore<Appointment>>,
        transactions: Arc<dyn EntityStore<Transaction>>,
    ) -> Self {
        Self { appointments, transactions }
    }

    pub async fn period_report(
        &self,
        owner: Uuid,
        period: ReportPeriod,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<PeriodReport, AppError> {
        let appointments = self
            .appointments
            .list(owner, &SortKey::desc("date"), MAX_LIST_LIMIT)
            .await?;
        let transactions = self
            .transactions
            .list(owner, &SortKey::desc("date"), MAX_LIST_LIMIT)
            .await?;

        let in_range = appointments_in_range(&appointments, range);
        let ledger = transactions_in_range(&transactions, range);

        tracing::debug!(
            owner = %owner,
            appointments = in_range.len(),
            transactions = ledger.len(),
            "Relatório por período"
        );

        Ok(PeriodReport {
            period,
            range,
            total_appointments: in_range.len(),
            completed_appointments: in_range
                .iter()
                .filter(|a| a.status == AppointmentStatus::Completed)
                .count(),
            completion_rate: completion_rate(&in_range),
            income: sum_transactions(&ledger, TransactionType::Income),
            expense: sum_transactions(&ledger, TransactionType::Expense),
            average_ticket: average_ticket(&in_range),
            by_weekday: weekday_chart(&in_range),
            top_services: top_n(&in_range, TOP_SERVICES),
            // A tendência olha o histórico inteiro, não só o período
            trend: monthly_trend(&appointments, &transactions, YearMonth::of(today), TREND_MONTHS_BACK),
            status_breakdown: status_breakdown(&in_range),
        })
    }
}
