// src/services/aggregation.rs

// Agregações sobre o snapshot já carregado (agendamentos / transações).
// Tudo aqui é puro e de passagem única; cada tela recalcula do zero.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    common::{
        calendar::{weekday_label_pt, DateRange, YearMonth},
        money::{percentage, round_currency},
    },
    models::{
        appointment::{Appointment, AppointmentStatus},
        plan::Plan,
        reports::{
            CategoryTotal, FinanceChartEntry, RevenueSource, ServiceRanking, StatusCount,
            TrendEntry, WeekdayCount,
        },
        transaction::{Transaction, TransactionType},
    },
    services::quota::count_in_month,
};

// =============================================================================
//  FILTROS
// =============================================================================

pub fn appointments_in_month(appointments: &[Appointment], month: YearMonth) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.date.is_some_and(|d| month.contains(d)))
        .cloned()
        .collect()
}

pub fn appointments_in_range(appointments: &[Appointment], range: DateRange) -> Vec<Appointment> {
    appointments.iter().filter(|a| range.contains(a.date)).cloned().collect()
}

pub fn transactions_in_month(transactions: &[Transaction], month: YearMonth) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.is_some_and(|d| month.contains(d)))
        .cloned()
        .collect()
}

pub fn transactions_in_range(transactions: &[Transaction], range: DateRange) -> Vec<Transaction> {
    transactions.iter().filter(|t| range.contains(t.date)).cloned().collect()
}

/// Agendamentos de hoje que não foram cancelados, na ordem recebida.
pub fn todays_appointments(appointments: &[Appointment], today: NaiveDate) -> Vec<Appointment> {
    appointments
        .iter()
        .filter(|a| a.date == Some(today) && a.status != AppointmentStatus::Canceled)
        .cloned()
        .collect()
}

// =============================================================================
//  SOMAS
// =============================================================================

pub fn sum_transactions(transactions: &[Transaction], kind: TransactionType) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

pub fn completed_value(appointments: &[Appointment]) -> Decimal {
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .map(|a| a.value)
        .sum()
}

/// Receita do mês: no premium vem do livro-caixa; nos demais, do valor
/// copiado nos agendamentos concluídos.
pub fn revenue_for_month(
    plan: Plan,
    appointments: &[Appointment],
    transactions: &[Transaction],
    month: YearMonth,
) -> (Decimal, RevenueSource) {
    match plan {
        Plan::Premium => (
            sum_transactions(&transactions_in_month(transactions, month), TransactionType::Income),
            RevenueSource::Transactions,
        ),
        Plan::Free | Plan::Basic => (
            completed_value(&appointments_in_month(appointments, month)),
            RevenueSource::CompletedAppointments,
        ),
    }
}

/// Totais por categoria, na ordem em que cada categoria aparece.
/// Categorias sem lançamento não entram.
pub fn group_by_category(transactions: &[Transaction], kind: TransactionType) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for t in transactions.iter().filter(|t| t.kind == kind) {
        let category = t.category_or_other();
        match totals.iter_mut().find(|c| c.category == category) {
            Some(entry) => entry.total += t.amount,
            None => totals.push(CategoryTotal {
                category,
                label: category.label().to_string(),
                total: t.amount,
            }),
        }
    }
    totals
}

// =============================================================================
//  DISTRIBUIÇÕES E RANKINGS
// =============================================================================

/// Contagem por dia da semana, índice 0 = domingo. Sempre 7 posições.
pub fn group_by_weekday(appointments: &[Appointment]) -> [usize; 7] {
    let mut buckets = [0usize; 7];
    for date in appointments.iter().filter_map(|a| a.date) {
        buckets[date.weekday().num_days_from_sunday() as usize] += 1;
    }
    buckets
}

pub fn weekday_chart(appointments: &[Appointment]) -> Vec<WeekdayCount> {
    group_by_weekday(appointments)
        .iter()
        .enumerate()
        .map(|(i, &count)| WeekdayCount {
            label: weekday_label_pt(i).to_string(),
            count,
        })
        .collect()
}

/// Serviços mais frequentes. Empates mantêm a ordem de primeira aparição.
pub fn top_n(appointments: &[Appointment], n: usize) -> Vec<ServiceRanking> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for name in appointments.iter().map(|a| a.service_name.as_str()).filter(|s| !s.is_empty()) {
        let count = counts.entry(name).or_insert(0);
        if *count == 0 {
            order.push(name);
        }
        *count += 1;
    }

    let mut ranking: Vec<ServiceRanking> = order
        .into_iter()
        .map(|name| ServiceRanking {
            service_name: name.to_string(),
            count: counts[name],
        })
        .collect();
    // sort_by é estável
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking.truncate(n);
    ranking
}

pub fn status_breakdown(appointments: &[Appointment]) -> Vec<StatusCount> {
    AppointmentStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            label: status.label().to_string(),
            count: appointments.iter().filter(|a| a.status == status).count(),
        })
        .collect()
}

// =============================================================================
//  SÉRIES MENSAIS
// =============================================================================

/// Uma entrada por mês, de `months_back` meses atrás até o mês corrente.
pub fn monthly_trend(
    appointments: &[Appointment],
    transactions: &[Transaction],
    current: YearMonth,
    months_back: u32,
) -> Vec<TrendEntry> {
    (0..=months_back)
        .rev()
        .map(|i| {
            let month = current.minus_months(i);
            TrendEntry {
                month: month.to_string(),
                label: month.short_label_pt().to_string(),
                appointments: count_in_month(appointments, month),
                income: sum_transactions(
                    &transactions_in_month(transactions, month),
                    TransactionType::Income,
                ),
            }
        })
        .collect()
}

pub fn finance_chart(
    transactions: &[Transaction],
    current: YearMonth,
    months_back: u32,
) -> Vec<FinanceChartEntry> {
    (0..=months_back)
        .rev()
        .map(|i| {
            let month = current.minus_months(i);
            let in_month = transactions_in_month(transactions, month);
            FinanceChartEntry {
                month: month.to_string(),
                label: month.short_label_pt().to_string(),
                income: sum_transactions(&in_month, TransactionType::Income),
                expense: sum_transactions(&in_month, TransactionType::Expense),
            }
        })
        .collect()
}

// =============================================================================
//  INDICADORES
// =============================================================================

/// Concluídos / total, em %, com uma casa. Zero sem agendamentos.
pub fn completion_rate(appointments: &[Appointment]) -> Decimal {
    let completed = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .count();
    percentage(completed, appointments.len())
}

/// Valor médio dos concluídos. Zero quando não há concluídos.
pub fn average_ticket(appointments: &[Appointment]) -> Decimal {
    let completed: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .collect();
    if completed.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = completed.iter().map(|a| a.value).sum();
    round_currency(total / Decimal::from(completed.len()))
}
