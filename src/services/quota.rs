// src/services/quota.rs

use crate::{
    common::{calendar::YearMonth, money::percentage},
    models::{account::Account, appointment::Appointment, plan::Plan, reports::QuotaStatus},
    services::plan_policy::{monthly_quota, MonthlyQuota},
};

/// Percentual da cota a partir do qual o dashboard mostra o aviso.
const ALERT_THRESHOLD_PERCENT: u32 = 80;

/// Agendamentos do mês, em qualquer status (cancelados também contam).
/// Datas ausentes ou malformadas ficam de fora.
pub fn count_in_month(appointments: &[Appointment], month: YearMonth) -> usize {
    appointments
        .iter()
        .filter(|a| a.date.is_some_and(|d| month.contains(d)))
        .count()
}

pub fn quota_reached(plan: Plan, count_in_current_month: usize) -> bool {
    match monthly_quota(plan) {
        MonthlyQuota::Limited(limit) => count_in_current_month >= limit as usize,
        MonthlyQuota::Unlimited => false,
    }
}

/// O contador em cache da conta só vale para o mês a que se refere;
/// fora dele a contagem é refeita a partir dos agendamentos.
pub fn effective_monthly_count(
    account: &Account,
    appointments: &[Appointment],
    month: YearMonth,
) -> u32 {
    match (account.reference_month, account.appointments_this_month) {
        (Some(reference), Some(cached)) if reference == month => cached,
        _ => count_in_month(appointments, month) as u32,
    }
}

pub fn quota_status(plan: Plan, used: u32) -> QuotaStatus {
    match monthly_quota(plan) {
        MonthlyQuota::Limited(limit) => {
            let progress = percentage(used as usize, limit as usize);
            QuotaStatus {
                used,
                limit: Some(limit),
                remaining: Some(limit.saturating_sub(used)),
                progress_percent: progress,
                alert: progress >= ALERT_THRESHOLD_PERCENT.into(),
                reached: used >= limit,
            }
        }
        MonthlyQuota::Unlimited => QuotaStatus {
            used,
            limit: None,
            remaining: None,
            progress_percent: Default::default(),
            alert: false,
            reached: false,
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::appointment::AppointmentStatus;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    pub(crate) fn appointment(date: Option<&str>, status: AppointmentStatus, value: i64) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            owner_id: Uuid::nil(),
            client_id: None,
            service_id: None,
            client_name: "Cliente".into(),
            service_name: "Serviço".into(),
            value: Decimal::from(value),
            date: date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            time: Some("09:00".into()),
            notes: None,
            status,
            created_date: Utc::now(),
            updated_date: Utc::now(),
        }
    }

    fn may() -> YearMonth {
        "2024-05".parse().unwrap()
    }

    #[test]
    fn counts_every_status_in_the_month() {
        let apps = vec![
            appointment(Some("2024-05-01"), AppointmentStatus::Canceled, 0),
            appointment(Some("2024-05-31"), AppointmentStatus::Completed, 0),
            appointment(Some("2024-06-01"), AppointmentStatus::Scheduled, 0),
            appointment(None, AppointmentStatus::Scheduled, 0),
        ];
        assert_eq!(count_in_month(&apps, may()), 2);
    }

    #[test]
    fn quota_boundaries() {
        assert!(!quota_reached(Plan::Free, 9));
        assert!(quota_reached(Plan::Free, 10));
        assert!(!quota_reached(Plan::Basic, 10_000));
        assert!(!quota_reached(Plan::Premium, 10_000));
    }

    #[test]
    fn stale_cached_counter_is_ignored() {
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            full_name: None,
            password_hash: String::new(),
            role: crate::models::plan::Role::User,
            plan: Plan::Free,
            appointments_this_month: Some(7),
            reference_month: Some("2024-04".parse().unwrap()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let apps = vec![appointment(Some("2024-05-02"), AppointmentStatus::Scheduled, 0)];
        assert_eq!(effective_monthly_count(&account, &apps, may()), 1);

        let current = Account { reference_month: Some(may()), ..account };
        assert_eq!(effective_monthly_count(&current, &apps, may()), 7);
    }

    #[test]
    fn status_alerts_at_eighty_percent() {
        let status = quota_status(Plan::Free, 8);
        assert!(status.alert);
        assert!(!status.reached);
        assert_eq!(status.remaining, Some(2));

        assert!(!quota_status(Plan::Free, 7).alert);
        assert!(quota_status(Plan::Free, 10).reached);

        let unlimited = quota_status(Plan::Premium, 500);
        assert_eq!(unlimited.limit, None);
        assert!(!unlimited.alert);
    }
}
