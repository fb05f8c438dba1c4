// src/services/agenda.rs

use std::cmp::Ordering;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::appointment::Appointment;

const FIRST_SLOT_HOUR: u32 = 7;
const LAST_SLOT_HOUR: u32 = 21;

/// Os 7 dias (domingo a sábado) da semana que contém `current`.
pub fn week_window(current: NaiveDate) -> Vec<NaiveDate> {
    let offset = u64::from(current.weekday().num_days_from_sunday());
    let start = current.checked_sub_days(Days::new(offset)).unwrap_or(current);
    start.iter_days().take(7).collect()
}

/// Agendamentos do dia, ordenados pelo horário. Como o formato é `HH:MM`
/// com zero à esquerda, a comparação de texto já é cronológica.
pub fn appointments_on(appointments: &[Appointment], date: NaiveDate) -> Vec<Appointment> {
    let mut day: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.date == Some(date))
        .cloned()
        .collect();
    day.sort_by(|a, b| match (&a.time, &b.time) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    day
}

/// Opções de horário de 07:00 a 21:30, de meia em meia hora.
/// Não é um modelo de disponibilidade: não existe checagem de conflito.
pub fn time_slots() -> Vec<String> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .flat_map(|h| [format!("{h:02}:00"), format!("{h:02}:30")])
        .collect()
}

pub fn is_valid_time(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    match (value[..2].parse::<u32>(), value[3..].parse::<u32>()) {
        (Ok(h), Ok(m)) => {
            h < 24 && m < 60 && value[..2].bytes().chain(value[3..].bytes()).all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}
