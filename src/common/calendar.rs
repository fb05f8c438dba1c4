// src/common/calendar.rs

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const WEEKDAY_LABELS_PT: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

const MONTH_LABELS_PT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Data "de hoje" no fuso do servidor. Os serviços recebem a data pronta
/// como parâmetro; só os handlers chamam isto.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Rótulo curto (pt-BR) do dia da semana, índice 0 = domingo.
pub fn weekday_label_pt(index: usize) -> &'static str {
    WEEKDAY_LABELS_PT.get(index).copied().unwrap_or("?")
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("mês inválido (esperado YYYY-MM): {0}")]
pub struct ParseYearMonthError(pub String);

// ---
// Mês de referência (YYYY-MM)
// ---
// Usado para cota mensal, receita do mês e gráficos de evolução.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// `true` quando a data cai dentro deste mês.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Volta `n` meses (atravessa a virada de ano).
    pub fn minus_months(self, n: u32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) - n as i32;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.and_then(|d| d.pred_opt())
    }

    /// Rótulo curto do mês em português ("jan", "fev", ...).
    pub fn short_label_pt(&self) -> &'static str {
        MONTH_LABELS_PT[(self.month - 1) as usize]
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(raw.to_string());
        let (year, month) = raw.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        YearMonth::new(year, month).ok_or_else(err)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---
// Intervalo fechado de datas (relatórios por período)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Datas ausentes nunca pertencem ao intervalo.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| d >= self.start && d <= self.end)
    }
}

/// Desserializa uma data `YYYY-MM-DD` vinda do armazenamento de documentos.
/// Valores ausentes ou malformados viram `None` em vez de derrubar o registro
/// inteiro; agregações simplesmente ignoram esses registros.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(raw: &str) -> YearMonth {
        raw.parse().unwrap()
    }

    #[test]
    fn parses_and_prints_year_month() {
        assert_eq!(ym("2024-05").to_string(), "2024-05");
        assert!("2024-5".parse::<YearMonth>().is_err());
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("maio".parse::<YearMonth>().is_err());
    }

    #[test]
    fn minus_months_crosses_year_boundary() {
        assert_eq!(ym("2024-02").minus_months(3), ym("2023-11"));
        assert_eq!(ym("2024-12").minus_months(0), ym("2024-12"));
        assert_eq!(ym("2024-01").minus_months(12), ym("2023-01"));
    }

    #[test]
    fn month_bounds() {
        let feb = ym("2024-02");
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(ym("2023-12").last_day(), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(feb.short_label_pt(), "fev");
    }

    #[test]
    fn lenient_date_drops_garbage() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "lenient_date")]
            date: Option<NaiveDate>,
        }

        let ok: Row = serde_json::from_str(r#"{"date":"2024-05-01"}"#).unwrap();
        assert_eq!(ok.date, NaiveDate::from_ymd_opt(2024, 5, 1));

        let bad: Row = serde_json::from_str(r#"{"date":"01/05/2024"}"#).unwrap();
        assert_eq!(bad.date, None);

        let missing: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing.date, None);

        let wrong_type: Row = serde_json::from_str(r#"{"date":42}"#).unwrap();
        assert_eq!(wrong_type.date, None);
    }
}
