//! Разбор даты и времени из ячеек выгрузок
//!
//! Текст пробуется по списку форматов. Числовые даты с точками и слешами
//! читаются как «день первым» (02.06.2025 = 2 июня).

use crate::types::{excel_epoch_date, Cell};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Форматы «дата + время»
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Форматы «только дата» (время = полночь)
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Разобрать дату-время из текста
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    lazy_static::lazy_static! {
        static ref SPACES_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let text = SPACES_RE.replace_all(text.trim(), " ");
    if text.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&text, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Серийный номер Excel (система 1900) → дата-время
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch_date()
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::milliseconds(millis))
}

/// Дата-время из одной ячейки
pub fn cell_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(n) => excel_serial_to_datetime(*n),
        Cell::Text(s) => parse_timestamp(s),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Склеить отдельные колонки даты и времени и разобрать результат
///
/// Пустая дата или пустое время → None.
pub fn combine_date_time(date: &Cell, time: &Cell) -> Option<NaiveDateTime> {
    if date.is_blank() || time.is_blank() {
        return None;
    }
    let joined = format!("{} {}", date.as_text(), time.as_text());
    parse_timestamp(&joined)
}
