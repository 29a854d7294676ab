//! Типы данных ядра мэтчинга
//!
//! - Cell / RawTable: сырая таблица из выгрузки (позиционная, без заголовка)
//! - VisitRecord: визит из Метрики после нормализации
//! - CallRecord: звонок из коллтрекинга после нормализации
//! - MatchRecord: итоговая пара (звонок, визит)

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Дата, которой Excel обозначает «только время» (серийный номер < 1)
pub fn excel_epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Ячейка таблицы
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Ячейка пустая (или состоит только из пробелов)
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Текстовое представление ячейки для склейки «дата + время»
    ///
    /// Полночь выводится как дата, день-эпоха Excel как время.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => {
                if dt.date() == excel_epoch_date() {
                    dt.format("%H:%M:%S").to_string()
                } else if dt.time() == NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else if dt.nanosecond() == 0 {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()
                }
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from(value.as_str())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

/// Сырая таблица: строки как есть, без гарантированного заголовка
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Построить таблицу из текстовых строк (удобно для тестов и CSV-подобных данных)
    pub fn from_text_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| Cell::from(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// В таблице нет ни одной непустой строки
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| row_is_blank(row))
    }

    /// Максимальная ширина строки
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// Строка полностью пустая
pub fn row_is_blank(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

/// Визит (Метрика)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitRecord {
    /// Начало визита
    pub visit_time: NaiveDateTime,
    /// Конец окна: visit_time + окно
    pub visit_end: NaiveDateTime,
    /// Нормализованный регион
    pub region: String,
    /// Сквозные колонки (имя, значение) в порядке настройки
    pub extra: Vec<(String, String)>,
}

/// Звонок (коллтрекинг)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallRecord {
    pub call_time: NaiveDateTime,
    pub region: String,
    pub phone: Option<String>,
    pub extra: Vec<(String, String)>,
}

/// Итоговое совпадение звонка и визита
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchRecord {
    pub call_time: NaiveDateTime,
    pub visit_time: NaiveDateTime,
    pub visit_end: NaiveDateTime,
    pub region: String,
    pub phone: Option<String>,
    pub call_extra: Vec<(String, String)>,
    pub visit_extra: Vec<(String, String)>,
}

impl MatchRecord {
    pub fn from_pair(call: &CallRecord, visit: &VisitRecord) -> Self {
        Self {
            call_time: call.call_time,
            visit_time: visit.visit_time,
            visit_end: visit.visit_end,
            region: call.region.clone(),
            phone: call.phone.clone(),
            call_extra: call.extra.clone(),
            visit_extra: visit.extra.clone(),
        }
    }

    /// |call_time - visit_time| в секундах
    pub fn delta_seconds(&self) -> i64 {
        (self.call_time - self.visit_time).num_seconds().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_cell_as_text_date_only() {
        let cell = Cell::DateTime(dt("2025-06-02 00:00:00"));
        assert_eq!(cell.as_text(), "2025-06-02");
    }

    #[test]
    fn test_cell_as_text_time_only() {
        let cell = Cell::DateTime(dt("1899-12-30 10:30:00"));
        assert_eq!(cell.as_text(), "10:30:00");
    }

    #[test]
    fn test_cell_as_text_full_datetime() {
        let cell = Cell::DateTime(dt("2025-06-02 10:30:15"));
        assert_eq!(cell.as_text(), "2025-06-02 10:30:15");
    }

    #[test]
    fn test_cell_as_text_numbers() {
        assert_eq!(Cell::Number(42.0).as_text(), "42");
        assert_eq!(Cell::Number(0.5).as_text(), "0.5");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_blank_detection() {
        assert!(Cell::Text("   ".into()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert!(row_is_blank(&[Cell::Empty, Cell::Text(" ".into())]));

        let table = RawTable::from_text_rows(vec![vec!["", " "], vec![""]]);
        assert!(table.is_blank());
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_match_delta_is_absolute() {
        let record = MatchRecord {
            call_time: dt("2025-06-02 09:45:00"),
            visit_time: dt("2025-06-02 09:10:00"),
            visit_end: dt("2025-06-02 10:10:00"),
            region: "москва".into(),
            phone: None,
            call_extra: vec![],
            visit_extra: vec![],
        };
        assert_eq!(record.delta_seconds(), 35 * 60);
    }
}
