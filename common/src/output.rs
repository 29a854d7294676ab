//! Проекция совпадений в итоговую таблицу
//!
//! Какие колонки выводить и как их подписать, задаётся настройкой.
//! По умолчанию набор повторяет исторический лист «Совпадения».

use crate::types::MatchRecord;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Колонка результата
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputColumn {
    CallDate,
    CallTime,
    CallDateTime,
    VisitTime,
    VisitEnd,
    Region,
    Phone,
    /// |call - visit| в секундах
    Delta,
    /// Сквозная колонка Метрики
    Visit(String),
    /// Сквозная колонка звонков
    Call(String),
}

/// Колонка и её подпись
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumnSpec {
    pub column: OutputColumn,
    pub label: String,
}

impl OutputColumnSpec {
    pub fn new(column: OutputColumn, label: impl Into<String>) -> Self {
        Self { column, label: label.into() }
    }

    /// Набор по умолчанию
    pub fn default_set() -> Vec<Self> {
        vec![
            Self::new(OutputColumn::CallTime, "Call Time"),
            Self::new(OutputColumn::CallDate, "Call Date"),
            Self::new(OutputColumn::Region, "region"),
            Self::new(OutputColumn::VisitTime, "visit_time"),
        ]
    }
}

/// Значение ячейки результата
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    Empty,
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl std::fmt::Display for OutputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputValue::Empty => Ok(()),
            OutputValue::Text(s) => write!(f, "{}", s),
            OutputValue::Integer(n) => write!(f, "{}", n),
            OutputValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            OutputValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            OutputValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Итоговая таблица, готовая к записи в лист
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<OutputValue>>,
}

impl OutputTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn lookup_extra(extra: &[(String, String)], name: &str) -> OutputValue {
    extra
        .iter()
        .find(|(key, _)| key == name.trim())
        .map(|(_, value)| OutputValue::Text(value.clone()))
        .unwrap_or(OutputValue::Empty)
}

fn value_of(record: &MatchRecord, column: &OutputColumn) -> OutputValue {
    match column {
        OutputColumn::CallDate => OutputValue::Date(record.call_time.date()),
        OutputColumn::CallTime => OutputValue::Time(record.call_time.time()),
        OutputColumn::CallDateTime => OutputValue::DateTime(record.call_time),
        OutputColumn::VisitTime => OutputValue::DateTime(record.visit_time),
        OutputColumn::VisitEnd => OutputValue::DateTime(record.visit_end),
        OutputColumn::Region => OutputValue::Text(record.region.clone()),
        OutputColumn::Phone => record
            .phone
            .as_ref()
            .map(|p| OutputValue::Text(p.clone()))
            .unwrap_or(OutputValue::Empty),
        OutputColumn::Delta => OutputValue::Integer(record.delta_seconds()),
        OutputColumn::Visit(name) => lookup_extra(&record.visit_extra, name),
        OutputColumn::Call(name) => lookup_extra(&record.call_extra, name),
    }
}

/// Спроецировать совпадения в таблицу
pub fn project(matches: &[MatchRecord], specs: &[OutputColumnSpec]) -> OutputTable {
    let headers = specs.iter().map(|s| s.label.clone()).collect();
    let rows = matches
        .iter()
        .map(|record| specs.iter().map(|s| value_of(record, &s.column)).collect())
        .collect();
    OutputTable { headers, rows }
}
