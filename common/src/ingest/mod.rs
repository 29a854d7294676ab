//! Ингест выгрузок
//!
//! ## Поток
//! 1. Найти строку заголовка (позиционно)
//! 2. Дальше читать колонки только по имени
//! 3. Отбросить строки без даты или региона (это шум, не ошибка)
//!
//! Ошибки структуры (HeaderNotFound, ColumnMissing) возвращаются вызывающему.

pub mod calls;
pub mod visits;

pub use calls::{ingest_calls, ingest_calls_report, CallTimeLayout};
pub use visits::{ingest_visits, ingest_visits_report};

use crate::error::Result;
use crate::table::{cell_at, HeaderIndex};
use crate::types::Cell;

/// Статистика ингеста одной таблицы
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Непустые строки данных после заголовка
    pub rows_seen: usize,
    /// Пропущенные строки-итоги
    pub skipped_total: usize,
    /// Дата/время не разобраны
    pub rejected_timestamp: usize,
    /// Регион пустой после нормализации
    pub rejected_region: usize,
    /// Принятые записи
    pub accepted: usize,
}

impl IngestReport {
    pub fn rejected(&self) -> usize {
        self.rejected_timestamp + self.rejected_region
    }
}

/// Записи и статистика
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub report: IngestReport,
}

impl<T> Default for Ingested<T> {
    fn default() -> Self {
        Self { records: Vec::new(), report: IngestReport::default() }
    }
}

/// Сквозные колонки: (имя, позиция)
pub(crate) fn resolve_passthrough(
    index: &HeaderIndex,
    names: &[String],
) -> Result<Vec<(String, usize)>> {
    names
        .iter()
        .map(|name| Ok((name.trim().to_string(), index.require(name)?)))
        .collect()
}

/// Значения сквозных колонок строки
pub(crate) fn read_passthrough(row: &[Cell], columns: &[(String, usize)]) -> Vec<(String, String)> {
    columns
        .iter()
        .map(|(name, pos)| (name.clone(), cell_at(row, *pos).as_text().trim().to_string()))
        .collect()
}
