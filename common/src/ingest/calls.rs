//! Ингест выгрузки звонков

use super::{read_passthrough, resolve_passthrough, IngestReport, Ingested};
use crate::error::{Error, Result, TableKind};
use crate::options::CallColumns;
use crate::region::normalize_region_cell;
use crate::table::{cell_at, find_first_nonblank_row, HeaderIndex};
use crate::timestamp::{cell_timestamp, combine_date_time};
use crate::types::{row_is_blank, CallRecord, Cell, RawTable};
use chrono::NaiveDateTime;

/// Где в выгрузке лежит время звонка
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTimeLayout {
    /// Отдельные колонки даты и времени
    Split { date: usize, time: usize },
    /// Одна колонка с датой и временем
    Combined { datetime: usize },
}

impl CallTimeLayout {
    /// Определить раскладку по заголовку
    ///
    /// Раздельные колонки приоритетнее общей.
    pub fn resolve(index: &HeaderIndex, columns: &CallColumns) -> Result<Self> {
        match (index.position(&columns.date), index.position(&columns.time)) {
            (Some(date), Some(time)) => Ok(Self::Split { date, time }),
            (date, _) => {
                if let Some(datetime) = index.position(&columns.datetime) {
                    return Ok(Self::Combined { datetime });
                }
                let missing = if date.is_none() { &columns.date } else { &columns.time };
                Err(Error::ColumnMissing {
                    table: TableKind::Calls,
                    column: missing.trim().to_string(),
                })
            }
        }
    }

    fn timestamp(&self, row: &[Cell]) -> Option<NaiveDateTime> {
        match *self {
            Self::Split { date, time } => combine_date_time(cell_at(row, date), cell_at(row, time)),
            Self::Combined { datetime } => cell_timestamp(cell_at(row, datetime)),
        }
    }
}

/// Звонки из сырой таблицы
pub fn ingest_calls(table: &RawTable, columns: &CallColumns) -> Result<Vec<CallRecord>> {
    ingest_calls_report(table, columns).map(|ingested| ingested.records)
}

/// Звонки и статистика отброшенных строк
///
/// Заголовок выгрузки звонков лежит в первой непустой строке. Порядок строк сохраняется.
pub fn ingest_calls_report(table: &RawTable, columns: &CallColumns) -> Result<Ingested<CallRecord>> {
    let Some(header_row) = find_first_nonblank_row(&table.rows) else {
        return Ok(Ingested::default());
    };

    let index = HeaderIndex::from_row(TableKind::Calls, &table.rows[header_row]);
    let layout = CallTimeLayout::resolve(&index, columns)?;
    let region_col = index.require(&columns.region)?;
    let phone_col = index.first_of(columns.phone.as_slice());
    let passthrough = resolve_passthrough(&index, &columns.passthrough)?;

    if phone_col.is_none() {
        log::debug!("Звонки: колонка телефона не найдена, телефон не выводится");
    }

    let mut report = IngestReport::default();
    let mut records = Vec::new();

    for (offset, row) in table.rows[header_row + 1..].iter().enumerate() {
        let row_no = header_row + offset + 2;
        if row_is_blank(row) {
            continue;
        }
        report.rows_seen += 1;

        let Some(call_time) = layout.timestamp(row) else {
            log::debug!("Звонки, строка {}: дата/время звонка не разобраны", row_no);
            report.rejected_timestamp += 1;
            continue;
        };

        let region = normalize_region_cell(cell_at(row, region_col));
        if region.is_empty() {
            log::debug!("Звонки, строка {}: пустой регион", row_no);
            report.rejected_region += 1;
            continue;
        }

        let phone = phone_col
            .map(|col| cell_at(row, col).as_text().trim().to_string())
            .filter(|p| !p.is_empty());

        records.push(CallRecord {
            call_time,
            region,
            phone,
            extra: read_passthrough(row, &passthrough),
        });
    }

    report.accepted = records.len();
    log::info!(
        "Звонки: принято {} из {} строк (без даты: {}, без региона: {})",
        report.accepted,
        report.rows_seen,
        report.rejected_timestamp,
        report.rejected_region
    );

    Ok(Ingested { records, report })
}
