//! Ингест выгрузки Метрики (визиты)

use super::{read_passthrough, resolve_passthrough, IngestReport, Ingested};
use crate::error::{Result, TableKind};
use crate::options::VisitColumns;
use crate::region::normalize_region_cell;
use crate::table::{cell_at, find_marker_row, HeaderIndex};
use crate::timestamp::cell_timestamp;
use crate::types::{row_is_blank, RawTable, VisitRecord};
use chrono::Duration;

/// Визиты из сырой таблицы Метрики
pub fn ingest_visits(
    table: &RawTable,
    columns: &VisitColumns,
    window: Duration,
) -> Result<Vec<VisitRecord>> {
    ingest_visits_report(table, columns, window).map(|ingested| ingested.records)
}

/// Визиты и статистика отброшенных строк
///
/// Строки выше заголовка (шапка отчёта) игнорируются. Порядок строк сохраняется.
pub fn ingest_visits_report(
    table: &RawTable,
    columns: &VisitColumns,
    window: Duration,
) -> Result<Ingested<VisitRecord>> {
    if table.is_blank() {
        return Ok(Ingested::default());
    }

    let header_row = find_marker_row(&table.rows, &columns.header_marker)?;
    let index = HeaderIndex::from_row(TableKind::Visits, &table.rows[header_row]);
    let time_col = index.require(&columns.visit_time)?;
    let region_col = index.require(&columns.region)?;
    let passthrough = resolve_passthrough(&index, &columns.passthrough)?;
    let total_marker = columns.total_marker.trim().to_lowercase();

    let mut report = IngestReport::default();
    let mut records = Vec::new();

    for (offset, row) in table.rows[header_row + 1..].iter().enumerate() {
        let row_no = header_row + offset + 2;
        if row_is_blank(row) {
            continue;
        }
        report.rows_seen += 1;

        // строки-итоги определяются по первой ячейке
        if !total_marker.is_empty()
            && cell_at(row, 0).as_text().to_lowercase().contains(&total_marker)
        {
            report.skipped_total += 1;
            continue;
        }

        let Some(visit_time) = cell_timestamp(cell_at(row, time_col)) else {
            log::debug!(
                "Метрика, строка {}: дата визита не разобрана: {:?}",
                row_no,
                cell_at(row, time_col)
            );
            report.rejected_timestamp += 1;
            continue;
        };

        let region = normalize_region_cell(cell_at(row, region_col));
        if region.is_empty() {
            log::debug!("Метрика, строка {}: пустой регион", row_no);
            report.rejected_region += 1;
            continue;
        }

        let Some(visit_end) = visit_time.checked_add_signed(window) else {
            log::debug!("Метрика, строка {}: конец окна вне диапазона дат", row_no);
            report.rejected_timestamp += 1;
            continue;
        };

        records.push(VisitRecord {
            visit_time,
            visit_end,
            region,
            extra: read_passthrough(row, &passthrough),
        });
    }

    report.accepted = records.len();
    log::info!(
        "Метрика: принято {} из {} строк (итоги: {}, без даты: {}, без региона: {})",
        report.accepted,
        report.rows_seen,
        report.skipped_total,
        report.rejected_timestamp,
        report.rejected_region
    );

    Ok(Ingested { records, report })
}
