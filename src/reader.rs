//! Чтение выгрузок Excel (calamine)
//!
//! Берётся первый лист книги. Позиции ячеек выравниваются так, чтобы строка 0 и
//! колонка 0 соответствовали A1, даже если calamine отдал диапазон со сдвигом.

use crate::error::{CallMatchError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use call_matcher_common::timestamp::{excel_serial_to_datetime, parse_timestamp};
use call_matcher_common::{Cell, RawTable};
use std::path::Path;

/// Прочитать первый лист книги как сырую таблицу
pub fn read_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(CallMatchError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CallMatchError::XlsxRead(format!("{}: {}", path.display(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CallMatchError::EmptyWorkbook(path.display().to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| CallMatchError::XlsxRead(format!("{} / {}: {}", path.display(), sheet_name, e)))?;

    let table = range_to_table(&range);
    log::debug!(
        "{}: лист «{}», строк: {}, колонок: {}",
        path.display(),
        sheet_name,
        table.len(),
        table.width()
    );
    Ok(table)
}

/// Диапазон calamine → RawTable с началом в A1
pub fn range_to_table(range: &Range<Data>) -> RawTable {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    RawTable::new(rows)
}

/// Ячейка calamine → Cell
pub fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_datetime(serial)
                .map(Cell::DateTime)
                .unwrap_or(Cell::Number(serial))
        }
        Data::DateTimeIso(s) => parse_timestamp(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::from(s.as_str())),
        Data::DurationIso(s) => Cell::from(s.as_str()),
    }
}
