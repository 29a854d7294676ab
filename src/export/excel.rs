//! Запись итоговой книги (rust_xlsxwriter)
//!
//! Листы: совпадения (с заголовком), сырая Метрика (как есть), сырые звонки (как есть).

use crate::config::SheetNames;
use crate::error::{CallMatchError, Result};
use call_matcher_common::types::excel_epoch_date;
use call_matcher_common::{Cell, MatchOutcome, OutputTable, OutputValue, RawTable};
use chrono::{NaiveDateTime, NaiveTime};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

/// Ширина колонок листа совпадений
const MATCH_COL_WIDTH: f64 = 20.0;

fn xlsx_err(e: XlsxError) -> CallMatchError {
    CallMatchError::XlsxWrite(e.to_string())
}

/// Форматы ячеек
struct Formats {
    header: Format,
    datetime: Format,
    date: Format,
    time: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            time: Format::new().set_num_format("hh:mm:ss"),
        }
    }
}

/// Записать книгу в файл
pub fn write_report(
    output_path: &Path,
    outcome: &MatchOutcome,
    visits_raw: &RawTable,
    calls_raw: &RawTable,
    sheets: &SheetNames,
) -> Result<()> {
    let buffer = build_report(outcome, visits_raw, calls_raw, sheets)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}

/// Собрать книгу в буфер
pub fn build_report(
    outcome: &MatchOutcome,
    visits_raw: &RawTable,
    calls_raw: &RawTable,
    sheets: &SheetNames,
) -> Result<Vec<u8>> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheets.matches).map_err(xlsx_err)?;
    write_output_table(worksheet, &outcome.table, &formats)?;

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheets.visits).map_err(xlsx_err)?;
    write_raw_table(worksheet, visits_raw, &formats)?;

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheets.calls).map_err(xlsx_err)?;
    write_raw_table(worksheet, calls_raw, &formats)?;

    workbook.save_to_buffer().map_err(xlsx_err)
}

fn write_output_table(worksheet: &mut Worksheet, table: &OutputTable, formats: &Formats) -> Result<()> {
    for (col, header) in table.headers.iter().enumerate() {
        let col = column_index(col)?;
        worksheet
            .write_string_with_format(0, col, header, &formats.header)
            .map_err(xlsx_err)?;

        // оформление необязательно: ошибка не прерывает запись
        if let Err(e) = worksheet.set_column_width(col, MATCH_COL_WIDTH) {
            log::warn!("Не удалось задать ширину колонки {}: {}", col, e);
        }
    }

    for (i, values) in table.rows.iter().enumerate() {
        let row = row_index(i + 1)?;
        for (col, value) in values.iter().enumerate() {
            write_output_value(worksheet, row, column_index(col)?, value, formats)?;
        }
    }

    Ok(())
}

fn write_output_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &OutputValue,
    formats: &Formats,
) -> Result<()> {
    let written = match value {
        OutputValue::Empty => return Ok(()),
        OutputValue::Text(s) => worksheet.write_string(row, col, s),
        OutputValue::Integer(n) => worksheet.write_number(row, col, *n as f64),
        OutputValue::Date(d) => worksheet.write_datetime_with_format(row, col, d, &formats.date),
        OutputValue::Time(t) => worksheet.write_datetime_with_format(row, col, t, &formats.time),
        OutputValue::DateTime(dt) => {
            worksheet.write_datetime_with_format(row, col, dt, &formats.datetime)
        }
    };
    written.map_err(xlsx_err)?;
    Ok(())
}

/// Сырая таблица как есть, без заголовка
fn write_raw_table(worksheet: &mut Worksheet, table: &RawTable, formats: &Formats) -> Result<()> {
    for (i, cells) in table.rows.iter().enumerate() {
        let row = row_index(i)?;
        for (col, cell) in cells.iter().enumerate() {
            write_raw_cell(worksheet, row, column_index(col)?, cell, formats)?;
        }
    }
    Ok(())
}

fn write_raw_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &Formats,
) -> Result<()> {
    let written = match cell {
        Cell::Empty => return Ok(()),
        Cell::Text(s) => worksheet.write_string(row, col, s),
        Cell::Number(n) => worksheet.write_number(row, col, *n),
        Cell::Bool(b) => worksheet.write_boolean(row, col, *b),
        Cell::DateTime(dt) => write_raw_datetime(worksheet, row, col, dt, formats),
    };
    written.map_err(xlsx_err)?;
    Ok(())
}

fn write_raw_datetime<'a>(
    worksheet: &'a mut Worksheet,
    row: u32,
    col: u16,
    dt: &NaiveDateTime,
    formats: &Formats,
) -> std::result::Result<&'a mut Worksheet, XlsxError> {
    if dt.date() == excel_epoch_date() {
        worksheet.write_datetime_with_format(row, col, &dt.time(), &formats.time)
    } else if dt.time() == NaiveTime::MIN {
        worksheet.write_datetime_with_format(row, col, &dt.date(), &formats.date)
    } else {
        worksheet.write_datetime_with_format(row, col, dt, &formats.datetime)
    }
}

fn row_index(i: usize) -> Result<u32> {
    u32::try_from(i).map_err(|_| CallMatchError::XlsxWrite(format!("слишком много строк: {}", i)))
}

fn column_index(i: usize) -> Result<u16> {
    u16::try_from(i).map_err(|_| CallMatchError::XlsxWrite(format!("слишком много колонок: {}", i)))
}
