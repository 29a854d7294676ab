//! Поиск строки заголовка и доступ к колонкам по имени
//!
//! Позиционный доступ используется только при поиске заголовка.
//! После этого все поля читаются по имени колонки.

use crate::error::{Error, Result, TableKind};
use crate::types::{row_is_blank, Cell};
use std::collections::HashMap;

/// Индекс «имя колонки → позиция»
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    table: TableKind,
    positions: HashMap<String, usize>,
    names: Vec<String>,
}

impl HeaderIndex {
    /// Построить индекс из строки заголовка (имена обрезаются, при повторе побеждает первое)
    pub fn from_row(table: TableKind, row: &[Cell]) -> Self {
        let mut positions = HashMap::new();
        let mut names = Vec::with_capacity(row.len());
        for (i, cell) in row.iter().enumerate() {
            let name = cell.as_text().trim().to_string();
            if !name.is_empty() {
                positions.entry(name.clone()).or_insert(i);
            }
            names.push(name);
        }
        Self { table, positions, names }
    }

    /// Позиция колонки, если она есть
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name.trim()).copied()
    }

    /// Позиция обязательной колонки
    pub fn require(&self, name: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| Error::ColumnMissing {
            table: self.table,
            column: name.trim().to_string(),
        })
    }

    /// Первая найденная колонка из списка написаний
    pub fn first_of<S: AsRef<str>>(&self, candidates: &[S]) -> Option<usize> {
        candidates.iter().find_map(|c| self.position(c.as_ref()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Имена колонок в исходном порядке
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Ячейка строки по позиции (короткая строка → пустая ячейка)
pub fn cell_at(row: &[Cell], index: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(index).unwrap_or(&EMPTY)
}

/// Найти строку заголовка Метрики: первая ячейка начинается с маркера
///
/// Возвращает индекс строки.
pub fn find_marker_row(rows: &[Vec<Cell>], marker: &str) -> Result<usize> {
    let needle = marker.trim().to_lowercase();
    rows.iter()
        .position(|row| {
            row.first()
                .map(|c| c.as_text().trim().to_lowercase().starts_with(&needle))
                .unwrap_or(false)
        })
        .ok_or_else(|| Error::HeaderNotFound { marker: marker.trim().to_string() })
}

/// Первая непустая строка (заголовок выгрузки звонков)
pub fn find_first_nonblank_row(rows: &[Vec<Cell>]) -> Option<usize> {
    rows.iter().position(|row| !row_is_blank(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawTable;

    #[test]
    fn test_header_index_trims_names() {
        let table = RawTable::from_text_rows(vec![vec![" Дата ", "Время", "  Город"]]);
        let index = HeaderIndex::from_row(TableKind::Calls, &table.rows[0]);
        assert_eq!(index.position("Дата"), Some(0));
        assert_eq!(index.position("Город"), Some(2));
        assert_eq!(index.position(" Время "), Some(1));
        assert_eq!(index.names(), &["Дата", "Время", "Город"]);
    }

    #[test]
    fn test_header_index_first_duplicate_wins() {
        let table = RawTable::from_text_rows(vec![vec!["Город", "Город"]]);
        let index = HeaderIndex::from_row(TableKind::Visits, &table.rows[0]);
        assert_eq!(index.position("Город"), Some(0));
    }

    #[test]
    fn test_require_missing_column() {
        let table = RawTable::from_text_rows(vec![vec!["Дата"]]);
        let index = HeaderIndex::from_row(TableKind::Calls, &table.rows[0]);
        let err = index.require("Время").unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnMissing { table: TableKind::Calls, ref column } if column == "Время"
        ));
    }

    #[test]
    fn test_first_of_respects_priority() {
        let table = RawTable::from_text_rows(vec![vec!["Номер телефона", "Телефон"]]);
        let index = HeaderIndex::from_row(TableKind::Calls, &table.rows[0]);
        assert_eq!(index.first_of(&["Телефон", "Номер телефона"]), Some(1));
        assert_eq!(index.first_of(&["Нет такой"]), None);
    }

    #[test]
    fn test_find_marker_row_skips_preamble() {
        let table = RawTable::from_text_rows(vec![
            vec!["Отчёт: посещаемость"],
            vec!["Период: 01.06.2025 - 07.06.2025"],
            vec![""],
            vec!["  ДАТА И ВРЕМЯ ВИЗИТА  ", "Город"],
            vec!["2025-06-02 10:00", "Москва"],
        ]);
        assert_eq!(find_marker_row(&table.rows, "Дата и время визита").unwrap(), 3);
    }

    #[test]
    fn test_find_marker_row_missing() {
        let table = RawTable::from_text_rows(vec![vec!["Дата", "Город"]]);
        let err = find_marker_row(&table.rows, "Дата и время визита").unwrap_err();
        assert!(matches!(err, Error::HeaderNotFound { .. }));
    }

    #[test]
    fn test_cell_at_out_of_range() {
        let row = vec![Cell::Text("a".into())];
        assert_eq!(cell_at(&row, 5), &Cell::Empty);
    }

    #[test]
    fn test_find_first_nonblank_row() {
        let table = RawTable::from_text_rows(vec![vec![""], vec!["Дата"]]);
        assert_eq!(find_first_nonblank_row(&table.rows), Some(1));
        assert_eq!(find_first_nonblank_row(&[]), None);
    }
}
