//! Типы ошибок ядра
//!
//! Ошибки структуры (нет заголовка, нет колонки) поднимаются наверх.
//! Плохие строки (дата не парсится, пустой регион) ошибкой не являются и просто отбрасываются.

use thiserror::Error;

/// Какая таблица
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Visits,
    Calls,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Visits => write!(f, "Метрика"),
            TableKind::Calls => write!(f, "Звонки"),
        }
    }
}

/// Ошибка ядра
#[derive(Error, Debug)]
pub enum Error {
    #[error("Не найдена строка заголовка, начинающаяся с «{marker}»")]
    HeaderNotFound { marker: String },

    #[error("В таблице «{table}» нет колонки «{column}»")]
    ColumnMissing { table: TableKind, column: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Псевдоним Result
pub type Result<T> = std::result::Result<T, Error>;
