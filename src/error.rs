use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallMatchError {
    #[error(transparent)]
    Common(#[from] call_matcher_common::Error),

    #[error("Ошибка настроек: {0}")]
    Config(String),

    #[error("Файл не найден: {0}")]
    FileNotFound(String),

    #[error("Не удалось прочитать Excel: {0}")]
    XlsxRead(String),

    #[error("Ошибка записи Excel: {0}")]
    XlsxWrite(String),

    #[error("В книге нет листов: {0}")]
    EmptyWorkbook(String),

    #[error("Ошибка разбора JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Ошибка IO: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CallMatchError>;
