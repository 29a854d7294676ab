//! Настройки ингеста и мэтчинга
//!
//! Все параметры передаются явно; ядро не читает глобального состояния.

use crate::error::{Error, Result};
use crate::matcher::MatchPolicy;
use crate::output::OutputColumnSpec;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Окно по умолчанию, минут
pub const DEFAULT_WINDOW_MINUTES: i64 = 60;

/// Верхняя граница окна: одни сутки
pub const MAX_WINDOW_MINUTES: i64 = 24 * 60;

/// Колонки выгрузки Метрики
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitColumns {
    /// Начало первой ячейки строки заголовка (сравнение без регистра)
    pub header_marker: String,
    pub visit_time: String,
    pub region: String,
    /// Строки-итоги: первая ячейка содержит эту подстроку
    pub total_marker: String,
    /// Дополнительные колонки, переносимые в результат
    pub passthrough: Vec<String>,
}

impl Default for VisitColumns {
    fn default() -> Self {
        Self {
            header_marker: "Дата и время визита".into(),
            visit_time: "Дата и время визита".into(),
            region: "Город".into(),
            total_marker: "итого".into(),
            passthrough: Vec::new(),
        }
    }
}

/// Колонки выгрузки звонков
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallColumns {
    pub date: String,
    pub time: String,
    /// Одна колонка с датой и временем (если раздельных нет)
    pub datetime: String,
    pub region: String,
    /// Допустимые написания колонки телефона, по приоритету
    pub phone: Vec<String>,
    pub passthrough: Vec<String>,
}

impl Default for CallColumns {
    fn default() -> Self {
        Self {
            date: "Дата".into(),
            time: "Время".into(),
            datetime: "Дата и время".into(),
            region: "Город".into(),
            phone: vec!["Телефон".into(), "Номер телефона".into()],
            passthrough: Vec::new(),
        }
    }
}

/// Полный набор параметров одного запуска
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Окно после начала визита, минут
    pub window_minutes: i64,
    pub policy: MatchPolicy,
    pub visit: VisitColumns,
    pub call: CallColumns,
    pub output: Vec<OutputColumnSpec>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            policy: MatchPolicy::default(),
            visit: VisitColumns::default(),
            call: CallColumns::default(),
            output: OutputColumnSpec::default_set(),
        }
    }
}

impl MatchOptions {
    /// Окно как Duration, с проверкой границ
    pub fn window(&self) -> Result<Duration> {
        if self.window_minutes <= 0 {
            return Err(Error::Config(format!(
                "окно должно быть больше нуля минут: {}",
                self.window_minutes
            )));
        }
        if self.window_minutes > MAX_WINDOW_MINUTES {
            return Err(Error::Config(format!(
                "окно больше {} минут: {}",
                MAX_WINDOW_MINUTES, self.window_minutes
            )));
        }
        Duration::try_minutes(self.window_minutes)
            .ok_or_else(|| Error::Config(format!("недопустимое окно: {} мин", self.window_minutes)))
    }

    /// Проверка параметров перед запуском
    pub fn validate(&self) -> Result<()> {
        self.window()?;
        if self.visit.header_marker.trim().is_empty() {
            return Err(Error::Config("пустой маркер заголовка Метрики".into()));
        }
        if self.output.is_empty() {
            return Err(Error::Config("не выбрано ни одной колонки результата".into()));
        }
        Ok(())
    }

    /// Прочитать из JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        Ok(options)
    }
}
