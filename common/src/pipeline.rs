//! Полный прогон: ингест обеих таблиц → мэтчинг → проекция
//!
//! Чистая функция от двух таблиц и настроек, без файлов и сети.

use crate::error::Result;
use crate::ingest::{ingest_calls_report, ingest_visits_report, IngestReport};
use crate::matcher::match_records;
use crate::options::MatchOptions;
use crate::output::{project, OutputTable};
use crate::types::{CallRecord, MatchRecord, RawTable, VisitRecord};

/// Результат одного прогона
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub visits: Vec<VisitRecord>,
    pub calls: Vec<CallRecord>,
    pub matches: Vec<MatchRecord>,
    pub table: OutputTable,
    pub visit_report: IngestReport,
    pub call_report: IngestReport,
}

impl MatchOutcome {
    /// Число совпадений для отображения
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Выполнить мэтчинг двух сырых таблиц
pub fn run(visits_raw: &RawTable, calls_raw: &RawTable, options: &MatchOptions) -> Result<MatchOutcome> {
    options.validate()?;

    let visits = ingest_visits_report(visits_raw, &options.visit, options.window()?)?;
    let calls = ingest_calls_report(calls_raw, &options.call)?;

    let matches = match_records(&calls.records, &visits.records, options.policy);
    let table = project(&matches, &options.output);
    log::info!(
        "Мэтчинг ({}; окно {} мин): {} совпадений",
        options.policy,
        options.window_minutes,
        matches.len()
    );

    Ok(MatchOutcome {
        visits: visits.records,
        calls: calls.records,
        matches,
        table,
        visit_report: visits.report,
        call_report: calls.report,
    })
}
