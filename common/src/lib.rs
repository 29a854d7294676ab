//! Call Matcher Common Library
//!
//! Ядро мэтчинга звонков и визитов: нормализация региона, ингест выгрузок,
//! сопоставление с политиками разрешения, проекция результата.
//! Без файловой системы, сети и переменных окружения.

pub mod error;
pub mod ingest;
pub mod matcher;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod region;
pub mod table;
pub mod timestamp;
pub mod types;

pub use error::{Error, Result, TableKind};
pub use ingest::{ingest_calls, ingest_visits, IngestReport, Ingested};
pub use matcher::{match_records, Candidate, MatchPolicy};
pub use options::{CallColumns, MatchOptions, VisitColumns, DEFAULT_WINDOW_MINUTES, MAX_WINDOW_MINUTES};
pub use output::{project, OutputColumn, OutputColumnSpec, OutputTable, OutputValue};
pub use pipeline::{run, MatchOutcome};
pub use region::normalize_region;
pub use types::{CallRecord, Cell, MatchRecord, RawTable, VisitRecord};
