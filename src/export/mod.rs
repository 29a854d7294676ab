pub mod excel;

use crate::cli::DEFAULT_OUTPUT;
use crate::config::SheetNames;
use crate::error::Result;
use call_matcher_common::{MatchOutcome, RawTable};
use std::path::{Path, PathBuf};

/// Папка или путь без расширения → файл .xlsx
pub fn output_path_for(output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(DEFAULT_OUTPUT)
    } else if output.extension().is_none() {
        output.with_extension("xlsx")
    } else {
        output.to_path_buf()
    }
}

pub fn export_report(
    outcome: &MatchOutcome,
    visits_raw: &RawTable,
    calls_raw: &RawTable,
    output: &Path,
    sheets: &SheetNames,
) -> Result<PathBuf> {
    let output_path = output_path_for(output);
    println!("- Создаём Excel...");
    excel::write_report(&output_path, outcome, visits_raw, calls_raw, sheets)?;
    println!("✔ Excel: {}", output_path.display());
    Ok(output_path)
}
