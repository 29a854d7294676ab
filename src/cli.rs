use call_matcher_common::MatchPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Имя файла результата по умолчанию
pub const DEFAULT_OUTPUT: &str = "Результат_мэтчинга.xlsx";

#[derive(Parser)]
#[command(name = "call-matcher")]
#[command(about = "Мэтчинг звонков и визитов Метрики (окно 60 минут)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Подробный лог
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Сопоставить звонки с визитами и сохранить Excel
    Match {
        /// Выгрузка Метрики (xlsx)
        #[arg(long, required = true)]
        visits: PathBuf,

        /// Выгрузка звонков (xlsx)
        #[arg(long, required = true)]
        calls: PathBuf,

        /// Итоговый файл
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Политика (first-per-call/nearest-per-visit/no-dedup)
        #[arg(short, long)]
        policy: Option<MatchPolicy>,

        /// Окно после начала визита, минут
        #[arg(short, long)]
        window: Option<i64>,

        /// Только посчитать совпадения, файл не писать
        #[arg(long)]
        dry_run: bool,
    },

    /// Показать/изменить настройки
    Config {
        /// Показать настройки
        #[arg(long)]
        show: bool,

        /// Политика по умолчанию
        #[arg(long)]
        set_policy: Option<MatchPolicy>,

        /// Окно по умолчанию, минут
        #[arg(long)]
        set_window: Option<i64>,

        /// Сбросить настройки
        #[arg(long)]
        reset: bool,
    },
}
