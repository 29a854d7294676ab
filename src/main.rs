use call_matcher::{cli, config, error, export, reader};
use call_matcher_common::{pipeline, IngestReport};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn print_report(name: &str, report: &IngestReport) {
    println!(
        "✔ {}: принято {} из {} строк (итоги: {}, отброшено: {})",
        name,
        report.accepted,
        report.rows_seen,
        report.skipped_total,
        report.rejected()
    );
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ Ошибка: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Match { visits, calls, output, policy, window, dry_run } => {
            let config = Config::load()?;
            println!("📞 call-matcher - мэтчинг звонков\n");

            let options = config.match_options(policy, window);

            // 1. Чтение выгрузок
            println!("[1/3] Читаем выгрузки...");
            let visits_raw = reader::read_table(&visits)?;
            let calls_raw = reader::read_table(&calls)?;
            println!("✔ Метрика: {} строк, звонки: {} строк\n", visits_raw.len(), calls_raw.len());

            // 2. Мэтчинг
            println!("[2/3] Сопоставляем (политика: {}, окно: {} мин)...", options.policy, options.window_minutes);
            let outcome = pipeline::run(&visits_raw, &calls_raw, &options)?;
            print_report("Метрика", &outcome.visit_report);
            print_report("Звонки", &outcome.call_report);

            if outcome.is_empty() {
                println!("⚠ Совпадений не найдено\n");
            } else {
                println!("✅ Найдено совпадений: {}\n", outcome.match_count());
            }

            // 3. Сохранение
            if dry_run {
                println!("[3/3] Пробный запуск, файл не записан");
            } else {
                println!("[3/3] Сохраняем результат...");
                export::export_report(&outcome, &visits_raw, &calls_raw, &output, &config.sheets)?;
            }

            println!("\n✅ Готово");
        }

        Commands::Config { show, set_policy, set_window, reset } => {
            // сброс не читает текущий файл
            let mut config = if reset {
                let config = Config::reset()?;
                println!("✔ Настройки сброшены");
                config
            } else {
                Config::load()?
            };

            if let Some(policy) = set_policy {
                config.set_policy(policy)?;
                println!("✔ Политика по умолчанию: {}", policy);
            }

            if let Some(minutes) = set_window {
                config.set_window(minutes)?;
                println!("✔ Окно по умолчанию: {} мин", minutes);
            }

            if show || !(reset || set_policy.is_some() || set_window.is_some()) {
                println!("Настройки ({}):", Config::config_path()?.display());
                println!("  Политика: {}", config.matching.policy);
                println!("  Окно: {} мин", config.matching.window_minutes);
                println!("  Заголовок Метрики: {}", config.matching.visit.header_marker);
                println!(
                    "  Листы: {} / {} / {}",
                    config.sheets.matches, config.sheets.visits, config.sheets.calls
                );
                println!("  Колонки результата:");
                for spec in &config.matching.output {
                    println!("    {:?} → {}", spec.column, spec.label);
                }
            }
        }
    }

    Ok(())
}
