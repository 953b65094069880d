//! CLI probe for the record core.
//!
//! # Responsibility
//! - Verify `rangebook_core` linkage with a deterministic ping/version line.
//! - Drive one core operation against a data file for local sanity checks.
//!
//! Usage: `rangebook_cli [<data-file> list|add <n> <start> <end>|filter [start|-] [end|-]|delete <index>]`
//!
//! Set `RANGEBOOK_LOG_DIR` (absolute path) to write core logs there;
//! `RANGEBOOK_LOG_LEVEL` overrides the build-mode default level.

use rangebook_core::{
    default_log_level, format_timestamp, init_logging, DeleteOutcome, JsonFileRecordStore,
    LogLevel, Record, RecordService, StoreConfig,
};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "RANGEBOOK_LOG_DIR";
const LOG_LEVEL_ENV: &str = "RANGEBOOK_LOG_LEVEL";

fn main() -> ExitCode {
    println!("rangebook_core ping={}", rangebook_core::ping());
    println!("rangebook_core version={}", rangebook_core::core_version());

    if let Err(message) = start_logging_from_env() {
        eprintln!("warning: logging disabled: {message}");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((data_file, command)) = args.split_first() else {
        return ExitCode::SUCCESS;
    };

    let store = JsonFileRecordStore::new(&StoreConfig::new(data_file));
    let service = RecordService::new(store);

    match run(&service, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging_from_env() -> Result<(), String> {
    let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
        return Ok(());
    };
    let level = resolve_log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref())?;
    init_logging(level.as_str(), &log_dir)
}

/// Blank or missing input falls back to the build-mode default.
fn resolve_log_level(raw: Option<&str>) -> Result<LogLevel, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default_log_level()),
        Some(value) => LogLevel::parse(value),
    }
}

fn run(service: &RecordService<JsonFileRecordStore>, command: &[String]) -> Result<(), String> {
    let words: Vec<&str> = command.iter().map(String::as_str).collect();
    match words.as_slice() {
        [] | ["list"] => {
            let records = service.list_all().map_err(|err| err.to_string())?;
            print_records(&records);
        }
        ["add", number, start, end] => {
            let record = service
                .create(number, start, end)
                .map_err(|err| err.to_string())?;
            println!("added {}", describe(&record));
        }
        ["filter", bounds @ ..] if bounds.len() <= 2 => {
            let bound = |i: usize| bounds.get(i).copied().filter(|value| *value != "-");
            let view = service
                .list_filtered(bound(0), bound(1))
                .map_err(|err| err.to_string())?;
            println!(
                "matched {} of {} records",
                view.filtered_records.len(),
                view.records.len()
            );
            print_records(&view.filtered_records);
        }
        ["delete", index] => {
            let index: i64 = index
                .parse()
                .map_err(|_| format!("`{index}` is not an index"))?;
            match service.delete_at(index).map_err(|err| err.to_string())? {
                DeleteOutcome::Deleted(record) => println!("deleted {}", describe(&record)),
                DeleteOutcome::NoOp => println!("nothing at index {index}"),
            }
        }
        other => return Err(format!("unrecognized command: {}", other.join(" "))),
    }
    Ok(())
}

fn print_records(records: &[Record]) {
    for (index, record) in records.iter().enumerate() {
        println!("[{index}] {}", describe(record));
    }
}

fn describe(record: &Record) -> String {
    format!(
        "number={} start={} end={}",
        record.number(),
        format_timestamp(&record.start_date()),
        format_timestamp(&record.end_date())
    )
}

#[cfg(test)]
mod tests {
    use super::resolve_log_level;
    use rangebook_core::{default_log_level, LogLevel};

    #[test]
    fn resolve_log_level_defaults_when_unset_or_blank() {
        assert_eq!(resolve_log_level(None).unwrap(), default_log_level());
        assert_eq!(resolve_log_level(Some("  ")).unwrap(), default_log_level());
    }

    #[test]
    fn resolve_log_level_parses_explicit_level() {
        assert_eq!(resolve_log_level(Some("WARN")).unwrap(), LogLevel::Warn);
        assert!(resolve_log_level(Some("loud")).is_err());
    }
}
