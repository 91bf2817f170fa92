//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `habit_core` linkage.
//! - Optionally print a read-only summary of habits stored in a database.
//!   A missing database file is an error; the CLI never creates one.
//!
//! # Usage
//! `habit_cli [DB_PATH]`. Set `HABIT_LOG_DIR` (absolute path) and optionally
//! `HABIT_LOG_LEVEL` to enable file logging.

use habit_core::db::open_existing_db;
use habit_core::{
    default_log_level, init_logging, HabitOverview, HabitService, SqliteHabitRepository,
    SystemClock,
};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("habit_core ping={}", habit_core::ping());
    println!("habit_core version={}", habit_core::core_version());

    if let Ok(log_dir) = std::env::var("HABIT_LOG_DIR") {
        let level = std::env::var("HABIT_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().as_str().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_overviews(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_summary module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn print_overviews(db_path: &str) -> Result<(), String> {
    let conn = open_existing_db(db_path)
        .map_err(|err| format!("cannot open database `{db_path}`: {err}"))?;
    let repo = SqliteHabitRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = HabitService::new(repo, SystemClock);

    let overviews = service.overviews().map_err(|err| err.to_string())?;
    println!("today={} habits={}", service.today(), overviews.len());
    for overview in &overviews {
        println!("{}", format_overview(overview));
    }
    Ok(())
}

fn format_overview(overview: &HabitOverview) -> String {
    let today = if overview.today_successful {
        "ok"
    } else {
        "missed"
    };
    let week = match overview.week_successful {
        Some(true) => "done",
        Some(false) => "open",
        None => "-",
    };
    format!(
        "{} kind={} streak={} today={today} week={week}",
        overview.id, overview.kind, overview.current_streak
    )
}
