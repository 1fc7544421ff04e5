use std::fs;
use std::path::Path;

use anyhow::Result;
use colored::{ColoredString, Colorize};

/// Maps a level name to a filter; unknown names mean `info`.
pub fn parse_level(log_level: &str) -> log::LevelFilter {
    match log_level.trim().to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    }
}

fn colored_level(level: log::Level) -> ColoredString {
    let tag = level.to_string();
    match level {
        log::Level::Error => tag.bright_red(),
        log::Level::Warn => tag.bright_yellow(),
        log::Level::Info => tag.bright_green(),
        log::Level::Debug => tag.bright_white(),
        log::Level::Trace => tag.bright_cyan(),
    }
}

/// Installs the global logger: colored lines on stderr, plain lines in
/// `{log_dir}/{app_name}_{timestamp}.log`.
///
/// # Errors
/// Fails when the directory or file cannot be created, or a logger is
/// already installed.
pub fn setup_logging(log_dir: &Path, app_name: &str, log_level: &str) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    // Only the newest log survives a restart.
    cleanup_old_logs(log_dir)?;

    let log_file_name = format!("{}_{}.log", app_name, chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let log_path = log_dir.join(log_file_name);
    let level = parse_level(log_level);

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]").to_string().as_str().truecolor(128, 128, 128),
                record.target().truecolor(128, 128, 128),
                colored_level(record.level()),
                message
            ))
        })
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(fern::log_file(log_path)?);

    fern::Dispatch::new().level(level).chain(console).chain(file).apply()?;

    Ok(())
}

fn cleanup_old_logs(log_dir: &Path) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|res| res.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "log"))
        .filter_map(|e| {
            let modified = e.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, e.path()))
        })
        .collect();

    // Newest first
    entries.sort_by_key(|(modified, _)| std::cmp::Reverse(*modified));

    for (_, path) in entries.iter().skip(1) {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("Failed to delete old log file {:?}: {}", path, e);
        }
    }

    Ok(())
}
