use directories::ProjectDirs;
use std::{
    env,
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_PATH_ENV: &str = "MUISTI_LOG";

/// Route `tracing` output to a log file; the terminal belongs to the TUI.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. When no log file can
/// be opened logging stays disabled.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
    }
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warnings.push(format!(
                    "Failed to create log dir {}: {e}",
                    parent.display()
                ));
                continue;
            }
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => warnings.push(format!(
                "Failed to open log file {}: {e}",
                candidate.display()
            )),
        }
    }

    (None, warnings)
}

/// Candidate log paths in order of preference
pub fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env::var_os(LOG_PATH_ENV).filter(|p| !p.is_empty()) {
        candidates.push(PathBuf::from(path));
    }

    if let Some(pd) = ProjectDirs::from("", "", "muisti") {
        candidates.push(pd.data_local_dir().join("muisti.log"));
    }

    candidates.push(PathBuf::from("muisti.log"));

    candidates
}
