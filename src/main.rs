use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    panic,
    path::PathBuf,
    time::Instant,
};

use muisti::{
    app::App,
    config::{Config, ConfigError, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    ui,
};

/// memorize flashed number sequences and type them back
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal memory game: a handful of short number sequences flash by one at a time, then you type back everything you remember and see how many sets you got right."
)]
pub struct Cli {
    /// number of sequences to memorize
    #[clap(short = 'n', long)]
    sequences: Option<usize>,

    /// digits per sequence, fixed for the whole session
    #[clap(short = 'd', long)]
    digits: Option<usize>,

    /// seconds each sequence stays on screen
    #[clap(short = 's', long)]
    secs_per_flash: Option<f64>,

    /// JSON file with default settings (defaults to the user config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// seed for reproducible sequences
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Config file values with CLI flags layered on top
    fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => FileConfigStore::with_path(path).load()?,
            None => {
                let store = FileConfigStore::new();
                store.load().unwrap_or_else(|e| {
                    tracing::warn!("ignoring {}: {e}", store.path().display());
                    Config::default()
                })
            }
        };

        if let Some(n) = self.sequences {
            config.sequence_count = n;
        }
        if let Some(d) = self.digits {
            config.digits_per_sequence = d;
        }
        if let Some(s) = self.secs_per_flash {
            config.secs_per_flash = s;
        }

        // reject bad values before the terminal is taken over
        config.session()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, e).exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    tracing::info!(?config, seed = ?cli.seed, "starting");

    install_panic_hook();
    enable_raw_mode()?;

    let mut app = App::new(&config, cli.seed);
    let result = run_in_alternate_screen(&mut app);

    restore_terminal()?;

    if let Err(e) = &result {
        tracing::error!("exited with error: {e}");
    }
    result
}

/// Leave raw mode and the alternate screen so the shell is usable again
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)
}

/// Restore the terminal before the default hook prints the panic message
fn install_panic_hook() {
    let original = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Err(e) = restore_terminal() {
            eprintln!("failed to restore terminal: {e}");
        }
        tracing::error!("panicked: {info}");
        original(info);
    }));
}

fn run_in_alternate_screen(app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    start_tui(&mut terminal, app)
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit {
        let event = runner.step();
        if app.handle_event(event, Instant::now()) {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["muisti"]);

        assert_eq!(cli.sequences, None);
        assert_eq!(cli.digits, None);
        assert_eq!(cli.secs_per_flash, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["muisti", "-n", "3", "-d", "4", "-s", "0.5", "--seed", "9"]);
        assert_eq!(cli.sequences, Some(3));
        assert_eq!(cli.digits, Some(4));
        assert_eq!(cli.secs_per_flash, Some(0.5));
        assert_eq!(cli.seed, Some(9));

        let cli = Cli::parse_from(["muisti", "--sequences", "7", "--secs-per-flash", "1"]);
        assert_eq!(cli.sequences, Some(7));
        assert_eq!(cli.secs_per_flash, Some(1.0));
    }

    #[test]
    fn test_cli_rejects_non_numeric() {
        assert!(Cli::try_parse_from(["muisti", "-n", "many"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "sequence_count": 8, "digits_per_sequence": 3, "secs_per_flash": 1.5 }"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "muisti",
            "-c",
            path.to_str().unwrap(),
            "-n",
            "4",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.sequence_count, 4);
        assert_eq!(config.digits_per_sequence, 3);
        assert_eq!(config.secs_per_flash, 1.5);
    }

    #[test]
    fn test_missing_explicit_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let cli = Cli::parse_from(["muisti", "-c", path.to_str().unwrap()]);

        assert_eq!(cli.resolve_config().unwrap(), Config::default());
    }

    #[test]
    fn test_broken_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{").unwrap();
        let cli = Cli::parse_from(["muisti", "-c", path.to_str().unwrap()]);

        assert_matches!(cli.resolve_config(), Err(ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_flag_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let cli = Cli::parse_from(["muisti", "-c", path.to_str().unwrap(), "-n", "0"]);

        assert_matches!(cli.resolve_config(), Err(ConfigError::ZeroSequences));
    }

    #[test]
    fn test_restore_without_raw_mode_is_harmless() {
        assert!(restore_terminal().is_ok());
    }

    #[test]
    fn test_panic_hook_chains_to_previous_hook() {
        install_panic_hook();
        let result = panic::catch_unwind(|| panic!("boom"));
        drop(panic::take_hook());

        assert!(result.is_err());
    }
}
