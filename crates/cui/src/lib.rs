mod actions;
mod app;
mod input;
mod view;

pub use app::App;

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tenzies_session::{
    default_log_path, init_tracing, parse_seed, resolve_seed, JsonlRecorder, LogTarget, Session,
    TenziesConfig,
};

const SHUTDOWN_SAVE_WAIT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub records_path: Option<PathBuf>,
}

/// Starts the terminal UI. The caller is expected to have installed tracing.
pub fn run(config: TenziesConfig, options: LaunchOptions) -> Result<()> {
    let seed = resolve_seed(options.seed.or(config.seed));
    let records_path = options.records_path.unwrap_or(config.records_path);
    tracing::info!(seed, records = %records_path.display(), "starting terminal ui");
    let recorder = Arc::new(JsonlRecorder::new(records_path));
    let mut app = App::bootstrap(Session::with_seed(seed, recorder));

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    app.shutdown(SHUTDOWN_SAVE_WAIT);
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let config = TenziesConfig::load().context("load config")?;
    let log_path = config.log_path.clone().unwrap_or_else(default_log_path);
    init_tracing(LogTarget::File(&log_path), &config.log_filter)
        .with_context(|| format!("open log file {}", log_path.display()))?;
    let options = parse_options(args)?;
    run(config, options)
}

fn parse_options(args: &[String]) -> Result<LaunchOptions> {
    let mut options = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = Some(parse_seed(value)?);
                    idx += 1;
                }
            }
            "--records" => {
                if let Some(value) = args.get(idx + 1) {
                    options.records_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    Ok(options)
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(120);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        }
        app.on_tick();
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "tenzies-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}

#[cfg(test)]
mod tests {
    use super::parse_options;
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_seed_and_records() {
        let options =
            parse_options(&args(&["--seed", "0x2a", "--records", "out.jsonl"])).expect("options");
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.records_path, Some(PathBuf::from("out.jsonl")));
    }

    #[test]
    fn bad_seed_is_an_error() {
        assert!(parse_options(&args(&["--seed", "many"])).is_err());
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let options = parse_options(&args(&["--cui", "--verbose"])).expect("options");
        assert_eq!(options.seed, None);
        assert_eq!(options.records_path, None);
    }
}
