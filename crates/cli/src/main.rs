use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tenzies_autoplay::{run_autoplay, AutoplayConfig};
use tenzies_core::{GameState, RollOutcome};
use tenzies_session::{
    init_tracing, load_records, parse_seed, resolve_seed, JsonlRecorder, LogTarget,
    MemoryRecorder, ResultRecorder, Session, TenziesConfig,
};

const EXIT_SAVE_WAIT: Duration = Duration::from_secs(2);
const RECENT_RECORDS: usize = 10;

#[derive(Debug, Clone, Default)]
struct CliOptions {
    cui: bool,
    auto: bool,
    seed: Option<u64>,
    records_path: Option<PathBuf>,
    games: Option<u32>,
    max_rolls: Option<u32>,
    trace: bool,
    json_out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Roll,
    Hold(Vec<usize>),
    NewGame,
    Show,
    Records,
    Help,
    Quit,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_cli_options(&args).and_then(|options| {
        if options.cui {
            tenzies_cui::run_with_args(&args)
        } else {
            run(options)
        }
    });
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> Result<()> {
    let config = TenziesConfig::load().context("load config")?;
    init_tracing(LogTarget::Stderr, &config.log_filter).context("init tracing")?;
    if options.auto {
        return run_auto(&options, &config);
    }
    let seed = resolve_seed(options.seed.or(config.seed));
    let records_path = options.records_path.unwrap_or(config.records_path);
    let recorder = Arc::new(JsonlRecorder::new(records_path.clone()));
    let mut session = Session::with_seed(seed, recorder);
    session.drain_events();
    println!("Tenzies (seed {seed}). Type `help` for commands.");
    println!("{}", render_board(session.state(), session.primary_label()));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read stdin")?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        let output = execute_command(&mut session, &command, &records_path);
        println!("{output}");
        session.poll();
    }
    session.flush(EXIT_SAVE_WAIT);
    Ok(())
}

fn run_auto(options: &CliOptions, config: &TenziesConfig) -> Result<()> {
    let defaults = AutoplayConfig::default();
    let cfg = AutoplayConfig {
        seed: options.seed.or(config.seed).unwrap_or(defaults.seed),
        games: options.games.unwrap_or(defaults.games),
        max_rolls: options.max_rolls.unwrap_or(defaults.max_rolls),
        record_steps: options.trace,
        ..defaults
    };
    // Simulated games only reach the results file when one is named explicitly.
    let recorder: Arc<dyn ResultRecorder> = match options.records_path.as_ref() {
        Some(path) => Arc::new(JsonlRecorder::new(path.clone())),
        None => Arc::new(MemoryRecorder::new()),
    };
    let result = run_autoplay(&cfg, recorder).context("run autoplay")?;
    println!("{}", result.to_text_report());
    if let Some(path) = options.json_out.as_ref() {
        result
            .write_json(path)
            .with_context(|| format!("write autoplay json to {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let value = args.get(idx + 1);
        match args[idx].as_str() {
            "--cui" => options.cui = true,
            "--auto" => options.auto = true,
            "--trace" => options.trace = true,
            "--seed" => {
                if let Some(value) = value {
                    options.seed = Some(parse_seed(value)?);
                    idx += 1;
                }
            }
            "--records" => {
                if let Some(value) = value {
                    options.records_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--games" => {
                if let Some(value) = value {
                    options.games = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid --games value {value}"))?,
                    );
                    idx += 1;
                }
            }
            "--max-rolls" => {
                if let Some(value) = value {
                    options.max_rolls = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid --max-rolls value {value}"))?,
                    );
                    idx += 1;
                }
            }
            "--json" => {
                if let Some(value) = value {
                    options.json_out = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    Ok(options)
}

/// `Ok(None)` for blank input.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let command = match head {
        "r" | "roll" => Command::Roll,
        "n" | "new" => Command::NewGame,
        "s" | "show" | "board" => Command::Show,
        "records" | "ls" => Command::Records,
        "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "hold" => {
            let mut indices = Vec::new();
            for part in parts {
                let number: usize = part
                    .parse()
                    .map_err(|_| format!("not a die number: {part}"))?;
                if number == 0 {
                    return Err("dice are numbered from 1".to_string());
                }
                indices.push(number - 1);
            }
            if indices.is_empty() {
                return Err("usage: hold <die> [die...]".to_string());
            }
            Command::Hold(indices)
        }
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

fn execute_command(session: &mut Session, command: &Command, records_path: &Path) -> String {
    match command {
        Command::Roll => {
            let note = match session.roll() {
                RollOutcome::Rolled { resampled } => format!("rolled {resampled} dice"),
                RollOutcome::Reset => "new game".to_string(),
            };
            format!(
                "{note}\n{}",
                render_board(session.state(), session.primary_label())
            )
        }
        Command::Hold(indices) => {
            let mut notes = Vec::new();
            for index in indices {
                if !session.hold_index(*index) {
                    notes.push(format!("die {} unchanged", index + 1));
                }
            }
            let mut out = render_board(session.state(), session.primary_label());
            if !notes.is_empty() {
                out = format!("{}\n{out}", notes.join(", "));
            }
            out
        }
        Command::NewGame => {
            session.new_game();
            render_board(session.state(), session.primary_label())
        }
        Command::Show => render_board(session.state(), session.primary_label()),
        Command::Records => render_records(records_path),
        Command::Help => help_text().to_string(),
        Command::Quit => String::new(),
    }
}

fn render_board(state: &GameState, primary_label: &str) -> String {
    let numbers: Vec<String> = (1..=state.dice.len())
        .map(|idx| format!("{:^5}", idx))
        .collect();
    let faces: Vec<String> = state
        .dice
        .iter()
        .map(|die| {
            if die.held {
                format!("[{:^3}]", die.value)
            } else {
                format!(" {:^3} ", die.value)
            }
        })
        .collect();
    let mut lines = vec![
        numbers.join(" "),
        faces.join(" "),
        format!(
            "game {} | rolls {} | held {}/{} | next: {}",
            state.game,
            state.roll_count,
            state.held_count(),
            state.dice.len(),
            primary_label
        ),
    ];
    if let Some(value) = state.winning_value() {
        lines.push(format!(
            "*** You won! All dice show {value} after {} rolls. ***",
            state.roll_count
        ));
    }
    lines.join("\n")
}

fn render_records(path: &Path) -> String {
    match load_records(path) {
        Ok(records) if records.is_empty() => format!("no results in {}", path.display()),
        Ok(records) => {
            let skip = records.len().saturating_sub(RECENT_RECORDS);
            let mut lines = vec![format!(
                "{} results in {} (latest {}):",
                records.len(),
                path.display(),
                records.len() - skip
            )];
            for record in &records[skip..] {
                lines.push(format!(
                    "  {}  value {}  rolls {:>3}  dice {}",
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    record.winning_value,
                    record.roll_count,
                    record.dice_count
                ));
            }
            lines.join("\n")
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read results");
            format!("could not read results: {err}")
        }
    }
}

fn help_text() -> &'static str {
    "commands:
  roll | r           roll unheld dice (starts a new game once won)
  hold | h <n>...    hold or release dice by number (1-10)
  new | n            start a new game
  show | s           print the dice
  records            list recent saved results
  help | ?           this help
  quit | q           exit"
}
