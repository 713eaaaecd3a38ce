// wormtape: a Turing machine on a write-once tape, with a time-travel visualizer

mod machine;
mod parser;
mod snapshot;
mod tape;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use machine::config::{MachineConfig, StepPolicy};
use machine::constants::{DEFAULT_MAX_STEPS, DEFAULT_TAPE_SIZE};
use machine::engine::{Machine, RunOutcome};
use machine::errors::MachineError;
use ui::App;

#[derive(Parser, Debug)]
#[command(name = "wormtape")]
#[command(about = "Run a Turing machine on a write-once tape")]
struct Cli {
    /// Path to a rule-table file
    rules: PathBuf,

    /// Number of physical (write-once) cells
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    physical: usize,

    /// Number of virtual tape positions
    #[arg(long = "virtual", default_value_t = DEFAULT_TAPE_SIZE)]
    virtual_size: usize,

    /// Initial tape contents, written from position 0
    #[arg(long, default_value = "")]
    input: String,

    /// Attempt exactly one transition
    #[arg(long, conflicts_with = "max_steps")]
    single_step: bool,

    /// Maximum number of transitions before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Print the final report instead of opening the TUI
    #[arg(long)]
    headless: bool,

    /// With --headless, print every physical head move before the report
    #[arg(long, requires = "headless")]
    motion: bool,

    /// Memory limit for recorded history, in megabytes
    #[arg(long, default_value_t = 256)]
    snapshot_limit_mb: usize,
}

impl Cli {
    fn machine_config(&self) -> MachineConfig {
        let policy = if self.single_step {
            StepPolicy::Single
        } else {
            StepPolicy::UntilHalt {
                max_steps: self.max_steps,
            }
        };
        MachineConfig {
            physical_capacity: self.physical,
            virtual_capacity: self.virtual_size,
            policy,
            snapshot_limit: self.snapshot_limit_mb.saturating_mul(1024 * 1024),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wormtape=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.rules) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.rules.display(), e);
            std::process::exit(1);
        }
    };

    let table = match parser::parse_rule_table(&source) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!(rules = table.len(), states = table.states().len(), "rule table loaded");

    let mut machine = match Machine::new(table, cli.machine_config()) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Nothing has been recorded yet, so there is no history to show
    if let Err(e) = machine.load_input(cli.input.as_bytes()) {
        eprintln!("Cannot load input: {}", e);
        std::process::exit(1);
    }

    let run_result = machine.run();

    if cli.headless {
        return run_headless(machine, run_result, cli.motion);
    }

    let run_error = match &run_result {
        Ok(RunOutcome::Halted { steps }) => {
            eprintln!("Machine halted after {} step(s).", steps);
            None
        }
        Ok(RunOutcome::StepLimitReached { steps }) => {
            eprintln!("Step limit reached after {} step(s).", steps);
            None
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            eprintln!("Entering TUI with partial execution history...");
            Some(e.to_string())
        }
    };

    if let Some(e) = machine.history_overflow() {
        eprintln!("Warning: {}; the TUI shows the run only up to that point.", e);
    }

    // Rewind to the beginning for TUI
    if let Err(e) = machine.rewind_to_start() {
        eprintln!("Warning: Failed to rewind to start: {}", e);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(machine, run_error);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Print the run's observables to stdout; exit 1 on a fatal machine error
fn run_headless(
    mut machine: Machine,
    run_result: Result<RunOutcome, MachineError>,
    show_motion: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run_result {
        if show_motion {
            print_motion(&machine);
        }
        let kind = if e.is_tape_violation() {
            "Tape violation"
        } else {
            "Runtime error"
        };
        eprintln!("{}: {}", kind, e);
        std::process::exit(1);
    }

    let report = match machine.report() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            std::process::exit(1);
        }
    };

    if show_motion {
        print_motion(&machine);
    }
    println!("{}", report);
    Ok(())
}

fn print_motion(machine: &Machine) {
    for line in machine.tape().head().log().get_output() {
        println!("{}", line);
    }
}
