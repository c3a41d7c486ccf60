//! GuardRail Ops
//!
//! Arcade terminal game: allow, redact or block requests before the
//! guardrail timer runs out.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use guardrail_ops::config::Config;
use guardrail_ops::data::{default_fixtures, load_fixtures, Difficulty};
use guardrail_ops::preferences::FilePreferenceStore;
use guardrail_ops::tui::App;
use guardrail_ops::Game;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;

/// GuardRail Ops: keep sensitive data and attacks away from the model.
#[derive(Parser)]
#[command(name = "guardrail-ops", version, about)]
struct Cli {
    /// Difficulty to preselect (casual or pro); also saved as the default
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// JSON file of requests to play instead of the built-in set
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Directory for result snapshots
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }
    if let Some(path) = cli.fixtures {
        config.fixtures_path = Some(path);
    }
    config.ensure_dirs()?;

    init_logging(&config)?;
    info!(version = guardrail_ops::VERSION, data_dir = %config.data_dir.display(), "starting");

    let fixtures = match &config.fixtures_path {
        Some(path) => load_fixtures(path)?,
        None => default_fixtures(),
    };

    let preferences = FilePreferenceStore::in_dir(&config.data_dir);
    let mut game = Game::new(fixtures, Box::new(preferences));
    if let Some(difficulty) = cli.difficulty {
        game.select_difficulty(difficulty);
    }

    let mut app = App::new(game, config.export_dir.clone());

    let mut terminal = setup_terminal()?;
    let outcome = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    outcome?;

    info!("exiting");
    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  Thanks for playing GuardRail Ops!                     ║");
    println!("║                                                        ║");
    println!("║  Stay vigilant, operator.                              ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    Ok(())
}

/// The TUI owns stdout, so logs go to a file in the data directory.
fn init_logging(config: &Config) -> Result<()> {
    let log_path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(guardrail_ops::config::DEFAULT_LOG_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        if !app.handle_input()? {
            break;
        }

        app.on_tick(Instant::now());
    }
    Ok(())
}
