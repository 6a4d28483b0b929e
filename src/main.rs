use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{
    io,
    time::{Duration, Instant},
};

mod app;
mod config;
mod engine;
mod ui;

use app::App;
use config::Config;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

// Input poll cadence; the engine runs its own 1-second tick schedule.
const TICK_RATE: Duration = Duration::from_millis(50);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "🍅 tomate - focus cycles in the terminal")]
struct Args {
    /// Work interval, e.g. 25m or 1h30m
    #[arg(short, long, value_parser = parse_duration)]
    work: Option<f64>,
    /// Break interval, e.g. 5m
    #[arg(short, long, value_parser = parse_duration)]
    rest: Option<f64>,
    /// Work+break cycles per session
    #[arg(short, long)]
    cycles: Option<u32>,
    #[arg(short = 't', long)]
    theme: Option<String>,
}

fn parse_duration(s: &str) -> std::result::Result<f64, String> {
    let s = s.trim().to_lowercase();
    let mut total = 0.0;
    let mut num = String::new();

    for c in s.chars() {
        match c {
            '0'..='9' | '.' => num.push(c),
            'h' => {
                total += num.parse::<f64>().map_err(|_| "Invalid hours")? * 60.0;
                num.clear();
            }
            'm' => {
                total += num.parse::<f64>().map_err(|_| "Invalid minutes")?;
                num.clear();
            }
            's' => {
                total += num.parse::<f64>().map_err(|_| "Invalid seconds")? / 60.0;
                num.clear();
            }
            _ => return Err("Invalid format".into()),
        }
    }

    if total > 0.0 { Ok(total) } else { Err("Duration must be > 0".into()) }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load();

    // CLI overrides; everything is clamped back into range before the
    // engine sees it.
    if let Some(w) = args.work {
        config.work_duration = (w * 60.0) as u32;
    }
    if let Some(r) = args.rest {
        config.break_duration = (r * 60.0) as u32;
    }
    if let Some(c) = args.cycles {
        config.total_cycles = c;
    }
    if let Some(t) = args.theme {
        config.theme = t;
    }
    let config = config.clamped();

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.engine.poll(Instant::now());
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app::handle_input(key, app) {
                    return Ok(());
                }
            }
        }
    }
}
