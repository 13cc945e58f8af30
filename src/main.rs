use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use expense_tracker::{ui::render, App, HttpExpenseStore, Settings};

#[derive(Debug, Parser)]
#[command(name = "expense-tracker", about = "Record and review personal expenses")]
struct Args {
    /// Base URL of the expense API, e.g. http://localhost:5000/api
    #[arg(long)]
    api_url: Option<String>,

    /// Path to a TOML settings file
    #[arg(long)]
    config: Option<String>,

    /// Where to write logs; the terminal is taken by the UI
    #[arg(long)]
    log_file: Option<String>,
}

fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log.file)
        .with_context(|| format!("Failed to open log file {}", settings.log.file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<HttpExpenseStore>,
) -> Result<()> {
    loop {
        terminal.draw(|f| render::draw(f, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        // Show the busy indicator before blocking on the request
        if app.is_busy() {
            terminal.draw(|f| render::draw(f, &app))?;
            app.run_pending().await;
        }

        if app.quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(url) = args.api_url {
        settings.api.base_url = url;
    }
    if let Some(path) = args.log_file {
        settings.log.file = path.into();
    }

    init_logging(&settings)?;
    info!(base_url = %settings.api.base_url, "starting expense tracker");

    let store = HttpExpenseStore::new(
        &settings.api.base_url,
        Duration::from_secs(settings.api.timeout_secs),
    )?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(store)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}
