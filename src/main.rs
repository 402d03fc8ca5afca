mod app;
mod event;
mod theme;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};

use hangry_dashboard::model::ResponseOrdering;
use hangry_dashboard::source::http::{DEFAULT_ENDPOINT, DEFAULT_SERVER};
use hangry_dashboard::source::{HttpDetailSource, HttpSourceConfig};

/// Hangry Dashboard: browse restaurants and load their reviews and photos.
#[derive(Parser, Debug)]
#[command(name = "hangry-dashboard", version, about)]
struct Cli {
    /// Path to the restaurant listing (YAML)
    #[arg(long, default_value = "./restaurants.yaml")]
    listing: PathBuf,

    /// Base URL of the server providing restaurant details
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Path of the show-more endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// How overlapping detail responses are reconciled: latest or arrival
    #[arg(long, default_value = "latest")]
    ordering: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Disable listing file watching (static mode)
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Validate listing file
    if !cli.listing.exists() {
        eprintln!("Error: listing not found at {}", cli.listing.display());
        std::process::exit(1);
    }

    // Set up logging to file (we own the terminal)
    let log_dir = std::env::var("HANGRY_DASHBOARD_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("hangry-dashboard"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "dashboard.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hangry_dashboard=info".parse()?),
        )
        .init();

    let config = HttpSourceConfig {
        server: cli.server,
        endpoint: cli.endpoint,
        timeout: Duration::from_secs(cli.timeout_secs),
    };
    let source = HttpDetailSource::new(&config)?;
    let ordering = ResponseOrdering::from_str_loose(&cli.ordering);
    tracing::info!(url = source.url(), %ordering, "starting dashboard");

    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    // Set up terminal with mouse capture enabled
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = ratatui::init();

    // Run the app
    let mut app = app::App::new(cli.listing, cli.no_watch, Arc::new(source), ordering);
    let result = app.run(&mut terminal).await;

    // Restore terminal: disable mouse capture before restoring
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    ratatui::restore();

    result
}
