use std::fs::OpenOptions;
use std::sync::Mutex;

use adapt_tui::app::App;
use adapt_tui::cli::CliArgs;
use adapt_tui::client::ApiClient;
use adapt_tui::config::init_client_config;
use adapt_tui::{event, terminal};
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE: &str = "adapt-tui.log";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    init_logging(args.debug)?;

    let config = init_client_config()?;
    let client = ApiClient::new(&config)?;

    // Piped output or an explicit flag: print and exit.
    if args.is_headless() || !is_terminal() {
        return event::run_headless(&client, &args).await;
    }

    let mut app = App::new(config, client);
    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup_terminal_state(true, true);

    result
}

/// Logs go to a file; stdout belongs to the alternate screen.
fn init_logging(debug: bool) -> Result<()> {
    if !debug {
        return Ok(());
    }

    let file = OpenOptions::new().create(true).append(true).open(LOG_FILE)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
