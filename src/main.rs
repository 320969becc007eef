use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use chainfeed::app::{App, AppEvent};
use chainfeed::chain::{HttpWalletProvider, RpcGateway};
use chainfeed::config::Config;
use chainfeed::ui;

#[derive(Parser, Debug)]
#[command(
    name = "chainfeed",
    version,
    about = "Terminal client for an on-chain microblog"
)]
struct Args {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override both the provider and contract JSON-RPC endpoints
    #[arg(long)]
    rpc_url: Option<String>,
    /// Append tracing output to this file (the TUI owns stdout)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chainfeed=debug")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Forward terminal key presses into the app channel. Runs on a plain
/// thread because crossterm's `read` blocks.
fn spawn_input_thread(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if tx.blocking_send(AppEvent::Input(key)).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let Some(event) = rx.recv().await else {
            return Ok(());
        };
        app.apply_event(event);
        // Apply anything else already queued before paying for a redraw.
        while let Ok(event) = rx.try_recv() {
            app.apply_event(event);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.rpc_url {
        config.provider_url = url.clone();
        config.contract_url = Some(url);
    }

    let provider = Arc::new(HttpWalletProvider::new(
        config.provider_url.clone(),
        config.request_timeout(),
    ));
    let gateway = Arc::new(RpcGateway::new(
        config.contract_url().to_string(),
        config.request_timeout(),
    ));

    let (tx, mut rx) = mpsc::channel(64);
    spawn_input_thread(tx.clone());
    let mut app = App::new(config, provider, gateway, tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
