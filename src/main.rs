use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;

use wx_dashboard::app::run_app;
use wx_dashboard::cli::Args;
use wx_dashboard::dashboard::Feeds;
use wx_dashboard::{feeds, page};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn write_page(runtime: &Runtime, client: &reqwest::Client, args: &Args) -> anyhow::Result<()> {
    let shell = match &args.shell {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading page shell {}", path.display()))?,
        None => page::DEFAULT_SHELL.to_string(),
    };

    let feeds = runtime.block_on(Feeds::fetch(client, &args.server));
    let page = feeds.render();
    tracing::debug!("rendered mounts: {}", page.ids().collect::<Vec<_>>().join(", "));
    let html = page.apply(&shell);

    if args.output.as_os_str() == "-" {
        io::stdout().write_all(html.as_bytes())?;
    } else {
        std::fs::write(&args.output, html)
            .with_context(|| format!("writing {}", args.output.display()))?;
        tracing::info!("wrote {}", args.output.display());
    }
    Ok(())
}

fn preview(runtime: &Runtime, client: &reqwest::Client, args: &Args) -> anyhow::Result<()> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &args.server, || {
        runtime.block_on(Feeds::fetch(client, &args.server))
    });

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("terminal preview")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Log lines would tear through the alternate screen.
    if !args.preview {
        init_logging();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let client = feeds::build_client()?;

    if args.preview {
        preview(&runtime, &client, &args)
    } else {
        write_page(&runtime, &client, &args)
    }
}
