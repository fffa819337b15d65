//! # deck-runner
//!
//! Operator console for the trading-bot deck. Wires the HTTP backend into
//! the feed aggregator and the controller, then runs a line-oriented loop:
//! the deck re-renders whenever a source cell settles, notices print as they
//! arrive, and stdin lines drive control actions.
//!
//! # Usage
//!
//! ```bash
//! deck-runner --base-url http://localhost:8000 --symbol AAPL
//! deck-runner --log-level debug --log-dir ./logs
//! ```
//!
//! Console commands: `start`, `stop`, `symbol <TICKER>`,
//! `refresh <source>`, `help`, `quit`.

mod render;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use deck_core::api::{Backend, HttpBackend};
use deck_core::config::Settings;
use deck_core::logging::init_logging;
use deck_core::types::SourceId;
use deck_ctl::{BotCommand, Controller, NoticeFeed};
use deck_feed::{Aggregator, DEFAULT_SYMBOL, SymbolSelector, WallClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Trading-bot operational deck.
#[derive(Parser)]
#[command(name = "deck-runner", about = "Trading-bot operational deck")]
struct Cli {
    /// Backend base URL (overrides BACKEND_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Initial chart symbol.
    #[arg(long, default_value = DEFAULT_SYMBOL)]
    symbol: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional directory for daily-rolling log files.
    #[arg(long)]
    log_dir: Option<String>,
}

/// One line typed at the console.
#[derive(Debug, PartialEq, Eq)]
enum OpCommand {
    Start,
    Stop,
    Symbol(String),
    Refresh(SourceId),
    Help,
    Quit,
}

/// Parse one console line. Blank lines parse to `None`.
fn parse_line(line: &str) -> Result<Option<OpCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err("too many arguments, try 'help'".to_string());
    }

    let command = match head.to_ascii_lowercase().as_str() {
        "start" => OpCommand::Start,
        "stop" => OpCommand::Stop,
        "symbol" => match arg {
            Some(symbol) => OpCommand::Symbol(symbol.to_string()),
            None => return Err("usage: symbol <TICKER>".to_string()),
        },
        "refresh" => match arg {
            Some(source) => OpCommand::Refresh(source.parse()?),
            None => return Err("usage: refresh <source>".to_string()),
        },
        "help" | "h" => OpCommand::Help,
        "quit" | "q" | "exit" => OpCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

/// Apply one parsed console line. Returns `false` when the loop should exit.
async fn handle_line(
    line: &str,
    controller: &Controller,
    aggregator: &Aggregator,
    selector: &SymbolSelector,
) -> bool {
    let command = match parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(reason) => {
            println!("{reason}");
            return true;
        }
    };

    match command {
        OpCommand::Start => {
            let status = aggregator.snapshot().bot_status;
            if status.is_loading() {
                println!("bot status still loading, hold on");
            } else if status.ready().is_some_and(|s| !s.state.can_start()) {
                println!("bot is already active");
            } else {
                // Outcome arrives on the notice feed.
                let _ = controller.submit(BotCommand::start(selector.get())).await;
            }
        }
        OpCommand::Stop => {
            let status = aggregator.snapshot().bot_status;
            if status.is_loading() {
                println!("bot status still loading, hold on");
            } else if status.ready().is_some_and(|s| !s.state.can_stop()) {
                println!("bot is not running");
            } else {
                let _ = controller.submit(BotCommand::Stop).await;
            }
        }
        OpCommand::Symbol(symbol) => {
            if selector.set(&symbol) {
                println!("chart symbol set to {}", selector.get());
            } else {
                println!("chart symbol unchanged ({})", selector.get());
            }
        }
        OpCommand::Refresh(source) => aggregator.refresh(source),
        OpCommand::Help => println!("{}", render::help()),
        OpCommand::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    init_logging(&cli.log_level, cli.log_dir.as_deref(), "deck-runner");

    // 2. Resolve settings and connect the backend
    let settings = Settings::resolve(cli.base_url.as_deref());
    info!("deck-runner starting, backend={}", settings.base_url);
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&settings)?);

    // 3. Start the feed, the clock, and the controller
    let selector = SymbolSelector::new(&cli.symbol);
    let mut aggregator = Aggregator::start(Arc::clone(&backend), selector.clone());
    let mut clock = WallClock::start();
    let notices = NoticeFeed::new();
    let controller = Controller::new(backend, aggregator.refresh_handle(), notices.clone());
    let mut notice_rx = notices.subscribe();

    // 4. Console loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render::help());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            changed = aggregator.changed() => {
                if !changed {
                    warn!("feed closed unexpectedly");
                    break;
                }
                println!("{}", render::deck(&aggregator.snapshot(), clock.now()));
            }
            notice = notice_rx.recv() => {
                if let Ok(notice) = notice {
                    println!("{}", render::notice(&notice));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                if !handle_line(&line, &controller, &aggregator, &selector).await {
                    break;
                }
            }
        }
    }

    // 5. Tear down the feed before the clock
    aggregator.stop();
    clock.stop();
    info!("deck stopped, goodbye");
    Ok(())
}
