mod app;
mod chain;
mod config;
mod ipfs;
mod logging;
mod ui;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::chain::contract::ContractHandle;
use crate::chain::rpc::RpcClient;
use crate::chain::watcher::{spawn_watcher, EventWatcher};
use crate::ipfs::PinningClient;
use crate::logging::ActivityLogger;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load config; write the defaults on first run so the contract address
    // and credentials are easy to find and edit.
    let config_existed = config::config_path().exists();
    let cfg = config::load_config()?;
    if !config_existed {
        config::save_config(&cfg)?;
    }

    init_tracing()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Diagnostics go to a file; the TUI owns stdout.
fn init_tracing() -> Result<()> {
    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ballotbox");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("ballotbox.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::new(cfg.clone());
    let pinning = PinningClient::new(&cfg.pinning);
    let mut activity_logger = ActivityLogger::new(&cfg.logging);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task (spinner cadence)
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Bind the contract handle. Without a reachable node or an unlocked
    // account the UI still runs; every action then reports the missing
    // handle. The event watcher lives exactly as long as the handle.
    state.system_message(format!("Connecting to {}...", cfg.chain.rpc_url));
    let rpc = Arc::new(RpcClient::new(cfg.chain.rpc_url.clone()));
    let mut handle: Option<ContractHandle> = None;
    let mut _watcher: Option<EventWatcher> = None;
    match ContractHandle::connect(rpc.clone(), &cfg.chain.contract_address).await {
        Ok(h) => {
            state.system_message(format!("Bound to contract {}.", h.address()));
            _watcher = Some(spawn_watcher(
                rpc.clone(),
                cfg.chain.contract_address.clone(),
                cfg.chain.created_event.clone(),
                cfg.chain.voted_event.clone(),
                Duration::from_millis(cfg.chain.poll_interval_ms),
                event_tx.clone(),
            ));
            let _ = event_tx.send(AppEvent::HandleReady {
                wallet: h.wallet().to_string(),
            });
            handle = Some(h);
        }
        Err(e) => {
            state.error_message(format!("Contract not loaded: {}", e));
            state.system_message(format!(
                "Edit {} and restart.",
                config::config_path().display()
            ));
        }
    }

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);

        // Drain new messages for the on-disk activity log
        let new_msgs: Vec<_> = state.new_messages.drain(..).collect();
        for msg in &new_msgs {
            activity_logger.log(msg);
        }

        // Process actions
        for action in actions {
            match action {
                Action::RefreshCandidates => {
                    if let Some(h) = &handle {
                        state.fetches_in_flight += 1;
                        spawn_fetch(h.clone(), event_tx.clone());
                    }
                }
                Action::RegisterCandidate { name, image_path } => {
                    if let Some(h) = &handle {
                        spawn_register(
                            h.clone(),
                            pinning.clone(),
                            name,
                            image_path,
                            event_tx.clone(),
                        );
                    }
                }
                Action::Vote { address } => {
                    if let Some(h) = &handle {
                        spawn_vote(h.clone(), address, event_tx.clone());
                    }
                }
                Action::CheckPinAuth => {
                    spawn_auth_check(pinning.clone(), event_tx.clone());
                }
                Action::Quit => {
                    state.should_quit = true;
                }
            }
        }

        if state.should_quit {
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}

fn spawn_fetch(handle: ContractHandle, event_tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let event = match handle.fetch_candidates().await {
            Ok(candidates) => AppEvent::CandidatesFetched { candidates },
            Err(e) => AppEvent::FetchFailed {
                error: e.to_string(),
            },
        };
        let _ = event_tx.send(event);
    });
}

fn spawn_register(
    handle: ContractHandle,
    pinning: PinningClient,
    name: String,
    image_path: PathBuf,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let result = async {
            let pinned = pinning
                .pin_file(&image_path)
                .await
                .map_err(|e| e.to_string())?;
            let image_ref = pinning.gateway_url(&pinned.ipfs_hash);
            handle
                .register_candidate(&name, &image_ref)
                .await
                .map_err(|e| e.to_string())
        }
        .await;
        let event = match result {
            Ok(tx_hash) => AppEvent::RegisterSubmitted { name, tx_hash },
            Err(error) => AppEvent::RegisterFailed { error },
        };
        let _ = event_tx.send(event);
    });
}

fn spawn_vote(
    handle: ContractHandle,
    address: String,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let event = match handle.vote(&address).await {
            Ok(tx_hash) => AppEvent::VoteSubmitted { address, tx_hash },
            Err(e) => AppEvent::VoteFailed {
                address,
                error: e.to_string(),
            },
        };
        let _ = event_tx.send(event);
    });
}

fn spawn_auth_check(pinning: PinningClient, event_tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let error = pinning.test_authentication().await.err().map(|e| e.to_string());
        let _ = event_tx.send(AppEvent::PinAuthChecked { error });
    });
}
