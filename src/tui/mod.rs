// File: src/tui/mod.rs
pub mod action;
pub mod form;
pub mod handlers;
pub mod state;
pub mod view;

use crate::client::RestClient;
use crate::config::Config;
use crate::model::Id;
use crate::service::EventService;
use crate::store::{DataProvider, Snapshot};
use action::{Action, AppEvent};
use state::AppState;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::sync::watch;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run(config: Config) -> Result<()> {
    let client = RestClient::new(&config.url, config.allow_insecure_certs)
        .with_context(|| format!("Cannot use backend {}", config.url))?;
    let provider = Arc::new(DataProvider::new(client));
    let mut snapshots = provider.subscribe();
    let service = EventService::new(provider);

    let (action_tx, action_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();
    let worker = tokio::spawn(network_actor(service, action_rx, event_tx));
    action_tx
        .send(Action::Reload)
        .context("Network task stopped before start")?;

    let author = (!config.author_id.is_empty()).then(|| Id::from(config.author_id.as_str()));
    let mut state = AppState::new(author, Duration::from_secs(config.notification_seconds));

    let mut terminal = setup_terminal()?;
    let result = event_loop(
        &mut terminal,
        &mut state,
        &mut snapshots,
        &action_tx,
        event_rx,
    );
    restore_terminal(&mut terminal)?;

    let _ = action_tx.send(Action::Quit);
    if let Err(e) = worker.await {
        log::warn!("Network task ended abnormally: {}", e);
    }
    result
}

fn event_loop(
    terminal: &mut Tui,
    state: &mut AppState,
    snapshots: &mut watch::Receiver<Arc<Snapshot>>,
    action_tx: &UnboundedSender<Action>,
    mut event_rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        if snapshots.has_changed().unwrap_or(false) {
            let snapshot = snapshots.borrow_and_update().clone();
            state.apply_snapshot(snapshot);
        }
        while let Ok(app_event) = event_rx.try_recv() {
            state.handle_app_event(app_event);
        }
        state.tick(Instant::now());

        terminal.draw(|f| view::draw(f, state))?;

        if event::poll(POLL_INTERVAL)?
            && let TermEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = handlers::handle_key(state, key)
        {
            if matches!(action, Action::Quit) {
                break;
            }
            action_tx
                .send(action)
                .context("Network task is no longer running")?;
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

/// Runs actions one at a time against the backend and reports back.
async fn network_actor(
    service: EventService,
    mut rx: UnboundedReceiver<Action>,
    tx: UnboundedSender<AppEvent>,
) {
    while let Some(action) = rx.recv().await {
        let reply = match action {
            Action::Reload => {
                service.provider().load().await;
                AppEvent::Loaded
            }
            Action::CreateEvent { ticket, draft } => {
                let (notification, _) = service.create(draft).await;
                AppEvent::Created {
                    ticket,
                    notification,
                }
            }
            Action::UpdateEvent {
                ticket,
                original,
                edit,
            } => {
                let (notification, _) = service.update(&original, &edit).await;
                AppEvent::Updated {
                    ticket,
                    notification,
                }
            }
            Action::DeleteEvent(id) => {
                let notification = service.delete(&id).await;
                AppEvent::Deleted { id, notification }
            }
            Action::Quit => break,
        };
        if tx.send(reply).is_err() {
            break;
        }
    }
    log::debug!("Network task stopped");
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Cannot enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    install_panic_hook();
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Puts the terminal back before the default hook prints the panic.
fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
