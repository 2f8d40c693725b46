// ABOUTME: App orchestrator — wires storage, session sync, the responder, and the TUI together.
// ABOUTME: Owns the single event loop that applies user intents and exchange results to the store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::exchange::{Applied, ExchangeEvent, Exchanger, apply_reply};
use crate::responder::HttpResponder;
use crate::session::{FileStorage, Storage, SyncController};
use crate::tui::input::{self, InputResult};
use crate::tui::state::{Focus, TuiState};
use crate::tui::ui;

/// Everything the event loop mutates: view state, the snapshot sync, and outgoing requests.
pub struct ChatApp<S: Storage> {
    pub state: TuiState,
    sync: SyncController<S>,
    exchanger: Exchanger,
}

impl<S: Storage> ChatApp<S> {
    /// The sync controller must already have loaded (or started fresh) so that
    /// `state.store` is the collection it will persist.
    pub fn new(state: TuiState, sync: SyncController<S>, exchanger: Exchanger) -> Self {
        Self {
            state,
            sync,
            exchanger,
        }
    }

    pub fn sync(&self) -> &SyncController<S> {
        &self.sync
    }

    /// Apply a user intent. Returns true when the app should quit.
    pub fn handle_intent(&mut self, intent: InputResult) -> bool {
        match intent {
            InputResult::None => {}
            InputResult::Quit => return true,
            InputResult::Send(text) => self.send(text),
            InputResult::NewSession => {
                let index = self.state.store.start_new_session();
                tracing::info!(index, "started new session");
                self.state.sync_sidebar_to_active();
                self.state.scroll_to_bottom();
                self.persist();
            }
            InputResult::SwitchSession(index) => match self.state.store.switch_session(index) {
                Ok(()) => {
                    self.state.focus = Focus::Input;
                    self.state.scroll_to_bottom();
                    self.persist();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "switch rejected");
                    self.state.show_error(e.to_string());
                }
            },
            InputResult::DeleteSession(index) => match self.state.store.delete_session(index) {
                Ok(_) => {
                    tracing::info!(index, "deleted session");
                    self.state.clamp_sidebar_cursor();
                    self.persist();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "delete rejected");
                    self.state.show_error(e.to_string());
                }
            },
        }
        false
    }

    /// Insert pasted text into the input when it has focus.
    pub fn handle_paste(&mut self, text: &str) {
        if self.state.focus == Focus::Input {
            self.state.insert_str_at_cursor(text);
        }
    }

    /// Fold a finished request back into the store.
    pub fn handle_exchange(&mut self, event: ExchangeEvent) {
        let ExchangeEvent { handle, result } = event;
        self.state.pending.retain(|h| h.id != handle.id);

        match result {
            Ok(reply) => match apply_reply(&mut self.state.store, &handle, reply) {
                Ok(Applied::Appended(index)) => {
                    tracing::info!(id = handle.id, index, "exchange complete");
                    if self.state.store.active_index() == Some(index) {
                        self.state.scroll_to_bottom();
                    }
                    self.persist();
                }
                Ok(Applied::Stale) => {
                    self.state.show_notice(
                        "A reply arrived for a chat that was deleted; it was discarded.",
                    );
                }
                Err(e) => {
                    tracing::error!(id = handle.id, error = %e, "could not store reply");
                    self.state.show_error(e.to_string());
                }
            },
            Err(e) => {
                tracing::error!(id = handle.id, error = %e, "exchange failed");
                self.state.restore_input(&handle.text);
                self.state.show_error(e.to_string());
            }
        }
    }

    fn send(&mut self, text: String) {
        let handle = self.exchanger.handle_for(&self.state.store, text);
        self.state.pending.push(handle.clone());
        self.state.toast = None;
        self.exchanger.spawn(handle);
    }

    fn persist(&mut self) {
        if let Err(e) = self.sync.persist(&self.state.store) {
            tracing::error!(error = %e, "failed to save sessions");
            self.state.show_error(format!("Could not save chats: {e}"));
        }
    }

    /// Drive the TUI until the user quits.
    pub async fn event_loop(
        &mut self,
        terminal: &mut ratatui::DefaultTerminal,
        exchange_rx: &mut mpsc::Receiver<ExchangeEvent>,
    ) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_secs(1));

        loop {
            terminal.draw(|frame| ui::render(frame, &mut self.state))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        let intent = input::handle_key(&mut self.state, key);
                        if self.handle_intent(intent) {
                            break;
                        }
                    }
                    Some(Ok(Event::Paste(text))) => self.handle_paste(&text),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(event) = exchange_rx.recv() => self.handle_exchange(event),
                _ = tick.tick() => {
                    self.state.expire_toast(Instant::now());
                }
            }
        }

        Ok(())
    }
}

/// Top-level application: builds the subsystems from config and runs the TUI.
pub struct App {
    config: Config,
    fresh: bool,
}

impl App {
    pub fn new(config: Config, fresh: bool) -> Self {
        Self { config, fresh }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let storage_path = self.config.storage_path();
        let storage = FileStorage::open(&storage_path)?;
        let mut sync = SyncController::with_key(storage, self.config.storage.key.clone());
        let store = if self.fresh {
            tracing::info!("starting with a fresh session list");
            sync.start_fresh()
        } else {
            sync.load()
        };
        tracing::info!(
            storage = %storage_path.display(),
            endpoint = %self.config.responder.base_url,
            "askcode starting"
        );

        let responder = Arc::new(HttpResponder::new(&self.config.responder)?);
        let (exchange_tx, mut exchange_rx) = mpsc::channel::<ExchangeEvent>(32);
        let exchanger = Exchanger::new(responder, exchange_tx);
        let mut app = ChatApp::new(TuiState::new(store), sync, exchanger);

        let mut terminal = ratatui::init();
        crossterm::execute!(std::io::stdout(), EnableBracketedPaste)?;

        let result = app.event_loop(&mut terminal, &mut exchange_rx).await;

        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();

        if result.is_ok() {
            print_exit_screen(&app.state);
        }
        tracing::info!(sessions = app.state.store.len(), "askcode exiting");
        result
    }
}

/// Print a farewell screen after the TUI exits.
fn print_exit_screen(state: &TuiState) {
    let elapsed =
        crate::tui::widgets::status::format_elapsed(state.session_start.elapsed().as_secs());
    let chats = state.store.len();
    let unanswered = state.pending.len();

    println!();
    println!("  \x1b[1mThanks for using askcode!\x1b[0m");
    println!();
    println!("  Session lasted {elapsed}; {chats} chat(s) saved.");
    if unanswered > 0 {
        println!("  {unanswered} question(s) were still waiting for a reply and were dropped.");
    }
    println!();
}
