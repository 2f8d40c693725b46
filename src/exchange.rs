// ABOUTME: Remote exchange — one question/answer round trip tracked by a request handle.
// ABOUTME: Spawns the responder call and folds the reply back into the session it was asked from.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::responder::{Responder, ResponderError};
use crate::session::{SessionError, SessionStore};

/// Identity of one outstanding request and the session layout it was issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeHandle {
    pub id: u64,
    /// Active session when the request was issued; `None` means "create one on reply".
    pub target: Option<usize>,
    /// Store epoch at issue time; a change means `target` may point elsewhere now.
    pub epoch: u64,
    pub text: String,
}

/// Completion of an exchange, delivered back to the event loop.
#[derive(Debug)]
pub struct ExchangeEvent {
    pub handle: ExchangeHandle,
    pub result: Result<String, ResponderError>,
}

/// What folding a successful reply into the store did.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    /// The pair was appended to the session at this index.
    Appended(usize),
    /// The target session was deleted or renumbered while the request was in flight.
    Stale,
}

/// Hands out handles and spawns requests.
pub struct Exchanger {
    responder: Arc<dyn Responder>,
    tx: mpsc::Sender<ExchangeEvent>,
    next_id: u64,
}

impl Exchanger {
    pub fn new(responder: Arc<dyn Responder>, tx: mpsc::Sender<ExchangeEvent>) -> Self {
        Self {
            responder,
            tx,
            next_id: 1,
        }
    }

    /// Capture a handle for `text` against the store's current selection.
    pub fn handle_for(&mut self, store: &SessionStore, text: String) -> ExchangeHandle {
        let id = self.next_id;
        self.next_id += 1;
        ExchangeHandle {
            id,
            target: store.active_index(),
            epoch: store.epoch(),
            text,
        }
    }

    /// Issue the request in a background task; the result arrives on the channel.
    pub fn spawn(&self, handle: ExchangeHandle) -> tokio::task::JoinHandle<()> {
        let responder = self.responder.clone();
        let tx = self.tx.clone();
        tracing::info!(id = handle.id, target = ?handle.target, "exchange started");
        tokio::spawn(async move {
            let result = responder.ask(&handle.text).await;
            if tx.send(ExchangeEvent { handle, result }).await.is_err() {
                tracing::debug!("event loop gone, dropping exchange result");
            }
        })
    }
}

/// Fold a successful reply into the store.
///
/// The reply goes to the session that was active when the request was issued.
/// Requests issued with no session selected share one new session.
pub fn apply_reply(
    store: &mut SessionStore,
    handle: &ExchangeHandle,
    reply: String,
) -> Result<Applied, SessionError> {
    if handle.target.is_some() && handle.epoch != store.epoch() {
        tracing::warn!(id = handle.id, "target session changed during request, discarding reply");
        return Ok(Applied::Stale);
    }
    let index = match handle.target {
        Some(target) => store.append_exchange(Some(target), handle.text.clone(), reply)?,
        None => store.append_unselected_exchange(handle.text.clone(), reply),
    };
    Ok(Applied::Appended(index))
}
