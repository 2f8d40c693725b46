// ABOUTME: Integration tests for the app controller — intents and exchange results end to end.
// ABOUTME: Uses a scripted responder and in-memory storage; no terminal is involved.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use askcode::app::ChatApp;
use askcode::exchange::{ExchangeEvent, Exchanger};
use askcode::responder::{Responder, ResponderError};
use askcode::session::{MemoryStorage, Message, SESSIONS_KEY, Storage, SyncController};
use askcode::tui::input::InputResult;
use askcode::tui::state::{ToastKind, TuiState};

/// Answers every question with a fixed reply, or fails with a fixed status.
struct Scripted(Result<&'static str, (u16, &'static str)>);

#[async_trait]
impl Responder for Scripted {
    async fn ask(&self, _text: &str) -> Result<String, ResponderError> {
        match self.0 {
            Ok(reply) => Ok(reply.to_string()),
            Err((status, body)) => Err(ResponderError::Status {
                status,
                body: body.to_string(),
            }),
        }
    }
}

fn app_with(
    responder: Scripted,
    storage: MemoryStorage,
) -> (ChatApp<MemoryStorage>, mpsc::Receiver<ExchangeEvent>) {
    let (tx, rx) = mpsc::channel(8);
    let mut sync = SyncController::new(storage);
    let store = sync.load();
    let app = ChatApp::new(
        TuiState::new(store),
        sync,
        Exchanger::new(Arc::new(responder), tx),
    );
    (app, rx)
}

async fn send_and_settle(
    app: &mut ChatApp<MemoryStorage>,
    rx: &mut mpsc::Receiver<ExchangeEvent>,
    text: &str,
) {
    app.handle_intent(InputResult::Send(text.to_string()));
    let event = rx.recv().await.expect("exchange result");
    app.handle_exchange(event);
}

#[tokio::test]
async fn first_send_creates_and_persists_session() {
    let (mut app, mut rx) = app_with(Scripted(Ok("It prints hello.")), MemoryStorage::new());

    app.handle_intent(InputResult::Send("What does this do?".to_string()));
    assert_eq!(app.state.pending.len(), 1);

    let event = rx.recv().await.unwrap();
    app.handle_exchange(event);

    assert!(app.state.pending.is_empty());
    assert_eq!(app.state.store.active_index(), Some(0));
    assert_eq!(
        app.state.store.sessions()[0].messages,
        vec![
            Message::user("What does this do?"),
            Message::bot("It prints hello.")
        ]
    );
    let raw = app.sync().storage().get(SESSIONS_KEY).unwrap().unwrap();
    assert_eq!(
        raw,
        r#"[{"isActive":true,"messages":[{"text":"What does this do?","isBot":false},{"text":"It prints hello.","isBot":true}]}]"#
    );
}

#[tokio::test]
async fn second_send_appends_to_active_session() {
    let (mut app, mut rx) = app_with(Scripted(Ok("sure")), MemoryStorage::new());

    send_and_settle(&mut app, &mut rx, "one").await;
    send_and_settle(&mut app, &mut rx, "two").await;

    assert_eq!(app.state.store.len(), 1);
    let messages = &app.state.store.sessions()[0].messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2], Message::user("two"));
    assert_eq!(messages[3], Message::bot("sure"));
}

#[tokio::test]
async fn rapid_first_sends_stay_in_one_session() {
    let (mut app, mut rx) = app_with(Scripted(Ok("noted")), MemoryStorage::new());

    app.handle_intent(InputResult::Send("q1".to_string()));
    app.handle_intent(InputResult::Send("q2".to_string()));
    assert_eq!(app.state.pending.len(), 2);
    for _ in 0..2 {
        let event = rx.recv().await.unwrap();
        app.handle_exchange(event);
    }

    assert!(app.state.pending.is_empty());
    assert_eq!(app.state.store.len(), 1);
    assert_eq!(app.state.store.active_index(), Some(0));
    let messages = &app.state.store.sessions()[0].messages;
    assert_eq!(messages.len(), 4);
    assert!(messages.contains(&Message::user("q1")));
    assert!(messages.contains(&Message::user("q2")));
}

#[tokio::test]
async fn failed_send_restores_input_and_shows_error() {
    let (mut app, mut rx) = app_with(Scripted(Err((500, "boom"))), MemoryStorage::new());

    send_and_settle(&mut app, &mut rx, "why?").await;

    assert!(app.state.store.is_empty());
    assert_eq!(app.state.input, "why?");
    let toast = app.state.toast.as_ref().expect("error toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.text.contains("(500): boom"));
    assert_eq!(app.sync().storage().writes, 0);
}

#[tokio::test]
async fn reply_lands_in_issuing_session_after_switch() {
    let (mut app, mut rx) = app_with(Scripted(Ok("answer")), MemoryStorage::new());
    app.handle_intent(InputResult::NewSession);
    app.handle_intent(InputResult::NewSession);
    app.handle_intent(InputResult::SwitchSession(0));

    app.handle_intent(InputResult::Send("question".to_string()));
    app.handle_intent(InputResult::SwitchSession(1));
    let event = rx.recv().await.unwrap();
    app.handle_exchange(event);

    assert_eq!(app.state.store.sessions()[0].messages.len(), 2);
    assert!(app.state.store.sessions()[1].messages.is_empty());
    assert_eq!(app.state.store.active_index(), Some(1));
}

#[tokio::test]
async fn reply_for_deleted_session_is_discarded() {
    let (mut app, mut rx) = app_with(Scripted(Ok("late")), MemoryStorage::new());
    app.handle_intent(InputResult::NewSession);
    app.handle_intent(InputResult::NewSession);

    app.handle_intent(InputResult::Send("question".to_string()));
    app.handle_intent(InputResult::DeleteSession(0));
    let event = rx.recv().await.unwrap();
    app.handle_exchange(event);

    assert_eq!(app.state.store.len(), 1);
    assert!(app.state.store.sessions()[0].messages.is_empty());
    assert_eq!(
        app.state.toast.as_ref().map(|t| t.kind),
        Some(ToastKind::Notice)
    );
}

#[tokio::test]
async fn delete_persists_and_clears_selection() {
    let (mut app, _rx) = app_with(Scripted(Ok("x")), MemoryStorage::new());
    app.handle_intent(InputResult::NewSession);
    app.handle_intent(InputResult::NewSession);

    app.handle_intent(InputResult::DeleteSession(1));

    assert_eq!(app.state.store.active_index(), None);
    assert_eq!(app.sync().storage().writes, 3);
    let raw = app.sync().storage().get(SESSIONS_KEY).unwrap().unwrap();
    assert_eq!(raw, r#"[{"isActive":false,"messages":[]}]"#);
}

#[tokio::test]
async fn out_of_range_intents_show_error_without_writing() {
    let (mut app, _rx) = app_with(Scripted(Ok("x")), MemoryStorage::new());

    app.handle_intent(InputResult::SwitchSession(3));
    assert!(app.state.toast.as_ref().unwrap().text.contains("out of range"));

    app.handle_intent(InputResult::DeleteSession(0));
    assert_eq!(app.sync().storage().writes, 0);
}

#[tokio::test]
async fn loaded_sessions_start_unselected() {
    let storage = MemoryStorage::new().with_entry(
        SESSIONS_KEY,
        r#"[{"isActive":true,"messages":[{"text":"q","isBot":false},{"text":"a","isBot":true}]}]"#,
    );
    let (app, _rx) = app_with(Scripted(Ok("x")), storage);

    assert_eq!(app.state.store.len(), 1);
    assert_eq!(app.state.store.active_index(), None);
    assert_eq!(app.sync().storage().writes, 0);
}

#[tokio::test]
async fn quit_intent_requests_exit() {
    let (mut app, _rx) = app_with(Scripted(Ok("x")), MemoryStorage::new());
    assert!(app.handle_intent(InputResult::Quit));
    assert!(!app.handle_intent(InputResult::None));
}

#[tokio::test]
async fn paste_goes_to_input() {
    let (mut app, _rx) = app_with(Scripted(Ok("x")), MemoryStorage::new());
    app.handle_paste("fn main() {}\r\n");
    assert_eq!(app.state.input, "fn main() {}\n");
}
