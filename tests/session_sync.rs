// ABOUTME: Integration tests for the session store and its persistence through storage backends.
// ABOUTME: Covers round trips, deletion/selection rules, and recovery from bad snapshots.

use askcode::session::{
    FileStorage, MemoryStorage, Message, SESSIONS_KEY, Session, SessionStore, Storage,
    SyncController,
};

/// Build a store through a mix of every mutation.
fn busy_store() -> SessionStore {
    let mut store = SessionStore::new();
    store.append_exchange(None, "q1", "a1").unwrap();
    store.start_new_session();
    store.append_exchange(Some(1), "q2", "multi\nline\nanswer").unwrap();
    store.append_exchange(Some(0), "q3", "a3").unwrap();
    store.start_new_session();
    store.switch_session(1).unwrap();
    store.append_exchange(Some(1), "unicode ✓ 🙂", "ok").unwrap();
    store.delete_session(2).unwrap();
    store
}

/// Saving through a file store and loading back reproduces the same sessions.
#[test]
fn file_round_trip_reproduces_sessions() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("askcode").join("storage.json");

    let store = busy_store();
    let mut sync = SyncController::new(FileStorage::open(&path).unwrap());
    sync.load();
    sync.persist(&store).unwrap();

    let mut reloaded = SyncController::new(FileStorage::open(&path).unwrap());
    let loaded = reloaded.load();

    assert_eq!(loaded.sessions(), store.sessions());
    // Selection is not restored; the user picks a chat again after restart.
    assert_eq!(loaded.active_index(), None);
}

/// Every mutation followed by a persist leaves storage holding the current collection.
#[test]
fn persisting_after_each_mutation_tracks_store() {
    let mut sync = SyncController::new(MemoryStorage::new());
    let mut store = sync.load();

    store.start_new_session();
    sync.persist(&store).unwrap();
    store.append_exchange(Some(0), "q", "a").unwrap();
    sync.persist(&store).unwrap();
    store.delete_session(0).unwrap();
    sync.persist(&store).unwrap();

    assert_eq!(sync.storage().writes, 3);
    let raw = sync.storage().get(SESSIONS_KEY).unwrap().unwrap();
    assert_eq!(raw, "[]");
}

/// A snapshot that is not JSON loads as an empty collection.
#[test]
fn garbage_snapshot_loads_empty() {
    let storage = MemoryStorage::new().with_entry(SESSIONS_KEY, "not json");
    let mut sync = SyncController::new(storage);
    let store = sync.load();
    assert!(store.is_empty());
    assert_eq!(store.active_index(), None);
}

/// A snapshot written by the browser version of this app loads as-is.
#[test]
fn browser_snapshot_format_loads() {
    let raw = r#"[{"isActive":false,"messages":[{"text":"What does this do?","isBot":false},{"text":"It prints hello.","isBot":true}]},{"isActive":true,"messages":[]}]"#;
    let mut sync = SyncController::new(MemoryStorage::new().with_entry(SESSIONS_KEY, raw));
    let store = sync.load();

    assert_eq!(store.len(), 2);
    assert_eq!(
        store.sessions()[0].messages,
        vec![
            Message::user("What does this do?"),
            Message::bot("It prints hello.")
        ]
    );
    assert!(store.sessions()[1].is_active);
}

/// Nothing is written until the initial load has run.
#[test]
fn no_write_before_initial_load() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("storage.json");
    {
        let mut seed = FileStorage::open(&path).unwrap();
        seed.set(SESSIONS_KEY, r#"[{"isActive":true,"messages":[]}]"#)
            .unwrap();
    }

    let mut sync = SyncController::new(FileStorage::open(&path).unwrap());
    sync.persist(&SessionStore::new()).unwrap();

    let reopened = FileStorage::open(&path).unwrap();
    let raw = reopened.get(SESSIONS_KEY).unwrap().unwrap();
    assert_eq!(raw, r#"[{"isActive":true,"messages":[]}]"#);
}

/// Zero sessions, one send: one active session holding exactly that exchange.
#[test]
fn first_send_creates_single_active_session() {
    let mut store = SessionStore::new();
    store
        .append_exchange(store.active_index(), "What does this do?", "It prints hello.")
        .unwrap();

    assert_eq!(
        store.sessions(),
        &[Session {
            is_active: true,
            messages: vec![
                Message::user("What does this do?"),
                Message::bot("It prints hello."),
            ],
        }]
    );
    assert_eq!(store.active_index(), Some(0));
}

/// Deleting the active first session leaves the former second one at index 0, unselected.
#[test]
fn deleting_active_first_session_shifts_and_clears() {
    let mut store = SessionStore::new();
    store.append_exchange(None, "one", "1").unwrap();
    store.append_exchange(None, "two", "2").unwrap();
    store.switch_session(0).unwrap();

    store.delete_session(0).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.sessions()[0].messages[0], Message::user("two"));
    assert_eq!(store.active_index(), None);
}

/// Deleting any session, before or after the active one, clears the selection.
#[test]
fn any_deletion_clears_selection() {
    for victim in 0..3 {
        let mut store = SessionStore::new();
        for _ in 0..3 {
            store.start_new_session();
        }
        store.switch_session(1).unwrap();
        store.delete_session(victim).unwrap();
        assert_eq!(store.active_index(), None, "deleting {victim}");
    }
}

/// Messages already in a session never change as other operations happen.
#[test]
fn messages_are_append_only() {
    let mut store = SessionStore::new();
    store.append_exchange(None, "q1", "a1").unwrap();
    let snapshot = store.sessions()[0].messages.clone();

    store.start_new_session();
    store.append_exchange(Some(1), "q2", "a2").unwrap();
    store.switch_session(0).unwrap();
    store.append_exchange(Some(0), "q3", "a3").unwrap();
    store.delete_session(1).unwrap();

    let messages = &store.sessions()[0].messages;
    assert_eq!(&messages[..snapshot.len()], &snapshot[..]);
    assert_eq!(messages.len(), snapshot.len() + 2);
}
