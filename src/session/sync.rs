// ABOUTME: Sync controller — keeps the stored session snapshot in step with the session store.
// ABOUTME: Loads once at startup and rewrites the full snapshot after every later change.

use crate::session::storage::Storage;
use crate::session::store::{Session, SessionStore};

/// Storage key holding the serialized session collection.
pub const SESSIONS_KEY: &str = "chatSessions";

/// Bridges a [`SessionStore`] to a [`Storage`] backend.
///
/// Writes are suppressed until [`SyncController::load`] has run so an empty
/// startup state can never clobber a previously saved snapshot.
pub struct SyncController<S: Storage> {
    storage: S,
    key: String,
    initialized: bool,
}

impl<S: Storage> SyncController<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SESSIONS_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the stored snapshot into a fresh store.
    ///
    /// A missing, unreadable, or malformed snapshot yields an empty store; none
    /// of those are errors from the caller's point of view.
    pub fn load(&mut self) -> SessionStore {
        let sessions = match self.storage.get(&self.key) {
            Ok(Some(raw)) => parse_snapshot(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session snapshot, starting empty");
                Vec::new()
            }
        };
        tracing::info!(sessions = sessions.len(), "loaded session snapshot");
        self.initialized = true;
        SessionStore::from_sessions(sessions)
    }

    /// Skip reading and start from an empty store; the next persist overwrites
    /// whatever was stored.
    pub fn start_fresh(&mut self) -> SessionStore {
        self.initialized = true;
        SessionStore::new()
    }

    /// Overwrite the stored snapshot with the whole collection. A no-op before load.
    pub fn persist(&mut self, store: &SessionStore) -> anyhow::Result<()> {
        if !self.initialized {
            tracing::debug!("skipping persist before initial load");
            return Ok(());
        }
        let snapshot = serialize_snapshot(store.sessions())?;
        self.storage.set(&self.key, &snapshot)?;
        tracing::debug!(sessions = store.len(), bytes = snapshot.len(), "persisted sessions");
        Ok(())
    }
}

/// Serialize a session collection to its snapshot text.
pub fn serialize_snapshot(sessions: &[Session]) -> anyhow::Result<String> {
    Ok(serde_json::to_string(sessions)?)
}

/// Parse snapshot text, treating anything malformed as "no prior data".
pub fn parse_snapshot(raw: &str) -> Vec<Session> {
    // `null` is what an empty slot looks like after a JSON round trip.
    match serde_json::from_str::<Option<Vec<Session>>>(raw) {
        Ok(sessions) => sessions.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "session snapshot is malformed, starting empty");
            Vec::new()
        }
    }
}
