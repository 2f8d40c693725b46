// ABOUTME: Session store — the canonical list of chat sessions and the active-session index.
// ABOUTME: Owns every mutation: new session, switch, delete, and appending a user/bot exchange.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by session store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session index {index} is out of range ({len} sessions)")]
    InvalidIndex { index: usize, len: usize },
}

/// One unit of conversation text, tagged by who produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub is_bot: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: true,
        }
    }
}

/// One independent conversation thread.
///
/// `is_active` mirrors the store's active index for display and for the
/// persisted snapshot; the index itself is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Messages are only ever appended, always as a user/bot pair.
    fn push_exchange(&mut self, user_text: String, bot_text: String) {
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::bot(bot_text));
    }
}

/// All chat sessions plus the index of the one currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active: Option<usize>,
    /// Bumped whenever sessions are renumbered (i.e. on deletion).
    epoch: u64,
    /// Session opened by a reply to a question asked with nothing selected.
    /// Later such replies join it. Cleared on deletion.
    unselected_home: Option<usize>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loaded collection. No session is selected.
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions,
            active: None,
            epoch: 0,
            unselected_home: None,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The session the active index points at, if any.
    pub fn active_session(&self) -> Option<&Session> {
        self.active.and_then(|i| self.sessions.get(i))
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Append an empty session, make it the only active one, and select it.
    pub fn start_new_session(&mut self) -> usize {
        self.push_active_session(Session::default())
    }

    /// Select the session at `index`.
    pub fn switch_session(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        self.active = Some(index);
        self.sync_active_flags();
        Ok(())
    }

    /// Remove the session at `index`. The selection is always cleared afterwards,
    /// whichever session was active.
    pub fn delete_session(&mut self, index: usize) -> Result<Session, SessionError> {
        self.check_index(index)?;
        let removed = self.sessions.remove(index);
        self.active = None;
        self.epoch += 1;
        self.unselected_home = None;
        self.sync_active_flags();
        Ok(removed)
    }

    /// Append a user message followed by the bot reply.
    ///
    /// With no target, a new session holding just this exchange is created and
    /// selected. Returns the index of the session that received the exchange.
    pub fn append_exchange(
        &mut self,
        target: Option<usize>,
        user_text: impl Into<String>,
        bot_text: impl Into<String>,
    ) -> Result<usize, SessionError> {
        let (user_text, bot_text) = (user_text.into(), bot_text.into());
        match target {
            Some(index) => {
                self.check_index(index)?;
                self.sessions[index].push_exchange(user_text, bot_text);
                Ok(index)
            }
            None => {
                let mut session = Session::default();
                session.push_exchange(user_text, bot_text);
                Ok(self.push_active_session(session))
            }
        }
    }

    /// Append an exchange that was asked while no session was selected.
    ///
    /// The first such reply opens (and selects) a new session; later ones land
    /// in that same session, so a burst of first questions stays one chat.
    pub fn append_unselected_exchange(
        &mut self,
        user_text: impl Into<String>,
        bot_text: impl Into<String>,
    ) -> usize {
        match self.unselected_home {
            Some(index) => {
                self.sessions[index].push_exchange(user_text.into(), bot_text.into());
                index
            }
            None => {
                let mut session = Session::default();
                session.push_exchange(user_text.into(), bot_text.into());
                let index = self.push_active_session(session);
                self.unselected_home = Some(index);
                index
            }
        }
    }

    fn push_active_session(&mut self, mut session: Session) -> usize {
        for existing in &mut self.sessions {
            existing.is_active = false;
        }
        session.is_active = true;
        self.sessions.push(session);
        let index = self.sessions.len() - 1;
        self.active = Some(index);
        index
    }

    fn sync_active_flags(&mut self) {
        let active = self.active;
        for (i, session) in self.sessions.iter_mut().enumerate() {
            session.is_active = active == Some(i);
        }
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.sessions.len() {
            Ok(())
        } else {
            Err(SessionError::InvalidIndex {
                index,
                len: self.sessions.len(),
            })
        }
    }
}
