// ABOUTME: Session module — chat session data model, key-value storage, and snapshot sync.
// ABOUTME: The store owns all mutations; the sync controller persists it through a Storage backend.

pub mod storage;
pub mod store;
pub mod sync;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{Message, Session, SessionError, SessionStore};
pub use sync::{SESSIONS_KEY, SyncController};
