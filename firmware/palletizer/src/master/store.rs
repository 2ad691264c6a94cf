use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

use crate::protocol::OPERATOR_LINE_LEN;

/// A queued operator command.
pub type Entry = heapless::String<OPERATOR_LINE_LEN>;

/// Position of the live entries within the store's log.
///
/// Entries `head..head + size` are queued; everything before `head` has
/// already been dispatched.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct QueueIndex {
    pub head: u16,
    pub size: u16,
}

/// Errors that might occur when accessing a queue store.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum StoreError {
    /// The storage device did not respond or is not formatted.
    Unavailable,
    /// The stored index does not match the log.
    Corrupt,
    /// The log has no room for another entry.
    Full,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "store unavailable"),
            StoreError::Corrupt => write!(f, "store index corrupt"),
            StoreError::Full => write!(f, "store full"),
        }
    }
}

/// Durable append-only log of operator commands.
///
/// The store has a single writer: the master's command queue.
pub trait QueueStore {
    /// Reads the index record written by [QueueStore::write_index].
    fn read_index(&mut self) -> Result<QueueIndex, StoreError>;

    /// Rewrites the index record.
    fn write_index(&mut self, index: QueueIndex) -> Result<(), StoreError>;

    /// Appends an entry at the end of the log.
    fn append(&mut self, line: &str) -> Result<(), StoreError>;

    /// Reads the entry at position `index` of the log.
    fn read_at(&mut self, index: u16) -> Result<Entry, StoreError>;

    /// Number of entries appended since the log was last cleared.
    fn count(&mut self) -> u16;

    /// Empties the log.
    fn clear(&mut self) -> Result<(), StoreError>;
}
