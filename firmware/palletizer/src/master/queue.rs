use core::fmt::{self, Display, Formatter};

use heapless::Deque;
use ufmt_macros::uDebug;

use super::store::{Entry, QueueIndex, QueueStore, StoreError};

/// Errors that might occur when queueing a command.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum QueueError {
    /// Every slot is taken. The queue is unchanged.
    Full,
    /// The command is longer than a queue entry.
    TooLong,
}

impl Display for QueueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full => write!(f, "queue full"),
            QueueError::TooLong => write!(f, "command too long"),
        }
    }
}

/// Bounded FIFO of operator commands, mirrored to a durable store.
///
/// The entries always live in RAM. While a store is attached, every change
/// is also written to it, so that the queue survives a restart. When the
/// store fails it is detached and the queue carries on in RAM; the failure
/// can be collected with [CommandQueue::take_store_fault].
///
/// The store's log is cleared whenever the queue drains empty.
///
/// # Type Parameters
///
/// - `S`: durable store
/// - `N`: capacity of the queue
pub struct CommandQueue<S, const N: usize> {
    entries: Deque<Entry, N>,
    store: Option<S>,
    index: QueueIndex,
    fault: Option<StoreError>,
}
impl<S: QueueStore, const N: usize> CommandQueue<S, N> {
    /// Creates an empty queue backed by `store`.
    ///
    /// Nothing is read from the store until [CommandQueue::restore].
    pub fn new(store: S) -> Self {
        Self {
            entries: Deque::new(),
            store: Some(store),
            index: QueueIndex::default(),
            fault: None,
        }
    }

    /// Loads the entries recorded in the store.
    ///
    /// # Returns
    ///
    /// - `Ok(count)`: the number of restored entries.
    /// - `Err(error)`: if the store could not be read. The store is detached
    ///   and the queue starts empty.
    pub fn restore(&mut self) -> Result<usize, StoreError> {
        self.entries.clear();
        let result = match self.store.as_mut() {
            Some(store) => Self::read_entries(store, &mut self.entries),
            None => return Ok(0),
        };
        match result {
            Ok(index) => {
                self.index = index;
                Ok(self.entries.len())
            }
            Err(e) => {
                self.entries.clear();
                self.index = QueueIndex::default();
                self.store = None;
                Err(e)
            }
        }
    }

    /// Adds a command at the back.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: if the command was queued.
    /// - `Err(QueueError::Full)`: if the queue is full.
    /// - `Err(QueueError::TooLong)`: if the command does not fit an entry.
    pub fn push(&mut self, line: &str) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full);
        }
        let entry = Entry::try_from(line).map_err(|_| QueueError::TooLong)?;
        self.entries
            .push_back(entry)
            .map_err(|_| QueueError::Full)?;
        self.index.size += 1;
        let index = self.index;
        self.persist(|store| {
            store.append(line)?;
            store.write_index(index)
        });
        Ok(())
    }

    /// Removes the command at the front.
    pub fn pop(&mut self) -> Option<Entry> {
        let entry = self.entries.pop_front()?;
        if self.entries.is_empty() {
            self.index = QueueIndex::default();
            self.persist(|store| {
                store.clear()?;
                store.write_index(QueueIndex::default())
            });
        } else {
            self.index.head += 1;
            self.index.size -= 1;
            let index = self.index;
            self.persist(|store| store.write_index(index));
        }
        Some(entry)
    }

    /// Discards every command.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = QueueIndex::default();
        self.persist(|store| {
            store.clear()?;
            store.write_index(QueueIndex::default())
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Returns true while changes are written to a durable store.
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Iterates the commands from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.as_str())
    }

    /// Returns the store failure that detached the store, once.
    pub fn take_store_fault(&mut self) -> Option<StoreError> {
        self.fault.take()
    }

    fn read_entries(store: &mut S, entries: &mut Deque<Entry, N>) -> Result<QueueIndex, StoreError> {
        let index = store.read_index()?;
        let end = index.head.checked_add(index.size).ok_or(StoreError::Corrupt)?;
        if usize::from(index.size) > N || end > store.count() {
            return Err(StoreError::Corrupt);
        }
        for position in index.head..end {
            let entry = store.read_at(position)?;
            entries.push_back(entry).map_err(|_| StoreError::Corrupt)?;
        }
        Ok(index)
    }

    fn persist(&mut self, write: impl FnOnce(&mut S) -> Result<(), StoreError>) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = write(store) {
                self.store = None;
                self.fault = Some(e);
            }
        }
    }
}
