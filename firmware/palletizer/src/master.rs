//! Firmware logic of the master: operator commands in, axis batches out.

mod completion;
mod config;
mod orchestrator;
mod queue;
mod state;
mod store;

pub use completion::{BatchKind, CompletionTracker};
pub use config::{CompletionStrategy, MasterConfig, QueuePolicy, DEFAULT_QUEUE_CAPACITY};
pub use orchestrator::{Master, NoPanel, Panel};
pub use queue::{CommandQueue, QueueError};
pub use state::{on_batch_complete, on_control, Effect, SystemState, Transition};
pub use store::{Entry, QueueIndex, QueueStore, StoreError};

#[cfg(test)]
pub use store::test::MemoryStore;
