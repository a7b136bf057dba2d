//! In-process command queue: one FIFO mailbox per plant.
//!
//! Mailboxes live only as long as the process. A restart drops every pending
//! command; devices simply see an empty list on their next poll.

use std::collections::{HashMap, VecDeque};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use potbot_domain::command::Command;
use potbot_domain::id::PlantId;

use crate::ports::CommandMailbox;

/// Mutex-guarded map of per-plant mailboxes.
///
/// A single coarse lock serialises every enqueue and drain, which makes a
/// drain atomic with respect to concurrent enqueues for the same plant.
/// The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryCommandQueue {
    mailboxes: Mutex<HashMap<PlantId, VecDeque<Command>>>,
    max_pending: Option<NonZeroUsize>,
}

impl InMemoryCommandQueue {
    /// Create an unbounded queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue keeping at most `max_pending` commands per plant.
    ///
    /// When a mailbox is full the oldest command is dropped to make room, so
    /// enqueue still always succeeds.
    #[must_use]
    pub fn with_max_pending(max_pending: NonZeroUsize) -> Self {
        Self {
            mailboxes: Mutex::default(),
            max_pending: Some(max_pending),
        }
    }

    /// Number of commands currently waiting for `plant_id`.
    #[must_use]
    pub fn pending(&self, plant_id: &PlantId) -> usize {
        self.lock().get(plant_id).map_or(0, VecDeque::len)
    }

    /// Number of plants with at least one pending command.
    #[must_use]
    pub fn mailbox_count(&self) -> usize {
        self.lock().len()
    }

    // The map holds plain data, so a panic in another holder cannot leave it
    // half-updated in a way later callers would care about.
    fn lock(&self) -> MutexGuard<'_, HashMap<PlantId, VecDeque<Command>>> {
        self.mailboxes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandMailbox for InMemoryCommandQueue {
    fn enqueue(&self, plant_id: PlantId, command: Command) {
        let mut mailboxes = self.lock();
        let mailbox = mailboxes.entry(plant_id).or_default();
        if let Some(max) = self.max_pending {
            while mailbox.len() >= max.get() {
                if let Some(evicted) = mailbox.pop_front() {
                    tracing::warn!(%evicted, max = max.get(), "mailbox full, dropping oldest command");
                }
            }
        }
        mailbox.push_back(command);
    }

    fn drain(&self, plant_id: &PlantId) -> Vec<Command> {
        self.lock()
            .remove(plant_id)
            .map(Vec::from)
            .unwrap_or_default()
    }
}
