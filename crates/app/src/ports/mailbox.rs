//! Mailbox port: per-device queue of pending commands.

use std::sync::Arc;

use potbot_domain::command::Command;
use potbot_domain::id::PlantId;

/// Volatile per-device command queue.
///
/// Both operations are total: there is no error a caller could handle.
/// Implementations trust their caller; ownership and device authentication
/// are checked by the services that sit in front of them.
pub trait CommandMailbox {
    /// Append `command` to the mailbox of `plant_id`, creating it if absent.
    fn enqueue(&self, plant_id: PlantId, command: Command);

    /// Take every pending command of `plant_id` in FIFO order and leave the
    /// mailbox empty. Returns an empty vector when nothing is pending.
    fn drain(&self, plant_id: &PlantId) -> Vec<Command>;
}

impl<T: CommandMailbox> CommandMailbox for Arc<T> {
    fn enqueue(&self, plant_id: PlantId, command: Command) {
        (**self).enqueue(plant_id, command);
    }

    fn drain(&self, plant_id: &PlantId) -> Vec<Command> {
        (**self).drain(plant_id)
    }
}
