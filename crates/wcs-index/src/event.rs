//! Group lifecycle notifications.

use std::sync::Mutex;

use crate::group::GroupId;

/// A transition in a group's lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupEvent {
    Created { id: GroupId, generation: u64, order: u32 },
    Updated { id: GroupId, generation: u64, len: usize },
    Disposed { id: GroupId, generation: u64 },
}

impl GroupEvent {
    pub fn id(&self) -> &GroupId {
        match self {
            GroupEvent::Created { id, .. }
            | GroupEvent::Updated { id, .. }
            | GroupEvent::Disposed { id, .. } => id,
        }
    }
}

/// Receives group lifecycle events, typically to mirror them into a UI.
pub trait GroupObserver: Send + Sync {
    fn on_event(&self, event: &GroupEvent);
}

/// Observer that keeps every event; handy for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<GroupEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<GroupEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl GroupObserver for RecordingObserver {
    fn on_event(&self, event: &GroupEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
