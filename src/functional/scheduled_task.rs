//! One-shot cancellable task.
//!
//! Holds at most one pending deadline. Arming always replaces the previous
//! deadline and bumps a generation counter, so a [`TaskTicket`] handed out
//! for an earlier arm can never fire the current one. Time is an input: the
//! owner passes `now` to [`ScheduledTask::fire`], which keeps the state
//! machine deterministic and lets any event loop drive it.

use std::time::{Duration, Instant};

/// Identifies one arming of a [`ScheduledTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskTicket {
    generation: u64,
    due_at: Instant,
}

impl TaskTicket {
    pub fn due_at(&self) -> Instant {
        self.due_at
    }
}

#[derive(Debug, Default)]
pub struct ScheduledTask {
    pending: Option<TaskTicket>,
    generation: u64,
}

impl ScheduledTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the task `delay` after `now`, cancelling anything pending.
    pub fn arm(&mut self, now: Instant, delay: Duration) -> TaskTicket {
        self.generation = self.generation.wrapping_add(1);
        let ticket = TaskTicket {
            generation: self.generation,
            due_at: now + delay,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Cancels the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Fires the pending deadline if it is due at `now`, disarming it.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(ticket) if ticket.due_at <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Like [`fire`](Self::fire) but only for the arming `ticket` came from.
    pub fn fire_ticket(&mut self, ticket: TaskTicket, now: Instant) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.fire(now)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.map(|t| t.due_at)
    }
}
