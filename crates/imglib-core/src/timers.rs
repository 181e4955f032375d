//! Timeout queue driven by a virtual clock.
//!
//! The widget only schedules short one-shot timeouts (status messages). The
//! host advances the clock explicitly, which keeps runs deterministic.

use std::cell::{Cell, RefCell};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Pending {
    id: TimerId,
    due_ms: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
pub struct Timers {
    now_ms: Cell<u64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<Pending>>,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed on the virtual clock
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn set_timeout<F>(&self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue.borrow_mut().push(Pending {
            id,
            due_ms: self.now_ms.get().saturating_add(delay_ms),
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a timeout; returns whether it was still pending
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|p| p.id != id);
        queue.len() != before
    }

    /// Move the clock forward, firing due timeouts in due order.
    ///
    /// Timeouts scheduled by a callback fire in the same call if they fall
    /// inside the window.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms.get().saturating_add(ms);

        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let index = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due_ms <= target)
                    .min_by_key(|(_, p)| (p.due_ms, p.id.0))
                    .map(|(i, _)| i);
                index.map(|i| queue.remove(i))
            };

            let Some(pending) = next else {
                break;
            };
            self.now_ms.set(pending.due_ms.max(self.now_ms.get()));
            trace!("Firing timer {:?} at {}ms", pending.id, self.now_ms.get());
            (pending.callback)();
        }

        self.now_ms.set(target);
    }
}
