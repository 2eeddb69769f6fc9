//! Per-frame callback registry.
//!
//! The host drives `Ticker::dispatch` once per display refresh. Code that
//! wants frames calls `Ticker::add` and keeps the returned `Subscription`;
//! dropping the subscription deregisters the callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<RefCell<dyn FnMut()>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    frame: u64,
    entries: Vec<(u64, Callback)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(e, _)| *e == id)
    }

    fn remove(&mut self, id: u64) -> Option<Callback> {
        let pos = self.entries.iter().position(|(e, _)| *e == id)?;
        Some(self.entries.remove(pos).1)
    }
}

/// Host frame scheduler. Cheap to clone; clones share one registry.
///
/// Single-threaded by construction (`!Send`).
#[derive(Clone, Default)]
pub struct Ticker {
    registry: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reg = self.registry.borrow();
        f.debug_struct("Ticker")
            .field("frame", &reg.frame)
            .field("subscriptions", &reg.entries.len())
            .finish()
    }
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to run on every dispatched frame.
    pub fn add<F>(&self, callback: F) -> Subscription
    where
        F: FnMut() + 'static,
    {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.entries.push((id, callback));
        tracing::debug!(id, active = reg.entries.len(), "ticker subscription added");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Run every registered callback once, in registration order. Returns how
    /// many ran.
    ///
    /// Callbacks may add or drop subscriptions while running. A subscription
    /// dropped before its turn in this frame is skipped; one added during the
    /// frame first runs on the next dispatch.
    pub fn dispatch(&self) -> usize {
        let snapshot: Vec<(u64, Callback)> = {
            let mut reg = self.registry.borrow_mut();
            reg.frame += 1;
            reg.entries.clone()
        };

        let mut ran = 0;
        for (id, callback) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            (&mut *callback.borrow_mut())();
            ran += 1;
        }
        ran
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames dispatched so far.
    pub fn frame(&self) -> u64 {
        self.registry.borrow().frame
    }
}

/// Handle for one ticker registration. Dropping it deregisters the callback.
#[must_use = "dropping a Subscription immediately deregisters its callback"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// False once the ticker itself has been dropped.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|reg| reg.borrow().contains(self.id))
    }

    /// Deregister now. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(reg) = self.registry.upgrade() else {
            return;
        };
        // The callback may own other subscriptions; release it only after the
        // registry borrow ends.
        let removed = {
            let mut reg = reg.borrow_mut();
            let removed = reg.remove(self.id);
            if removed.is_some() {
                tracing::debug!(
                    id = self.id,
                    active = reg.entries.len(),
                    "ticker subscription removed"
                );
            }
            removed
        };
        drop(removed);
    }
}
