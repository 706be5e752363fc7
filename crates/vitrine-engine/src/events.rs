//! Host event subscriptions.
//!
//! Engines never read host events directly; they register interest with an
//! [`EventSource`] at mount and release it at unmount, and the host forwards
//! resize and pointer notifications to subscribed engines only. Injecting
//! the source lets tests assert subscription balance.

use std::cell::RefCell;
use std::rc::Rc;

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// Registry of interest in one stream of host events.
pub trait EventSource {
    fn subscribe(&mut self) -> Subscription;

    /// Release a subscription. Returns false when the handle was already
    /// released or never issued.
    fn unsubscribe(&mut self, sub: Subscription) -> bool;
}

/// Plain subscription registry used by the showcase host and in tests.
#[derive(Debug, Default)]
pub struct HostEvents {
    next: u64,
    active: Vec<u64>,
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.active.len()
    }
}

impl EventSource for HostEvents {
    fn subscribe(&mut self) -> Subscription {
        let id = self.next;
        self.next += 1;
        self.active.push(id);
        Subscription(id)
    }

    fn unsubscribe(&mut self, sub: Subscription) -> bool {
        match self.active.iter().position(|&id| id == sub.0) {
            Some(i) => {
                self.active.swap_remove(i);
                true
            }
            None => false,
        }
    }
}

/// Shared handle to one registry. The host keeps a single source per event
/// stream and hands each engine a clone, so the subscriber count reflects
/// every engine currently mounted.
impl EventSource for Rc<RefCell<HostEvents>> {
    fn subscribe(&mut self) -> Subscription {
        self.borrow_mut().subscribe()
    }

    fn unsubscribe(&mut self, sub: Subscription) -> bool {
        self.borrow_mut().unsubscribe(sub)
    }
}
