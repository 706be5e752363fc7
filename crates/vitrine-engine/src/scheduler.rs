//! Display-refresh scheduling.
//!
//! The frame loop never calls the host scheduler implicitly; it requests
//! exactly one "run before the next repaint" callback per completed frame
//! and cancels the pending one on stop. Injecting the scheduler lets tests
//! step the loop deterministically.

use std::time::{Duration, Instant};

/// Handle for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// One-shot display-refresh scheduling primitive.
pub trait Scheduler {
    /// Request a callback before the next repaint.
    fn schedule(&mut self) -> FrameHandle;

    /// Cancel a scheduled callback. Cancelling a handle that already ran
    /// or was never issued is a no-op.
    fn cancel(&mut self, handle: FrameHandle);

    /// Take the callback that is due to run now, if any. A cancelled
    /// callback is never returned.
    fn take_due(&mut self) -> Option<FrameHandle>;
}

/// Wall-clock scheduler used by the showcase host: each request becomes
/// due one frame interval after it was made.
#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    next_handle: u64,
    pending: Option<(FrameHandle, Instant)>,
}

impl TickScheduler {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next_handle: 0,
            pending: None,
        }
    }

    /// Time until the pending callback is due, for host poll timeouts.
    pub fn until_due(&self) -> Option<Duration> {
        self.pending
            .map(|(_, deadline)| deadline.saturating_duration_since(Instant::now()))
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some((handle, Instant::now() + self.interval));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending.map(|(h, _)| h) == Some(handle) {
            self.pending = None;
        }
    }

    fn take_due(&mut self) -> Option<FrameHandle> {
        match self.pending {
            Some((handle, deadline)) if Instant::now() >= deadline => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }
}

/// Test scheduler: callbacks fire only when [`ManualScheduler::fire`] is
/// called, and schedule/cancel invocations are counted.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: u64,
    pending: Option<FrameHandle>,
    due: Option<FrameHandle>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Promote the pending callback to due, as a display refresh would.
    /// Returns false when nothing was pending.
    pub fn fire(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                self.due = Some(handle);
                true
            }
            None => false,
        }
    }

    pub fn schedule_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancel_count(&self) -> usize {
        self.cancelled
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.scheduled += 1;
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        // An in-flight callback may already sit in the due slot; cancel
        // must reach it there too so no stray frame runs after stop.
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        } else if self.due == Some(handle) {
            self.due = None;
            self.cancelled += 1;
        }
    }

    fn take_due(&mut self) -> Option<FrameHandle> {
        self.due.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_fires_once_per_request() {
        let mut s = ManualScheduler::new();
        let h = s.schedule();
        assert!(s.fire());
        assert_eq!(s.take_due(), Some(h));
        assert_eq!(s.take_due(), None);
        assert!(!s.fire());
        assert_eq!(s.schedule_count(), 1);
    }

    #[test]
    fn cancelled_callback_is_never_due() {
        let mut s = ManualScheduler::new();
        let h = s.schedule();
        s.fire();
        s.cancel(h);
        assert_eq!(s.take_due(), None);
        assert_eq!(s.cancel_count(), 1);

        // Cancelling again is a no-op.
        s.cancel(h);
        assert_eq!(s.cancel_count(), 1);
    }

    #[test]
    fn tick_scheduler_becomes_due_after_interval() {
        let mut s = TickScheduler::new(1000);
        let h = s.schedule();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(s.take_due(), Some(h));
        assert_eq!(s.take_due(), None);
    }
}
