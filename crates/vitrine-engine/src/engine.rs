//! Engine composition and the frame loop state machine.

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use vitrine_core::AnimationSpeed;

use crate::context::{FrameContext, Pointer};
use crate::error::EngineError;
use crate::events::{EventSource, Subscription};
use crate::scheduler::{FrameHandle, Scheduler};
use crate::surface::Surface;

/// One animated background, as the engine sees it.
///
/// Implementations own their populations and per-variant state; the engine
/// owns the surface, the clock, the RNG and the loop.
pub trait Background {
    /// Discard all state derived from the previous dimensions and build a
    /// fresh scene for the given surface size, in device pixels. Called
    /// once at mount and again on every resize.
    fn rebuild(&mut self, width: f32, height: f32, rng: &mut StdRng);

    /// Simulate and paint one frame.
    fn frame(&mut self, surface: &mut Surface, ctx: &FrameContext, rng: &mut StdRng);

    /// Whether this background reacts to pointer movement beyond reading
    /// the shared position. Engines only subscribe to pointer events for
    /// backgrounds that return true.
    fn wants_pointer(&self) -> bool {
        false
    }

    /// Pointer movement callback, delivered only while subscribed.
    fn pointer_moved(&mut self, _x: f32, _y: f32, _t: f32) {}
}

/// Frame loop state. There is no paused-with-pending-frame state: Stopped
/// means no callback is scheduled and none will run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Binds one background to one surface and drives its frame loop.
///
/// Each engine instance is independent: its own surface, clock, RNG and
/// subscriptions. Simulation time advances by a fixed step per painted
/// frame, so a given seed yields an identical animation regardless of how
/// irregularly the host fires callbacks.
pub struct Engine<S: Scheduler> {
    surface: Surface,
    background: Box<dyn Background>,
    scheduler: S,
    state: LoopState,
    pending: Option<FrameHandle>,
    pointer: Pointer,
    t: f32,
    speed: AnimationSpeed,
    rng: StdRng,
    resize_events: Box<dyn EventSource>,
    pointer_events: Box<dyn EventSource>,
    resize_sub: Option<Subscription>,
    pointer_sub: Option<Subscription>,
    frames_painted: u64,
}

impl<S: Scheduler> Engine<S> {
    /// Bind a background to a fresh surface and start the loop.
    ///
    /// Surface allocation happens before any subscription, so a failed
    /// mount leaves no registration behind and nothing to tear down.
    #[allow(clippy::too_many_arguments)]
    pub fn mount(
        background: Box<dyn Background>,
        cols: u16,
        rows: u16,
        speed: AnimationSpeed,
        seed: u64,
        scheduler: S,
        resize_events: Box<dyn EventSource>,
        pointer_events: Box<dyn EventSource>,
    ) -> Result<Self, EngineError> {
        let surface = Surface::new(cols, rows)?;
        let mut engine = Self {
            surface,
            background,
            scheduler,
            state: LoopState::Stopped,
            pending: None,
            pointer: Pointer::OFF_SURFACE,
            t: 0.0,
            speed,
            rng: StdRng::seed_from_u64(seed),
            resize_events,
            pointer_events,
            resize_sub: None,
            pointer_sub: None,
            frames_painted: 0,
        };
        engine.resize_sub = Some(engine.resize_events.subscribe());
        if engine.background.wants_pointer() {
            engine.pointer_sub = Some(engine.pointer_events.subscribe());
        }
        engine
            .background
            .rebuild(engine.surface.width(), engine.surface.height(), &mut engine.rng);
        debug!("engine mounted at {cols}x{rows} cells, seed {seed}");
        engine.start();
        Ok(engine)
    }

    /// Start the loop. Idempotent: a running engine keeps its single
    /// pending callback.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        debug!("frame loop started");
        self.state = LoopState::Running;
        self.pending = Some(self.scheduler.schedule());
    }

    /// Stop the loop and cancel the pending callback. Idempotent.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        debug!("frame loop stopped after {} frames", self.frames_painted);
        self.state = LoopState::Stopped;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Run the due frame callback, if any. Returns whether a frame was
    /// painted.
    ///
    /// A callback that arrives after stop, or that is not the one this
    /// engine scheduled, paints nothing and schedules nothing.
    pub fn run_due_frame(&mut self) -> bool {
        let Some(handle) = self.scheduler.take_due() else {
            return false;
        };
        if self.state != LoopState::Running || self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        self.paint_frame();
        self.pending = Some(self.scheduler.schedule());
        true
    }

    fn paint_frame(&mut self) {
        self.t += self.speed.time_step();
        let ctx = FrameContext {
            t: self.t,
            dt: self.speed.time_step(),
            width: self.surface.width(),
            height: self.surface.height(),
            pointer: self.pointer,
        };
        self.background.frame(&mut self.surface, &ctx, &mut self.rng);
        self.frames_painted += 1;
    }

    /// Host resize notification. Ignored once the resize subscription is
    /// released. The surface is reallocated and the scene rebuilt even
    /// when the dimensions are unchanged.
    pub fn notify_resize(&mut self, cols: u16, rows: u16) {
        if self.resize_sub.is_none() {
            return;
        }
        if let Err(err) = self.surface.resize(cols, rows) {
            warn!("ignoring resize to zero area: {err}");
            return;
        }
        self.background
            .rebuild(self.surface.width(), self.surface.height(), &mut self.rng);
    }

    /// Host pointer notification, in device pixels. The shared position is
    /// always updated; the movement callback is delivered only while the
    /// pointer subscription is held.
    pub fn notify_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Pointer::new(x, y);
        if self.pointer_sub.is_some() {
            self.background.pointer_moved(x, y, self.t);
        }
    }

    /// Full teardown: release both subscriptions, then stop the loop.
    /// Idempotent; also run on drop.
    pub fn unmount(&mut self) {
        if let Some(sub) = self.resize_sub.take() {
            self.resize_events.unsubscribe(sub);
        }
        if let Some(sub) = self.pointer_sub.take() {
            self.pointer_events.unsubscribe(sub);
        }
        self.stop();
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: Scheduler> Drop for Engine<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::events::HostEvents;
    use crate::scheduler::ManualScheduler;

    use super::*;

    type SharedEvents = Rc<RefCell<HostEvents>>;

    #[derive(Default)]
    struct Stats {
        rebuilds: u32,
        frames: u32,
        pointer_moves: u32,
    }

    struct Recorder {
        stats: Rc<RefCell<Stats>>,
        reactive: bool,
    }

    impl Background for Recorder {
        fn rebuild(&mut self, _width: f32, _height: f32, _rng: &mut StdRng) {
            self.stats.borrow_mut().rebuilds += 1;
        }

        fn frame(&mut self, _surface: &mut Surface, _ctx: &FrameContext, _rng: &mut StdRng) {
            self.stats.borrow_mut().frames += 1;
        }

        fn wants_pointer(&self) -> bool {
            self.reactive
        }

        fn pointer_moved(&mut self, _x: f32, _y: f32, _t: f32) {
            self.stats.borrow_mut().pointer_moves += 1;
        }
    }

    fn mounted(
        reactive: bool,
    ) -> (Engine<ManualScheduler>, Rc<RefCell<Stats>>, SharedEvents, SharedEvents) {
        let stats = Rc::new(RefCell::new(Stats::default()));
        let resize = SharedEvents::default();
        let pointer = SharedEvents::default();
        let engine = Engine::mount(
            Box::new(Recorder { stats: Rc::clone(&stats), reactive }),
            80,
            24,
            AnimationSpeed::Medium,
            42,
            ManualScheduler::new(),
            Box::new(Rc::clone(&resize)),
            Box::new(Rc::clone(&pointer)),
        )
        .unwrap();
        (engine, stats, resize, pointer)
    }

    #[test]
    fn exactly_one_schedule_per_painted_frame() {
        let (mut engine, stats, _, _) = mounted(false);
        assert_eq!(engine.state(), LoopState::Running);
        assert_eq!(stats.borrow().rebuilds, 1);
        assert_eq!(engine.scheduler().schedule_count(), 1);

        for _ in 0..5 {
            engine.scheduler_mut().fire();
            assert!(engine.run_due_frame());
        }
        assert_eq!(engine.frames_painted(), 5);
        assert_eq!(stats.borrow().frames, 5);
        // One request at start, one after each painted frame.
        assert_eq!(engine.scheduler().schedule_count(), 6);
        assert!(engine.scheduler().has_pending());
    }

    #[test]
    fn stop_cancels_pending_and_is_idempotent() {
        let (mut engine, _, _, _) = mounted(false);
        engine.stop();
        assert_eq!(engine.state(), LoopState::Stopped);
        assert_eq!(engine.scheduler().cancel_count(), 1);
        assert!(!engine.scheduler().has_pending());

        engine.stop();
        assert_eq!(engine.scheduler().cancel_count(), 1);

        // Restart schedules a fresh callback.
        engine.start();
        engine.start();
        assert_eq!(engine.scheduler().schedule_count(), 2);
    }

    #[test]
    fn callback_landing_after_stop_paints_nothing() {
        let (mut engine, stats, _, _) = mounted(false);
        engine.scheduler_mut().fire();
        engine.stop();
        assert!(!engine.run_due_frame());
        assert_eq!(stats.borrow().frames, 0);
        assert!(!engine.scheduler().has_pending());
    }

    #[test]
    fn resize_rebuilds_even_at_identical_dimensions() {
        let (mut engine, stats, _, _) = mounted(false);
        engine.notify_resize(100, 30);
        assert_eq!(stats.borrow().rebuilds, 2);
        engine.notify_resize(100, 30);
        assert_eq!(stats.borrow().rebuilds, 3);

        // Zero-area resize is logged and ignored.
        engine.notify_resize(0, 30);
        assert_eq!(stats.borrow().rebuilds, 3);
        assert_eq!(engine.surface().cols(), 100);
    }

    #[test]
    fn failed_mount_leaves_no_subscription() {
        let resize = SharedEvents::default();
        let pointer = SharedEvents::default();
        let result = Engine::mount(
            Box::new(Recorder { stats: Rc::default(), reactive: true }),
            0,
            24,
            AnimationSpeed::Medium,
            42,
            ManualScheduler::new(),
            Box::new(Rc::clone(&resize)),
            Box::new(Rc::clone(&pointer)),
        );
        assert_eq!(result.err(), Some(EngineError::EmptySurface { cols: 0, rows: 24 }));
        assert_eq!(resize.borrow().subscriber_count(), 0);
        assert_eq!(pointer.borrow().subscriber_count(), 0);
    }

    #[test]
    fn unmount_releases_everything_once() {
        let (mut engine, _, resize, pointer) = mounted(true);
        assert_eq!(resize.borrow().subscriber_count(), 1);
        assert_eq!(pointer.borrow().subscriber_count(), 1);

        engine.unmount();
        assert_eq!(resize.borrow().subscriber_count(), 0);
        assert_eq!(pointer.borrow().subscriber_count(), 0);
        assert_eq!(engine.state(), LoopState::Stopped);

        // Notifications after unmount are ignored.
        let cols_before = engine.surface().cols();
        engine.notify_resize(10, 10);
        assert_eq!(engine.surface().cols(), cols_before);

        drop(engine);
        assert_eq!(resize.borrow().subscriber_count(), 0);
        assert_eq!(pointer.borrow().subscriber_count(), 0);
    }

    #[test]
    fn pointer_subscription_follows_background_interest() {
        let (mut engine, stats, _, pointer) = mounted(false);
        assert_eq!(pointer.borrow().subscriber_count(), 0);

        engine.notify_pointer(12.0, 8.0);
        assert_eq!(stats.borrow().pointer_moves, 0);
        // Shared position updates regardless.
        engine.scheduler_mut().fire();
        engine.run_due_frame();

        let (mut reactive, stats, _, pointer) = mounted(true);
        assert_eq!(pointer.borrow().subscriber_count(), 1);
        reactive.notify_pointer(12.0, 8.0);
        assert_eq!(stats.borrow().pointer_moves, 1);
    }
}
