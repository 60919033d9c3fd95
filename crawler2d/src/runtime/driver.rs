use crate::render::{DrawList, append_draw_list};
use crate::runtime::{Creature, Leg, SpineSegment, TickReport, Viewport};
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Read-only view of the creature after a tick.
#[derive(Copy, Clone, Debug)]
pub struct FrameSnapshot<'a> {
    pub tick: u64,
    pub dt: f32,
    pub time: f64,
    pub viewport: Viewport,
    pub segments: &'a [SpineSegment],
    pub legs: &'a [Leg],
}

impl<'a> FrameSnapshot<'a> {
    pub fn segment_positions(&self) -> impl Iterator<Item = Vec2> + 'a {
        self.segments.iter().map(|segment| segment.position)
    }

    /// Feet as drawn, not as simulated.
    pub fn rendered_feet(&self) -> impl Iterator<Item = Vec2> + 'a {
        self.legs.iter().map(|leg| leg.render_foot)
    }
}

/// Per-frame hook for decorative collaborators. Both callbacks default to no-ops.
pub trait FrameObserver {
    /// Draws behind the creature. Called after the tick, before the creature is projected.
    fn draw_underlay(&mut self, _out: &mut DrawList, _frame: &FrameSnapshot<'_>) {}

    /// Called once the frame's draw list is complete.
    fn on_frame(&mut self, _frame: &FrameSnapshot<'_>) {}
}

impl<T: FrameObserver + ?Sized> FrameObserver for Rc<RefCell<T>> {
    fn draw_underlay(&mut self, out: &mut DrawList, frame: &FrameSnapshot<'_>) {
        if let Ok(mut inner) = self.try_borrow_mut() {
            inner.draw_underlay(out, frame);
        }
    }

    fn on_frame(&mut self, frame: &FrameSnapshot<'_>) {
        if let Ok(mut inner) = self.try_borrow_mut() {
            inner.on_frame(frame);
        }
    }
}

/// Shared stop flag between a driver and the handles it gave out.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Returned by [`FrameDriver::start`]. Stopping is idempotent.
#[derive(Clone, Debug)]
pub struct DriverHandle {
    token: CancellationToken,
}

impl DriverHandle {
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            log::info!("frame driver stopped");
        }
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// Owns the per-frame order: tick, clear, underlays, creature, observers.
pub struct FrameDriver {
    creature: Creature,
    draw_list: DrawList,
    observers: Vec<Box<dyn FrameObserver>>,
    token: Option<CancellationToken>,
    last_timestamp: Option<f64>,
    last_report: Option<TickReport>,
}

impl FrameDriver {
    pub fn new(creature: Creature) -> Self {
        Self {
            creature,
            draw_list: DrawList::default(),
            observers: Vec::new(),
            token: None,
            last_timestamp: None,
            last_report: None,
        }
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    pub fn add_observer(&mut self, observer: impl FrameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Starts (or restarts) the loop. Handles from an earlier start stay stopped.
    pub fn start(&mut self) -> DriverHandle {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        self.last_timestamp = None;
        DriverHandle { token }
    }

    pub fn is_running(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Forgets the last timestamp so the next frame does not see the gap as elapsed time,
    /// e.g. after the page was hidden.
    pub fn resume_clock(&mut self) {
        self.last_timestamp = None;
    }

    /// Runs one frame at host time `timestamp` (seconds). Returns `None` once stopped.
    pub fn frame(&mut self, timestamp: f64) -> Option<&DrawList> {
        if !self.is_running() {
            return None;
        }
        let dt = match self.last_timestamp {
            Some(previous) if timestamp.is_finite() => (timestamp - previous).max(0.0) as f32,
            _ => 0.0,
        };
        if timestamp.is_finite() {
            self.last_timestamp = Some(timestamp);
        }
        Some(self.step(dt))
    }

    /// Runs one frame with an explicit time step, regardless of the running state.
    pub fn step(&mut self, dt: f32) -> &DrawList {
        let report = self.creature.update(dt);

        self.draw_list.clear();
        let snapshot = self.creature.snapshot(report.dt);
        for observer in &mut self.observers {
            observer.draw_underlay(&mut self.draw_list, &snapshot);
        }
        append_draw_list(&mut self.draw_list, &self.creature);
        for observer in &mut self.observers {
            observer.on_frame(&snapshot);
        }

        self.last_report = Some(report);
        &self.draw_list
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }
}
