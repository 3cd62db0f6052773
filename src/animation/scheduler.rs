use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
    sync::Arc,
};

use crate::foundation::{clock::Clock, error::WallResult};

type FrameCallback = Rc<RefCell<dyn FnMut(f64) -> WallResult<()>>>;

/// Running state and subscriber count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    /// Whether the shared loop is ticking.
    pub is_running: bool,
    /// Live subscriptions.
    pub subscriber_count: usize,
}

struct Inner {
    clock: Arc<dyn Clock>,
    subscribers: Vec<(u64, FrameCallback)>,
    next_id: u64,
    running: bool,
    last_time_ms: f64,
    max_delta_secs: f64,
}

impl Inner {
    fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_time_ms = self.clock.now_ms();
        }
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

/// One frame loop shared by many independent subscribers.
///
/// The loop starts with the first subscriber and stops when the last one leaves. Cloning the
/// scheduler yields another handle to the same loop.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<Inner>>,
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("status", &self.status())
            .finish()
    }
}

/// Handle returned by [`FrameScheduler::subscribe`]; dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    inner: Weak<RefCell<Inner>>,
    id: u64,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    /// Remove the callback now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            tracing::warn!(id = self.id, "unsubscribe during scheduler borrow ignored");
            return;
        };
        inner.subscribers.retain(|(id, _)| *id != self.id);
        if inner.subscribers.is_empty() {
            inner.stop();
        }
    }
}

impl FrameScheduler {
    /// Stopped scheduler clamping deltas to `max_delta_secs`.
    pub fn new(clock: Arc<dyn Clock>, max_delta_secs: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                clock,
                subscribers: Vec::new(),
                next_id: 0,
                running: false,
                last_time_ms: 0.0,
                max_delta_secs,
            })),
        }
    }

    /// Register a per-frame callback receiving the clamped delta in seconds.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(f64) -> WallResult<()> + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        let callback: FrameCallback = Rc::new(RefCell::new(callback));
        inner.subscribers.push((id, callback));
        if inner.subscribers.len() == 1 {
            inner.start();
        }
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver one frame to every subscriber. Returns how many were notified.
    ///
    /// Subscriber errors are logged and do not stop the fan-out.
    pub fn tick(&self, now_ms: f64) -> usize {
        let (delta, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.running {
                return 0;
            }
            let delta = ((now_ms - inner.last_time_ms) / 1000.0)
                .min(inner.max_delta_secs)
                .max(0.0);
            inner.last_time_ms = now_ms;
            let callbacks: Vec<FrameCallback> =
                inner.subscribers.iter().map(|(_, cb)| cb.clone()).collect();
            (delta, callbacks)
        };

        let mut notified = 0;
        for cb in callbacks {
            let Ok(mut f) = cb.try_borrow_mut() else {
                continue;
            };
            notified += 1;
            if let Err(e) = (&mut *f)(delta) {
                tracing::error!(error = %e, "animation callback error");
            }
        }
        notified
    }

    /// Start ticking even without subscribers.
    pub fn force_start(&self) {
        self.inner.borrow_mut().start();
    }

    /// Stop ticking even with subscribers.
    pub fn force_stop(&self) {
        self.inner.borrow_mut().stop();
    }

    /// Running state and subscriber count.
    pub fn status(&self) -> SchedulerStatus {
        let inner = self.inner.borrow();
        SchedulerStatus {
            is_running: inner.running,
            subscriber_count: inner.subscribers.len(),
        }
    }
}

/// Interval timer driven by a shared frame loop.
///
/// Accumulates the loop's deltas and marks itself due each time `interval_secs` has passed.
/// Hosts poll [`FrameTimer::take_due`] after a frame to run periodic work such as statistics.
#[derive(Debug)]
pub struct FrameTimer {
    due: Rc<Cell<u32>>,
    _subscription: Subscription,
}

impl FrameTimer {
    /// Subscribe a timer to `scheduler`. Non-positive intervals fire on every frame.
    pub fn every(scheduler: &FrameScheduler, interval_secs: f64) -> Self {
        let due = Rc::new(Cell::new(0u32));
        let counter = due.clone();
        let mut elapsed = 0.0;
        let subscription = scheduler.subscribe(move |delta| {
            elapsed += delta;
            if elapsed >= interval_secs {
                elapsed = if interval_secs > 0.0 { elapsed % interval_secs } else { 0.0 };
                counter.set(counter.get().saturating_add(1));
            }
            Ok(())
        });
        Self {
            due,
            _subscription: subscription,
        }
    }

    /// Whether the interval elapsed since the last call. Clears the pending count.
    pub fn take_due(&self) -> bool {
        self.due.replace(0) > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
