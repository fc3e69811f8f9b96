use foundation::time::Millis;
use tracing::trace;

use crate::metrics::Metrics;
use crate::queue::EventQueue;
use crate::tick::Tick;
use crate::timers::{TimerId, Timers};

/// Default cap on events delivered by a single drain.
///
/// Handlers that keep posting follow-ups cannot starve the tick loop.
pub const DEFAULT_DRAIN_LIMIT: usize = 10_000;

/// Receives events from an [`EventLoop`].
///
/// All handlers run on the loop's thread; a handler never blocks, it posts
/// follow-up events or schedules timers through the [`Context`] instead.
pub trait Handler<E> {
    fn handle(&mut self, event: E, cx: &mut Context<'_, E>);

    /// Called once per tick before queued events are drained.
    fn on_tick(&mut self, _tick: Tick, _cx: &mut Context<'_, E>) {}
}

/// Handler-side view of the loop.
pub struct Context<'a, E> {
    now: Millis,
    queue: &'a mut EventQueue<E>,
    timers: &'a mut Timers<E>,
    metrics: &'a mut Metrics,
}

impl<E> Context<'_, E> {
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn post(&mut self, event: E) {
        self.queue.post(event);
    }

    pub fn schedule_in(&mut self, delay: Millis, event: E) -> TimerId {
        self.timers.schedule(self.now + delay, event)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn metrics(&mut self) -> &mut Metrics {
        self.metrics
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrainSummary {
    pub delivered: usize,
    /// Events left queued because the drain limit was reached.
    pub deferred: usize,
}

/// Single-threaded cooperative event loop.
///
/// Ordering contract:
/// - Posted events are delivered in posting order.
/// - Timers due at a tick are enqueued in `(due, insertion_order)` after
///   anything already queued.
pub struct EventLoop<E> {
    tick: Tick,
    queue: EventQueue<E>,
    timers: Timers<E>,
    metrics: Metrics,
    drain_limit: usize,
}

impl<E> EventLoop<E> {
    pub fn new(step: Millis) -> Self {
        Self {
            tick: Tick::new(0, step),
            queue: EventQueue::new(),
            timers: Timers::new(),
            metrics: Metrics::new(),
            drain_limit: DEFAULT_DRAIN_LIMIT,
        }
    }

    pub fn with_drain_limit(mut self, limit: usize) -> Self {
        self.drain_limit = limit.max(1);
        self
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn now(&self) -> Millis {
        self.tick.now
    }

    pub fn post(&mut self, event: E) {
        self.queue.post(event);
    }

    pub fn schedule_in(&mut self, delay: Millis, event: E) -> TimerId {
        self.timers.schedule(self.tick.now + delay, event)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Delivers queued events, including ones posted while draining.
    pub fn run_until_idle<H: Handler<E>>(&mut self, handler: &mut H) -> DrainSummary {
        let mut delivered = 0usize;
        while delivered < self.drain_limit {
            let Some((seq, event)) = self.queue.pop() else {
                break;
            };
            trace!(seq, now = self.tick.now.0, "deliver event");
            let mut cx = Context {
                now: self.tick.now,
                queue: &mut self.queue,
                timers: &mut self.timers,
                metrics: &mut self.metrics,
            };
            handler.handle(event, &mut cx);
            delivered += 1;
        }
        self.metrics.inc_by("loop.events", delivered as u64);

        DrainSummary {
            delivered,
            deferred: self.queue.len(),
        }
    }

    /// Moves to the next tick, fires due timers and drains the queue.
    pub fn advance<H: Handler<E>>(&mut self, handler: &mut H) -> DrainSummary {
        self.tick = self.tick.next();
        self.metrics.inc("loop.ticks");

        for event in self.timers.take_due(self.tick.now) {
            self.queue.post(event);
        }

        let mut cx = Context {
            now: self.tick.now,
            queue: &mut self.queue,
            timers: &mut self.timers,
            metrics: &mut self.metrics,
        };
        handler.on_tick(self.tick, &mut cx);

        self.run_until_idle(handler)
    }

    /// Advances tick by tick until loop time reaches `until`.
    pub fn run_until<H: Handler<E>>(&mut self, until: Millis, handler: &mut H) {
        self.run_until_idle(handler);
        while self.tick.now < until {
            self.advance(handler);
        }
    }
}
