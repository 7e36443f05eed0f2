//! One-shot and repeating timers, polled by the frame driver.
//!
//! Timers are not preemptive: they fire during [`Timers::process`], at the
//! resolution of the polling frequency.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use smallvec::SmallVec;
use web_time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

type TimerCallback = Rc<dyn Fn(TimerId)>;

struct TimerEntry {
    id: TimerId,
    due: Instant,
    interval: Option<Duration>,
    callback: TimerCallback,
}

#[derive(Default)]
struct TimerQueue {
    next_id: u64,
    entries: Vec<TimerEntry>,
}

/// Shared timer queue. Callbacks may schedule or cancel timers, including
/// their own.
#[derive(Clone, Default)]
pub struct Timers {
    queue: Rc<RefCell<TimerQueue>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timeout(&self, delay: Duration, f: impl Fn(TimerId) + 'static) -> TimerId {
        self.schedule_at(Instant::now() + delay, None, f)
    }

    pub fn set_interval(&self, period: Duration, f: impl Fn(TimerId) + 'static) -> TimerId {
        self.schedule_at(Instant::now() + period, Some(period), f)
    }

    /// Fires first at `due`, then every `interval` if one is given.
    pub fn schedule_at(
        &self,
        due: Instant,
        interval: Option<Duration>,
        f: impl Fn(TimerId) + 'static,
    ) -> TimerId {
        let mut q = self.queue.borrow_mut();
        q.next_id += 1;
        let id = TimerId(q.next_id);
        q.entries.push(TimerEntry {
            id,
            due,
            interval,
            callback: Rc::new(f),
        });
        id
    }

    /// `false` if the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut q = self.queue.borrow_mut();
        let before = q.entries.len();
        q.entries.retain(|e| e.id != id);
        q.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().entries.is_empty()
    }

    /// Runs every timer due at `now`, in scheduling order. A repeating timer
    /// fires at most once per call. Returns the number of callbacks run.
    pub fn process(&self, now: Instant) -> usize {
        let due: SmallVec<[TimerId; 8]> = self
            .queue
            .borrow()
            .entries
            .iter()
            .filter(|e| e.due <= now)
            .map(|e| e.id)
            .collect();

        let mut fired = 0;
        for id in due {
            // Re-checked per timer: an earlier callback may have cancelled it.
            let callback = {
                let mut q = self.queue.borrow_mut();
                let Some(pos) = q.entries.iter().position(|e| e.id == id) else {
                    continue;
                };
                let interval = q.entries[pos].interval;
                match interval {
                    Some(period) => {
                        let entry = &mut q.entries[pos];
                        entry.due += period;
                        if entry.due <= now {
                            entry.due = now + period;
                        }
                        entry.callback.clone()
                    }
                    None => q.entries.remove(pos).callback,
                }
            };
            callback(id);
            fired += 1;
        }
        if fired > 0 {
            log::trace!("timers: {fired} fired");
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_timeout_fires_once() {
        let timers = Timers::new();
        let t0 = Instant::now();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        timers.schedule_at(t0 + ms(10), None, move |_| h.set(h.get() + 1));

        assert_eq!(timers.process(t0 + ms(5)), 0);
        assert_eq!(timers.process(t0 + ms(10)), 1);
        assert_eq!(timers.process(t0 + ms(50)), 0);
        assert_eq!(hits.get(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_interval_fires_once_per_poll() {
        let timers = Timers::new();
        let t0 = Instant::now();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = timers.schedule_at(t0 + ms(10), Some(ms(10)), move |_| h.set(h.get() + 1));

        // Late poll: three periods elapsed, one call.
        assert_eq!(timers.process(t0 + ms(35)), 1);
        assert_eq!(timers.process(t0 + ms(40)), 0);
        assert_eq!(timers.process(t0 + ms(45)), 1);
        assert_eq!(hits.get(), 2);

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.process(t0 + ms(100)), 0);
    }

    #[test]
    fn test_callback_can_cancel_pending_timer() {
        let timers = Timers::new();
        let t0 = Instant::now();
        let hits = Rc::new(Cell::new(0));
        let target: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));

        let handle = timers.clone();
        let victim = target.clone();
        let h = hits.clone();
        timers.schedule_at(t0 + ms(1), None, move |_| {
            h.set(h.get() + 1);
            if let Some(id) = victim.get() {
                handle.cancel(id);
            }
        });
        let h = hits.clone();
        target.set(Some(timers.schedule_at(t0 + ms(2), None, move |_| {
            h.set(h.get() + 10)
        })));

        assert_eq!(timers.process(t0 + ms(5)), 1);
        assert_eq!(hits.get(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_interval_cancels_itself() {
        let timers = Timers::new();
        let t0 = Instant::now();
        let hits = Rc::new(Cell::new(0));
        let handle = timers.clone();
        let h = hits.clone();
        timers.schedule_at(t0, Some(ms(1)), move |id| {
            h.set(h.get() + 1);
            handle.cancel(id);
        });

        timers.process(t0);
        timers.process(t0 + ms(10));
        assert_eq!(hits.get(), 1);
        assert!(timers.is_empty());
    }
}
