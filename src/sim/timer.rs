//! Cooperative timer service
//!
//! A deterministic stand-in for a host clock: timers are advanced by elapsed
//! milliseconds and fire in due order, ties broken by scheduling order.
//! Firing does not call back into the caller; [`Timers::pop_due`] hands the
//! tag back so the owner can dispatch it and freely schedule or cancel more
//! timers in between.

/// Handle used to cancel a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    handle: TimerHandle,
    due_ms: f64,
    period_ms: Option<f64>,
    tag: T,
}

#[derive(Debug, Clone)]
pub struct Timers<T> {
    now_ms: f64,
    next_handle: u64,
    entries: Vec<TimerEntry<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_handle: 0,
            entries: Vec::new(),
        }
    }

    /// Current clock time (ms)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Fire `tag` every `delay_ms`, first after one full delay
    pub fn schedule_repeating(&mut self, delay_ms: u32, tag: T) -> TimerHandle {
        // A zero period would fire forever within one advance
        let period = f64::from(delay_ms.max(1));
        self.push(period, Some(period), tag)
    }

    /// Fire `tag` once after `delay_ms`
    pub fn schedule_once(&mut self, delay_ms: u32, tag: T) -> TimerHandle {
        self.push(f64::from(delay_ms), None, tag)
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time. Repeating timers are rescheduled one period later.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<T>
    where
        T: Clone,
    {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .partial_cmp(&b.due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.handle.0.cmp(&b.handle.0))
            })
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        self.now_ms = self.now_ms.max(entry.due_ms);
        let fired = entry.tag.clone();
        match entry.period_ms {
            Some(period) => entry.due_ms += period,
            None => {
                self.entries.remove(idx);
            }
        }
        Some(fired)
    }

    /// Move the clock forward without firing anything (call after draining
    /// [`Timers::pop_due`])
    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn push(&mut self, delay_ms: f64, period_ms: Option<f64>, tag: T) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.entries.push(TimerEntry {
            handle,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            tag,
        });
        handle
    }
}
