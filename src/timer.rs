//! Timer Queue - Cooperative, single-threaded timers on a logical clock
//!
//! Timers carry a task value instead of a callback. The owner pumps the queue
//! with [`TimerQueue::pop_due`] and dispatches each task itself, so a task can
//! freely mutate the owner and schedule more timers.
//!
//! # Pattern
//!
//! - `set_timeout` fires once, `set_interval` fires every period
//! - Timers due at the same instant fire in the order they were scheduled
//! - `clear` is safe for any id, fired or not
//! - Logical time only moves when the owner pumps
//!
//! # Example
//!
//! ```
//! use sparkle_tui::timer::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! timers.set_timeout(100, "once");
//! let tick = timers.set_interval(40, "tick");
//!
//! let mut fired = Vec::new();
//! while let Some((_, task)) = timers.pop_due(100) {
//!     fired.push((timers.now(), task));
//! }
//! timers.advance_to(100);
//! timers.clear(tick);
//!
//! assert_eq!(fired, vec![(40, "tick"), (80, "tick"), (100, "once")]);
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

// =============================================================================
// TIMER ID
// =============================================================================

/// Handle for a scheduled timer. Never reused within one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct TimerEntry<T> {
    task: T,
    /// Some for repeating timers.
    period: Option<u64>,
}

// =============================================================================
// TIMER QUEUE
// =============================================================================

/// Logical-time timer queue.
pub struct TimerQueue<T> {
    now: u64,
    next_id: u64,
    next_seq: u64,
    /// (deadline, sequence, id). Stale rows for cleared timers are skipped.
    heap: BinaryHeap<Reverse<(u64, u64, TimerId)>>,
    entries: HashMap<TimerId, TimerEntry<T>>,
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            next_seq: 0,
            heap: BinaryHeap::new(),
            entries: HashMap::new(),
        }
    }

    /// Current logical time in milliseconds.
    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `task` once, `delay_ms` from now.
    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TimerId {
        self.insert(delay_ms, None, task)
    }

    /// Schedule `task` every `period_ms`, first firing one period from now.
    ///
    /// A zero period is treated as 1 ms so a pump always terminates.
    pub fn set_interval(&mut self, period_ms: u64, task: T) -> TimerId {
        let period = period_ms.max(1);
        self.insert(period, Some(period), task)
    }

    /// Cancel a timer. Unknown or already fired ids are ignored.
    ///
    /// Returns true if a pending timer was cancelled.
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Whether `id` is still scheduled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of scheduled timers (one-shot and repeating).
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of scheduled repeating timers.
    pub fn interval_count(&self) -> usize {
        self.entries.values().filter(|e| e.period.is_some()).count()
    }

    /// Period of a scheduled repeating timer.
    pub fn period_of(&self, id: TimerId) -> Option<u64> {
        self.entries.get(&id).and_then(|e| e.period)
    }

    /// Earliest deadline among live timers.
    pub fn next_deadline(&self) -> Option<u64> {
        self.heap
            .iter()
            .filter(|Reverse((_, _, id))| self.entries.contains_key(id))
            .map(|Reverse((deadline, _, _))| *deadline)
            .min()
    }

    /// Pop the next task due at or before `until`.
    ///
    /// Moves the clock to the task's deadline. Repeating timers are
    /// rescheduled one period later before the task is handed out, so
    /// clearing them from the dispatcher works as expected.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, T)> {
        loop {
            let Reverse((deadline, _, id)) = *self.heap.peek()?;
            if deadline > until {
                return None;
            }
            self.heap.pop();

            let Some(entry) = self.entries.get(&id) else {
                continue; // cleared
            };

            self.now = self.now.max(deadline);

            match entry.period {
                Some(period) => {
                    let task = entry.task.clone();
                    let seq = self.bump_seq();
                    self.heap.push(Reverse((deadline + period, seq, id)));
                    return Some((id, task));
                }
                None => {
                    let entry = self.entries.remove(&id)?;
                    return Some((id, entry.task));
                }
            }
        }
    }

    /// Finish a pump: move the clock forward to `until`.
    pub fn advance_to(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, delay: u64, period: Option<u64>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.heap.push(Reverse((self.now + delay, seq, id)));
        self.entries.insert(id, TimerEntry { task, period });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FRAME CLOCK
// =============================================================================

/// Turns wall-clock time into whole logical milliseconds.
///
/// Sub-millisecond remainders carry into the next tick so the logical clock
/// does not drift behind real time.
pub struct FrameClock {
    last: Instant,
    carry: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            carry: 0.0,
        }
    }

    /// Milliseconds elapsed since the previous tick.
    pub fn tick(&mut self) -> u64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f64() * 1000.0;
        self.last = now;
        self.split(elapsed)
    }

    fn split(&mut self, elapsed_ms: f64) -> u64 {
        let total = elapsed_ms + self.carry;
        let whole = total.floor();
        self.carry = total - whole;
        whole as u64
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut TimerQueue<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut fired = Vec::new();
        while let Some((_, task)) = timers.pop_due(until) {
            fired.push((timers.now(), task));
        }
        timers.advance_to(until);
        fired
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut timers = TimerQueue::new();
        let id = timers.set_timeout(50, "a");
        assert!(timers.is_pending(id));

        assert!(drain(&mut timers, 49).is_empty());
        assert_eq!(drain(&mut timers, 50), vec![(50, "a")]);
        assert!(!timers.is_pending(id));
        assert!(drain(&mut timers, 500).is_empty());
    }

    #[test]
    fn test_interval_repeats() {
        let mut timers = TimerQueue::new();
        timers.set_interval(30, "t");
        let fired = drain(&mut timers, 100);
        assert_eq!(fired, vec![(30, "t"), (60, "t"), (90, "t")]);
        assert_eq!(timers.now(), 100);
        assert_eq!(drain(&mut timers, 120), vec![(120, "t")]);
    }

    #[test]
    fn test_same_deadline_fires_in_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.set_timeout(10, "first");
        timers.set_timeout(10, "second");
        timers.set_timeout(0, "zero");
        let fired: Vec<_> = drain(&mut timers, 10).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!["zero", "first", "second"]);
    }

    #[test]
    fn test_clear_is_safe_anytime() {
        let mut timers = TimerQueue::new();
        let once = timers.set_timeout(10, "once");
        let tick = timers.set_interval(10, "tick");

        assert!(timers.clear(tick));
        assert!(!timers.clear(tick));
        assert_eq!(drain(&mut timers, 100), vec![(10, "once")]);
        assert!(!timers.clear(once));
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_counts_and_period() {
        let mut timers = TimerQueue::new();
        timers.set_timeout(5, "a");
        let tick = timers.set_interval(800, "b");
        assert_eq!(timers.pending_count(), 2);
        assert_eq!(timers.interval_count(), 1);
        assert_eq!(timers.period_of(tick), Some(800));
        assert_eq!(timers.next_deadline(), Some(5));

        timers.clear(tick);
        assert_eq!(drain(&mut timers, 10), vec![(5, "a")]);
        assert_eq!(timers.pending_count(), 0);
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_zero_period_interval_terminates() {
        let mut timers = TimerQueue::new();
        timers.set_interval(0, "spin");
        assert_eq!(drain(&mut timers, 3).len(), 3);
    }

    #[test]
    fn test_timers_scheduled_mid_pump_fire_in_same_pump() {
        let mut timers = TimerQueue::new();
        timers.set_timeout(10, "outer");
        let mut fired = Vec::new();
        while let Some((_, task)) = timers.pop_due(100) {
            if task == "outer" {
                timers.set_timeout(15, "inner");
            }
            fired.push((timers.now(), task));
        }
        assert_eq!(fired, vec![(10, "outer"), (25, "inner")]);
    }

    #[test]
    fn test_frame_clock_carries_fraction() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.split(16.5), 16);
        assert_eq!(clock.split(16.5), 17);
        assert_eq!(clock.split(0.25), 0);
        assert_eq!(clock.split(0.75), 1);
    }
}
