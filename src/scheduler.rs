//! Deterministic timers
//!
//! A millisecond clock plus a list of pending tasks. Intervals hand back a
//! [`TaskHandle`] so they can be stopped; one-shots cannot be cancelled.
//! The clock only moves when the owner calls [`Scheduler::pop_due`].

/// Cancellation handle for an interval task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: u64,
    due_ms: u64,
    /// Some for intervals
    period_ms: Option<u64>,
    task: T,
}

/// Pending tasks keyed by due time
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of pending tasks
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.id == handle.0)
    }

    fn push(&mut self, delay_ms: u64, period_ms: Option<u64>, task: T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            task,
        });
        id
    }

    /// Run `task` every `period_ms`, first one period from now
    pub fn every(&mut self, period_ms: u64, task: T) -> TaskHandle {
        // A zero period would fire forever without the clock moving
        let period_ms = period_ms.max(1);
        TaskHandle(self.push(period_ms, Some(period_ms), task))
    }

    /// Run `task` once, `delay_ms` from now
    pub fn once(&mut self, delay_ms: u64, task: T) {
        self.push(delay_ms, None, task);
    }

    /// Stop an interval. Takes effect immediately, even between two due
    /// tasks of the same `pop_due` sweep. Returns false if it was not pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != handle.0);
        self.entries.len() != before
    }
}

impl<T: Copy> Scheduler<T> {
    /// Next task due at or before `until_ms`, moving the clock to its due
    /// time. Ties go to the task scheduled first. When nothing is due the
    /// clock moves to `until_ms` and `None` is returned.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        let next = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.id))
            .map(|(idx, _)| idx);

        let Some(idx) = next else {
            self.now_ms = self.now_ms.max(until_ms);
            return None;
        };

        let entry = &mut self.entries[idx];
        self.now_ms = self.now_ms.max(entry.due_ms);
        let task = entry.task;
        match entry.period_ms {
            Some(period) => entry.due_ms += period,
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Job {
        Tick,
        Alarm,
    }

    fn drain(s: &mut Scheduler<Job>, until: u64) -> Vec<(u64, Job)> {
        let mut fired = Vec::new();
        while let Some(job) = s.pop_due(until) {
            fired.push((s.now_ms(), job));
        }
        fired
    }

    #[test]
    fn test_interval_fires_each_period() {
        let mut s = Scheduler::new();
        s.every(16, Job::Tick);
        assert_eq!(
            drain(&mut s, 50),
            vec![(16, Job::Tick), (32, Job::Tick), (48, Job::Tick)]
        );
        assert_eq!(s.now_ms(), 50);
        assert_eq!(drain(&mut s, 63), vec![]);
        assert_eq!(drain(&mut s, 64), vec![(64, Job::Tick)]);
    }

    #[test]
    fn test_once_fires_once() {
        let mut s = Scheduler::new();
        s.once(100, Job::Alarm);
        assert_eq!(drain(&mut s, 99), vec![]);
        assert_eq!(drain(&mut s, 1000), vec![(100, Job::Alarm)]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_ties_keep_schedule_order() {
        let mut s = Scheduler::new();
        s.once(32, Job::Alarm);
        s.every(16, Job::Tick);
        assert_eq!(
            drain(&mut s, 32),
            vec![(16, Job::Tick), (32, Job::Alarm), (32, Job::Tick)]
        );
    }

    #[test]
    fn test_cancel_mid_sweep() {
        let mut s = Scheduler::new();
        let tick = s.every(10, Job::Tick);
        let mut fired = 0;
        while let Some(job) = s.pop_due(100) {
            assert_eq!(job, Job::Tick);
            fired += 1;
            if fired == 3 {
                assert!(s.cancel(tick));
            }
        }
        assert_eq!(fired, 3);
        assert!(!s.is_scheduled(tick));
        assert!(!s.cancel(tick));
        assert_eq!(s.now_ms(), 100);
    }

    #[test]
    fn test_zero_period_still_advances() {
        let mut s = Scheduler::new();
        s.every(0, Job::Tick);
        assert_eq!(drain(&mut s, 3).len(), 3);
    }
}
