use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`], used to cancel the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Deadline-ordered queue of pending tasks.
///
/// Times are offsets from an arbitrary monotonic origin chosen by the caller.
/// Tasks with the same deadline fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn schedule(&mut self, due: Duration, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert((due, id), task);
        self.deadlines.insert(id, due);
        TimerHandle(id)
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(due) => self.entries.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
        self.deadlines.clear();
    }

    /// Remove and return the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, Duration, T)> {
        let (&(due, id), _) = self.entries.iter().next()?;
        if due > now {
            return None;
        }
        self.deadlines.remove(&id);
        self.entries
            .remove(&(due, id))
            .map(|task| (TimerHandle(id), due, task))
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
